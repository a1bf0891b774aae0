use serde::Deserialize;
use std::collections::BTreeMap;

use handle_errors::Error;

use crate::types::{
    category::{Category, CategoryId},
    pagination::{Page, Pagination},
    question::{NewQuestion, Question, QuestionId},
    quiz::QuizScope,
};

#[derive(Deserialize)]
struct Fixture {
    categories: Vec<Category>,
    questions: Vec<Question>,
}

/// Trivia data held in process, ordered by id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    categories: BTreeMap<CategoryId, Category>,
    questions: BTreeMap<QuestionId, Question>,
    next_id: i32,
}

impl MemoryStore {
    /// The bundled dataset, the same rows the seed migration inserts.
    pub fn seeded() -> Result<Self, Error> {
        Self::from_json(include_str!("../../trivia.json"))
    }

    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let fixture: Fixture = serde_json::from_str(raw).map_err(Error::FixtureError)?;
        let next_id = fixture
            .questions
            .iter()
            .map(|question| question.id.0)
            .max()
            .unwrap_or(0)
            + 1;

        Ok(MemoryStore {
            categories: fixture
                .categories
                .into_iter()
                .map(|category| (category.id, category))
                .collect(),
            questions: fixture
                .questions
                .into_iter()
                .map(|question| (question.id, question))
                .collect(),
            next_id,
        })
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories.values().cloned().collect()
    }

    pub fn category(&self, id: CategoryId) -> Result<Category, Error> {
        self.categories
            .get(&id)
            .cloned()
            .ok_or(Error::CategoryNotFound(id.0))
    }

    fn page_of<'a>(
        questions: impl Iterator<Item = &'a Question>,
        pagination: Pagination,
    ) -> Page<Question> {
        let matching: Vec<Question> = questions.cloned().collect();
        Page {
            items: pagination.slice(&matching),
            total: matching.len() as i64,
        }
    }

    fn in_scope(question: &Question, scope: QuizScope) -> bool {
        match scope {
            QuizScope::All => true,
            QuizScope::Category(id) => question.category == id,
        }
    }

    pub fn questions_page(&self, pagination: Pagination) -> Page<Question> {
        Self::page_of(self.questions.values(), pagination)
    }

    pub fn search_page(&self, term: &str, pagination: Pagination) -> Page<Question> {
        let needle = term.to_lowercase();
        Self::page_of(
            self.questions
                .values()
                .filter(|question| question.question.to_lowercase().contains(&needle)),
            pagination,
        )
    }

    pub fn category_page(&self, category: CategoryId, pagination: Pagination) -> Page<Question> {
        Self::page_of(
            self.questions
                .values()
                .filter(|question| question.category == category),
            pagination,
        )
    }

    pub fn count_questions(&self) -> i64 {
        self.questions.len() as i64
    }

    pub fn count_in_scope(&self, scope: QuizScope) -> i64 {
        self.questions
            .values()
            .filter(|question| Self::in_scope(question, scope))
            .count() as i64
    }

    pub fn add_question(&mut self, new_question: NewQuestion) -> Result<Question, Error> {
        if self
            .questions
            .values()
            .any(|question| question.question == new_question.question)
        {
            return Err(Error::DuplicateQuestion);
        }
        // Mirrors the foreign key on questions.category.
        if !self.categories.contains_key(&new_question.category) {
            return Err(Error::CategoryNotFound(new_question.category.0));
        }

        let question = Question {
            id: QuestionId(self.next_id),
            question: new_question.question,
            answer: new_question.answer,
            category: new_question.category,
            difficulty: new_question.difficulty,
        };
        self.next_id += 1;
        self.questions.insert(question.id, question.clone());
        Ok(question)
    }

    pub fn delete_question(&mut self, id: QuestionId) -> Result<Question, Error> {
        self.questions
            .remove(&id)
            .ok_or(Error::QuestionNotFound(id.0))
    }

    pub fn quiz_candidates(&self, scope: QuizScope, previous: &[QuestionId]) -> Vec<Question> {
        self.questions
            .values()
            .filter(|question| Self::in_scope(question, scope))
            .filter(|question| !previous.contains(&question.id))
            .cloned()
            .collect()
    }
}

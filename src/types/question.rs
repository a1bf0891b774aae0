use serde::{Deserialize, Serialize};

use super::category::CategoryId;
use super::lenient::{i32_from_number_or_string, optional_i32_from_number_or_string};

#[derive(Serialize, Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub answer: String,
    pub category: CategoryId,
    pub difficulty: i32,
}

#[derive(Serialize, Debug, Clone, Copy, Eq, Hash, Deserialize, PartialEq, Ord, PartialOrd)]
pub struct QuestionId(#[serde(deserialize_with = "i32_from_number_or_string")] pub i32);

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: CategoryId,
    pub difficulty: i32,
}

/// Body of `POST /questions`: either a search (`searchTerm`) or the fields
/// of a question to add.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct QuestionsRequest {
    #[serde(rename = "searchTerm", default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "optional_i32_from_number_or_string")]
    pub difficulty: Option<i32>,
    #[serde(default, deserialize_with = "optional_i32_from_number_or_string")]
    pub category: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionsAction {
    Search(String),
    Add(NewQuestion),
}

impl QuestionsRequest {
    pub fn into_action(self) -> Result<QuestionsAction, handle_errors::Error> {
        if let Some(term) = self.search_term.filter(|term| !term.is_empty()) {
            return Ok(QuestionsAction::Search(term));
        }

        let question = self
            .question
            .filter(|text| !text.trim().is_empty())
            .ok_or(handle_errors::Error::MissingField("question"))?;
        let answer = self
            .answer
            .filter(|text| !text.trim().is_empty())
            .ok_or(handle_errors::Error::MissingField("answer"))?;
        let difficulty = self
            .difficulty
            .ok_or(handle_errors::Error::MissingField("difficulty"))?;
        let category = self
            .category
            .ok_or(handle_errors::Error::MissingField("category"))?;

        Ok(QuestionsAction::Add(NewQuestion {
            question,
            answer,
            category: CategoryId(category),
            difficulty,
        }))
    }
}

use sqlx::postgres::PgPool;
use std::sync::Arc;
use tokio::sync::RwLock;

use handle_errors::Error;

use crate::types::{
    category::{Category, CategoryId},
    pagination::{Page, Pagination},
    question::{NewQuestion, Question, QuestionId},
    quiz::QuizScope,
};

pub mod memory;
mod postgres;

use memory::MemoryStore;

/// Trivia persistence, either PostgreSQL or an in-process copy of the seed
/// data.
#[derive(Debug, Clone)]
pub enum Store {
    Postgres(PgPool),
    Memory(Arc<RwLock<MemoryStore>>),
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self, Error> {
        let pool = postgres::connect(db_url).await?;
        Ok(Store::Postgres(pool))
    }

    pub fn in_memory() -> Result<Self, Error> {
        Ok(Store::Memory(Arc::new(RwLock::new(MemoryStore::seeded()?))))
    }

    /// Creates and seeds the schema. Nothing to do for the memory backend.
    pub async fn migrate(&self) -> Result<(), Error> {
        match self {
            Store::Postgres(pool) => postgres::migrate(pool).await,
            Store::Memory(_) => Ok(()),
        }
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>, Error> {
        match self {
            Store::Postgres(pool) => postgres::get_categories(pool).await,
            Store::Memory(data) => Ok(data.read().await.categories()),
        }
    }

    pub async fn get_category(&self, id: CategoryId) -> Result<Category, Error> {
        match self {
            Store::Postgres(pool) => postgres::get_category(pool, id).await,
            Store::Memory(data) => data.read().await.category(id),
        }
    }

    pub async fn get_questions(&self, pagination: Pagination) -> Result<Page<Question>, Error> {
        match self {
            Store::Postgres(pool) => postgres::get_questions(pool, pagination).await,
            Store::Memory(data) => Ok(data.read().await.questions_page(pagination)),
        }
    }

    pub async fn search_questions(
        &self,
        term: &str,
        pagination: Pagination,
    ) -> Result<Page<Question>, Error> {
        match self {
            Store::Postgres(pool) => postgres::search_questions(pool, term, pagination).await,
            Store::Memory(data) => Ok(data.read().await.search_page(term, pagination)),
        }
    }

    pub async fn get_category_questions(
        &self,
        category: CategoryId,
        pagination: Pagination,
    ) -> Result<Page<Question>, Error> {
        match self {
            Store::Postgres(pool) => {
                postgres::get_category_questions(pool, category, pagination).await
            }
            Store::Memory(data) => Ok(data.read().await.category_page(category, pagination)),
        }
    }

    pub async fn count_questions(&self) -> Result<i64, Error> {
        match self {
            Store::Postgres(pool) => postgres::count_questions(pool).await,
            Store::Memory(data) => Ok(data.read().await.count_questions()),
        }
    }

    pub async fn count_in_scope(&self, scope: QuizScope) -> Result<i64, Error> {
        match self {
            Store::Postgres(pool) => postgres::count_in_scope(pool, scope).await,
            Store::Memory(data) => Ok(data.read().await.count_in_scope(scope)),
        }
    }

    /// Fails with `Error::DuplicateQuestion` when the text is already stored.
    pub async fn add_question(&self, new_question: NewQuestion) -> Result<Question, Error> {
        match self {
            Store::Postgres(pool) => postgres::add_question(pool, new_question).await,
            Store::Memory(data) => data.write().await.add_question(new_question),
        }
    }

    pub async fn delete_question(&self, id: QuestionId) -> Result<Question, Error> {
        match self {
            Store::Postgres(pool) => postgres::delete_question(pool, id).await,
            Store::Memory(data) => data.write().await.delete_question(id),
        }
    }

    pub async fn quiz_candidates(
        &self,
        scope: QuizScope,
        previous: &[QuestionId],
    ) -> Result<Vec<Question>, Error> {
        match self {
            Store::Postgres(pool) => postgres::quiz_candidates(pool, scope, previous).await,
            Store::Memory(data) => Ok(data.read().await.quiz_candidates(scope, previous)),
        }
    }
}

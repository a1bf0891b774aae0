use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};

use handle_errors::Error;

use crate::types::{
    category::{Category, CategoryId},
    pagination::{Page, Pagination},
    question::{NewQuestion, Question, QuestionId},
    quiz::QuizScope,
};

pub async fn connect(db_url: &str) -> Result<PgPool, Error> {
    match PgPoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await
    {
        Ok(pool) => Ok(pool),
        Err(error) => {
            tracing::event!(tracing::Level::ERROR, "Cannot connect to database: {:?}", error);
            Err(Error::DatabaseQueryError(error))
        }
    }
}

pub async fn migrate(pool: &PgPool) -> Result<(), Error> {
    sqlx::migrate!()
        .run(pool)
        .await
        .map_err(Error::MigrationError)
}

fn question_from_row(row: PgRow) -> Question {
    Question {
        id: QuestionId(row.get("id")),
        question: row.get("question"),
        answer: row.get("answer"),
        category: CategoryId(row.get("category")),
        difficulty: row.get("difficulty"),
    }
}

fn category_from_row(row: PgRow) -> Category {
    Category {
        id: CategoryId(row.get("id")),
        kind: row.get("type"),
    }
}

fn query_failed(error: sqlx::Error) -> Error {
    tracing::event!(tracing::Level::ERROR, "{:?}", error);
    Error::DatabaseQueryError(error)
}

/// The id filter of a quiz scope, `0` standing for every category.
fn scope_filter(scope: QuizScope) -> i32 {
    match scope {
        QuizScope::All => 0,
        QuizScope::Category(id) => id.0,
    }
}

pub async fn get_categories(pool: &PgPool) -> Result<Vec<Category>, Error> {
    sqlx::query("SELECT id, type FROM categories ORDER BY id")
        .map(category_from_row)
        .fetch_all(pool)
        .await
        .map_err(query_failed)
}

pub async fn get_category(pool: &PgPool, id: CategoryId) -> Result<Category, Error> {
    match sqlx::query("SELECT id, type FROM categories WHERE id = $1")
        .bind(id.0)
        .map(category_from_row)
        .fetch_optional(pool)
        .await
    {
        Ok(Some(category)) => Ok(category),
        Ok(None) => Err(Error::CategoryNotFound(id.0)),
        Err(error) => Err(query_failed(error)),
    }
}

pub async fn get_questions(pool: &PgPool, pagination: Pagination) -> Result<Page<Question>, Error> {
    let items = sqlx::query(
        "SELECT id, question, answer, category, difficulty
        FROM questions
        ORDER BY id
        LIMIT $1 OFFSET $2",
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .map(question_from_row)
    .fetch_all(pool)
    .await
    .map_err(query_failed)?;

    let total = count_questions(pool).await?;
    Ok(Page { items, total })
}

pub async fn search_questions(
    pool: &PgPool,
    term: &str,
    pagination: Pagination,
) -> Result<Page<Question>, Error> {
    // strpos matches the term literally, so `%` and `_` need no escaping.
    let items = sqlx::query(
        "SELECT id, question, answer, category, difficulty
        FROM questions
        WHERE strpos(lower(question), lower($1)) > 0
        ORDER BY id
        LIMIT $2 OFFSET $3",
    )
    .bind(term)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .map(question_from_row)
    .fetch_all(pool)
    .await
    .map_err(query_failed)?;

    let total = sqlx::query(
        "SELECT COUNT(*) AS total FROM questions WHERE strpos(lower(question), lower($1)) > 0",
    )
    .bind(term)
    .map(|row: PgRow| row.get::<i64, _>("total"))
    .fetch_one(pool)
    .await
    .map_err(query_failed)?;

    Ok(Page { items, total })
}

pub async fn get_category_questions(
    pool: &PgPool,
    category: CategoryId,
    pagination: Pagination,
) -> Result<Page<Question>, Error> {
    let items = sqlx::query(
        "SELECT id, question, answer, category, difficulty
        FROM questions
        WHERE category = $1
        ORDER BY id
        LIMIT $2 OFFSET $3",
    )
    .bind(category.0)
    .bind(pagination.limit())
    .bind(pagination.offset())
    .map(question_from_row)
    .fetch_all(pool)
    .await
    .map_err(query_failed)?;

    let total = count_in_scope(pool, QuizScope::Category(category)).await?;
    Ok(Page { items, total })
}

pub async fn count_questions(pool: &PgPool) -> Result<i64, Error> {
    count_in_scope(pool, QuizScope::All).await
}

pub async fn count_in_scope(pool: &PgPool, scope: QuizScope) -> Result<i64, Error> {
    sqlx::query("SELECT COUNT(*) AS total FROM questions WHERE ($1 = 0 OR category = $1)")
        .bind(scope_filter(scope))
        .map(|row: PgRow| row.get::<i64, _>("total"))
        .fetch_one(pool)
        .await
        .map_err(query_failed)
}

/// Inserts unless a question with the same text exists; the check and the
/// insert run as one statement.
pub async fn add_question(pool: &PgPool, new_question: NewQuestion) -> Result<Question, Error> {
    match sqlx::query(
        "INSERT INTO questions (question, answer, category, difficulty)
        SELECT $1, $2, $3, $4
        WHERE NOT EXISTS (SELECT 1 FROM questions WHERE question = $1)
        RETURNING id, question, answer, category, difficulty",
    )
    .bind(new_question.question)
    .bind(new_question.answer)
    .bind(new_question.category.0)
    .bind(new_question.difficulty)
    .map(question_from_row)
    .fetch_optional(pool)
    .await
    {
        Ok(Some(question)) => Ok(question),
        Ok(None) => Err(Error::DuplicateQuestion),
        Err(error) => Err(query_failed(error)),
    }
}

pub async fn delete_question(pool: &PgPool, id: QuestionId) -> Result<Question, Error> {
    match sqlx::query(
        "DELETE FROM questions WHERE id = $1
        RETURNING id, question, answer, category, difficulty",
    )
    .bind(id.0)
    .map(question_from_row)
    .fetch_optional(pool)
    .await
    {
        Ok(Some(question)) => Ok(question),
        Ok(None) => Err(Error::QuestionNotFound(id.0)),
        Err(error) => Err(query_failed(error)),
    }
}

pub async fn quiz_candidates(
    pool: &PgPool,
    scope: QuizScope,
    previous: &[QuestionId],
) -> Result<Vec<Question>, Error> {
    let excluded: Vec<i32> = previous.iter().map(|id| id.0).collect();
    sqlx::query(
        "SELECT id, question, answer, category, difficulty
        FROM questions
        WHERE ($1 = 0 OR category = $1) AND NOT (id = ANY($2))",
    )
    .bind(scope_filter(scope))
    .bind(excluded)
    .map(question_from_row)
    .fetch_all(pool)
    .await
    .map_err(query_failed)
}

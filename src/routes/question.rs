use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{Level, event, info, instrument};

use handle_errors::Error;

use crate::routes::ApiSettings;
use crate::store::Store;
use crate::types::category::format_categories;
use crate::types::pagination::{Pagination, extract_pagination};
use crate::types::question::{NewQuestion, Question, QuestionId, QuestionsAction, QuestionsRequest};

#[derive(Serialize, Debug)]
struct QuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    categories: BTreeMap<i32, String>,
    current_category: String,
}

#[derive(Serialize, Debug)]
struct SearchResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: String,
}

#[derive(Serialize, Debug)]
struct AddQuestionResponse {
    success: bool,
    question: String,
    total_questions: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_question_id: Option<i32>,
}

#[derive(Serialize, Debug)]
struct DeleteQuestionResponse {
    success: bool,
    deleted_question_text: String,
    deleted_question_id: i32,
}

#[instrument(skip(store))]
pub async fn get_questions(
    params: HashMap<String, String>,
    store: Store,
    settings: ApiSettings,
) -> Result<impl warp::Reply, warp::Rejection> {
    event!(target: "trivia_api", Level::INFO, "querying questions");
    let pagination = extract_pagination(&params).map_err(warp::reject::custom)?;
    info!(page = pagination.page);

    let page = match store.get_questions(pagination).await {
        Ok(page) => page,
        Err(e) => return Err(warp::reject::custom(e)),
    };
    let categories = match store.get_categories().await {
        Ok(categories) => format_categories(&categories),
        Err(e) => return Err(warp::reject::custom(e)),
    };

    Ok(warp::reply::json(&QuestionsResponse {
        success: true,
        questions: page.items,
        total_questions: page.total,
        categories,
        current_category: settings.current_category,
    }))
}

/// `POST /questions` either searches or adds, depending on the body.
#[instrument(skip(store))]
pub async fn search_or_add_question(
    params: HashMap<String, String>,
    store: Store,
    settings: ApiSettings,
    request: QuestionsRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let pagination = extract_pagination(&params).map_err(warp::reject::custom)?;
    match request.into_action().map_err(warp::reject::custom)? {
        QuestionsAction::Search(term) => {
            search_questions(&store, &term, pagination, settings).await
        }
        QuestionsAction::Add(new_question) => add_question(&store, new_question).await,
    }
}

async fn search_questions(
    store: &Store,
    term: &str,
    pagination: Pagination,
    settings: ApiSettings,
) -> Result<warp::reply::Json, warp::Rejection> {
    event!(Level::INFO, term, "searching questions");
    match store.search_questions(term, pagination).await {
        Ok(page) => Ok(warp::reply::json(&SearchResponse {
            success: true,
            questions: page.items,
            total_questions: page.total,
            current_category: settings.current_category,
        })),
        Err(e) => Err(warp::reject::custom(e)),
    }
}

async fn add_question(
    store: &Store,
    new_question: NewQuestion,
) -> Result<warp::reply::Json, warp::Rejection> {
    let text = new_question.question.clone();
    let new_question_id = match store.add_question(new_question).await {
        Ok(question) => Some(question.id.0),
        Err(Error::DuplicateQuestion) => {
            event!(Level::INFO, "question already exists, nothing added");
            None
        }
        Err(e) => return Err(warp::reject::custom(e)),
    };
    let total_questions = store
        .count_questions()
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&AddQuestionResponse {
        success: new_question_id.is_some(),
        question: text,
        total_questions,
        new_question_id,
    }))
}

#[instrument(skip(store))]
pub async fn delete_question(id: i32, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    match store.delete_question(QuestionId(id)).await {
        Ok(question) => Ok(warp::reply::json(&DeleteQuestionResponse {
            success: true,
            deleted_question_text: question.question,
            deleted_question_id: question.id.0,
        })),
        Err(e) => Err(warp::reject::custom(e)),
    }
}

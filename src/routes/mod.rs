use handle_errors::return_error;
use warp::{Filter, Rejection, Reply, http::Method};

use crate::config::Config;
use crate::quiz::QuizPolicy;
use crate::store::Store;

pub mod category;
pub mod question;
pub mod quiz;


/// Per-process values the handlers need besides the store.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub current_category: String,
    pub quiz: QuizPolicy,
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            current_category: "Science".to_owned(),
            quiz: QuizPolicy::default(),
        }
    }
}

impl From<&Config> for ApiSettings {
    fn from(config: &Config) -> Self {
        ApiSettings {
            current_category: config.current_category.clone(),
            quiz: QuizPolicy {
                min_questions: config.quiz_min_questions,
            },
        }
    }
}

fn request_span(route: &'static str) -> impl Fn(warp::trace::Info<'_>) -> tracing::Span + Clone {
    move |info: warp::trace::Info<'_>| {
        tracing::info_span!(
            "request",
            route,
            method = %info.method(),
            path = %info.path(),
            id = %uuid::Uuid::new_v4(),
        )
    }
}

/// Every route of the API. Paths are matched before verbs, so a known path
/// with the wrong verb is rejected as 405 rather than 404.
pub fn build(
    store: Store,
    settings: ApiSettings,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let store_filter = warp::any().map(move || store.clone());
    let settings_filter = warp::any().map(move || settings.clone());

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["Content-Type", "Authorization"])
        .allow_methods(&[
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]);

    let get_categories = warp::path("categories")
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(category::get_categories)
        .with(warp::trace(request_span("get_categories")));

    let get_category_questions = warp::path("categories")
        .and(warp::path::param::<i32>())
        .and(warp::path("questions"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query())
        .and(store_filter.clone())
        .and_then(category::get_category_questions)
        .with(warp::trace(request_span("get_category_questions")));

    let get_questions = warp::path("questions")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query())
        .and(store_filter.clone())
        .and(settings_filter.clone())
        .and_then(question::get_questions)
        .with(warp::trace(request_span("get_questions")));

    let search_or_add_question = warp::path("questions")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::query())
        .and(store_filter.clone())
        .and(settings_filter.clone())
        .and(warp::body::json())
        .and_then(question::search_or_add_question)
        .with(warp::trace(request_span("search_or_add_question")));

    let delete_question = warp::path("questions")
        .and(warp::path::param::<i32>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(store_filter.clone())
        .and_then(question::delete_question)
        .with(warp::trace(request_span("delete_question")));

    let get_quiz_question = warp::path("quizzes")
        .and(warp::path::end())
        .and(warp::post())
        .and(store_filter.clone())
        .and(settings_filter.clone())
        .and(warp::body::json())
        .and_then(quiz::get_quiz_question)
        .with(warp::trace(request_span("get_quiz_question")));

    get_categories
        .or(get_category_questions)
        .or(get_questions)
        .or(search_or_add_question)
        .or(delete_question)
        .or(get_quiz_question)
        .with(cors)
        .with(warp::trace::request())
        .recover(return_error)
}

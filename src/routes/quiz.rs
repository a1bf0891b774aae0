use tracing::{Level, event, instrument};

use crate::quiz::next_question;
use crate::routes::ApiSettings;
use crate::store::Store;
use crate::types::quiz::{QuizRequest, QuizResponse, QuizScope};

#[instrument(skip(store))]
pub async fn get_quiz_question(
    store: Store,
    settings: ApiSettings,
    request: QuizRequest,
) -> Result<impl warp::Reply, warp::Rejection> {
    let scope = QuizScope::from(request.quiz_category.id);
    let draw = match next_question(&store, scope, &request.previous_questions, settings.quiz).await
    {
        Ok(draw) => draw,
        Err(e) => return Err(warp::reject::custom(e)),
    };

    if draw.question.is_none() {
        event!(Level::INFO, "no questions left in this quiz");
    }

    Ok(warp::reply::json(&QuizResponse {
        success: true,
        question: draw.question,
        quiz_category: request.quiz_category,
        total_questions: draw.remaining,
    }))
}

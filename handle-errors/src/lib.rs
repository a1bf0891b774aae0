use serde::Serialize;
use warp::{
    Rejection, Reply,
    filters::{body::BodyDeserializeError, cors::CorsForbidden},
    http::StatusCode,
    reject::{
        InvalidHeader, InvalidQuery, MethodNotAllowed, MissingHeader, Reject, UnsupportedMediaType,
    },
};

use sqlx::migrate::MigrateError;

use tracing::{Level, event, instrument};

#[derive(Debug)]
pub enum Error {
    ParseError(std::num::ParseIntError),
    MissingField(&'static str),
    DuplicateQuestion,
    QuestionNotFound(i32),
    CategoryNotFound(i32),
    DatabaseQueryError(sqlx::Error),
    MigrationError(MigrateError),
    ConfigError(config::ConfigError),
    FixtureError(serde_json::Error),
}

/// Coarse classification used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ValidationFailure,
    StorageFault,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::QuestionNotFound(_) | Error::CategoryNotFound(_) => ErrorKind::NotFound,
            Error::ParseError(_)
            | Error::MissingField(_)
            | Error::DuplicateQuestion
            | Error::ConfigError(_) => ErrorKind::ValidationFailure,
            Error::DatabaseQueryError(_) | Error::MigrationError(_) | Error::FixtureError(_) => {
                ErrorKind::StorageFault
            }
        }
    }

    /// Domain failures are all reported as 422, missing records included.
    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::ValidationFailure => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::StorageFault => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::ParseError(err) => {
                write!(f, "Cannot parse parameter: {}", err)
            }
            Error::MissingField(field) => {
                write!(f, "Missing field: {}", field)
            }
            Error::DuplicateQuestion => {
                write!(f, "Question already exists")
            }
            Error::QuestionNotFound(id) => {
                write!(f, "Question {} not found", id)
            }
            Error::CategoryNotFound(id) => {
                write!(f, "Category {} not found", id)
            }
            Error::DatabaseQueryError(_) => {
                write!(f, "Cannot update, invalid data.")
            }
            Error::MigrationError(err) => {
                write!(f, "Cannot run migration: {}", err)
            }
            Error::ConfigError(err) => {
                write!(f, "Cannot read configuration: {}", err)
            }
            Error::FixtureError(err) => {
                write!(f, "Cannot read trivia fixture: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {}

impl Reject for Error {}

const BAD_REQUEST_MSG: &str = "Bad Request";
const FORBIDDEN_MSG: &str = "Forbidden";
const RESOURCE_NOT_FOUND_MSG: &str = "Resource Not Found";
const METHOD_NOT_ALLOWED_MSG: &str = "Method Not Allowed";
const UNPROCESSABLE_ENTITY_MSG: &str = "Unprocessable Entity";

/// JSON body sent for every failed request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: &'static str,
}

impl ErrorResponse {
    pub fn for_status(status: StatusCode) -> Self {
        let message = match status {
            StatusCode::BAD_REQUEST => BAD_REQUEST_MSG,
            StatusCode::FORBIDDEN => FORBIDDEN_MSG,
            StatusCode::NOT_FOUND => RESOURCE_NOT_FOUND_MSG,
            StatusCode::METHOD_NOT_ALLOWED => METHOD_NOT_ALLOWED_MSG,
            _ => UNPROCESSABLE_ENTITY_MSG,
        };
        ErrorResponse {
            success: false,
            error: status.as_u16(),
            message,
        }
    }
}

fn error_reply(status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse::for_status(status)),
        status,
    )
}

#[instrument]
pub async fn return_error(r: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(crate::Error::DatabaseQueryError(e)) = r.find() {
        event!(Level::ERROR, "Database query error: {}", e);
        Ok(error_reply(StatusCode::UNPROCESSABLE_ENTITY))
    } else if let Some(error) = r.find::<Error>() {
        event!(Level::ERROR, kind = ?error.kind(), "{}", error);
        Ok(error_reply(error.status()))
    } else if let Some(error) = r.find::<CorsForbidden>() {
        event!(Level::ERROR, "CORS forbidden error: {}", error);
        Ok(error_reply(StatusCode::FORBIDDEN))
    } else if let Some(error) = r.find::<BodyDeserializeError>() {
        event!(Level::ERROR, "Cannot deserialize request body: {}", error);
        Ok(error_reply(StatusCode::UNPROCESSABLE_ENTITY))
    } else if let Some(error) = r.find::<UnsupportedMediaType>() {
        event!(Level::ERROR, "{}", error);
        Ok(error_reply(StatusCode::UNPROCESSABLE_ENTITY))
    } else if let Some(error) = r.find::<InvalidQuery>() {
        event!(Level::ERROR, "{}", error);
        Ok(error_reply(StatusCode::UNPROCESSABLE_ENTITY))
    } else if let Some(error) = r.find::<MissingHeader>() {
        event!(Level::ERROR, "{}", error);
        Ok(error_reply(StatusCode::BAD_REQUEST))
    } else if let Some(error) = r.find::<InvalidHeader>() {
        event!(Level::ERROR, "{}", error);
        Ok(error_reply(StatusCode::BAD_REQUEST))
    } else if r.find::<MethodNotAllowed>().is_some() {
        event!(Level::WARN, "Method not allowed on this route");
        Ok(error_reply(StatusCode::METHOD_NOT_ALLOWED))
    } else {
        event!(Level::WARN, "Requested route was not found");
        Ok(error_reply(StatusCode::NOT_FOUND))
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    async fn render(rejection: Rejection) -> (StatusCode, serde_json::Value) {
        let res = return_error(rejection).await.unwrap().into_response();
        let status = res.status();
        let bytes = warp::hyper::body::to_bytes(res.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn domain_errors_are_unprocessable() {
        assert_eq!(
            Error::QuestionNotFound(200).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::CategoryNotFound(7).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::MissingField("question").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn classifies_errors_by_kind() {
        assert_eq!(Error::QuestionNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(Error::MissingField("answer").kind(), ErrorKind::ValidationFailure);
        assert_eq!(Error::DuplicateQuestion.kind(), ErrorKind::ValidationFailure);
        assert_eq!(
            Error::DatabaseQueryError(sqlx::Error::RowNotFound).kind(),
            ErrorKind::StorageFault
        );
    }

    #[tokio::test]
    async fn renders_domain_errors_as_json() {
        let (status, body) = render(warp::reject::custom(Error::QuestionNotFound(200))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 422);
        assert_eq!(body["message"], "Unprocessable Entity");
    }

    #[tokio::test]
    async fn storage_faults_are_unprocessable() {
        let rejection =
            warp::reject::custom(Error::DatabaseQueryError(sqlx::Error::PoolTimedOut));
        let (status, body) = render(rejection).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "Unprocessable Entity");
    }

    #[tokio::test]
    async fn unmatched_routes_are_not_found() {
        let (status, body) = render(warp::reject::not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], 404);
        assert_eq!(body["message"], "Resource Not Found");
    }

    #[test]
    fn every_status_has_a_fixed_message() {
        assert_eq!(
            ErrorResponse::for_status(StatusCode::BAD_REQUEST).message,
            "Bad Request"
        );
        assert_eq!(
            ErrorResponse::for_status(StatusCode::METHOD_NOT_ALLOWED).message,
            "Method Not Allowed"
        );
    }
}

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::domain::error::TodoError;

/// Wire shape of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody { pub error: String }

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::InvalidId(_) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            TodoError::Validation(_) | TodoError::InvalidPatch(_) => Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            TodoError::NotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            TodoError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self { Self::new(rejection.status(), rejection.body_text()) }
}

/// Syntax errors are the client's malformed JSON (400); well-formed JSON of
/// the wrong shape is unprocessable (422).
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        let status = match err.classify() {
            serde_json::error::Category::Data => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, format!("invalid JSON body: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, axum::Json(ErrorBody { error: self.message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_status() {
        assert_eq!(ApiError::from(TodoError::NotFound).status, StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(TodoError::InvalidId("x".into())).status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(TodoError::Validation("too long".into())).status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::from(TodoError::InvalidPatch("bad op".into())).status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn store_errors_hide_driver_details() {
        let err = ApiError::from(TodoError::Store(sqlx::Error::PoolClosed));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "internal server error");
    }

    #[test]
    fn classifies_json_errors() {
        let syntax = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ApiError::from(syntax).status, StatusCode::BAD_REQUEST);
        let data = serde_json::from_str::<crate::domain::todo::Todo>("{\"description\": 5}").unwrap_err();
        assert_eq!(ApiError::from(data).status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}

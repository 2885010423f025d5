use crate::core::validator::BatchRejection;
use crate::domain::model::EntryError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to HTTP callers. The display string is the `error` field of the body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{message}")]
    BadRequest {
        message: String,
        details: Option<Vec<EntryError>>,
    },

    #[error("Session not connected")]
    SessionUnavailable,

    #[error("Failed to send message")]
    DeliveryFailed,

    #[error("Not found")]
    NotFound,

    #[error("Internal server error")]
    Internal,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<EntryError>>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::SessionUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::DeliveryFailed | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<BatchRejection> for ApiError {
    fn from(rejection: BatchRejection) -> Self {
        match rejection {
            BatchRejection::AllInvalid(errors) => ApiError::BadRequest {
                message: "All messages invalid".to_string(),
                details: Some(errors),
            },
            other => ApiError::bad_request(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.to_string();
        let details = match self {
            ApiError::BadRequest { details, .. } => details,
            _ => None,
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}

//! API error type shared by HTTP and WebSocket handlers.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unknown format: {0}")]
    UnknownFormat(String),
    #[error("unknown question: {0}")]
    UnknownQuestion(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            AppError::UnknownFormat(_) | AppError::UnknownQuestion(_) => {
                (StatusCode::NOT_FOUND, "NotFound")
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
        };

        let body = Json(ErrorBody {
            error: ErrorDetail { code: code.to_string(), message: self.to_string() },
        });

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

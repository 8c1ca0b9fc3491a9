use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::plugins::stories::store::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: Option<String>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub code: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), code: None }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::new(StatusCode::NOT_FOUND, message).with_code("not_found")
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::new(StatusCode::FORBIDDEN, message).with_code("forbidden")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(StatusCode::BAD_REQUEST, message).with_code("validation_error")
    }

    pub fn unauthorized(message: impl Into<String>, code: &str) -> Self {
        AppError::new(StatusCode::UNAUTHORIZED, message).with_code(code)
    }
}

fn development_mode() -> bool {
    std::env::var("APP_ENV").map(|v| v == "development").unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // suppress internal detail outside development mode
        let message = if self.status == StatusCode::INTERNAL_SERVER_ERROR && !development_mode() {
            "internalServerError".to_string()
        } else {
            self.message
        };
        let body = ErrorBody { error: message, code: self.code };
        (self.status, Json(body)).into_response()
    }
}

impl From<(StatusCode, String)> for AppError {
    fn from((status, msg): (StatusCode, String)) -> Self {
        AppError::new(status, msg)
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => AppError::not_found("storyNotFound"),
            StoreError::NotAuthor => AppError::forbidden("notAuthorizedToDeleteThisStory"),
        }
    }
}

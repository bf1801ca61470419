use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Alert not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type AlertResult<T> = Result<T, AlertError>;

impl From<AlertError> for AppError {
    fn from(err: AlertError) -> Self {
        match err {
            AlertError::NotFound(_) => AppError::NotFound("Alert not found".to_string()),
            AlertError::Validation(msg) => AppError::BadRequest(msg),
            AlertError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for AlertError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for AlertError {
    fn from(err: mongodb::error::Error) -> Self {
        AlertError::Database(err.to_string())
    }
}

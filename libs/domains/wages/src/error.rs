use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_users::UserError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WageError {
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type WageResult<T> = Result<T, WageError>;

impl From<UserError> for WageError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => WageError::UserNotFound(id),
            UserError::Validation(msg) => WageError::Validation(msg),
            UserError::Database(msg) => WageError::Database(msg),
            other => WageError::Internal(other.to_string()),
        }
    }
}

impl From<WageError> for AppError {
    fn from(err: WageError) -> Self {
        match err {
            WageError::UserNotFound(_) => AppError::NotFound("User not found".to_string()),
            WageError::Validation(msg) => AppError::BadRequest(msg),
            WageError::Database(msg) => AppError::Database(msg),
            WageError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for WageError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for WageError {
    fn from(err: mongodb::error::Error) -> Self {
        WageError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_missing_user_maps_to_not_found() {
        let err: WageError = UserError::NotFound(Uuid::now_v7()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_is_bad_request() {
        let response = WageError::Validation("hours".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

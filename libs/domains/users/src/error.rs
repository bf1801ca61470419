use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User with this email already exists.")]
    DuplicateEmail,

    #[error("User with this phone already exists.")]
    DuplicatePhone,

    #[error("Incorrect Credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    Inactive,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound("User not found".to_string()),
            err @ (UserError::DuplicateEmail | UserError::DuplicatePhone) => {
                AppError::BadRequest(err.to_string())
            }
            err @ UserError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            err @ UserError::Inactive => AppError::Forbidden(err.to_string()),
            UserError::Validation(msg) => AppError::BadRequest(msg),
            err @ (UserError::PasswordHash(_) | UserError::Token(_)) => {
                AppError::InternalServerError(err.to_string())
            }
            UserError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        if database::mongodb::is_duplicate_key_error(&err) {
            // The message names the violated index
            return if err.to_string().contains("phone") {
                UserError::DuplicatePhone
            } else {
                UserError::DuplicateEmail
            };
        }
        UserError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_invalid_credentials_is_unauthorized() {
        let response = UserError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let app_error: AppError = UserError::InvalidCredentials.into();
        assert!(matches!(app_error, AppError::Unauthorized(msg) if msg == "Incorrect Credentials"));
    }

    #[test]
    fn test_duplicates_are_bad_requests() {
        assert_eq!(
            UserError::DuplicateEmail.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            UserError::DuplicatePhone.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_hashing_failures_are_internal() {
        let response = UserError::PasswordHash("salt".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

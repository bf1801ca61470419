pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// `error` member of the failure envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// e.g. `NotFoundError`, `BadRequestError`
    pub name: String,
    /// Field errors for validation failures, otherwise an empty array
    pub details: Value,
}

/// Body of every non-2xx response:
///
/// ```json
/// {
///   "success": false,
///   "message": "Product not found",
///   "error": { "name": "NotFoundError", "details": [] }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: ErrorBody,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: ErrorBody {
                name: code.name().to_string(),
                details: details.unwrap_or_else(|| Value::Array(Vec::new())),
            },
        }
    }
}

/// Error type every handler ultimately returns.
///
/// Domain crates convert their own error enums into this at the HTTP boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("UUID error: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not Implemented: {0}")]
    NotImplemented(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::SerdeJson(_) => ErrorCode::SerdeJsonError,
            AppError::JsonExtractorRejection(_) => ErrorCode::InvalidJson,
            AppError::ValidationError(_) => ErrorCode::ValidationError,
            AppError::UuidError(_) => ErrorCode::InvalidUuid,
            AppError::BadRequest(_) => ErrorCode::BadRequest,
            AppError::Unauthorized(_) => ErrorCode::Unauthorized,
            AppError::Forbidden(_) => ErrorCode::Forbidden,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::NotImplemented(_) => ErrorCode::NotImplemented,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
            AppError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        let (message, details) = match self {
            // Server-side failures never leak their cause to the client
            AppError::SerdeJson(_) | AppError::Database(_) | AppError::InternalServerError(_) => {
                tracing::error!(error_code = code.code(), error = %self, "Internal error");
                (code.default_message().to_string(), None)
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), error = %e, "JSON extraction failed");
                (e.body_text(), None)
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = code.code(), error = %e, "Validation failed");
                (
                    code.default_message().to_string(),
                    Some(validation_details(&e)),
                )
            }
            AppError::UuidError(e) => {
                tracing::warn!(error_code = code.code(), error = %e, "Invalid UUID");
                (code.default_message().to_string(), None)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error_code = code.code(), "Service unavailable: {}", msg);
                (msg, None)
            }
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::NotImplemented(msg) => {
                tracing::info!(error_code = code.code(), error = code.name(), "{}", msg);
                (msg, None)
            }
        };

        error_response(code, message, details)
    }
}

/// Flattens `validator` output into `{ field: [{ code, message, params }] }`.
pub fn validation_details(errors: &ValidationErrors) -> Value {
    let details = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let entries: Vec<Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), Value::Array(entries))
        })
        .collect::<serde_json::Map<_, _>>();

    Value::Object(details)
}

/// Builds the failure envelope with the status that belongs to `code`.
pub fn error_response(code: ErrorCode, message: impl Into<String>, details: Option<Value>) -> Response {
    (
        code.status(),
        Json(ErrorResponse::new(code, message, details)),
    )
        .into_response()
}

/// Convenience alias for handler results
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use validator::Validate;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_envelope() {
        let response = AppError::NotFound("Product not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Product not found");
        assert_eq!(json["error"]["name"], "NotFoundError");
        assert_eq!(json["error"]["details"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_internal_errors_are_masked() {
        let response = AppError::Database("connection reset by peer".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["message"], "An unexpected internal server error occurred.");
        assert_eq!(json["error"]["name"], "InternalServerError");
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3))]
        name: String,
    }

    #[tokio::test]
    async fn test_validation_errors_carry_field_details() {
        let errors = Sample {
            name: "ab".to_string(),
        }
        .validate()
        .unwrap_err();

        let response = AppError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"]["name"], "BadRequestError");
        assert_eq!(json["error"]["details"]["name"][0]["code"], "length");
    }

    #[tokio::test]
    async fn test_conflict_status() {
        let response = AppError::Conflict("Inventory still holds products".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"]["name"], "ConflictError");
    }
}

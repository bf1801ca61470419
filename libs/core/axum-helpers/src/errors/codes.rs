//! Error codes shared by every error response.
//!
//! Each code carries the envelope `name` clients switch on, an integer for
//! structured logs, the HTTP status and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::NotFound;
//! assert_eq!(code.name(), "NotFoundError");
//! assert_eq!(code.code(), 1004);
//! ```

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000s)
    /// Request body failed validation
    ValidationError,
    InvalidUuid,
    /// Request body was not valid JSON for the target type
    InvalidJson,
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict,
    /// Domain rule rejected an otherwise well-formed request
    BadRequest,

    // Server errors (5000s)
    InternalError,
    NotImplemented,
    ServiceUnavailable,
    DatabaseError,
    SerdeJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::InvalidJson => "INVALID_JSON",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::BadRequest => "BAD_REQUEST",
            Self::InternalError => "INTERNAL_ERROR",
            Self::NotImplemented => "NOT_IMPLEMENTED",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::SerdeJsonError => "SERDE_JSON_ERROR",
        }
    }

    /// Integer code for structured logs.
    ///
    /// - 1000-1999: client errors
    /// - 5000-5999: server errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::InvalidJson => 1003,
            Self::NotFound => 1004,
            Self::Unauthorized => 1005,
            Self::Forbidden => 1006,
            Self::Conflict => 1007,
            Self::BadRequest => 1008,
            Self::InternalError => 5000,
            Self::NotImplemented => 5001,
            Self::ServiceUnavailable => 5003,
            Self::DatabaseError => 5004,
            Self::SerdeJsonError => 5005,
        }
    }

    /// Value of `error.name` in the response envelope
    pub fn name(&self) -> &'static str {
        match self {
            Self::ValidationError | Self::InvalidUuid | Self::InvalidJson | Self::BadRequest => {
                "BadRequestError"
            }
            Self::NotFound => "NotFoundError",
            Self::Unauthorized => "UnauthorizedError",
            Self::Forbidden => "ForbiddenError",
            Self::Conflict => "ConflictError",
            Self::NotImplemented => "NotImplementedError",
            Self::ServiceUnavailable => "ServiceUnavailableError",
            Self::InternalError | Self::DatabaseError | Self::SerdeJsonError => {
                "InternalServerError"
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ValidationError | Self::InvalidUuid | Self::InvalidJson | Self::BadRequest => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Conflict => StatusCode::CONFLICT,
            Self::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::InternalError | Self::DatabaseError | Self::SerdeJsonError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Invalid request body.",
            Self::InvalidUuid => "Invalid UUID format",
            Self::InvalidJson => "Invalid JSON format",
            Self::NotFound => "Not Found",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::Conflict => "Conflict",
            Self::BadRequest => "Bad Request",
            Self::NotImplemented => "Not Implemented",
            Self::ServiceUnavailable => "Service temporarily unavailable",
            Self::InternalError | Self::DatabaseError | Self::SerdeJsonError => {
                "An unexpected internal server error occurred."
            }
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ErrorCode; 13] = [
        ErrorCode::ValidationError,
        ErrorCode::InvalidUuid,
        ErrorCode::InvalidJson,
        ErrorCode::NotFound,
        ErrorCode::Unauthorized,
        ErrorCode::Forbidden,
        ErrorCode::Conflict,
        ErrorCode::BadRequest,
        ErrorCode::InternalError,
        ErrorCode::NotImplemented,
        ErrorCode::ServiceUnavailable,
        ErrorCode::DatabaseError,
        ErrorCode::SerdeJsonError,
    ];

    #[test]
    fn test_codes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code for {code}");
        }
    }

    #[test]
    fn test_client_codes_map_to_client_statuses() {
        for code in ALL {
            if code.code() < 5000 {
                assert!(code.status().is_client_error(), "{code}");
            } else {
                assert!(code.status().is_server_error(), "{code}");
            }
        }
    }

    #[test]
    fn test_envelope_names() {
        assert_eq!(ErrorCode::ValidationError.name(), "BadRequestError");
        assert_eq!(ErrorCode::Conflict.name(), "ConflictError");
        assert_eq!(ErrorCode::DatabaseError.name(), "InternalServerError");
        assert_eq!(ErrorCode::NotImplemented.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[test]
    fn test_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::InvalidUuid).unwrap();
        assert_eq!(json, "\"INVALID_UUID\"");
    }
}

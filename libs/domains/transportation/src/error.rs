use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_products::ProductError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Transportation not found: {0}")]
    NotFound(Uuid),

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Insufficient stock for product {name}. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Transport with this package_id already exists.")]
    DuplicatePackage,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type TransportResult<T> = Result<T, TransportError>;

impl From<ProductError> for TransportError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => TransportError::ProductNotFound(id),
            ProductError::Validation(msg) | ProductError::Duplicate(msg) => {
                TransportError::Validation(msg)
            }
            err @ ProductError::InsufficientStock { .. } => {
                TransportError::Validation(err.to_string())
            }
            ProductError::Database(msg) => TransportError::Database(msg),
        }
    }
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NotFound(_) => {
                AppError::NotFound("Transportation not found".to_string())
            }
            err @ TransportError::ProductNotFound(_) => AppError::NotFound(err.to_string()),
            err @ (TransportError::InsufficientStock { .. }
            | TransportError::InvalidStatus(_)
            | TransportError::DuplicatePackage) => AppError::BadRequest(err.to_string()),
            TransportError::Validation(msg) => AppError::BadRequest(msg),
            TransportError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for TransportError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for TransportError {
    fn from(err: mongodb::error::Error) -> Self {
        if database::mongodb::is_duplicate_key_error(&err) {
            return TransportError::DuplicatePackage;
        }
        TransportError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for TransportError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        TransportError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_product_not_found_keeps_id_in_message() {
        let id = Uuid::now_v7();
        let app_error: AppError = TransportError::from(ProductError::NotFound(id)).into();
        assert!(matches!(app_error, AppError::NotFound(msg) if msg == format!("Product not found: {id}")));
    }

    #[test]
    fn test_insufficient_stock_names_product() {
        let err = TransportError::InsufficientStock {
            name: "Paint Bucket".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product Paint Bucket. Available: 3, Requested: 5"
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_duplicate_package_is_bad_request() {
        let response = TransportError::DuplicatePackage.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

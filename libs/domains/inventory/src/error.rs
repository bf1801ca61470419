use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_products::ProductError;
use thiserror::Error;
use uuid::Uuid;

use crate::models::ContainerKind;

pub const STORAGE_NOT_EMPTY: &str =
    "Cannot remove storage with products. Please remove all products first.";

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Inventory not found: {0}")]
    InventoryNotFound(Uuid),

    #[error("Storage location not found: {0}")]
    StorageNotFound(String),

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error("Product not found in {0}")]
    NotInContainer(ContainerKind),

    #[error("Product weight ({weight}) exceeds available {kind} capacity ({available})")]
    CapacityExceeded {
        kind: ContainerKind,
        weight: f64,
        available: f64,
    },

    #[error("Product volume ({volume}) exceeds available {kind} volume ({available})")]
    VolumeExceeded {
        kind: ContainerKind,
        volume: f64,
        available: f64,
    },

    #[error("Storage {storage} already belongs to inventory {inventory}")]
    StorageAlreadyAttached { storage: Uuid, inventory: Uuid },

    #[error("Storage {storage} is not attached to inventory {inventory}")]
    StorageNotAttached { storage: Uuid, inventory: Uuid },

    #[error("{0}")]
    NotEmpty(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Storage with this location_id already exists.")]
    DuplicateLocation,

    #[error("Database error: {0}")]
    Database(String),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::InventoryNotFound(_) => {
                AppError::NotFound("Inventory not found".to_string())
            }
            InventoryError::StorageNotFound(_) => {
                AppError::NotFound("Storage location not found".to_string())
            }
            InventoryError::Product(err) => err.into(),
            err @ InventoryError::NotInContainer(_) => AppError::NotFound(err.to_string()),
            err @ (InventoryError::CapacityExceeded { .. }
            | InventoryError::VolumeExceeded { .. }
            | InventoryError::StorageAlreadyAttached { .. }
            | InventoryError::StorageNotAttached { .. }
            | InventoryError::DuplicateLocation) => AppError::BadRequest(err.to_string()),
            InventoryError::NotEmpty(msg) => AppError::Conflict(msg),
            InventoryError::Validation(msg) => AppError::BadRequest(msg),
            InventoryError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for InventoryError {
    fn from(err: mongodb::error::Error) -> Self {
        if database::mongodb::is_duplicate_key_error(&err) {
            return InventoryError::DuplicateLocation;
        }
        InventoryError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for InventoryError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        InventoryError::Database(err.to_string())
    }
}

//! Inventory Domain
//!
//! Inventories and storage bins: containers holding product lines against
//! weight and volume limits, and the [`StockService`] that moves stock between
//! them and the product catalogue.
//!
//! Every move checks product existence, container existence, capacity, volume
//! and unallocated stock before the first write. The writes themselves are
//! single-document atomic updates (`$inc`, `$push`, `$pull`).

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod stock;

pub use error::{InventoryError, InventoryResult, STORAGE_NOT_EMPTY};
pub use handlers::{inventory_router, storage_router, ApiDoc, StorageApiDoc};
pub use memory::{InMemoryInventoryRepository, InMemoryStorageRepository};
pub use models::{
    AddInventoryProduct, Container, ContainerKind, CostSummary, CreateInventory, CreateStorage,
    Inventory, InventoryProducts, Load, RemoveInventoryProduct, Storage, StorageLinkRequest,
    StorageProductRequest, UpdateInventory, UpdateStorage, Utilization,
};
pub use mongodb::{MongoInventoryRepository, MongoStorageRepository};
pub use repository::{InventoryRepository, StorageRepository};
pub use service::{InventoryService, StorageService};
pub use stock::StockService;

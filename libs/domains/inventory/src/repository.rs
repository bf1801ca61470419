use async_trait::async_trait;
use uuid::Uuid;

use crate::error::InventoryResult;
use crate::models::{CreateInventory, CreateStorage, Inventory, Load, Storage, UpdateInventory, UpdateStorage};

/// Persistence for inventories.
///
/// `deposit` and `withdraw` change the line item and the occupied totals in one
/// atomic document update and return false when nothing matched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn create(&self, input: CreateInventory) -> InventoryResult<Inventory>;

    async fn get_by_id(&self, id: Uuid) -> InventoryResult<Option<Inventory>>;

    async fn list(&self) -> InventoryResult<Vec<Inventory>>;

    async fn update(&self, id: Uuid, input: UpdateInventory) -> InventoryResult<Option<Inventory>>;

    async fn delete(&self, id: Uuid) -> InventoryResult<bool>;

    async fn deposit(&self, id: Uuid, product: Uuid, quantity: i64, load: Load) -> InventoryResult<bool>;

    /// Drops the line when `quantity` covers it, otherwise decrements it
    async fn withdraw(&self, id: Uuid, product: Uuid, quantity: i64, load: Load) -> InventoryResult<bool>;

    /// Adds the storage id to the set; idempotent
    async fn add_storage(&self, id: Uuid, storage: Uuid) -> InventoryResult<bool>;

    async fn remove_storage(&self, id: Uuid, storage: Uuid) -> InventoryResult<bool>;
}

/// Persistence for storage bins. Same line-item contract as [`InventoryRepository`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageRepository: Send + Sync {
    async fn create(&self, input: CreateStorage) -> InventoryResult<Storage>;

    async fn get_by_id(&self, id: Uuid) -> InventoryResult<Option<Storage>>;

    async fn get_by_location(&self, location_id: &str) -> InventoryResult<Option<Storage>>;

    async fn list(&self) -> InventoryResult<Vec<Storage>>;

    async fn update(&self, id: Uuid, input: UpdateStorage) -> InventoryResult<Option<Storage>>;

    async fn delete(&self, id: Uuid) -> InventoryResult<bool>;

    async fn deposit(&self, id: Uuid, product: Uuid, quantity: i64, load: Load) -> InventoryResult<bool>;

    async fn withdraw(&self, id: Uuid, product: Uuid, quantity: i64, load: Load) -> InventoryResult<bool>;

    /// Sets or clears the owning inventory
    async fn set_inventory(&self, id: Uuid, inventory: Option<Uuid>) -> InventoryResult<bool>;
}

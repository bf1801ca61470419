//! CRUD services for inventories and storage bins

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{InventoryError, InventoryResult};
use crate::models::{
    Container, CreateInventory, CreateStorage, Inventory, Storage, UpdateInventory, UpdateStorage,
};
use crate::repository::{InventoryRepository, StorageRepository};

pub struct InventoryService<I: InventoryRepository> {
    repository: Arc<I>,
}

impl<I: InventoryRepository> InventoryService<I> {
    pub fn new(repository: I) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input), fields(inventory_name = %input.name))]
    pub async fn create_inventory(&self, input: CreateInventory) -> InventoryResult<Inventory> {
        input
            .validate()
            .map_err(|e| InventoryError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_inventory(&self, id: Uuid) -> InventoryResult<Inventory> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(InventoryError::InventoryNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_inventories(&self) -> InventoryResult<Vec<Inventory>> {
        self.repository.list().await
    }

    #[instrument(skip(self, input))]
    pub async fn update_inventory(
        &self,
        id: Uuid,
        input: UpdateInventory,
    ) -> InventoryResult<Inventory> {
        input
            .validate()
            .map_err(|e| InventoryError::Validation(e.to_string()))?;

        self.repository
            .update(id, input)
            .await?
            .ok_or(InventoryError::InventoryNotFound(id))
    }

    /// Refused while the inventory still holds products or storage bins.
    #[instrument(skip(self))]
    pub async fn delete_inventory(&self, id: Uuid) -> InventoryResult<()> {
        let inventory = self.get_inventory(id).await?;
        if !inventory.is_empty() || !inventory.storage.is_empty() {
            return Err(InventoryError::NotEmpty(
                "Cannot delete inventory with products or storages. Please remove them first."
                    .to_string(),
            ));
        }

        if !self.repository.delete(id).await? {
            return Err(InventoryError::InventoryNotFound(id));
        }
        tracing::info!(inventory_id = %id, "Inventory deleted");
        Ok(())
    }
}

pub struct StorageService<S: StorageRepository, I: InventoryRepository> {
    repository: Arc<S>,
    inventories: Arc<I>,
}

impl<S: StorageRepository, I: InventoryRepository> StorageService<S, I> {
    pub fn new(repository: S, inventories: I) -> Self {
        Self {
            repository: Arc::new(repository),
            inventories: Arc::new(inventories),
        }
    }

    /// Creates the bin and, when an inventory is named, attaches it there.
    #[instrument(skip(self, input), fields(location_id = %input.location_id))]
    pub async fn create_storage(&self, input: CreateStorage) -> InventoryResult<Storage> {
        input
            .validate()
            .map_err(|e| InventoryError::Validation(e.to_string()))?;

        if let Some(inventory_id) = input.inventory {
            if self.inventories.get_by_id(inventory_id).await?.is_none() {
                return Err(InventoryError::InventoryNotFound(inventory_id));
            }
        }

        let storage = self.repository.create(input).await?;
        if let Some(inventory_id) = storage.inventory {
            self.inventories.add_storage(inventory_id, storage.id).await?;
            tracing::info!(storage_id = %storage.id, inventory_id = %inventory_id, "Storage attached on create");
        }
        Ok(storage)
    }

    /// Looks a bin up by id, or by `location_id` when the identifier is not a known id.
    #[instrument(skip(self))]
    pub async fn get_storage(&self, identifier: &str) -> InventoryResult<Storage> {
        if let Ok(id) = Uuid::parse_str(identifier) {
            if let Some(storage) = self.repository.get_by_id(id).await? {
                return Ok(storage);
            }
        }

        self.repository
            .get_by_location(identifier)
            .await?
            .ok_or_else(|| InventoryError::StorageNotFound(identifier.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn list_storages(&self) -> InventoryResult<Vec<Storage>> {
        self.repository.list().await
    }

    #[instrument(skip(self, input))]
    pub async fn update_storage(&self, id: Uuid, input: UpdateStorage) -> InventoryResult<Storage> {
        input
            .validate()
            .map_err(|e| InventoryError::Validation(e.to_string()))?;

        self.repository
            .update(id, input)
            .await?
            .ok_or_else(|| InventoryError::StorageNotFound(id.to_string()))
    }

    /// Refused while the bin holds products; detaches it from its inventory.
    #[instrument(skip(self))]
    pub async fn delete_storage(&self, id: Uuid) -> InventoryResult<()> {
        let storage = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| InventoryError::StorageNotFound(id.to_string()))?;

        if !storage.is_empty() {
            return Err(InventoryError::NotEmpty(
                "Cannot delete storage location with products inside.".to_string(),
            ));
        }

        self.repository.delete(id).await?;
        if let Some(inventory_id) = storage.inventory {
            self.inventories.remove_storage(inventory_id, id).await?;
        }
        tracing::info!(storage_id = %id, "Storage deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockInventoryRepository, MockStorageRepository};
    use domain_products::{Dimensions, GeoPoint, StockLine};
    use mockall::predicate::eq;

    fn inventory_input() -> CreateInventory {
        CreateInventory {
            name: "North Hub".to_string(),
            total_capacity: 1000.0,
            total_volume: 500.0,
            inventory_location: GeoPoint::new(77.5946, 12.9716),
        }
    }

    fn storage_input(inventory: Option<Uuid>) -> CreateStorage {
        CreateStorage {
            location_id: "A1".to_string(),
            dimensions: Dimensions::new(2.0, 2.0, 2.0),
            holding_capacity: 100.0,
            volume: None,
            inventory,
        }
    }

    #[tokio::test]
    async fn test_create_inventory_validates_name() {
        let mut mock_repo = MockInventoryRepository::new();
        mock_repo.expect_create().never();

        let service = InventoryService::new(mock_repo);
        let mut input = inventory_input();
        input.name = "NH".to_string();

        let result = service.create_inventory(input).await;
        assert!(matches!(result, Err(InventoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_inventory_with_products_is_refused() {
        let mut mock_repo = MockInventoryRepository::new();
        let mut inventory = Inventory::new(inventory_input());
        inventory.products.push(StockLine {
            product: Uuid::now_v7(),
            quantity: 2,
        });
        let id = inventory.id;

        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(inventory.clone())));
        mock_repo.expect_delete().never();

        let service = InventoryService::new(mock_repo);
        let result = service.delete_inventory(id).await;
        assert!(matches!(result, Err(InventoryError::NotEmpty(_))));
    }

    #[tokio::test]
    async fn test_create_storage_attaches_to_inventory() {
        let inventory = Inventory::new(inventory_input());
        let inventory_id = inventory.id;

        let mut inventories = MockInventoryRepository::new();
        inventories
            .expect_get_by_id()
            .with(eq(inventory_id))
            .returning(move |_| Ok(Some(inventory.clone())));
        inventories
            .expect_add_storage()
            .times(1)
            .returning(|_, _| Ok(true));

        let mut storages = MockStorageRepository::new();
        storages
            .expect_create()
            .returning(|input| Ok(Storage::new(input)));

        let service = StorageService::new(storages, inventories);
        let storage = service
            .create_storage(storage_input(Some(inventory_id)))
            .await
            .unwrap();

        assert_eq!(storage.inventory, Some(inventory_id));
        assert_eq!(storage.volume, 8.0);
    }

    #[tokio::test]
    async fn test_create_storage_with_unknown_inventory() {
        let mut inventories = MockInventoryRepository::new();
        inventories.expect_get_by_id().returning(|_| Ok(None));
        let mut storages = MockStorageRepository::new();
        storages.expect_create().never();

        let service = StorageService::new(storages, inventories);
        let result = service.create_storage(storage_input(Some(Uuid::now_v7()))).await;
        assert!(matches!(result, Err(InventoryError::InventoryNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_storage_falls_back_to_location_id() {
        let storage = Storage::new(storage_input(None));
        let mut storages = MockStorageRepository::new();
        storages.expect_get_by_id().never();
        storages.expect_get_by_location().returning(move |location| {
            assert_eq!(location, "A1");
            Ok(Some(storage.clone()))
        });

        let service = StorageService::new(storages, MockInventoryRepository::new());
        let found = service.get_storage("A1").await.unwrap();
        assert_eq!(found.location_id, "A1");
    }

    #[tokio::test]
    async fn test_delete_non_empty_storage_is_refused() {
        let mut storage = Storage::new(storage_input(None));
        storage.products.push(StockLine {
            product: Uuid::now_v7(),
            quantity: 1,
        });
        let id = storage.id;

        let mut storages = MockStorageRepository::new();
        storages
            .expect_get_by_id()
            .returning(move |_| Ok(Some(storage.clone())));
        storages.expect_delete().never();

        let service = StorageService::new(storages, MockInventoryRepository::new());
        let err = service.delete_storage(id).await.unwrap_err();
        assert!(matches!(err, InventoryError::NotEmpty(_)));
    }
}

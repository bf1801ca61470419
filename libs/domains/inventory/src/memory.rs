//! In-process inventory and storage repositories for tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{InventoryError, InventoryResult};
use crate::models::{
    Container, CreateInventory, CreateStorage, Inventory, Load, Storage, UpdateInventory,
    UpdateStorage,
};
use crate::repository::{InventoryRepository, StorageRepository};

#[derive(Clone, Default)]
pub struct InMemoryInventoryRepository {
    inventories: Arc<RwLock<HashMap<Uuid, Inventory>>>,
}

impl InMemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventoryRepository {
    async fn create(&self, input: CreateInventory) -> InventoryResult<Inventory> {
        let inventory = Inventory::new(input);
        self.inventories
            .write()
            .await
            .insert(inventory.id, inventory.clone());
        Ok(inventory)
    }

    async fn get_by_id(&self, id: Uuid) -> InventoryResult<Option<Inventory>> {
        Ok(self.inventories.read().await.get(&id).cloned())
    }

    async fn list(&self) -> InventoryResult<Vec<Inventory>> {
        let mut inventories: Vec<Inventory> =
            self.inventories.read().await.values().cloned().collect();
        inventories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(inventories)
    }

    async fn update(&self, id: Uuid, input: UpdateInventory) -> InventoryResult<Option<Inventory>> {
        let mut inventories = self.inventories.write().await;
        Ok(inventories.get_mut(&id).map(|inventory| {
            inventory.apply_update(input);
            inventory.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> InventoryResult<bool> {
        Ok(self.inventories.write().await.remove(&id).is_some())
    }

    async fn deposit(&self, id: Uuid, product: Uuid, quantity: i64, load: Load) -> InventoryResult<bool> {
        let mut inventories = self.inventories.write().await;
        Ok(inventories
            .get_mut(&id)
            .map(|inventory| inventory.deposit(product, quantity, load))
            .is_some())
    }

    async fn withdraw(&self, id: Uuid, product: Uuid, quantity: i64, load: Load) -> InventoryResult<bool> {
        let mut inventories = self.inventories.write().await;
        Ok(inventories
            .get_mut(&id)
            .is_some_and(|inventory| inventory.withdraw(product, quantity, load)))
    }

    async fn add_storage(&self, id: Uuid, storage: Uuid) -> InventoryResult<bool> {
        let mut inventories = self.inventories.write().await;
        Ok(inventories
            .get_mut(&id)
            .map(|inventory| {
                if !inventory.storage.contains(&storage) {
                    inventory.storage.push(storage);
                    inventory.updated_at = Utc::now();
                }
            })
            .is_some())
    }

    async fn remove_storage(&self, id: Uuid, storage: Uuid) -> InventoryResult<bool> {
        let mut inventories = self.inventories.write().await;
        Ok(inventories
            .get_mut(&id)
            .map(|inventory| {
                inventory.storage.retain(|s| *s != storage);
                inventory.updated_at = Utc::now();
            })
            .is_some())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStorageRepository {
    storages: Arc<RwLock<HashMap<Uuid, Storage>>>,
}

impl InMemoryStorageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageRepository for InMemoryStorageRepository {
    async fn create(&self, input: CreateStorage) -> InventoryResult<Storage> {
        let mut storages = self.storages.write().await;
        if storages.values().any(|s| s.location_id == input.location_id) {
            return Err(InventoryError::DuplicateLocation);
        }
        let storage = Storage::new(input);
        storages.insert(storage.id, storage.clone());
        Ok(storage)
    }

    async fn get_by_id(&self, id: Uuid) -> InventoryResult<Option<Storage>> {
        Ok(self.storages.read().await.get(&id).cloned())
    }

    async fn get_by_location(&self, location_id: &str) -> InventoryResult<Option<Storage>> {
        Ok(self
            .storages
            .read()
            .await
            .values()
            .find(|s| s.location_id == location_id)
            .cloned())
    }

    async fn list(&self) -> InventoryResult<Vec<Storage>> {
        let mut storages: Vec<Storage> = self.storages.read().await.values().cloned().collect();
        storages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(storages)
    }

    async fn update(&self, id: Uuid, input: UpdateStorage) -> InventoryResult<Option<Storage>> {
        let mut storages = self.storages.write().await;
        if let Some(ref location_id) = input.location_id {
            if storages
                .values()
                .any(|s| s.id != id && &s.location_id == location_id)
            {
                return Err(InventoryError::DuplicateLocation);
            }
        }
        Ok(storages.get_mut(&id).map(|storage| {
            storage.apply_update(input);
            storage.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> InventoryResult<bool> {
        Ok(self.storages.write().await.remove(&id).is_some())
    }

    async fn deposit(&self, id: Uuid, product: Uuid, quantity: i64, load: Load) -> InventoryResult<bool> {
        let mut storages = self.storages.write().await;
        Ok(storages
            .get_mut(&id)
            .map(|storage| storage.deposit(product, quantity, load))
            .is_some())
    }

    async fn withdraw(&self, id: Uuid, product: Uuid, quantity: i64, load: Load) -> InventoryResult<bool> {
        let mut storages = self.storages.write().await;
        Ok(storages
            .get_mut(&id)
            .is_some_and(|storage| storage.withdraw(product, quantity, load)))
    }

    async fn set_inventory(&self, id: Uuid, inventory: Option<Uuid>) -> InventoryResult<bool> {
        let mut storages = self.storages.write().await;
        Ok(storages
            .get_mut(&id)
            .map(|storage| {
                storage.inventory = inventory;
                storage.updated_at = Utc::now();
            })
            .is_some())
    }
}

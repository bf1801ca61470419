//! Stock accounting across products, storage bins and inventories.
//!
//! Moves validate everything they can up front, then issue one atomic
//! single-document write per touched document. The guarded product stock
//! write goes first because it is the only write that can still be refused
//! after validation.

use domain_products::{Product, ProductRepository, ProductService};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{InventoryError, InventoryResult, STORAGE_NOT_EMPTY};
use crate::models::{
    Container, ContainerKind, CostSummary, Inventory, InventoryProduct, InventoryProducts, Load,
    Storage, Utilization,
};
use crate::repository::{InventoryRepository, StorageRepository};

pub struct StockService<P, I, S>
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    products: ProductService<P>,
    inventories: Arc<I>,
    storages: Arc<S>,
}

/// Secondary container write planned during validation
struct Mirror {
    id: Uuid,
    quantity: i64,
    load: Load,
    drains_line: bool,
}

impl<P, I, S> StockService<P, I, S>
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    pub fn new(products: ProductService<P>, inventories: I, storages: S) -> Self {
        Self {
            products,
            inventories: Arc::new(inventories),
            storages: Arc::new(storages),
        }
    }

    async fn inventory(&self, id: Uuid) -> InventoryResult<Inventory> {
        self.inventories
            .get_by_id(id)
            .await?
            .ok_or(InventoryError::InventoryNotFound(id))
    }

    async fn storage(&self, id: Uuid) -> InventoryResult<Storage> {
        self.storages
            .get_by_id(id)
            .await?
            .ok_or_else(|| InventoryError::StorageNotFound(id.to_string()))
    }

    fn ensure_in_stock(product: &Product, quantity: i64) -> InventoryResult<()> {
        if product.quantity < quantity {
            return Err(domain_products::ProductError::InsufficientStock {
                available: product.quantity,
                requested: quantity,
            }
            .into());
        }
        Ok(())
    }

    fn ensure_owner(storage: &Storage, inventory_id: Uuid) -> InventoryResult<()> {
        match storage.inventory {
            Some(owner) if owner != inventory_id => Err(InventoryError::StorageAlreadyAttached {
                storage: storage.id,
                inventory: owner,
            }),
            _ => Ok(()),
        }
    }

    /// A bin named as the other side of a move must already belong to the inventory.
    fn ensure_linked(storage: &Storage, inventory_id: Uuid) -> InventoryResult<()> {
        match storage.inventory {
            Some(owner) if owner == inventory_id => Ok(()),
            Some(owner) => Err(InventoryError::StorageAlreadyAttached {
                storage: storage.id,
                inventory: owner,
            }),
            None => Err(InventoryError::StorageNotAttached {
                storage: storage.id,
                inventory: inventory_id,
            }),
        }
    }

    /// Plans the mirrored withdrawal on a secondary container; `None` when it holds no line.
    fn plan_mirror<C: Container>(container: &C, id: Uuid, product: &Product, moved: i64) -> Option<Mirror> {
        let line = container.line_quantity(product.id)?;
        let quantity = line.min(moved);
        Some(Mirror {
            id,
            quantity,
            load: Load::of(product, quantity),
            drains_line: line <= moved,
        })
    }

    /// Plans withdrawals from the inventory's bins so they never hold more than
    /// the inventory line. Units kept loose in the inventory go first, then bins
    /// in attach order.
    async fn plan_bin_withdrawals(
        &self,
        inventory: &Inventory,
        product: &Product,
        line: i64,
        moved: i64,
    ) -> InventoryResult<Vec<Mirror>> {
        let mut bins = Vec::new();
        for &storage_id in &inventory.storage {
            let Some(storage) = self.storages.get_by_id(storage_id).await? else {
                continue;
            };
            if let Some(held) = storage.line_quantity(product.id) {
                bins.push((storage_id, held));
            }
        }

        let binned: i64 = bins.iter().map(|(_, held)| held).sum();
        let mut remaining = moved - (line - binned).max(0);
        let mut plan = Vec::new();
        for (id, held) in bins {
            if remaining <= 0 {
                break;
            }
            let quantity = held.min(remaining);
            plan.push(Mirror {
                id,
                quantity,
                load: Load::of(product, quantity),
                drains_line: held <= quantity,
            });
            remaining -= quantity;
        }
        Ok(plan)
    }

    /// Lines a bin brings along when it joins an inventory, with their loads.
    async fn carried_lines(&self, storage: &Storage) -> InventoryResult<Vec<(Uuid, i64, Load)>> {
        let ids = storage.products.iter().map(|line| line.product).collect();
        let by_id: HashMap<Uuid, Product> = self
            .products
            .get_many(ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(storage
            .products
            .iter()
            .map(|line| {
                let load = by_id
                    .get(&line.product)
                    .map(|product| Load::of(product, line.quantity))
                    .unwrap_or_default();
                (line.product, line.quantity, load)
            })
            .collect())
    }

    /// Places `quantity` units of unallocated stock into an inventory, and into
    /// one of its storage bins when `storage_id` is given.
    #[instrument(skip(self))]
    pub async fn add_to_inventory(
        &self,
        inventory_id: Uuid,
        product_id: Uuid,
        quantity: i64,
        storage_id: Option<Uuid>,
    ) -> InventoryResult<Inventory> {
        let product = self.products.get_product(product_id).await?;
        let inventory = self.inventory(inventory_id).await?;
        let load = Load::of(&product, quantity);

        inventory.ensure_fits(&load)?;
        Self::ensure_in_stock(&product, quantity)?;

        if let Some(storage_id) = storage_id {
            let storage = self.storage(storage_id).await?;
            Self::ensure_linked(&storage, inventory_id)?;
            storage.ensure_fits(&load)?;
        }

        self.products.take_stock(product_id, quantity).await?;

        if let Some(storage_id) = storage_id {
            self.storages
                .deposit(storage_id, product_id, quantity, load)
                .await?;
        }
        if !self
            .inventories
            .deposit(inventory_id, product_id, quantity, load)
            .await?
        {
            tracing::warn!(inventory_id = %inventory_id, "Inventory vanished during deposit");
            return Err(InventoryError::InventoryNotFound(inventory_id));
        }
        if let Some(storage_id) = storage_id {
            self.products.set_storage(product_id, Some(storage_id)).await?;
        }

        tracing::info!(
            inventory_id = %inventory_id,
            product_id = %product_id,
            quantity,
            cost = load.cost,
            "Product added to inventory"
        );
        self.inventory(inventory_id).await
    }

    /// Takes up to `quantity` units out of an inventory and back into unallocated
    /// stock, drawing the same units out of its bins that hold the product.
    #[instrument(skip(self))]
    pub async fn remove_from_inventory(
        &self,
        inventory_id: Uuid,
        product_id: Uuid,
        quantity: i64,
    ) -> InventoryResult<Inventory> {
        let product = self.products.get_product(product_id).await?;
        let inventory = self.inventory(inventory_id).await?;

        let line = inventory
            .line_quantity(product_id)
            .ok_or(InventoryError::NotInContainer(ContainerKind::Inventory))?;
        let moved = line.min(quantity);
        let load = Load::of(&product, moved);

        let mirrors = self
            .plan_bin_withdrawals(&inventory, &product, line, moved)
            .await?;

        self.inventories
            .withdraw(inventory_id, product_id, moved, load)
            .await?;
        for mirror in &mirrors {
            self.storages
                .withdraw(mirror.id, product_id, mirror.quantity, mirror.load)
                .await?;
        }
        self.products.restore_stock(product_id, moved).await?;
        for mirror in mirrors.iter().filter(|m| m.drains_line) {
            self.products.clear_storage_if(product_id, mirror.id).await?;
        }

        tracing::info!(
            inventory_id = %inventory_id,
            product_id = %product_id,
            quantity = moved,
            cost = load.cost,
            "Product removed from inventory"
        );
        self.inventory(inventory_id).await
    }

    /// Places `quantity` units of unallocated stock into a storage bin, mirrored on
    /// the bin's inventory. A named `inventory_id` must be that inventory.
    #[instrument(skip(self))]
    pub async fn add_to_storage(
        &self,
        storage_id: Uuid,
        product_id: Uuid,
        quantity: i64,
        inventory_id: Option<Uuid>,
    ) -> InventoryResult<Storage> {
        let product = self.products.get_product(product_id).await?;
        let storage = self.storage(storage_id).await?;
        let load = Load::of(&product, quantity);

        storage.ensure_fits(&load)?;
        Self::ensure_in_stock(&product, quantity)?;

        if let Some(inventory_id) = inventory_id {
            Self::ensure_linked(&storage, inventory_id)?;
        }
        let secondary = storage.inventory;
        if let Some(inventory_id) = secondary {
            self.inventory(inventory_id).await?.ensure_fits(&load)?;
        }

        self.products.take_stock(product_id, quantity).await?;

        if let Some(inventory_id) = secondary {
            self.inventories
                .deposit(inventory_id, product_id, quantity, load)
                .await?;
        }
        if !self
            .storages
            .deposit(storage_id, product_id, quantity, load)
            .await?
        {
            tracing::warn!(storage_id = %storage_id, "Storage vanished during deposit");
            return Err(InventoryError::StorageNotFound(storage_id.to_string()));
        }
        self.products.set_storage(product_id, Some(storage_id)).await?;

        tracing::info!(
            storage_id = %storage_id,
            product_id = %product_id,
            quantity,
            cost = load.cost,
            "Product added to storage"
        );
        self.storage(storage_id).await
    }

    /// Takes up to `quantity` units out of a storage bin and back into unallocated
    /// stock, mirrored on the bin's inventory when it holds the product.
    #[instrument(skip(self))]
    pub async fn remove_from_storage(
        &self,
        storage_id: Uuid,
        product_id: Uuid,
        quantity: i64,
        inventory_id: Option<Uuid>,
    ) -> InventoryResult<Storage> {
        let product = self.products.get_product(product_id).await?;
        let storage = self.storage(storage_id).await?;

        let line = storage
            .line_quantity(product_id)
            .ok_or(InventoryError::NotInContainer(ContainerKind::Storage))?;
        let moved = line.min(quantity);
        let load = Load::of(&product, moved);

        if let Some(inventory_id) = inventory_id {
            Self::ensure_linked(&storage, inventory_id)?;
        }
        let mirror = match storage.inventory {
            Some(inventory_id) => {
                let inventory = self.inventory(inventory_id).await?;
                Self::plan_mirror(&inventory, inventory_id, &product, moved)
            }
            None => None,
        };

        self.storages
            .withdraw(storage_id, product_id, moved, load)
            .await?;
        if let Some(ref mirror) = mirror {
            self.inventories
                .withdraw(mirror.id, product_id, mirror.quantity, mirror.load)
                .await?;
        }
        self.products.restore_stock(product_id, moved).await?;
        if line <= moved {
            self.products.clear_storage_if(product_id, storage_id).await?;
        }

        tracing::info!(
            storage_id = %storage_id,
            product_id = %product_id,
            quantity = moved,
            cost = load.cost,
            "Product removed from storage"
        );
        self.storage(storage_id).await
    }

    /// Links a storage bin to an inventory on both sides. A stocked bin that is
    /// not linked yet brings its lines into the inventory, within its capacity.
    #[instrument(skip(self))]
    pub async fn attach_storage(&self, inventory_id: Uuid, storage_id: Uuid) -> InventoryResult<Inventory> {
        let inventory = self.inventory(inventory_id).await?;
        let storage = self.storage(storage_id).await?;
        Self::ensure_owner(&storage, inventory_id)?;

        let carried = if storage.inventory.is_none() {
            self.carried_lines(&storage).await?
        } else {
            Vec::new()
        };
        let total = carried
            .iter()
            .fold(Load::default(), |total, &(_, _, load)| total + load);
        inventory.ensure_fits(&total)?;

        self.inventories.add_storage(inventory_id, storage_id).await?;
        self.storages
            .set_inventory(storage_id, Some(inventory_id))
            .await?;
        for (product_id, quantity, load) in carried {
            self.inventories
                .deposit(inventory_id, product_id, quantity, load)
                .await?;
        }

        tracing::info!(inventory_id = %inventory_id, storage_id = %storage_id, "Storage attached");
        self.inventory(inventory_id).await
    }

    /// Unlinks a storage bin; refused while the bin holds any product line.
    #[instrument(skip(self))]
    pub async fn detach_storage(&self, inventory_id: Uuid, storage_id: Uuid) -> InventoryResult<Inventory> {
        self.inventory(inventory_id).await?;
        let storage = self.storage(storage_id).await?;

        if !storage.is_empty() {
            return Err(InventoryError::NotEmpty(STORAGE_NOT_EMPTY.to_string()));
        }

        self.inventories
            .remove_storage(inventory_id, storage_id)
            .await?;
        if storage.inventory == Some(inventory_id) {
            self.storages.set_inventory(storage_id, None).await?;
        }

        tracing::info!(inventory_id = %inventory_id, storage_id = %storage_id, "Storage detached");
        self.inventory(inventory_id).await
    }

    #[instrument(skip(self))]
    pub async fn inventory_utilization(&self, id: Uuid) -> InventoryResult<Utilization> {
        Ok(self.inventory(id).await?.utilization())
    }

    #[instrument(skip(self))]
    pub async fn storage_utilization(&self, id: Uuid) -> InventoryResult<Utilization> {
        Ok(self.storage(id).await?.utilization())
    }

    #[instrument(skip(self))]
    pub async fn inventory_cost_summary(&self, id: Uuid) -> InventoryResult<CostSummary> {
        Ok(self.inventory(id).await?.cost_summary())
    }

    #[instrument(skip(self))]
    pub async fn storage_cost_summary(&self, id: Uuid) -> InventoryResult<CostSummary> {
        Ok(self.storage(id).await?.cost_summary())
    }

    /// The inventory's lines with their products, in line order
    #[instrument(skip(self))]
    pub async fn inventory_products(&self, id: Uuid) -> InventoryResult<InventoryProducts> {
        let inventory = self.inventory(id).await?;
        let ids = inventory.products.iter().map(|line| line.product).collect();

        let mut by_id: HashMap<Uuid, Product> = self
            .products
            .get_many(ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let products: Vec<InventoryProduct> = inventory
            .products
            .iter()
            .filter_map(|line| {
                by_id.remove(&line.product).map(|product| InventoryProduct {
                    product,
                    quantity: line.quantity,
                })
            })
            .collect();

        Ok(InventoryProducts {
            total: products.len(),
            products,
        })
    }
}

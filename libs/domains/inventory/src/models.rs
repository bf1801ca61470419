use chrono::{DateTime, Utc};
use domain_products::{Dimensions, GeoPoint, Product, StockLine};
use serde::{Deserialize, Serialize};
use std::ops::Add;
use strum::Display;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{InventoryError, InventoryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ContainerKind {
    Inventory,
    Storage,
}

/// Weight, volume and value of `quantity` units of one product
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Load {
    pub weight: f64,
    pub volume: f64,
    pub cost: f64,
}

impl Load {
    pub fn of(product: &Product, quantity: i64) -> Self {
        let q = quantity as f64;
        Self {
            weight: product.weight * q,
            volume: product.unit_volume() * q,
            cost: product.price * q,
        }
    }

    pub fn negated(self) -> Self {
        Self {
            weight: -self.weight,
            volume: -self.volume,
            cost: -self.cost,
        }
    }
}

impl Add for Load {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            weight: self.weight + other.weight,
            volume: self.volume + other.volume,
            cost: self.cost + other.cost,
        }
    }
}

/// Storage bin holding product lines, optionally under an inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Storage {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub location_id: String,
    pub dimensions: Dimensions,
    /// Weight limit
    pub holding_capacity: f64,
    pub capacity_occupied: f64,
    pub volume: f64,
    pub volume_occupied: f64,
    pub total_cost: f64,
    #[serde(default)]
    pub products: Vec<StockLine>,
    #[serde(default)]
    pub inventory: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Inventory {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    /// Weight limit
    pub total_capacity: f64,
    pub capacity_occupied: f64,
    pub total_volume: f64,
    pub volume_occupied: f64,
    pub cost_price: f64,
    #[serde(default)]
    pub products: Vec<StockLine>,
    /// Attached storage bins
    #[serde(default)]
    pub storage: Vec<Uuid>,
    pub inventory_location: GeoPoint,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateStorage {
    #[validate(length(min = 2, max = 40))]
    pub location_id: String,
    #[validate(nested)]
    pub dimensions: Dimensions,
    #[validate(range(min = 0.0))]
    pub holding_capacity: f64,
    /// Defaults to length × width × height
    #[validate(range(min = 0.0))]
    pub volume: Option<f64>,
    /// Inventory to attach the new bin to
    pub inventory: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateStorage {
    #[validate(length(min = 2, max = 40))]
    pub location_id: Option<String>,
    #[validate(nested)]
    pub dimensions: Option<Dimensions>,
    #[validate(range(min = 0.0))]
    pub holding_capacity: Option<f64>,
    #[validate(range(min = 0.0))]
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateInventory {
    #[validate(length(min = 3, max = 50))]
    pub name: String,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub total_capacity: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub total_volume: f64,
    #[validate(nested)]
    pub inventory_location: GeoPoint,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateInventory {
    #[validate(length(min = 3, max = 50))]
    pub name: Option<String>,
    #[validate(range(min = 0.0))]
    pub total_capacity: Option<f64>,
    #[validate(range(min = 0.0))]
    pub total_volume: Option<f64>,
    #[validate(nested)]
    pub inventory_location: Option<GeoPoint>,
}

fn one() -> i64 {
    1
}

/// Body of `POST /inventory/{id}/products`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AddInventoryProduct {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[serde(default = "one")]
    pub quantity: i64,
    /// Also place the units in this storage bin
    pub storage_id: Option<Uuid>,
}

/// Body of `DELETE /inventory/{id}/products`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RemoveInventoryProduct {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[serde(default = "one")]
    pub quantity: i64,
}

/// Body of `POST` and `DELETE /storages/{id}/products`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct StorageProductRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[serde(default = "one")]
    pub quantity: i64,
    /// Inventory to mirror the move on; defaults to the bin's own inventory
    pub inventory_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct StorageLinkRequest {
    pub storage_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Utilization {
    pub capacity_utilization: String,
    pub volume_utilization: String,
    pub total_cost: f64,
    pub capacity_occupied: f64,
    pub total_capacity: f64,
    pub volume_occupied: f64,
    pub total_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CostBreakdown {
    pub capacity: f64,
    pub capacity_used: f64,
    pub total_volume: f64,
    pub volume_used: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CostSummary {
    pub total_value: f64,
    pub capacity_utilization: String,
    pub volume_utilization: String,
    pub summary: CostBreakdown,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InventoryProduct {
    pub product: Product,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InventoryProducts {
    pub total: usize,
    pub products: Vec<InventoryProduct>,
}

/// `occupied / total` as a percentage with two decimals; `"0.00%"` for an empty total
pub fn percentage(occupied: f64, total: f64) -> String {
    let ratio = if total > 0.0 {
        occupied / total * 100.0
    } else {
        0.0
    };
    format!("{:.2}%", ratio)
}

/// Anything that holds product lines against weight and volume limits.
pub trait Container {
    const KIND: ContainerKind;

    fn capacity(&self) -> f64;
    fn capacity_occupied(&self) -> f64;
    fn volume(&self) -> f64;
    fn volume_occupied(&self) -> f64;
    fn total_cost(&self) -> f64;
    fn lines(&self) -> &[StockLine];

    /// In-place mutation used by the in-memory repositories
    fn lines_mut(&mut self) -> &mut Vec<StockLine>;
    fn add_load(&mut self, load: Load);

    fn line_quantity(&self, product: Uuid) -> Option<i64> {
        self.lines()
            .iter()
            .find(|line| line.product == product)
            .map(|line| line.quantity)
    }

    fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }

    /// Rejects a load that would overflow the weight or volume limit.
    fn ensure_fits(&self, load: &Load) -> InventoryResult<()> {
        if self.capacity_occupied() + load.weight > self.capacity() {
            return Err(InventoryError::CapacityExceeded {
                kind: Self::KIND,
                weight: load.weight,
                available: self.capacity() - self.capacity_occupied(),
            });
        }
        if self.volume_occupied() + load.volume > self.volume() {
            return Err(InventoryError::VolumeExceeded {
                kind: Self::KIND,
                volume: load.volume,
                available: self.volume() - self.volume_occupied(),
            });
        }
        Ok(())
    }

    fn utilization(&self) -> Utilization {
        Utilization {
            capacity_utilization: percentage(self.capacity_occupied(), self.capacity()),
            volume_utilization: percentage(self.volume_occupied(), self.volume()),
            total_cost: self.total_cost(),
            capacity_occupied: self.capacity_occupied(),
            total_capacity: self.capacity(),
            volume_occupied: self.volume_occupied(),
            total_volume: self.volume(),
        }
    }

    fn cost_summary(&self) -> CostSummary {
        let utilization = self.utilization();
        CostSummary {
            total_value: self.total_cost(),
            capacity_utilization: utilization.capacity_utilization,
            volume_utilization: utilization.volume_utilization,
            summary: CostBreakdown {
                capacity: self.capacity(),
                capacity_used: self.capacity_occupied(),
                total_volume: self.volume(),
                volume_used: self.volume_occupied(),
                total_value: self.total_cost(),
            },
        }
    }

    /// Adds `quantity` to the product's line, creating it when absent.
    fn deposit(&mut self, product: Uuid, quantity: i64, load: Load) {
        let lines = self.lines_mut();
        match lines.iter().position(|l| l.product == product) {
            Some(index) => lines[index].quantity += quantity,
            None => lines.push(StockLine { product, quantity }),
        }
        self.add_load(load);
    }

    /// Takes `quantity` off the product's line and drops the line once it is used up.
    /// Returns false when there is no line for the product.
    fn withdraw(&mut self, product: Uuid, quantity: i64, load: Load) -> bool {
        let lines = self.lines_mut();
        let Some(index) = lines.iter().position(|l| l.product == product) else {
            return false;
        };
        if lines[index].quantity <= quantity {
            lines.remove(index);
        } else {
            lines[index].quantity -= quantity;
        }
        self.add_load(load.negated());
        true
    }
}

impl Container for Storage {
    const KIND: ContainerKind = ContainerKind::Storage;

    fn capacity(&self) -> f64 {
        self.holding_capacity
    }
    fn capacity_occupied(&self) -> f64 {
        self.capacity_occupied
    }
    fn volume(&self) -> f64 {
        self.volume
    }
    fn volume_occupied(&self) -> f64 {
        self.volume_occupied
    }
    fn total_cost(&self) -> f64 {
        self.total_cost
    }
    fn lines(&self) -> &[StockLine] {
        &self.products
    }
    fn lines_mut(&mut self) -> &mut Vec<StockLine> {
        &mut self.products
    }
    fn add_load(&mut self, load: Load) {
        self.capacity_occupied += load.weight;
        self.volume_occupied += load.volume;
        self.total_cost += load.cost;
        self.updated_at = Utc::now();
    }
}

impl Container for Inventory {
    const KIND: ContainerKind = ContainerKind::Inventory;

    fn capacity(&self) -> f64 {
        self.total_capacity
    }
    fn capacity_occupied(&self) -> f64 {
        self.capacity_occupied
    }
    fn volume(&self) -> f64 {
        self.total_volume
    }
    fn volume_occupied(&self) -> f64 {
        self.volume_occupied
    }
    fn total_cost(&self) -> f64 {
        self.cost_price
    }
    fn lines(&self) -> &[StockLine] {
        &self.products
    }
    fn lines_mut(&mut self) -> &mut Vec<StockLine> {
        &mut self.products
    }
    fn add_load(&mut self, load: Load) {
        self.capacity_occupied += load.weight;
        self.volume_occupied += load.volume;
        self.cost_price += load.cost;
        self.updated_at = Utc::now();
    }
}

impl Storage {
    pub fn new(input: CreateStorage) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            location_id: input.location_id,
            volume: input.volume.unwrap_or_else(|| input.dimensions.volume()),
            dimensions: input.dimensions,
            holding_capacity: input.holding_capacity,
            capacity_occupied: 0.0,
            volume_occupied: 0.0,
            total_cost: 0.0,
            products: Vec::new(),
            inventory: input.inventory,
            created_at: now,
            updated_at: now,
        }
    }

    /// New dimensions recompute the volume unless one is supplied alongside.
    pub fn apply_update(&mut self, update: UpdateStorage) {
        if let Some(location_id) = update.location_id {
            self.location_id = location_id;
        }
        if let Some(dimensions) = update.dimensions {
            self.dimensions = dimensions;
            self.volume = dimensions.volume();
        }
        if let Some(holding_capacity) = update.holding_capacity {
            self.holding_capacity = holding_capacity;
        }
        if let Some(volume) = update.volume {
            self.volume = volume;
        }
        self.updated_at = Utc::now();
    }
}

impl Inventory {
    pub fn new(input: CreateInventory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            total_capacity: input.total_capacity,
            capacity_occupied: 0.0,
            total_volume: input.total_volume,
            volume_occupied: 0.0,
            cost_price: 0.0,
            products: Vec::new(),
            storage: Vec::new(),
            inventory_location: input.inventory_location,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateInventory) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(total_capacity) = update.total_capacity {
            self.total_capacity = total_capacity;
        }
        if let Some(total_volume) = update.total_volume {
            self.total_volume = total_volume;
        }
        if let Some(location) = update.inventory_location {
            self.inventory_location = location;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(capacity: f64, volume: f64) -> Storage {
        Storage::new(CreateStorage {
            location_id: "A1".to_string(),
            dimensions: Dimensions::new(5.0, 5.0, 2.0),
            holding_capacity: capacity,
            volume: Some(volume),
            inventory: None,
        })
    }

    #[test]
    fn test_storage_volume_defaults_to_dimensions() {
        let storage = Storage::new(CreateStorage {
            location_id: "B2".to_string(),
            dimensions: Dimensions::new(2.0, 3.0, 4.0),
            holding_capacity: 100.0,
            volume: None,
            inventory: None,
        });
        assert_eq!(storage.volume, 24.0);
    }

    #[test]
    fn test_storage_update_dimensions_recomputes_volume() {
        let mut storage = storage(10.0, 99.0);
        storage.apply_update(UpdateStorage {
            dimensions: Some(Dimensions::new(1.0, 2.0, 3.0)),
            ..Default::default()
        });
        assert_eq!(storage.volume, 6.0);
    }

    #[test]
    fn test_percentage_handles_zero_total() {
        assert_eq!(percentage(0.0, 0.0), "0.00%");
        assert_eq!(percentage(40.0, 50.0), "80.00%");
        assert_eq!(percentage(1.0, 3.0), "33.33%");
    }

    #[test]
    fn test_ensure_fits_reports_remaining_capacity() {
        let mut storage = storage(50.0, 50.0);
        storage.capacity_occupied = 40.0;

        let err = storage
            .ensure_fits(&Load {
                weight: 20.0,
                volume: 1.0,
                cost: 0.0,
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Product weight (20) exceeds available storage capacity (10)"
        );
    }

    #[test]
    fn test_ensure_fits_checks_volume_after_weight() {
        let storage = storage(50.0, 5.0);
        let err = storage
            .ensure_fits(&Load {
                weight: 1.0,
                volume: 6.0,
                cost: 0.0,
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Product volume (6) exceeds available storage volume (5)"
        );
    }

    #[test]
    fn test_deposit_and_withdraw_lines() {
        let mut storage = storage(100.0, 100.0);
        let product = Uuid::now_v7();
        let unit = Load {
            weight: 2.0,
            volume: 1.0,
            cost: 10.0,
        };

        storage.deposit(product, 3, unit);
        storage.deposit(product, 2, unit);
        assert_eq!(storage.line_quantity(product), Some(5));
        assert_eq!(storage.products.len(), 1);

        assert!(storage.withdraw(product, 2, unit));
        assert_eq!(storage.line_quantity(product), Some(3));

        assert!(storage.withdraw(product, 3, unit));
        assert!(storage.is_empty());
        assert!(!storage.withdraw(product, 1, unit));
    }

    #[test]
    fn test_container_kind_displays_snake_case() {
        assert_eq!(ContainerKind::Inventory.to_string(), "inventory");
        assert_eq!(ContainerKind::Storage.to_string(), "storage");
    }

    #[test]
    fn test_loads_add_componentwise() {
        let a = Load { weight: 1.0, volume: 2.0, cost: 3.0 };
        let b = Load { weight: 0.5, volume: 1.0, cost: 7.0 };
        assert_eq!(a + b, Load { weight: 1.5, volume: 3.0, cost: 10.0 });
        assert_eq!(a + b.negated() + b, a);
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{CreateProduct, GeoPoint, Product, ProductFilter, UpdateProduct};

/// Persistence for products.
///
/// The stock primitives (`take_stock`, `restore_stock`) must update the
/// quantity and the restock flag in a single write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Products for the given ids; unknown ids are skipped
    async fn get_many(&self, ids: Vec<Uuid>) -> ProductResult<Vec<Product>>;

    async fn get_by_sku(&self, sku: &str) -> ProductResult<Option<Product>>;

    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>>;

    /// Merges the update into the stored product. `None` when it does not exist.
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Option<Product>>;

    async fn delete(&self, id: Uuid) -> ProductResult<bool>;

    async fn list_by_category(&self, category: &str) -> ProductResult<Vec<Product>>;

    async fn list_by_supplier(&self, supplier_id: Uuid) -> ProductResult<Vec<Product>>;

    async fn list_needing_restock(&self) -> ProductResult<Vec<Product>>;

    /// `quantity <= threshold_limit`, evaluated on the stored values
    async fn list_low_stock(&self) -> ProductResult<Vec<Product>>;

    /// Expiry date on or before `date`
    async fn list_expiring_before(&self, date: NaiveDate) -> ProductResult<Vec<Product>>;

    /// Expiry date strictly before `today`
    async fn list_expired(&self, today: NaiveDate) -> ProductResult<Vec<Product>>;

    /// Products whose supplier is within `max_distance` meters, nearest first
    async fn list_near(&self, point: GeoPoint, max_distance: f64) -> ProductResult<Vec<Product>>;

    /// Removes `quantity` units of unallocated stock, only if that many are available.
    /// `None` when the product is missing or short.
    async fn take_stock(&self, id: Uuid, quantity: i64) -> ProductResult<Option<Product>>;

    /// Adds `quantity` units back to unallocated stock. `None` when the product is missing.
    async fn restore_stock(&self, id: Uuid, quantity: i64) -> ProductResult<Option<Product>>;

    /// Sets (or clears) the storage bin reference
    async fn set_storage(&self, id: Uuid, storage: Option<Uuid>) -> ProductResult<()>;

    /// Clears the storage reference only while it still points at `storage`
    async fn clear_storage_if(&self, id: Uuid, storage: Uuid) -> ProductResult<()>;
}

//! Product Service - Business logic layer

use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, GeoPoint, NearQuery, Product, ProductFilter, UpdateProduct};
use crate::repository::ProductRepository;

pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_NEAR_DISTANCE_M: f64 = 10_000.0;

pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Products for the given ids, in no particular order; missing ids are skipped
    #[instrument(skip(self, ids))]
    pub async fn get_many(&self, ids: Vec<Uuid>) -> ProductResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.repository.get_many(ids).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_sku(&self, sku: &str) -> ProductResult<Product> {
        // sku is the id string, so an unknown sku still names the missing id when it parses
        self.repository
            .get_by_sku(sku)
            .await?
            .ok_or_else(|| ProductError::NotFound(Uuid::parse_str(sku).unwrap_or_default()))
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        self.repository.list(filter).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository
            .update(id, input)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_by_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        self.repository.list_by_category(category).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_supplier(&self, supplier_id: Uuid) -> ProductResult<Vec<Product>> {
        self.repository.list_by_supplier(supplier_id).await
    }

    #[instrument(skip(self))]
    pub async fn list_needing_restock(&self) -> ProductResult<Vec<Product>> {
        self.repository.list_needing_restock().await
    }

    #[instrument(skip(self))]
    pub async fn list_low_stock(&self) -> ProductResult<Vec<Product>> {
        self.repository.list_low_stock().await
    }

    /// Products expiring within `days` (default 7) from today, inclusive
    #[instrument(skip(self))]
    pub async fn list_expiring(&self, days: Option<i64>) -> ProductResult<Vec<Product>> {
        let days = days.unwrap_or(DEFAULT_EXPIRY_WINDOW_DAYS);
        if days < 0 {
            return Err(ProductError::Validation(
                "days must not be negative".to_string(),
            ));
        }
        let cutoff = today() + Duration::days(days);
        self.repository.list_expiring_before(cutoff).await
    }

    #[instrument(skip(self))]
    pub async fn list_expired(&self) -> ProductResult<Vec<Product>> {
        self.repository.list_expired(today()).await
    }

    #[instrument(skip(self))]
    pub async fn list_near(&self, query: NearQuery) -> ProductResult<Vec<Product>> {
        if !(-180.0..=180.0).contains(&query.lng) || !(-90.0..=90.0).contains(&query.lat) {
            return Err(ProductError::Validation(
                "lng must be within [-180, 180] and lat within [-90, 90]".to_string(),
            ));
        }
        let max_distance = query.max_distance.unwrap_or(DEFAULT_NEAR_DISTANCE_M);
        self.repository
            .list_near(GeoPoint::new(query.lng, query.lat), max_distance)
            .await
    }

    /// Removes `quantity` units from unallocated stock.
    #[instrument(skip(self))]
    pub async fn take_stock(&self, id: Uuid, quantity: i64) -> ProductResult<Product> {
        if let Some(product) = self.repository.take_stock(id, quantity).await? {
            tracing::info!(product_id = %id, quantity, remaining = product.quantity, "Stock taken");
            return Ok(product);
        }

        let product = self.get_product(id).await?;
        Err(ProductError::InsufficientStock {
            available: product.quantity,
            requested: quantity,
        })
    }

    /// Returns `quantity` units to unallocated stock.
    #[instrument(skip(self))]
    pub async fn restore_stock(&self, id: Uuid, quantity: i64) -> ProductResult<Product> {
        let product = self
            .repository
            .restore_stock(id, quantity)
            .await?
            .ok_or(ProductError::NotFound(id))?;
        tracing::info!(product_id = %id, quantity, remaining = product.quantity, "Stock restored");
        Ok(product)
    }

    pub async fn set_storage(&self, id: Uuid, storage: Option<Uuid>) -> ProductResult<()> {
        self.repository.set_storage(id, storage).await
    }

    pub async fn clear_storage_if(&self, id: Uuid, storage: Uuid) -> ProductResult<()> {
        self.repository.clear_storage_if(id, storage).await
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dimensions;
    use crate::repository::MockProductRepository;
    use mockall::predicate::{always, eq};

    fn sample_input() -> CreateProduct {
        CreateProduct {
            name: "Canned Beans".to_string(),
            batch_id: Some("B-01".to_string()),
            category: Some("food".to_string()),
            price: 1.5,
            quantity: 10,
            weight: 0.4,
            dimensions: Dimensions::new(0.1, 0.1, 0.12),
            description: None,
            threshold_limit: 2,
            shelf_life_days: Some(365),
            mfg_date: None,
            expiry_date: None,
            supplier_id: None,
            supplier_location: None,
        }
    }

    #[tokio::test]
    async fn test_create_product_success() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_create()
            .times(1)
            .returning(|input| Ok(Product::new(input)));

        let service = ProductService::new(mock_repo);
        let product = service.create_product(sample_input()).await.unwrap();

        assert_eq!(product.name, "Canned Beans");
        assert_eq!(product.sku, product.id.to_string());
    }

    #[tokio::test]
    async fn test_create_product_validation_error() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let mut input = sample_input();
        input.name = "x".to_string();

        let result = service.create_product(input).await;
        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut mock_repo = MockProductRepository::new();
        let id = Uuid::now_v7();
        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        let result = service.get_product(id).await;
        assert!(matches!(result, Err(ProductError::NotFound(got)) if got == id));
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(false));

        let service = ProductService::new(mock_repo);
        let result = service.delete_product(Uuid::now_v7()).await;
        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_take_stock_reports_available_quantity() {
        let mut mock_repo = MockProductRepository::new();
        let product = Product::new(sample_input());
        let id = product.id;

        mock_repo
            .expect_take_stock()
            .with(eq(id), eq(25))
            .returning(|_, _| Ok(None));
        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(product.clone())));

        let service = ProductService::new(mock_repo);
        let err = service.take_stock(id, 25).await.unwrap_err();

        assert!(matches!(
            err,
            ProductError::InsufficientStock {
                available: 10,
                requested: 25
            }
        ));
        assert_eq!(err.to_string(), "Insufficient stock. Available: 10, Requested: 25");
    }

    #[tokio::test]
    async fn test_take_stock_missing_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_take_stock().returning(|_, _| Ok(None));
        mock_repo.expect_get_by_id().returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        let result = service.take_stock(Uuid::now_v7(), 1).await;
        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_expiring_uses_default_window() {
        let mut mock_repo = MockProductRepository::new();
        let expected = today() + Duration::days(DEFAULT_EXPIRY_WINDOW_DAYS);
        mock_repo
            .expect_list_expiring_before()
            .with(eq(expected))
            .returning(|_| Ok(vec![]));

        let service = ProductService::new(mock_repo);
        assert!(service.list_expiring(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_near_defaults_distance() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_list_near()
            .with(always(), eq(DEFAULT_NEAR_DISTANCE_M))
            .returning(|_, _| Ok(vec![]));

        let service = ProductService::new(mock_repo);
        let query = NearQuery {
            lng: 10.0,
            lat: 50.0,
            max_distance: None,
        };
        assert!(service.list_near(query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_near_rejects_out_of_range_coordinates() {
        let service = ProductService::new(MockProductRepository::new());
        let query = NearQuery {
            lng: 200.0,
            lat: 0.0,
            max_distance: None,
        };
        assert!(matches!(
            service.list_near(query).await,
            Err(ProductError::Validation(_))
        ));
    }
}

//! In-process [`ProductRepository`] backed by a `HashMap`.
//!
//! Used by tests across the workspace and by the stock accounting scenarios
//! that need real repository behaviour without a database.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{CreateProduct, GeoPoint, Product, ProductFilter, UpdateProduct};
use crate::repository::ProductRepository;

#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a fully built product as-is
    pub async fn insert(&self, product: Product) {
        self.products.write().await.insert(product.id, product);
    }

    async fn select(&self, predicate: impl Fn(&Product) -> bool) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| predicate(p))
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input);
        self.insert(product.clone()).await;
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn get_many(&self, ids: Vec<Uuid>) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(ids.iter().filter_map(|id| products.get(id).cloned()).collect())
    }

    async fn get_by_sku(&self, sku: &str) -> ProductResult<Option<Product>> {
        Ok(self.select(|p| p.sku == sku).await.into_iter().next())
    }

    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let products = self
            .select(|p| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|c| p.category.as_ref() == Some(c))
                    && filter.supplier_id.is_none_or(|s| p.supplier_id == Some(s))
                    && filter
                        .needs_restock
                        .is_none_or(|r| p.restock_recommended == r)
            })
            .await;

        Ok(products
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit.max(0) as usize)
            .collect())
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Option<Product>> {
        let mut products = self.products.write().await;
        Ok(products.get_mut(&id).map(|product| {
            product.apply_update(input);
            product.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        Ok(self.products.write().await.remove(&id).is_some())
    }

    async fn list_by_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        Ok(self
            .select(|p| p.category.as_deref() == Some(category))
            .await)
    }

    async fn list_by_supplier(&self, supplier_id: Uuid) -> ProductResult<Vec<Product>> {
        Ok(self.select(|p| p.supplier_id == Some(supplier_id)).await)
    }

    async fn list_needing_restock(&self) -> ProductResult<Vec<Product>> {
        Ok(self.select(|p| p.restock_recommended).await)
    }

    async fn list_low_stock(&self) -> ProductResult<Vec<Product>> {
        Ok(self
            .select(|p| Product::needs_restock(p.quantity, p.threshold_limit))
            .await)
    }

    async fn list_expiring_before(&self, date: NaiveDate) -> ProductResult<Vec<Product>> {
        Ok(self
            .select(|p| p.expiry_date.is_some_and(|d| d <= date))
            .await)
    }

    async fn list_expired(&self, today: NaiveDate) -> ProductResult<Vec<Product>> {
        Ok(self
            .select(|p| p.expiry_date.is_some_and(|d| d < today))
            .await)
    }

    async fn list_near(&self, point: GeoPoint, max_distance: f64) -> ProductResult<Vec<Product>> {
        let mut nearby: Vec<(f64, Product)> = self
            .select(|p| p.supplier_location.is_some())
            .await
            .into_iter()
            .filter_map(|p| {
                let distance = p.supplier_location.as_ref()?.distance_to(&point);
                (distance <= max_distance).then_some((distance, p))
            })
            .collect();
        nearby.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(nearby.into_iter().map(|(_, p)| p).collect())
    }

    async fn take_stock(&self, id: Uuid, quantity: i64) -> ProductResult<Option<Product>> {
        let mut products = self.products.write().await;
        Ok(products
            .get_mut(&id)
            .filter(|p| p.quantity >= quantity)
            .map(|product| {
                product.adjust_quantity(-quantity);
                product.clone()
            }))
    }

    async fn restore_stock(&self, id: Uuid, quantity: i64) -> ProductResult<Option<Product>> {
        let mut products = self.products.write().await;
        Ok(products.get_mut(&id).map(|product| {
            product.adjust_quantity(quantity);
            product.clone()
        }))
    }

    async fn set_storage(&self, id: Uuid, storage: Option<Uuid>) -> ProductResult<()> {
        if let Some(product) = self.products.write().await.get_mut(&id) {
            product.storage = storage;
            product.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn clear_storage_if(&self, id: Uuid, storage: Uuid) -> ProductResult<()> {
        if let Some(product) = self.products.write().await.get_mut(&id) {
            if product.storage == Some(storage) {
                product.storage = None;
                product.updated_at = Utc::now();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dimensions;

    fn input(name: &str, quantity: i64, threshold: i64) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            batch_id: None,
            category: None,
            price: 1.0,
            quantity,
            weight: 1.0,
            dimensions: Dimensions::default(),
            description: None,
            threshold_limit: threshold,
            shelf_life_days: None,
            mfg_date: None,
            expiry_date: None,
            supplier_id: None,
            supplier_location: None,
        }
    }

    #[tokio::test]
    async fn test_take_stock_refuses_to_go_negative() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(input("Crate", 5, 0)).await.unwrap();

        assert!(repo.take_stock(product.id, 6).await.unwrap().is_none());
        let updated = repo.take_stock(product.id, 5).await.unwrap().unwrap();
        assert_eq!(updated.quantity, 0);
        assert!(updated.restock_recommended);
    }

    #[tokio::test]
    async fn test_clear_storage_only_when_matching() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(input("Crate", 5, 0)).await.unwrap();
        let (bin_a, bin_b) = (Uuid::now_v7(), Uuid::now_v7());

        repo.set_storage(product.id, Some(bin_a)).await.unwrap();
        repo.clear_storage_if(product.id, bin_b).await.unwrap();
        assert_eq!(repo.get_by_id(product.id).await.unwrap().unwrap().storage, Some(bin_a));

        repo.clear_storage_if(product.id, bin_a).await.unwrap();
        assert_eq!(repo.get_by_id(product.id).await.unwrap().unwrap().storage, None);
    }

    #[tokio::test]
    async fn test_list_near_sorts_by_distance() {
        let repo = InMemoryProductRepository::new();
        let mut far = input("Far supplier", 1, 0);
        far.supplier_location = Some(GeoPoint::new(13.10, 52.52));
        let mut near = input("Near supplier", 1, 0);
        near.supplier_location = Some(GeoPoint::new(13.41, 52.52));
        repo.create(far).await.unwrap();
        repo.create(near).await.unwrap();

        let found = repo
            .list_near(GeoPoint::new(13.405, 52.52), 50_000.0)
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "Near supplier");

        let close_only = repo
            .list_near(GeoPoint::new(13.405, 52.52), 1_000.0)
            .await
            .unwrap();
        assert_eq!(close_only.len(), 1);
    }
}

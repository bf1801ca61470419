//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use database::mongodb::{id_filter, uuid_to_bson};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Bson, Document},
    options::{FindOptions, IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{CreateProduct, GeoPoint, Product, ProductFilter, UpdateProduct};
use crate::repository::ProductRepository;

#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Product>("products");
        Self { collection }
    }

    /// Initialize indexes, including the 2dsphere index `$near` queries need
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "sku": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_sku_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "category": 1, "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "supplier_id": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_supplier".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "restock_recommended": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_restock".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "expiry_date": 1 })
                .options(
                    IndexOptions::builder()
                        .sparse(true)
                        .name("idx_expiry_date".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "supplier_location": "2dsphere" })
                .options(
                    IndexOptions::builder()
                        .name("idx_supplier_location".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = doc! {};

        if let Some(ref category) = filter.category {
            doc.insert("category", category);
        }

        if let Some(ref supplier_id) = filter.supplier_id {
            doc.insert("supplier_id", uuid_to_bson(supplier_id));
        }

        if let Some(needs_restock) = filter.needs_restock {
            doc.insert("restock_recommended", needs_restock);
        }

        doc
    }

    /// Pipeline update that shifts `quantity` by `delta` and recomputes the
    /// restock flag from the new value in the same write.
    fn stock_pipeline(delta: i64) -> Vec<Document> {
        vec![
            doc! {
                "$set": {
                    "quantity": { "$add": ["$quantity", delta] },
                    "updated_at": to_bson(&Utc::now()).unwrap_or(Bson::Null),
                }
            },
            Self::restock_stage(),
        ]
    }

    fn restock_stage() -> Document {
        doc! {
            "$set": {
                "restock_recommended": { "$lte": ["$quantity", "$threshold_limit"] }
            }
        }
    }

    /// The fields an update touches, encoded the way `Product` stores them.
    fn update_fields(input: &UpdateProduct) -> ProductResult<Document> {
        let mut fields = doc! {};
        if let Some(ref name) = input.name {
            fields.insert("name", name.as_str());
        }
        if let Some(ref batch_id) = input.batch_id {
            fields.insert("batch_id", batch_id.as_str());
        }
        if let Some(ref category) = input.category {
            fields.insert("category", category.as_str());
        }
        if let Some(price) = input.price {
            fields.insert("price", price);
        }
        if let Some(quantity) = input.quantity {
            fields.insert("quantity", quantity);
        }
        if let Some(weight) = input.weight {
            fields.insert("weight", weight);
        }
        if let Some(ref dimensions) = input.dimensions {
            fields.insert("dimensions", to_bson(dimensions)?);
        }
        if let Some(ref description) = input.description {
            fields.insert("description", description.as_str());
        }
        if let Some(threshold_limit) = input.threshold_limit {
            fields.insert("threshold_limit", threshold_limit);
        }
        if let Some(shelf_life_days) = input.shelf_life_days {
            fields.insert("shelf_life_days", shelf_life_days);
        }
        if let Some(ref mfg_date) = input.mfg_date {
            fields.insert("mfg_date", to_bson(mfg_date)?);
        }
        if let Some(ref expiry_date) = input.expiry_date {
            fields.insert("expiry_date", to_bson(expiry_date)?);
        }
        if let Some(ref supplier_id) = input.supplier_id {
            fields.insert("supplier_id", uuid_to_bson(supplier_id));
        }
        if let Some(ref location) = input.supplier_location {
            fields.insert("supplier_location", to_bson(location)?);
        }
        fields.insert("updated_at", to_bson(&Utc::now())?);
        Ok(fields)
    }

    /// Pipeline update that sets only the supplied fields and recomputes the
    /// restock flag from the stored quantity and threshold in the same write.
    fn update_pipeline(input: &UpdateProduct) -> ProductResult<Vec<Document>> {
        // Pipeline stages read `$`-prefixed strings as field paths.
        let literals: Document = Self::update_fields(input)?
            .into_iter()
            .map(|(key, value)| (key, Bson::Document(doc! { "$literal": value })))
            .collect();
        Ok(vec![doc! { "$set": literals }, Self::restock_stage()])
    }

    fn near_filter(point: &GeoPoint, max_distance: f64) -> Document {
        doc! {
            "supplier_location": {
                "$near": {
                    "$geometry": {
                        "type": "Point",
                        "coordinates": [point.lng(), point.lat()],
                    },
                    "$maxDistance": max_distance,
                }
            }
        }
    }

    async fn find_many(&self, filter: Document) -> ProductResult<Vec<Product>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let cursor = self.collection.find(filter).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn apply_stock_delta(
        &self,
        filter: Document,
        delta: i64,
    ) -> ProductResult<Option<Product>> {
        let product = self
            .collection
            .find_one_and_update(filter, Self::stock_pipeline(delta))
            .return_document(ReturnDocument::After)
            .await?;
        Ok(product)
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input);

        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(id_filter(&id)).await?;
        Ok(product)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn get_many(&self, ids: Vec<Uuid>) -> ProductResult<Vec<Product>> {
        let ids: Vec<Bson> = ids.iter().map(uuid_to_bson).collect();
        let cursor = self.collection.find(doc! { "_id": { "$in": ids } }).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn get_by_sku(&self, sku: &str) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(doc! { "sku": sku }).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let mongo_filter = Self::build_filter(&filter);

        let options = FindOptions::builder()
            .limit(filter.limit)
            .skip(filter.offset)
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(mongo_filter)
            .with_options(options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Option<Product>> {
        let product = self
            .collection
            .find_one_and_update(id_filter(&id), Self::update_pipeline(&input)?)
            .return_document(ReturnDocument::After)
            .await?;

        if product.is_some() {
            tracing::info!(product_id = %id, "Product updated successfully");
        }
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = self.collection.delete_one(id_filter(&id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn list_by_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        self.find_many(doc! { "category": category }).await
    }

    #[instrument(skip(self))]
    async fn list_by_supplier(&self, supplier_id: Uuid) -> ProductResult<Vec<Product>> {
        self.find_many(doc! { "supplier_id": uuid_to_bson(&supplier_id) })
            .await
    }

    #[instrument(skip(self))]
    async fn list_needing_restock(&self) -> ProductResult<Vec<Product>> {
        self.find_many(doc! { "restock_recommended": true }).await
    }

    #[instrument(skip(self))]
    async fn list_low_stock(&self) -> ProductResult<Vec<Product>> {
        self.find_many(doc! { "$expr": { "$lte": ["$quantity", "$threshold_limit"] } })
            .await
    }

    #[instrument(skip(self))]
    async fn list_expiring_before(&self, date: NaiveDate) -> ProductResult<Vec<Product>> {
        // Dates are stored as ISO strings, so string comparison orders them correctly.
        self.find_many(doc! { "expiry_date": { "$lte": date.to_string() } })
            .await
    }

    #[instrument(skip(self))]
    async fn list_expired(&self, today: NaiveDate) -> ProductResult<Vec<Product>> {
        self.find_many(doc! { "expiry_date": { "$lt": today.to_string() } })
            .await
    }

    #[instrument(skip(self))]
    async fn list_near(&self, point: GeoPoint, max_distance: f64) -> ProductResult<Vec<Product>> {
        // $near already sorts by distance and rejects an explicit sort.
        let cursor = self
            .collection
            .find(Self::near_filter(&point, max_distance))
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn take_stock(&self, id: Uuid, quantity: i64) -> ProductResult<Option<Product>> {
        let mut filter = id_filter(&id);
        filter.insert("quantity", doc! { "$gte": quantity });
        self.apply_stock_delta(filter, -quantity).await
    }

    #[instrument(skip(self))]
    async fn restore_stock(&self, id: Uuid, quantity: i64) -> ProductResult<Option<Product>> {
        self.apply_stock_delta(id_filter(&id), quantity).await
    }

    #[instrument(skip(self))]
    async fn set_storage(&self, id: Uuid, storage: Option<Uuid>) -> ProductResult<()> {
        let storage = storage.as_ref().map(uuid_to_bson).unwrap_or(Bson::Null);
        self.collection
            .update_one(
                id_filter(&id),
                doc! { "$set": { "storage": storage, "updated_at": to_bson(&Utc::now())? } },
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_storage_if(&self, id: Uuid, storage: Uuid) -> ProductResult<()> {
        let mut filter = id_filter(&id);
        filter.insert("storage", uuid_to_bson(&storage));
        self.collection
            .update_one(
                filter,
                doc! { "$set": { "storage": Bson::Null, "updated_at": to_bson(&Utc::now())? } },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_empty() {
        let filter = ProductFilter::default();
        let doc = MongoProductRepository::build_filter(&filter);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_build_filter_with_category_and_supplier() {
        let filter = ProductFilter {
            category: Some("frozen".to_string()),
            supplier_id: Some(Uuid::now_v7()),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        assert!(doc.contains_key("category"));
        assert!(doc.contains_key("supplier_id"));
        assert!(!doc.contains_key("restock_recommended"));
    }

    #[test]
    fn test_build_filter_with_restock_flag() {
        let filter = ProductFilter {
            needs_restock: Some(true),
            ..Default::default()
        };
        let doc = MongoProductRepository::build_filter(&filter);
        assert_eq!(doc.get_bool("restock_recommended").ok(), Some(true));
    }

    #[test]
    fn test_stock_pipeline_recomputes_restock_after_quantity() {
        let pipeline = MongoProductRepository::stock_pipeline(-3);
        assert_eq!(pipeline.len(), 2);
        let first = pipeline[0].get_document("$set").unwrap();
        assert!(first.contains_key("quantity"));
        let second = pipeline[1].get_document("$set").unwrap();
        assert!(second.contains_key("restock_recommended"));
    }

    #[test]
    fn test_update_fields_only_touch_supplied_values() {
        let fields = MongoProductRepository::update_fields(&UpdateProduct {
            name: Some("Primer".to_string()),
            threshold_limit: Some(5),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(fields.get_str("name").ok(), Some("Primer"));
        assert_eq!(fields.get_i64("threshold_limit").ok(), Some(5));
        assert!(fields.contains_key("updated_at"));
        for untouched in ["quantity", "price", "storage", "restock_recommended", "sku"] {
            assert!(!fields.contains_key(untouched), "{untouched} must not be written");
        }
    }

    #[test]
    fn test_update_pipeline_sets_literals_then_recomputes_restock() {
        let pipeline = MongoProductRepository::update_pipeline(&UpdateProduct {
            name: Some("$quantity".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(pipeline.len(), 2);
        let name = pipeline[0]
            .get_document("$set")
            .and_then(|set| set.get_document("name"))
            .unwrap();
        assert_eq!(name.get_str("$literal").ok(), Some("$quantity"));
        let second = pipeline[1].get_document("$set").unwrap();
        assert!(second.contains_key("restock_recommended"));
    }

    #[test]
    fn test_near_filter_shape() {
        let doc = MongoProductRepository::near_filter(&GeoPoint::new(1.0, 2.0), 500.0);
        let near = doc
            .get_document("supplier_location")
            .and_then(|d| d.get_document("$near"))
            .unwrap();
        assert_eq!(near.get_f64("$maxDistance").ok(), Some(500.0));
    }
}

use async_trait::async_trait;
use chrono::Utc;
use database::mongodb::{id_filter, uuid_to_bson};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Bson, Document},
    options::{FindOptions, IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use super::lines::{self, LoadFields};
use crate::error::InventoryResult;
use crate::models::{CreateStorage, Load, Storage, UpdateStorage};
use crate::repository::StorageRepository;

const FIELDS: LoadFields = LoadFields {
    capacity: "capacity_occupied",
    volume: "volume_occupied",
    cost: "total_cost",
};

#[derive(Clone)]
pub struct MongoStorageRepository {
    collection: Collection<Storage>,
}

impl MongoStorageRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Storage>("storages"),
        }
    }

    pub async fn init_indexes(&self) -> InventoryResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "location_id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_location_id_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "inventory": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_inventory".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Storage indexes created successfully");
        Ok(())
    }

    /// `$set` of the supplied fields only; occupied totals and lines are left
    /// to the stock writes. New dimensions recompute the volume unless one is
    /// supplied alongside.
    fn update_document(input: &UpdateStorage) -> InventoryResult<Document> {
        let mut fields = doc! {};
        if let Some(ref location_id) = input.location_id {
            fields.insert("location_id", location_id.as_str());
        }
        if let Some(ref dimensions) = input.dimensions {
            fields.insert("dimensions", to_bson(dimensions)?);
            fields.insert("volume", dimensions.volume());
        }
        if let Some(holding_capacity) = input.holding_capacity {
            fields.insert("holding_capacity", holding_capacity);
        }
        if let Some(volume) = input.volume {
            fields.insert("volume", volume);
        }
        fields.insert("updated_at", to_bson(&Utc::now())?);
        Ok(doc! { "$set": fields })
    }
}

#[async_trait]
impl StorageRepository for MongoStorageRepository {
    #[instrument(skip(self, input), fields(location_id = %input.location_id))]
    async fn create(&self, input: CreateStorage) -> InventoryResult<Storage> {
        let storage = Storage::new(input);
        self.collection.insert_one(&storage).await?;

        tracing::info!(storage_id = %storage.id, "Storage created successfully");
        Ok(storage)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> InventoryResult<Option<Storage>> {
        Ok(self.collection.find_one(id_filter(&id)).await?)
    }

    #[instrument(skip(self))]
    async fn get_by_location(&self, location_id: &str) -> InventoryResult<Option<Storage>> {
        Ok(self
            .collection
            .find_one(doc! { "location_id": location_id })
            .await?)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> InventoryResult<Vec<Storage>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateStorage) -> InventoryResult<Option<Storage>> {
        let storage = self
            .collection
            .find_one_and_update(id_filter(&id), Self::update_document(&input)?)
            .return_document(ReturnDocument::After)
            .await?;

        if storage.is_some() {
            tracing::info!(storage_id = %id, "Storage updated successfully");
        }
        Ok(storage)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> InventoryResult<bool> {
        let result = self.collection.delete_one(id_filter(&id)).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn deposit(&self, id: Uuid, product: Uuid, quantity: i64, load: Load) -> InventoryResult<bool> {
        Ok(lines::deposit(&self.collection, FIELDS, id, product, quantity, load).await?)
    }

    #[instrument(skip(self))]
    async fn withdraw(&self, id: Uuid, product: Uuid, quantity: i64, load: Load) -> InventoryResult<bool> {
        Ok(lines::withdraw(&self.collection, FIELDS, id, product, quantity, load).await?)
    }

    #[instrument(skip(self))]
    async fn set_inventory(&self, id: Uuid, inventory: Option<Uuid>) -> InventoryResult<bool> {
        let inventory = inventory.as_ref().map(uuid_to_bson).unwrap_or(Bson::Null);
        let result = self
            .collection
            .update_one(
                id_filter(&id),
                doc! { "$set": { "inventory": inventory, "updated_at": to_bson(&Utc::now())? } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}

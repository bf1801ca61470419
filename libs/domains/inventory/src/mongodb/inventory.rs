use async_trait::async_trait;
use chrono::Utc;
use database::mongodb::{id_filter, uuid_to_bson};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Document},
    options::{FindOptions, IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use super::lines::{self, LoadFields};
use crate::error::InventoryResult;
use crate::models::{CreateInventory, Inventory, Load, UpdateInventory};
use crate::repository::InventoryRepository;

const FIELDS: LoadFields = LoadFields {
    capacity: "capacity_occupied",
    volume: "volume_occupied",
    cost: "cost_price",
};

#[derive(Clone)]
pub struct MongoInventoryRepository {
    collection: Collection<Inventory>,
}

impl MongoInventoryRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Inventory>("inventories"),
        }
    }

    pub async fn init_indexes(&self) -> InventoryResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "inventory_location": "2dsphere" })
                .options(
                    IndexOptions::builder()
                        .name("idx_inventory_location".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "storage": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_storage".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Inventory indexes created successfully");
        Ok(())
    }

    /// `$set` of the supplied fields only; totals, lines and bins are left to
    /// the stock writes.
    fn update_document(input: &UpdateInventory) -> InventoryResult<Document> {
        let mut fields = doc! {};
        if let Some(ref name) = input.name {
            fields.insert("name", name.as_str());
        }
        if let Some(total_capacity) = input.total_capacity {
            fields.insert("total_capacity", total_capacity);
        }
        if let Some(total_volume) = input.total_volume {
            fields.insert("total_volume", total_volume);
        }
        if let Some(ref location) = input.inventory_location {
            fields.insert("inventory_location", to_bson(location)?);
        }
        fields.insert("updated_at", to_bson(&Utc::now())?);
        Ok(doc! { "$set": fields })
    }
}

#[async_trait]
impl InventoryRepository for MongoInventoryRepository {
    #[instrument(skip(self, input), fields(inventory_name = %input.name))]
    async fn create(&self, input: CreateInventory) -> InventoryResult<Inventory> {
        let inventory = Inventory::new(input);
        self.collection.insert_one(&inventory).await?;

        tracing::info!(inventory_id = %inventory.id, "Inventory created successfully");
        Ok(inventory)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> InventoryResult<Option<Inventory>> {
        Ok(self.collection.find_one(id_filter(&id)).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> InventoryResult<Vec<Inventory>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateInventory) -> InventoryResult<Option<Inventory>> {
        let inventory = self
            .collection
            .find_one_and_update(id_filter(&id), Self::update_document(&input)?)
            .return_document(ReturnDocument::After)
            .await?;

        if inventory.is_some() {
            tracing::info!(inventory_id = %id, "Inventory updated successfully");
        }
        Ok(inventory)
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
    async fn add_storage(&self, id: Uuid, storage: Uuid) -> InventoryResult<bool> {
        let result = self
            .collection
            .update_one(
                id_filter(&id),
                doc! {
                    "$addToSet": { "storage": uuid_to_bson(&storage) },
                    "$set": { "updated_at": to_bson(&Utc::now())? },
                },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn remove_storage(&self, id: Uuid, storage: Uuid) -> InventoryResult<bool> {
        let result = self
            .collection
            .update_one(
                id_filter(&id),
                doc! {
                    "$pull": { "storage": uuid_to_bson(&storage) },
                    "$set": { "updated_at": to_bson(&Utc::now())? },
                },
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_document_leaves_stock_fields_alone() {
        let update = MongoInventoryRepository::update_document(&UpdateInventory {
            total_capacity: Some(250.0),
            ..Default::default()
        })
        .unwrap();

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_f64("total_capacity").ok(), Some(250.0));
        assert!(set.contains_key("updated_at"));
        for untouched in [
            "name",
            "capacity_occupied",
            "volume_occupied",
            "cost_price",
            "products",
            "storage",
        ] {
            assert!(!set.contains_key(untouched), "{untouched} must not be written");
        }
    }
}

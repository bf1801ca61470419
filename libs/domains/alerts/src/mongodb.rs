//! MongoDB implementation of AlertRepository

use async_trait::async_trait;
use chrono::Utc;
use database::mongodb::id_filter;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, to_bson},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AlertError, AlertResult};
use crate::models::{Alert, UpdateAlert};
use crate::repository::AlertRepository;

#[derive(Clone)]
pub struct MongoAlertRepository {
    collection: Collection<Alert>,
}

impl MongoAlertRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Alert>("alerts"),
        }
    }

    pub async fn init_indexes(&self) -> AlertResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "resolved": 1, "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_resolved_created_at".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "target_id": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_target_id".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Alert indexes created successfully");
        Ok(())
    }

    async fn find_many(&self, filter: Document) -> AlertResult<Vec<Alert>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let cursor = self.collection.find(filter).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }
}

#[async_trait]
impl AlertRepository for MongoAlertRepository {
    #[instrument(skip(self, alert), fields(alert_type = %alert.alert_type))]
    async fn create(&self, alert: Alert) -> AlertResult<Alert> {
        self.collection.insert_one(&alert).await?;
        tracing::info!(alert_id = %alert.id, target_id = %alert.target_id, "Alert created successfully");
        Ok(alert)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> AlertResult<Option<Alert>> {
        Ok(self.collection.find_one(id_filter(&id)).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> AlertResult<Vec<Alert>> {
        self.find_many(doc! {}).await
    }

    #[instrument(skip(self))]
    async fn list_unresolved(&self) -> AlertResult<Vec<Alert>> {
        self.find_many(doc! { "resolved": false }).await
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: Uuid, update: UpdateAlert) -> AlertResult<Option<Alert>> {
        let filter = id_filter(&id);
        let Some(mut alert) = self.collection.find_one(filter.clone()).await? else {
            return Ok(None);
        };

        alert.apply_update(update);
        self.collection.replace_one(filter, &alert).await?;

        tracing::info!(alert_id = %id, "Alert updated successfully");
        Ok(Some(alert))
    }

    #[instrument(skip(self))]
    async fn resolve(&self, id: Uuid) -> AlertResult<Option<Alert>> {
        let now = to_bson(&Utc::now()).map_err(|e| AlertError::Database(e.to_string()))?;
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let alert = self
            .collection
            .find_one_and_update(
                id_filter(&id),
                doc! { "$set": { "resolved": true, "updated_at": now } },
            )
            .with_options(options)
            .await?;

        if alert.is_some() {
            tracing::info!(alert_id = %id, "Alert resolved");
        }
        Ok(alert)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AlertResult<bool> {
        let result = self.collection.delete_one(id_filter(&id)).await?;
        if result.deleted_count > 0 {
            tracing::info!(alert_id = %id, "Alert deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }
}

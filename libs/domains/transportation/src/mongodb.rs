//! MongoDB implementation of TransportRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::mongodb::{id_filter, uuid_to_bson};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Document},
    options::{FindOptions, IndexOptions},
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::TransportResult;
use crate::models::{Transport, TransportChanges, TransportStatus};
use crate::repository::TransportRepository;

#[derive(Clone)]
pub struct MongoTransportRepository {
    collection: Collection<Transport>,
}

impl MongoTransportRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Transport>("deliveries"),
        }
    }

    pub async fn init_indexes(&self) -> TransportResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "package_id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_package_id_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "status": 1, "eta": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_status_eta".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "assigned_to": 1 })
                .options(
                    IndexOptions::builder()
                        .sparse(true)
                        .name("idx_assigned_to".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Transport indexes created successfully");
        Ok(())
    }

    fn overdue_filter(now: DateTime<Utc>) -> TransportResult<Document> {
        Ok(doc! {
            "eta": { "$lt": to_bson(&now)? },
            "status": { "$ne": TransportStatus::Delivered.to_string() },
        })
    }

    async fn find_many(&self, filter: Document) -> TransportResult<Vec<Transport>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let cursor = self.collection.find(filter).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }
}

#[async_trait]
impl TransportRepository for MongoTransportRepository {
    #[instrument(skip(self, transport), fields(package_id = %transport.package_id))]
    async fn create(&self, transport: Transport) -> TransportResult<Transport> {
        self.collection.insert_one(&transport).await?;
        tracing::info!(transport_id = %transport.id, "Transport created successfully");
        Ok(transport)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> TransportResult<Option<Transport>> {
        Ok(self.collection.find_one(id_filter(&id)).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> TransportResult<Vec<Transport>> {
        self.find_many(doc! {}).await
    }

    #[instrument(skip(self))]
    async fn list_by_status(&self, status: TransportStatus) -> TransportResult<Vec<Transport>> {
        self.find_many(doc! { "status": status.to_string() }).await
    }

    #[instrument(skip(self))]
    async fn list_by_assignee(&self, user_id: Uuid) -> TransportResult<Vec<Transport>> {
        self.find_many(doc! { "assigned_to": uuid_to_bson(&user_id) })
            .await
    }

    #[instrument(skip(self))]
    async fn list_overdue(&self, now: DateTime<Utc>) -> TransportResult<Vec<Transport>> {
        self.find_many(Self::overdue_filter(now)?).await
    }

    #[instrument(skip(self, changes))]
    async fn update(
        &self,
        id: Uuid,
        changes: TransportChanges,
    ) -> TransportResult<Option<Transport>> {
        let filter = id_filter(&id);
        let Some(mut transport) = self.collection.find_one(filter.clone()).await? else {
            return Ok(None);
        };

        transport.apply_changes(changes);
        self.collection.replace_one(filter, &transport).await?;

        tracing::info!(transport_id = %id, status = %transport.status, "Transport updated successfully");
        Ok(Some(transport))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> TransportResult<bool> {
        let result = self.collection.delete_one(id_filter(&id)).await?;
        if result.deleted_count > 0 {
            tracing::info!(transport_id = %id, "Transport deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overdue_filter_excludes_delivered() {
        let filter = MongoTransportRepository::overdue_filter(Utc::now()).unwrap();
        let status = filter.get_document("status").unwrap();
        assert_eq!(status.get_str("$ne").unwrap(), "delivered");
        assert!(filter.get_document("eta").unwrap().contains_key("$lt"));
    }
}

//! MongoDB implementation of WageRepository

use async_trait::async_trait;
use database::mongodb::uuid_to_bson;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{FindOptions, IndexOptions, ReplaceOptions},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::WageResult;
use crate::models::Wage;
use crate::repository::WageRepository;

#[derive(Clone)]
pub struct MongoWageRepository {
    collection: Collection<Wage>,
}

impl MongoWageRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Wage>("wages"),
        }
    }

    pub async fn init_indexes(&self) -> WageResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "user_id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_user_id_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "overworked": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_overworked".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Wage indexes created successfully");
        Ok(())
    }

    fn user_filter(user_id: &Uuid) -> Document {
        doc! { "user_id": uuid_to_bson(user_id) }
    }

    async fn find_many(&self, filter: Document) -> WageResult<Vec<Wage>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let cursor = self.collection.find(filter).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }
}

#[async_trait]
impl WageRepository for MongoWageRepository {
    #[instrument(skip(self, wage), fields(user_id = %wage.user_id))]
    async fn upsert_for_user(&self, wage: Wage) -> WageResult<Wage> {
        let filter = Self::user_filter(&wage.user_id);
        let wage = match self.collection.find_one(filter.clone()).await? {
            Some(previous) => wage.replacing(&previous),
            None => wage,
        };

        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection
            .replace_one(filter, &wage)
            .with_options(options)
            .await?;

        tracing::info!(
            user_id = %wage.user_id,
            total_salary = wage.total_salary,
            "Wage record saved"
        );
        Ok(wage)
    }

    #[instrument(skip(self))]
    async fn get_by_user(&self, user_id: Uuid) -> WageResult<Option<Wage>> {
        Ok(self.collection.find_one(Self::user_filter(&user_id)).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> WageResult<Vec<Wage>> {
        self.find_many(doc! {}).await
    }

    #[instrument(skip(self))]
    async fn list_overworked(&self) -> WageResult<Vec<Wage>> {
        self.find_many(doc! { "overworked": true }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_filter_encodes_uuid_like_the_model() {
        let id = Uuid::now_v7();
        let filter = MongoWageRepository::user_filter(&id);
        assert_eq!(filter.get("user_id"), Some(&uuid_to_bson(&id)));
    }
}

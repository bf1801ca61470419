use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AlertResult;
use crate::models::{Alert, UpdateAlert};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertRepository: Send + Sync {
    async fn create(&self, alert: Alert) -> AlertResult<Alert>;

    async fn get_by_id(&self, id: Uuid) -> AlertResult<Option<Alert>>;

    /// Newest first
    async fn list(&self) -> AlertResult<Vec<Alert>>;

    async fn list_unresolved(&self) -> AlertResult<Vec<Alert>>;

    async fn update(&self, id: Uuid, update: UpdateAlert) -> AlertResult<Option<Alert>>;

    /// Flips `resolved` to true in one write
    async fn resolve(&self, id: Uuid) -> AlertResult<Option<Alert>>;

    async fn delete(&self, id: Uuid) -> AlertResult<bool>;
}

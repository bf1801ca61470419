use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::TransportResult;
use crate::models::{Transport, TransportChanges, TransportStatus};

/// Persistence for delivery records. `package_id` is unique.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransportRepository: Send + Sync {
    async fn create(&self, transport: Transport) -> TransportResult<Transport>;

    async fn get_by_id(&self, id: Uuid) -> TransportResult<Option<Transport>>;

    async fn list(&self) -> TransportResult<Vec<Transport>>;

    async fn list_by_status(&self, status: TransportStatus) -> TransportResult<Vec<Transport>>;

    async fn list_by_assignee(&self, user_id: Uuid) -> TransportResult<Vec<Transport>>;

    /// ETA before `now` and status other than delivered
    async fn list_overdue(&self, now: DateTime<Utc>) -> TransportResult<Vec<Transport>>;

    async fn update(&self, id: Uuid, changes: TransportChanges)
        -> TransportResult<Option<Transport>>;

    async fn delete(&self, id: Uuid) -> TransportResult<bool>;
}

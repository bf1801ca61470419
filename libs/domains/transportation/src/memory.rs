//! In-process [`TransportRepository`] for tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{TransportError, TransportResult};
use crate::models::{Transport, TransportChanges, TransportStatus};
use crate::repository::TransportRepository;

#[derive(Clone, Default)]
pub struct InMemoryTransportRepository {
    transports: Arc<RwLock<HashMap<Uuid, Transport>>>,
}

impl InMemoryTransportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn select(&self, predicate: impl Fn(&Transport) -> bool) -> Vec<Transport> {
        let mut transports: Vec<Transport> = self
            .transports
            .read()
            .await
            .values()
            .filter(|t| predicate(t))
            .cloned()
            .collect();
        transports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        transports
    }
}

#[async_trait]
impl TransportRepository for InMemoryTransportRepository {
    async fn create(&self, transport: Transport) -> TransportResult<Transport> {
        let mut transports = self.transports.write().await;
        if transports
            .values()
            .any(|t| t.package_id == transport.package_id)
        {
            return Err(TransportError::DuplicatePackage);
        }
        transports.insert(transport.id, transport.clone());
        Ok(transport)
    }

    async fn get_by_id(&self, id: Uuid) -> TransportResult<Option<Transport>> {
        Ok(self.transports.read().await.get(&id).cloned())
    }

    async fn list(&self) -> TransportResult<Vec<Transport>> {
        Ok(self.select(|_| true).await)
    }

    async fn list_by_status(&self, status: TransportStatus) -> TransportResult<Vec<Transport>> {
        Ok(self.select(|t| t.status == status).await)
    }

    async fn list_by_assignee(&self, user_id: Uuid) -> TransportResult<Vec<Transport>> {
        Ok(self.select(|t| t.assigned_to == Some(user_id)).await)
    }

    async fn list_overdue(&self, now: DateTime<Utc>) -> TransportResult<Vec<Transport>> {
        Ok(self.select(|t| t.is_overdue(now)).await)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: TransportChanges,
    ) -> TransportResult<Option<Transport>> {
        let mut transports = self.transports.write().await;
        if let Some(package_id) = &changes.order.package_id {
            if transports
                .values()
                .any(|t| t.id != id && &t.package_id == package_id)
            {
                return Err(TransportError::DuplicatePackage);
            }
        }
        Ok(transports.get_mut(&id).map(|transport| {
            transport.apply_changes(changes);
            transport.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> TransportResult<bool> {
        Ok(self.transports.write().await.remove(&id).is_some())
    }
}

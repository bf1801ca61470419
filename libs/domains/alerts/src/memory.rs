//! In-process [`AlertRepository`] for tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AlertResult;
use crate::models::{Alert, UpdateAlert};
use crate::repository::AlertRepository;

#[derive(Clone, Default)]
pub struct InMemoryAlertRepository {
    alerts: Arc<RwLock<HashMap<Uuid, Alert>>>,
}

impl InMemoryAlertRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn select(&self, predicate: impl Fn(&Alert) -> bool) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self
            .alerts
            .read()
            .await
            .values()
            .filter(|a| predicate(a))
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        alerts
    }
}

#[async_trait]
impl AlertRepository for InMemoryAlertRepository {
    async fn create(&self, alert: Alert) -> AlertResult<Alert> {
        self.alerts.write().await.insert(alert.id, alert.clone());
        Ok(alert)
    }

    async fn get_by_id(&self, id: Uuid) -> AlertResult<Option<Alert>> {
        Ok(self.alerts.read().await.get(&id).cloned())
    }

    async fn list(&self) -> AlertResult<Vec<Alert>> {
        Ok(self.select(|_| true).await)
    }

    async fn list_unresolved(&self) -> AlertResult<Vec<Alert>> {
        Ok(self.select(|a| !a.resolved).await)
    }

    async fn update(&self, id: Uuid, update: UpdateAlert) -> AlertResult<Option<Alert>> {
        Ok(self.alerts.write().await.get_mut(&id).map(|alert| {
            alert.apply_update(update);
            alert.clone()
        }))
    }

    async fn resolve(&self, id: Uuid) -> AlertResult<Option<Alert>> {
        Ok(self.alerts.write().await.get_mut(&id).map(|alert| {
            alert.resolved = true;
            alert.updated_at = Utc::now();
            alert.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AlertResult<bool> {
        Ok(self.alerts.write().await.remove(&id).is_some())
    }
}

//! In-process [`WageRepository`] for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::WageResult;
use crate::models::Wage;
use crate::repository::WageRepository;

/// Records keyed by user id
#[derive(Clone, Default)]
pub struct InMemoryWageRepository {
    wages: Arc<RwLock<HashMap<Uuid, Wage>>>,
}

impl InMemoryWageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WageRepository for InMemoryWageRepository {
    async fn upsert_for_user(&self, wage: Wage) -> WageResult<Wage> {
        let mut wages = self.wages.write().await;
        let wage = match wages.get(&wage.user_id) {
            Some(previous) => wage.replacing(previous),
            None => wage,
        };
        wages.insert(wage.user_id, wage.clone());
        Ok(wage)
    }

    async fn get_by_user(&self, user_id: Uuid) -> WageResult<Option<Wage>> {
        Ok(self.wages.read().await.get(&user_id).cloned())
    }

    async fn list(&self) -> WageResult<Vec<Wage>> {
        let mut wages: Vec<Wage> = self.wages.read().await.values().cloned().collect();
        wages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(wages)
    }

    async fn list_overworked(&self) -> WageResult<Vec<Wage>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|w| w.overworked)
            .collect())
    }
}

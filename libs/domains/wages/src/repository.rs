use async_trait::async_trait;
use uuid::Uuid;

use crate::error::WageResult;
use crate::models::Wage;

/// Persistence for payroll records, keyed by user
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WageRepository: Send + Sync {
    /// Inserts the record or replaces the user's existing one, keeping its id
    async fn upsert_for_user(&self, wage: Wage) -> WageResult<Wage>;

    async fn get_by_user(&self, user_id: Uuid) -> WageResult<Option<Wage>>;

    async fn list(&self) -> WageResult<Vec<Wage>>;

    /// Records flagged `overworked`
    async fn list_overworked(&self) -> WageResult<Vec<Wage>>;
}

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AlertError, AlertResult};
use crate::models::{Alert, CreateAlert, UpdateAlert};
use crate::repository::AlertRepository;

pub struct AlertService<R: AlertRepository> {
    repository: Arc<R>,
}

impl<R: AlertRepository> Clone for AlertService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: AlertRepository> AlertService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input), fields(alert_type = %input.alert_type, target_id = %input.target_id))]
    pub async fn create_alert(&self, input: CreateAlert) -> AlertResult<Alert> {
        input
            .validate()
            .map_err(|e| AlertError::Validation(e.to_string()))?;
        self.repository.create(Alert::new(input)).await
    }

    #[instrument(skip(self))]
    pub async fn get_alert(&self, id: Uuid) -> AlertResult<Alert> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(AlertError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_alerts(&self) -> AlertResult<Vec<Alert>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn list_unresolved(&self) -> AlertResult<Vec<Alert>> {
        self.repository.list_unresolved().await
    }

    #[instrument(skip(self, input))]
    pub async fn update_alert(&self, id: Uuid, input: UpdateAlert) -> AlertResult<Alert> {
        input
            .validate()
            .map_err(|e| AlertError::Validation(e.to_string()))?;
        self.repository
            .update(id, input)
            .await?
            .ok_or(AlertError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn resolve_alert(&self, id: Uuid) -> AlertResult<Alert> {
        self.repository
            .resolve(id)
            .await?
            .ok_or(AlertError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_alert(&self, id: Uuid) -> AlertResult<()> {
        if !self.repository.delete(id).await? {
            return Err(AlertError::NotFound(id));
        }
        tracing::info!(alert_id = %id, "Alert deleted");
        Ok(())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertType {
    #[default]
    DefaultAlert,
    LowStock,
    OutOfStock,
    TransportationDelay,
    MissedEta,
    Overwork,
    InventoryMismatch,
    RouteDeviation,
    UnauthorizedAccess,
    StockExpired,
    SystemError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Alert {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    #[serde(rename = "type", default)]
    pub alert_type: AlertType,
    pub triggered_on: DateTime<Utc>,
    #[serde(default)]
    pub resolved: bool,
    /// Entity the alert is about: a product, inventory, transport, user...
    pub target_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateAlert {
    #[serde(rename = "type", default)]
    pub alert_type: AlertType,
    pub target_id: Uuid,
    #[validate(length(min = 1, max = 500))]
    pub message: String,
    /// Defaults to now
    pub triggered_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateAlert {
    #[serde(rename = "type")]
    pub alert_type: Option<AlertType>,
    pub target_id: Option<Uuid>,
    #[validate(length(min = 1, max = 500))]
    pub message: Option<String>,
    pub resolved: Option<bool>,
}

impl Alert {
    pub fn new(input: CreateAlert) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            alert_type: input.alert_type,
            triggered_on: input.triggered_on.unwrap_or(now),
            resolved: false,
            target_id: input.target_id,
            message: input.message,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateAlert) {
        if let Some(alert_type) = update.alert_type {
            self.alert_type = alert_type;
        }
        if let Some(target_id) = update.target_id {
            self.target_id = target_id;
        }
        if let Some(message) = update.message {
            self.message = message;
        }
        if let Some(resolved) = update.resolved {
            self.resolved = resolved;
        }
        self.updated_at = Utc::now();
    }
}

use chrono::{DateTime, Utc};
use domain_products::{GeoPoint, Product, StockLine};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Delivery status; any status may be set from any other
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransportStatus {
    #[default]
    Pending,
    Dispatched,
    InTransit,
    Delivered,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Land,
    Air,
    Ship,
}

/// Weight, volume and value of an order, snapshotted at creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderTotals {
    pub total_weight: f64,
    pub total_volume: f64,
    pub total_value: f64,
}

impl OrderTotals {
    pub fn add(&mut self, product: &Product, quantity: i64) {
        let quantity = quantity as f64;
        self.total_weight += product.weight * quantity;
        self.total_volume += product.unit_volume() * quantity;
        self.total_value += product.price * quantity;
    }
}

/// Delivery record created from an order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Transport {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub package_id: String,
    #[serde(default)]
    pub transportation_cost: f64,
    #[serde(flatten)]
    pub totals: OrderTotals,
    #[serde(default)]
    pub status: TransportStatus,
    #[serde(default)]
    pub products: Vec<StockLine>,
    pub start_location: Option<GeoPoint>,
    pub current_location: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,
    /// User (usually a driver) responsible for the delivery
    pub assigned_to: Option<Uuid>,
    pub eta: Option<DateTime<Utc>>,
    #[serde(default)]
    pub transport_mode: TransportMode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn one() -> i64 {
    1
}

/// One `(product, quantity)` entry of an order
#[derive(Debug, Clone, Copy, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct OrderLine {
    pub product: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[serde(default = "one")]
    pub quantity: i64,
}

impl From<OrderLine> for StockLine {
    fn from(line: OrderLine) -> Self {
        StockLine {
            product: line.product,
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateOrder {
    #[validate(length(min = 2, max = 20))]
    pub package_id: String,
    #[validate(range(min = 0.0))]
    pub transportation_cost: Option<f64>,
    pub status: Option<TransportStatus>,
    #[validate(nested)]
    #[serde(default)]
    pub products: Vec<OrderLine>,
    #[validate(nested)]
    pub start_location: Option<GeoPoint>,
    #[validate(nested)]
    pub current_location: Option<GeoPoint>,
    #[validate(nested)]
    pub destination: Option<GeoPoint>,
    pub assigned_to: Option<Uuid>,
    pub eta: Option<DateTime<Utc>>,
    #[serde(default)]
    pub transport_mode: TransportMode,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrder {
    #[validate(length(min = 2, max = 20))]
    pub package_id: Option<String>,
    #[validate(range(min = 0.0))]
    pub transportation_cost: Option<f64>,
    pub status: Option<TransportStatus>,
    /// Replaces the line items; totals are recomputed
    #[validate(nested)]
    pub products: Option<Vec<OrderLine>>,
    #[validate(nested)]
    pub start_location: Option<GeoPoint>,
    #[validate(nested)]
    pub current_location: Option<GeoPoint>,
    #[validate(nested)]
    pub destination: Option<GeoPoint>,
    pub assigned_to: Option<Uuid>,
    pub eta: Option<DateTime<Utc>>,
    pub transport_mode: Option<TransportMode>,
}

#[derive(Debug, Clone, Copy, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct StatusUpdate {
    pub status: TransportStatus,
}

/// Field changes for a stored transport; `totals` accompanies a new product list
#[derive(Debug, Clone, Default)]
pub struct TransportChanges {
    pub order: UpdateOrder,
    pub totals: Option<OrderTotals>,
}

impl Transport {
    pub fn new(input: CreateOrder, totals: OrderTotals) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            package_id: input.package_id,
            transportation_cost: input.transportation_cost.unwrap_or_default(),
            totals,
            status: input.status.unwrap_or_default(),
            products: input.products.into_iter().map(StockLine::from).collect(),
            start_location: input.start_location,
            current_location: input.current_location,
            destination: input.destination,
            assigned_to: input.assigned_to,
            eta: input.eta,
            transport_mode: input.transport_mode,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_changes(&mut self, changes: TransportChanges) {
        let TransportChanges { order, totals } = changes;
        if let Some(package_id) = order.package_id {
            self.package_id = package_id;
        }
        if let Some(cost) = order.transportation_cost {
            self.transportation_cost = cost;
        }
        if let Some(status) = order.status {
            self.status = status;
        }
        if let Some(products) = order.products {
            self.products = products.into_iter().map(StockLine::from).collect();
        }
        if let Some(totals) = totals {
            self.totals = totals;
        }
        if let Some(location) = order.start_location {
            self.start_location = Some(location);
        }
        if let Some(location) = order.current_location {
            self.current_location = Some(location);
        }
        if let Some(location) = order.destination {
            self.destination = Some(location);
        }
        if let Some(assignee) = order.assigned_to {
            self.assigned_to = Some(assignee);
        }
        if let Some(eta) = order.eta {
            self.eta = Some(eta);
        }
        if let Some(mode) = order.transport_mode {
            self.transport_mode = mode;
        }
        self.updated_at = Utc::now();
    }

    /// Past its ETA and not yet delivered
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TransportStatus::Delivered && self.eta.is_some_and(|eta| eta < now)
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Per-unit (products) or whole-bin (storages) measurements
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Dimensions {
    #[validate(range(min = 0.0))]
    pub length: f64,
    #[validate(range(min = 0.0))]
    pub width: f64,
    #[validate(range(min = 0.0))]
    pub height: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum GeoType {
    #[default]
    Point,
}

/// GeoJSON point, `coordinates` is `[longitude, latitude]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct GeoPoint {
    #[serde(rename = "type", default)]
    pub kind: GeoType,
    #[validate(length(equal = 2, message = "Coordinates must be an array of two numbers: [longitude, latitude]"))]
    pub coordinates: Vec<f64>,
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self {
            kind: GeoType::Point,
            coordinates: vec![lng, lat],
        }
    }

    pub fn lng(&self) -> f64 {
        self.coordinates.first().copied().unwrap_or_default()
    }

    pub fn lat(&self) -> f64 {
        self.coordinates.get(1).copied().unwrap_or_default()
    }

    /// Great-circle distance in meters
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;

        let (lat1, lat2) = (self.lat().to_radians(), other.lat().to_radians());
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng() - self.lng()).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }
}

/// One `(product, quantity)` entry held by a storage, inventory or transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StockLine {
    pub product: Uuid,
    pub quantity: i64,
}

/// Product entity; `quantity` is unallocated stock not yet placed in any container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub batch_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Equal to the id string
    pub sku: String,
    /// Unit cost
    pub price: f64,
    pub quantity: i64,
    /// Per unit
    pub weight: f64,
    /// Per unit
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub threshold_limit: i64,
    #[serde(default)]
    pub restock_recommended: bool,
    /// Storage bin currently holding this product, if any
    #[serde(default)]
    pub storage: Option<Uuid>,
    #[serde(default)]
    pub shelf_life_days: Option<i64>,
    #[serde(default)]
    pub mfg_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub supplier_id: Option<Uuid>,
    #[serde(default)]
    pub supplier_location: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateProduct {
    #[validate(length(min = 3, max = 40))]
    pub name: String,
    #[validate(length(min = 2, max = 20))]
    pub batch_id: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub weight: f64,
    #[validate(nested)]
    #[serde(default)]
    pub dimensions: Dimensions,
    pub description: Option<String>,
    #[serde(default)]
    pub threshold_limit: i64,
    pub shelf_life_days: Option<i64>,
    pub mfg_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub supplier_id: Option<Uuid>,
    #[validate(nested)]
    pub supplier_location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateProduct {
    #[validate(length(min = 3, max = 40))]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 20))]
    pub batch_id: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    #[validate(range(min = 0))]
    pub quantity: Option<i64>,
    pub weight: Option<f64>,
    #[validate(nested)]
    pub dimensions: Option<Dimensions>,
    pub description: Option<String>,
    pub threshold_limit: Option<i64>,
    pub shelf_life_days: Option<i64>,
    pub mfg_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub supplier_id: Option<Uuid>,
    #[validate(nested)]
    pub supplier_location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub supplier_id: Option<Uuid>,
    /// Only products whose restock flag matches
    pub needs_restock: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> i64 {
    50
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category: None,
            supplier_id: None,
            needs_restock: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

/// `GET /expiring` query
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ExpiringQuery {
    /// Window in days from today, defaults to 7
    pub days: Option<i64>,
}

/// `GET /near` query
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct NearQuery {
    pub lng: f64,
    pub lat: f64,
    /// Meters, defaults to 10 000
    pub max_distance: Option<f64>,
}

impl Product {
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        let id = Uuid::now_v7();

        Self {
            id,
            name: input.name,
            batch_id: input.batch_id,
            category: input.category,
            sku: id.to_string(),
            price: input.price,
            quantity: input.quantity,
            weight: input.weight,
            dimensions: input.dimensions,
            description: input.description,
            threshold_limit: input.threshold_limit,
            restock_recommended: Self::needs_restock(input.quantity, input.threshold_limit),
            storage: None,
            shelf_life_days: input.shelf_life_days,
            mfg_date: input.mfg_date,
            expiry_date: input.expiry_date,
            supplier_id: input.supplier_id,
            supplier_location: input.supplier_location,
            created_at: now,
            updated_at: now,
        }
    }

    /// Single rule for the restock flag
    pub fn needs_restock(quantity: i64, threshold_limit: i64) -> bool {
        quantity <= threshold_limit
    }

    pub fn unit_volume(&self) -> f64 {
        self.dimensions.volume()
    }

    /// Merges the update and recomputes the restock flag from the merged values.
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(batch_id) = update.batch_id {
            self.batch_id = Some(batch_id);
        }
        if let Some(category) = update.category {
            self.category = Some(category);
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(weight) = update.weight {
            self.weight = weight;
        }
        if let Some(dimensions) = update.dimensions {
            self.dimensions = dimensions;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(threshold_limit) = update.threshold_limit {
            self.threshold_limit = threshold_limit;
        }
        if let Some(shelf_life_days) = update.shelf_life_days {
            self.shelf_life_days = Some(shelf_life_days);
        }
        if let Some(mfg_date) = update.mfg_date {
            self.mfg_date = Some(mfg_date);
        }
        if let Some(expiry_date) = update.expiry_date {
            self.expiry_date = Some(expiry_date);
        }
        if let Some(supplier_id) = update.supplier_id {
            self.supplier_id = Some(supplier_id);
        }
        if let Some(location) = update.supplier_location {
            self.supplier_location = Some(location);
        }
        self.refresh_restock();
        self.updated_at = Utc::now();
    }

    /// Moves `delta` units into (positive) or out of (negative) unallocated stock.
    pub fn adjust_quantity(&mut self, delta: i64) {
        self.quantity += delta;
        self.refresh_restock();
        self.updated_at = Utc::now();
    }

    fn refresh_restock(&mut self) {
        self.restock_recommended = Self::needs_restock(self.quantity, self.threshold_limit);
    }
}

//! MongoDB connection management and BSON helpers shared by the domain repositories.

mod config;
mod connector;
mod health;
mod helpers;

pub use config::MongoConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry};
pub use health::{HealthStatus, check_health, check_health_detailed};
pub use helpers::{id_filter, is_duplicate_key_error, uuid_to_bson};

pub use mongodb::{Client, Collection, Database};

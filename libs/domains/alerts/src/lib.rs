//! Alerts Domain
//!
//! Operational alerts (low stock, late deliveries, overwork...) that staff raise and resolve.

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{AlertError, AlertResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryAlertRepository;
pub use models::{Alert, AlertType, CreateAlert, UpdateAlert};
pub use mongodb::MongoAlertRepository;
pub use repository::AlertRepository;
pub use service::AlertService;

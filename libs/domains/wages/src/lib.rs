//! Wages Domain
//!
//! A user's wage is `wage_per_hour × hours_this_month`, both read from the user record.
//! Each calculation is stored as the user's single payroll record in `wages`.

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{WageError, WageResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryWageRepository;
pub use models::{CalculateQuery, Wage, WageAmount, WageRateUpdate};
pub use mongodb::MongoWageRepository;
pub use repository::WageRepository;
pub use service::WageService;

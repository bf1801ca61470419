//! Transportation Domain
//!
//! Orders placed through `/buy` become delivery records tracked under
//! `/transports`. Placing an order prices its lines from the product
//! catalogue and checks unallocated stock, but never reserves it.

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{TransportError, TransportResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryTransportRepository;
pub use models::{
    CreateOrder, OrderLine, OrderTotals, StatusUpdate, Transport, TransportChanges, TransportMode,
    TransportStatus, UpdateOrder,
};
pub use mongodb::MongoTransportRepository;
pub use repository::TransportRepository;
pub use service::TransportService;

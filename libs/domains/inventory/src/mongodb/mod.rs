//! MongoDB implementations of the inventory and storage repositories

mod lines;
mod inventory;
mod storage;

pub use inventory::MongoInventoryRepository;
pub use storage::MongoStorageRepository;

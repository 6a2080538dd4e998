pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemorySchemeStore;
pub use postgres::PgSchemeStore;
pub use store::SchemeStore;

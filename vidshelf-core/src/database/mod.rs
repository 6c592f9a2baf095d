//! Persistence boundary: repository ports and the adapters implementing them.

pub mod infrastructure;
pub mod ports;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use infrastructure::memory::InMemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::{PoolStats, PostgresDatabase, PostgresOptions};

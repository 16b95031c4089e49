//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod fs;
pub mod postgres;

pub use fs::LocalImageStore;
pub use postgres::PostgresStorage;

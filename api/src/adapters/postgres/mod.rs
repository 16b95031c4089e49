//! PostgreSQL adapters
//!
//! Implementation of the storage ports using SeaORM and PostgreSQL.

pub mod connection;
pub mod storage;


pub use connection::{connect, ensure_schema};
pub use storage::PostgresStorage;

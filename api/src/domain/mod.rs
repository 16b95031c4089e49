//! Domain layer
//!
//! Store-agnostic models and the ports the rest of the crate talks through.
//! - `entities`: Users, pets, orders and their embedded documents
//! - `ports`: Trait definitions implemented by adapters

pub mod entities;
pub mod ports;

//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod image_store;
pub mod storage;

pub use image_store::ImageStore;
pub use storage::{Collection, Storage, StorageAdmin};

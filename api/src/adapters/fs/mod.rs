//! Filesystem adapters

pub mod image_store;

pub use image_store::{file_extension, LocalImageStore};

//! Image store port
//!
//! Abstracts the filesystem that uploaded pet images are written to.

use async_trait::async_trait;

use crate::error::DomainError;

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `bytes` under a freshly generated filename that keeps the
    /// extension of `original_name`. Returns the generated filename.
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, DomainError>;
}

//! Local filesystem adapter for ImageStore
//!
//! Files are named `<unix-nanos>.<ext>`, where `<ext>` is the segment after
//! the first `.` of the uploaded filename. Names already stored in pet
//! documents follow this scheme.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::domain::ports::ImageStore;
use crate::error::DomainError;

/// Attempts at finding a free name before giving up
const MAX_NAME_ATTEMPTS: i64 = 64;

pub struct LocalImageStore {
    dir: PathBuf,
}

impl LocalImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the target directory if needed
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }
}

/// Extension of an uploaded filename: the segment after its first `.`
pub fn file_extension(original_name: &str) -> Result<&str, DomainError> {
    original_name
        .split('.')
        .nth(1)
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| {
            DomainError::InvalidArgument(format!(
                "file name {:?} has no extension",
                original_name
            ))
        })
}

fn now_nanos() -> i64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1000))
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, DomainError> {
        let extension = file_extension(original_name)?;
        let stamp = now_nanos();

        for offset in 0..MAX_NAME_ATTEMPTS {
            let filename = format!("{}.{}", stamp + offset, extension);
            let path = self.dir.join(&filename);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(DomainError::Internal(format!(
                        "cannot create {}: {}",
                        path.display(),
                        e
                    )))
                }
            };

            file.write_all(bytes)
                .await
                .map_err(|e| DomainError::Internal(format!("cannot write {}: {}", filename, e)))?;
            file.flush()
                .await
                .map_err(|e| DomainError::Internal(format!("cannot write {}: {}", filename, e)))?;

            tracing::debug!(%filename, size = bytes.len(), "Image stored");
            return Ok(filename);
        }

        Err(DomainError::Internal(format!(
            "no free image name near {} in {}",
            stamp,
            self.dir.display()
        )))
    }
}

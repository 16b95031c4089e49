use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 32 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    /// Deadline applied to every document-store round trip
    pub database_timeout: Duration,
    pub http_addr: String,
    pub http_port: u16,
    /// Base URI prefixed to stored image filenames
    pub public_base_uri: String,
    /// Directory uploaded images are written to and served from
    pub public_file_path: PathBuf,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
    /// Largest accepted image upload request, in bytes
    pub upload_max_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_timeout: Duration::from_secs(parse_var("DATABASE_TIMEOUT_SECS", 10)?),
            http_addr: env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_var("PORT", 8080)?,
            public_base_uri: env::var("PUBLIC_URI")
                .map(|uri| uri.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "/images".to_string()),
            public_file_path: env::var("PUBLIC_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./public")),
            rate_limit_per_second: parse_var("RATE_LIMIT_PER_SECOND", 2)?,
            rate_limit_burst: parse_var("RATE_LIMIT_BURST", 5)?,
            upload_max_bytes: parse_var("UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES)?,
        })
    }

    /// Address the HTTP listener binds to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.http_addr, self.http_port)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

//! Explicit configuration. The environment is read once here, at the edge;
//! everything downstream takes these structs as plain values.

use crate::defaults;

/// Connection settings for the S3-compatible document store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("STORE_ENDPOINT_URL")
                .unwrap_or_else(|_| "http://minio:9000".to_string()),
            access_key: std::env::var("STORE_ACCESS_KEY_ID")
                .unwrap_or_else(|_| "minioadmin".to_string()),
            secret_key: std::env::var("STORE_SECRET_ACCESS_KEY")
                .unwrap_or_else(|_| "minioadmin".to_string()),
            bucket: std::env::var("STORE_BUCKET").unwrap_or_else(|_| "cctv".to_string()),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Threshold applied when a similarity request does not carry one.
    pub default_threshold: f32,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let default_threshold = std::env::var("SEARCH_THRESHOLD")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(defaults::DEFAULT_THRESHOLD);
        Self {
            bind_addr: std::env::var("BIND_ADDR")
                .unwrap_or_else(|_| defaults::DEFAULT_BIND_ADDR.to_string()),
            default_threshold,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: defaults::DEFAULT_BIND_ADDR.to_string(),
            default_threshold: defaults::DEFAULT_THRESHOLD,
        }
    }
}

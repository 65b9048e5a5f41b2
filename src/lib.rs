//! Face retrieval service
//!
//! Embedding-based similarity search over face detections stored in an
//! S3-compatible document store, fully offline and deterministic.

pub mod api;
pub mod config;
pub mod embedding;
pub mod model;
pub mod resolver;
pub mod search;
pub mod store;
pub mod vector;

pub use model::*;
pub use store::DocStore;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// Embedding dimensionality produced by the generator.
    pub const DIMENSION: usize = 192;
    /// Minimum cosine similarity for a corpus entry to count as a match.
    pub const DEFAULT_THRESHOLD: f32 = 0.8;
    pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
}

/// Error types for the retrieval core
pub mod errors {
    pub type Result<T> = std::result::Result<T, FaceSearchError>;

    #[derive(Debug, thiserror::Error)]
    pub enum FaceSearchError {
        #[error("image decode failed: {0}")]
        Decode(String),

        #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
        DimensionMismatch { expected: usize, actual: usize },

        #[error("threshold {0} outside [0, 1]")]
        InvalidThreshold(f32),

        #[error("storage error: {0}")]
        Storage(#[from] anyhow::Error),
    }
}

//! Error types for the cache service.

use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur while resolving cached model data.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The loaded payload could not be turned into model types.
    #[error("model error: {0}")]
    Model(#[from] netric_types::Error),

    /// The caller-supplied loader failed.
    #[error("loader error: {0}")]
    Loader(String),

    /// The loader answered with a definition for a different type.
    #[error("requested definition for {requested}, received {received}")]
    ObjTypeMismatch { requested: String, received: String },
}

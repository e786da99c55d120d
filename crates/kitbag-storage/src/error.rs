//! Error types for object storage

use kitbag_env::EnvError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("The specified key does not exist: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Object stream error: {0}")]
    Stream(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("Invalid storage configuration: {0}")]
    InvalidConfig(String),
}

impl StorageError {
    pub fn not_found(bucket: &str, key: &str) -> Self {
        StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

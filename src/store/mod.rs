pub mod s3;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Failure classes for a `put`, distinguished for logging only; the publisher
/// folds all of them into a boolean failure result.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store rejected the request for missing or invalid credentials.
    #[error("credentials not available: {0}")]
    Credentials(String),
    /// Any other transfer failure.
    #[error("transfer failed: {0}")]
    Transfer(String),
}

/// Durable remote storage capability.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload the file at `local_path` to `bucket` under `key`.
    async fn put(&self, local_path: &Path, bucket: &str, key: &str) -> Result<(), StoreError>;
}

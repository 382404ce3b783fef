use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;

use super::{ObjectStore, StoreError};

/// S3-backed object store using the default AWS credential chain
/// (environment, shared config, instance profile).
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Build a client from the ambient AWS configuration. Credentials are
    /// not validated here; a missing chain surfaces on the first `put`.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, local_path: &Path, bucket: &str, key: &str) -> Result<(), StoreError> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| StoreError::Transfer(format!("failed to read {}: {}", local_path.display(), e)))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("{}", DisplayErrorContext(&e));
                // The SDK reports a missing/expired credential chain as a
                // dispatch failure; sniff the message to keep the two
                // failure classes apart in the logs.
                if msg.to_lowercase().contains("credential") {
                    StoreError::Credentials(msg)
                } else {
                    StoreError::Transfer(msg)
                }
            })?;

        Ok(())
    }
}

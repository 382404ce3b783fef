use tracing::{error, info};

use crate::models::snapshot::SnapshotArtifact;
use crate::store::{ObjectStore, StoreError};

/// Upload the snapshot to `bucket` under `prefix` + artifact name (or an
/// explicit `remote_name` when given).
///
/// Never raises and never deletes: every failure class is logged and folded
/// into `false`, and cleanup of the local file is the orchestrator's call.
pub async fn publish(
    store: &dyn ObjectStore,
    artifact: &SnapshotArtifact,
    bucket: &str,
    prefix: &str,
    remote_name: Option<&str>,
) -> bool {
    // Local precondition, not a transfer failure
    if !artifact.path.exists() {
        error!("File {} does not exist", artifact.path.display());
        return false;
    }

    let key = match remote_name {
        Some(name) => name.to_string(),
        None => remote_key(prefix, artifact),
    };

    match store.put(&artifact.path, bucket, &key).await {
        Ok(()) => {
            info!(
                "Successfully uploaded {} to {}/{}",
                artifact.path.display(),
                bucket,
                key
            );
            true
        }
        Err(StoreError::Credentials(msg)) => {
            error!("AWS credentials not available: {}", msg);
            false
        }
        Err(StoreError::Transfer(msg)) => {
            error!("Error uploading file: {}", msg);
            false
        }
    }
}

/// Remote key the publisher will use for an artifact with no explicit name.
pub fn remote_key(prefix: &str, artifact: &SnapshotArtifact) -> String {
    format!("{}{}", prefix, artifact.name)
}

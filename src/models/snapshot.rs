use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// A snapshot file written locally, waiting to be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotArtifact {
    /// File name, e.g. `crypto_prices_2025_06_09_10.csv`.
    pub name: String,
    /// Full local path of the file.
    pub path: PathBuf,
}

/// Snapshot file name for the given instant.
///
/// Pure function of the UTC hour: two writes within the same hour map to the
/// same name (last writer wins), writes in different hours get distinct names.
pub fn artifact_name(at: DateTime<Utc>) -> String {
    format!("crypto_prices_{}.csv", at.format("%Y_%m_%d_%H"))
}

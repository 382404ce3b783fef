use std::path::PathBuf;
use thiserror::Error;

use crate::api::coingecko::models::ApiError;

/// Fatal error classes for a pipeline run.
///
/// Per-chunk price failures are not represented here: they are tolerated,
/// logged, and counted on the batch. Everything below aborts the run with a
/// non-zero exit.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The catalog endpoint answered with a non-2xx status.
    #[error("failed to fetch coin list: {status} - {body}")]
    UpstreamCatalog { status: u16, body: String },

    /// Network or decode failure talking to the upstream API.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Every chunk failed or came back empty; there is nothing to snapshot.
    #[error("no price data was collected across {chunks} chunk(s)")]
    EmptyBatch { chunks: usize },

    /// Local filesystem failure while writing the snapshot.
    #[error("snapshot write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The upload was rejected or the artifact went missing; the local
    /// snapshot is kept for manual recovery.
    #[error("publish failed; snapshot kept at {}", path.display())]
    PublishFailed { path: PathBuf },
}

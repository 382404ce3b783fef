use tracing::info;

use crate::api::coingecko::models::ApiError;
use crate::api::PriceSource;
use crate::utils::errors::PipelineError;

/// Resolve the full catalog of coin ids from the upstream source.
///
/// One call, no retry, no filtering: upstream order and duplicates (if any)
/// are passed through untouched. A non-2xx answer is fatal for the run.
pub async fn resolve_catalog(source: &dyn PriceSource) -> Result<Vec<String>, PipelineError> {
    let entries = source.coins_list().await.map_err(|e| match e {
        ApiError::Upstream { status, body } => PipelineError::UpstreamCatalog { status, body },
        other => PipelineError::Api(other),
    })?;

    let ids: Vec<String> = entries.into_iter().map(|entry| entry.id).collect();
    info!("Found {} supported crypto coin ids", ids.len());
    Ok(ids)
}

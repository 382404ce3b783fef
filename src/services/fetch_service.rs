use chrono::Utc;
use tracing::{info, warn};

use crate::api::coingecko::models::ApiError;
use crate::api::PriceSource;
use crate::config::PipelineConfig;
use crate::models::price::{PriceBatch, PriceRecord};
use crate::utils::errors::PipelineError;
use crate::utils::ratelimit::RateLimiter;

/// Fetch spot prices for `ids` in chunks of `config.chunk_size`.
///
/// Chunks are fetched strictly in sequence, each behind the rate limiter.
/// A chunk that comes back non-2xx or empty is logged, counted as skipped,
/// and the run continues: the batch just lacks those coins. Transport-level
/// failures abort the run. If nothing at all was collected the run fails
/// with `EmptyBatch`.
pub async fn fetch_prices(
    source: &dyn PriceSource,
    ids: &[String],
    config: &PipelineConfig,
    limiter: &RateLimiter,
) -> Result<PriceBatch, PipelineError> {
    let mut batch = PriceBatch::default();
    let total_chunks = ids.len().div_ceil(config.chunk_size);

    for (index, chunk) in ids.chunks(config.chunk_size).enumerate() {
        limiter.acquire().await;

        match source.simple_price(chunk, &config.quote_currency).await {
            Ok(prices) if !prices.is_empty() => {
                // One timestamp per chunk, assigned at fetch time.
                let observed_at = Utc::now();
                let before = batch.len();
                // Walk the requested ids rather than the response map so the
                // batch order stays deterministic; ids the upstream omitted
                // produce no record at all.
                for id in chunk {
                    if let Some(price) = prices.get(id) {
                        batch.records.push(PriceRecord {
                            coin: id.clone(),
                            price_usd: price.usd,
                            observed_at,
                        });
                    }
                }
                info!(
                    "Chunk {}/{}: collected {} coins",
                    index + 1,
                    total_chunks,
                    batch.len() - before
                );
            }
            Ok(_) => {
                warn!("Chunk {}/{}: no data found, skipping", index + 1, total_chunks);
                batch.skipped_chunks += 1;
            }
            Err(ApiError::Upstream { status, body }) => {
                warn!(
                    "Chunk {}/{}: failed to fetch: {} - {}, skipping",
                    index + 1,
                    total_chunks,
                    status,
                    body
                );
                batch.skipped_chunks += 1;
            }
            Err(e) => return Err(PipelineError::Api(e)),
        }
    }

    if batch.is_empty() {
        return Err(PipelineError::EmptyBatch { chunks: total_chunks });
    }

    Ok(batch)
}

use chrono::Utc;
use tracing::{info, warn};

use crate::api::PriceSource;
use crate::config::PipelineConfig;
use crate::services::{catalog_service, fetch_service, publish_service, snapshot_service};
use crate::store::ObjectStore;
use crate::utils::errors::PipelineError;
use crate::utils::ratelimit::RateLimiter;

/// What one successful run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub coins_discovered: usize,
    pub records_collected: usize,
    pub skipped_chunks: usize,
    pub artifact_name: String,
    pub remote_key: String,
}

/// Execute one full pipeline run: resolve -> fetch -> write -> publish ->
/// cleanup.
///
/// Strictly sequential, fail-fast: any error in the first three stages
/// aborts immediately. A publish failure is fatal too, but deliberately
/// leaves the local snapshot in place for manual recovery. The local file is
/// deleted only after a confirmed upload; a failure to delete at that point
/// is logged and ignored since the remote copy already exists.
pub async fn run(
    config: &PipelineConfig,
    source: &dyn PriceSource,
    store: &dyn ObjectStore,
) -> Result<RunSummary, PipelineError> {
    info!("Step 1: Fetching list of all supported crypto coin ids...");
    let ids = catalog_service::resolve_catalog(source).await?;

    info!("Step 2: Fetching price data for {} coins...", ids.len());
    let limiter = RateLimiter::new(1, config.rate_limit_delay);
    let batch = fetch_service::fetch_prices(source, &ids, config, &limiter).await?;
    info!(
        "Collected {} records ({} chunks skipped)",
        batch.len(),
        batch.skipped_chunks
    );

    info!("Step 3: Saving price data to CSV...");
    let artifact = snapshot_service::write_snapshot(&batch, &config.snapshot_dir, Utc::now())?;

    info!("Step 4: Uploading to S3...");
    if !publish_service::publish(store, &artifact, &config.bucket, &config.prefix, None).await {
        return Err(PipelineError::PublishFailed {
            path: artifact.path,
        });
    }

    // Cleanup: the remote copy is confirmed, so a leftover local file is
    // only a nuisance, not data loss.
    if let Err(e) = std::fs::remove_file(&artifact.path) {
        warn!(
            "Failed to clean up local file {}: {}",
            artifact.path.display(),
            e
        );
    } else {
        info!("Cleaned up local file: {}", artifact.path.display());
    }

    Ok(RunSummary {
        coins_discovered: ids.len(),
        records_collected: batch.len(),
        skipped_chunks: batch.skipped_chunks,
        artifact_name: artifact.name.clone(),
        remote_key: publish_service::remote_key(&config.prefix, &artifact),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::coingecko::models::{ApiError, CatalogEntry, SimplePrice};
    use crate::store::StoreError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;

    struct ScriptedSource {
        catalog: Result<Vec<&'static str>, ApiError>,
        prices: Mutex<Vec<Result<HashMap<String, SimplePrice>, ApiError>>>,
        price_calls: Mutex<usize>,
    }

    #[async_trait]
    impl PriceSource for ScriptedSource {
        async fn coins_list(&self) -> Result<Vec<CatalogEntry>, ApiError> {
            self.catalog.clone().map(|ids| {
                ids.into_iter()
                    .map(|id| CatalogEntry {
                        id: id.to_string(),
                        symbol: None,
                        name: None,
                    })
                    .collect()
            })
        }

        async fn simple_price(
            &self,
            _ids: &[String],
            _vs_currency: &str,
        ) -> Result<HashMap<String, SimplePrice>, ApiError> {
            *self.price_calls.lock().unwrap() += 1;
            let mut prices = self.prices.lock().unwrap();
            if prices.is_empty() {
                Ok(HashMap::new())
            } else {
                prices.remove(0)
            }
        }
    }

    struct RecordingStore {
        keys: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl ObjectStore for RecordingStore {
        async fn put(&self, _local_path: &Path, _bucket: &str, key: &str) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::Transfer("upload rejected".into()));
            }
            self.keys.lock().unwrap().push(key.to_string());
            Ok(())
        }
    }

    fn two_coin_source() -> ScriptedSource {
        let mut prices = HashMap::new();
        prices.insert("bitcoin".to_string(), SimplePrice { usd: Some(50000.0) });
        prices.insert("ethereum".to_string(), SimplePrice { usd: Some(3000.0) });
        ScriptedSource {
            catalog: Ok(vec!["bitcoin", "ethereum"]),
            prices: Mutex::new(vec![Ok(prices)]),
            price_calls: Mutex::new(0),
        }
    }

    fn test_config(dir: &tempfile::TempDir) -> PipelineConfig {
        PipelineConfig {
            rate_limit_delay: Duration::ZERO,
            snapshot_dir: dir.path().to_path_buf(),
            ..PipelineConfig::default()
        }
    }

    #[tokio::test]
    async fn full_run_publishes_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let source = two_coin_source();
        let store = RecordingStore {
            keys: Mutex::new(Vec::new()),
            fail: false,
        };

        let summary = run(&config, &source, &store).await.unwrap();

        assert_eq!(summary.coins_discovered, 2);
        assert_eq!(summary.records_collected, 2);
        assert_eq!(summary.skipped_chunks, 0);
        assert_eq!(*source.price_calls.lock().unwrap(), 1);

        let keys = store.keys.lock().unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0], format!("hourly/{}", summary.artifact_name));
        assert_eq!(keys[0], summary.remote_key);

        // Publish success implies local deletion
        assert!(!dir.path().join(&summary.artifact_name).exists());
    }

    /// Store that swallows the local file during upload, so the
    /// orchestrator's own delete afterwards fails with NotFound.
    struct ConsumingStore;

    #[async_trait]
    impl ObjectStore for ConsumingStore {
        async fn put(&self, local_path: &Path, _bucket: &str, _key: &str) -> Result<(), StoreError> {
            std::fs::remove_file(local_path).unwrap();
            Ok(())
        }
    }

    #[tokio::test]
    async fn cleanup_failure_after_successful_publish_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let source = two_coin_source();

        // Upload succeeds but the local file is already gone when cleanup
        // runs; the run must still count as a success.
        let summary = run(&config, &source, &ConsumingStore).await.unwrap();

        assert_eq!(summary.records_collected, 2);
        assert!(!dir.path().join(&summary.artifact_name).exists());
    }

    #[tokio::test]
    async fn publish_failure_keeps_artifact_and_fails_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let source = two_coin_source();
        let store = RecordingStore {
            keys: Mutex::new(Vec::new()),
            fail: true,
        };

        let err = run(&config, &source, &store).await.unwrap_err();
        let path = match err {
            PipelineError::PublishFailed { path } => path,
            other => panic!("expected PublishFailed, got {:?}", other),
        };

        // Snapshot is preserved for manual recovery
        assert!(path.exists());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().next().unwrap(), "price_usd,coin,timestamp");
        assert_eq!(contents.lines().count(), 3);
    }

    #[tokio::test]
    async fn catalog_failure_aborts_before_any_price_call() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let source = ScriptedSource {
            catalog: Err(ApiError::Upstream {
                status: 500,
                body: "down".into(),
            }),
            prices: Mutex::new(Vec::new()),
            price_calls: Mutex::new(0),
        };
        let store = RecordingStore {
            keys: Mutex::new(Vec::new()),
            fail: false,
        };

        let err = run(&config, &source, &store).await.unwrap_err();
        assert!(matches!(err, PipelineError::UpstreamCatalog { status: 500, .. }));
        assert_eq!(*source.price_calls.lock().unwrap(), 0);
        assert!(store.keys.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_batch_writes_no_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let source = ScriptedSource {
            catalog: Ok(vec!["bitcoin"]),
            prices: Mutex::new(vec![Err(ApiError::Upstream {
                status: 502,
                body: "bad gateway".into(),
            })]),
            price_calls: Mutex::new(0),
        };
        let store = RecordingStore {
            keys: Mutex::new(Vec::new()),
            fail: false,
        };

        let err = run(&config, &source, &store).await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyBatch { chunks: 1 }));

        // No snapshot file was created and nothing was uploaded
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(store.keys.lock().unwrap().is_empty());
    }
}

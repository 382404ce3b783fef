use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod models;
mod services;
mod store;
mod utils;

use api::coingecko::CoinGeckoClient;
use config::PipelineConfig;
use store::s3::S3Store;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("coinlake=info".parse().unwrap())
                .add_directive("aws_config=warn".parse().unwrap()),
        )
        .with_target(true)
        .init();

    info!("coinlake v{} - hourly crypto price snapshot pipeline", env!("CARGO_PKG_VERSION"));

    let config = match PipelineConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        "Configured: chunk_size={}, rate_limit={}ms, destination=s3://{}/{}",
        config.chunk_size,
        config.rate_limit_delay.as_millis(),
        config.bucket,
        config.prefix
    );

    let source = match CoinGeckoClient::new(&config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let store = S3Store::from_env().await;

    match services::pipeline_service::run(&config, &source, &store).await {
        Ok(summary) => {
            info!(
                "Pipeline completed: {} coins discovered, {} records collected ({} chunks skipped)",
                summary.coins_discovered, summary.records_collected, summary.skipped_chunks
            );
            info!("Snapshot published to s3://{}/{}", config.bucket, summary.remote_key);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Pipeline failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

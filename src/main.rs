//! LTP Service - Main entry point
//!
//! Primes the price cache, starts the periodic refresher, and serves
//! `GET /api/v1/ltp` until interrupted.

use anyhow::Result;
use ltp_service::{
    spawn_periodic_refresh, AsyncTickerClient, Config, HttpServer, PriceCache, PriceService,
    PriceServiceImpl, RefreshEngine, TickerClient, TickerSource, TokioRefreshSpawner,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize logging (stderr); RUST_LOG wins over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting LTP service with upstream URL: {}",
        config.upstream_base_url
    );

    // Initialize ticker client
    let sync_client = TickerClient::new(&config);
    let metrics = sync_client.metrics().clone();
    let source = Arc::new(AsyncTickerClient::new(sync_client)) as Arc<dyn TickerSource>;

    let cache = PriceCache::new();
    let engine = Arc::new(
        RefreshEngine::new(cache.clone(), source, config.retry_policy())
            .with_metrics(metrics.clone()),
    );

    // Prime the cache before accepting requests
    let outcome = engine.run_refresh_cycle().await;
    info!(resolved = outcome.resolved(), "Initial refresh finished");

    let ticker = spawn_periodic_refresh(engine.clone(), config.refresh_interval());
    info!(
        "Refreshing every {}s, staleness threshold {}s",
        config.refresh_interval_secs, config.staleness_threshold_secs
    );

    let spawner = Arc::new(TokioRefreshSpawner::current(engine.clone()));
    let service = Arc::new(
        PriceServiceImpl::new(cache, spawner, config.staleness_threshold()).with_metrics(metrics),
    ) as Arc<dyn PriceService>;

    let server = HttpServer::bind(&config.listen_addr)?;
    let shutdown = server.shutdown_handle();
    let mut serving = tokio::task::spawn_blocking(move || server.serve(service));

    tokio::select! {
        result = &mut serving => {
            if let Err(e) = result {
                error!("HTTP server task failed: {}", e);
            }
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown requested");
            shutdown.shutdown();
            if let Err(e) = serving.await {
                error!("HTTP server task failed: {}", e);
            }
        }
    }

    ticker.abort();
    info!("LTP service shutdown complete");
    Ok(())
}

//! LTP Service - last traded prices for a fixed set of currency pairs.
//!
//! Prices come from a single upstream ticker API and are served from an in-memory
//! cache. Reads never block on network I/O; refreshes run in the background, one
//! at a time, and tolerate partial upstream failure.
//!
//! # Architecture
//!
//! - **models**: Supported pairs, cached price entries, upstream wire types
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **metrics**: Counters for upstream calls and refresh cycles
//! - **cache**: The shared, lock-guarded price state
//! - **client**: HTTP client for the upstream ticker API
//! - **refresh**: Refresh engine, retry policy, scheduler and spawn point
//! - **services**: The non-blocking read path
//! - **server**: HTTP front end

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod refresh;
pub mod server;
pub mod services;

pub use cache::PriceCache;
pub use client::{AsyncTickerClient, TickerClient, TickerSource};
pub use config::Config;
pub use error::{ConfigError, ServerError, TickerApiError};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use models::{LtpResponse, PriceEntry, SupportedPair, TickerInfo, TickerResponse, SUPPORTED_PAIRS};
pub use refresh::{
    spawn_periodic_refresh, RefreshEngine, RefreshOutcome, RefreshPath, RefreshSpawner,
    RetryPolicy, TokioRefreshSpawner,
};
pub use server::HttpServer;
pub use services::{PriceService, PriceServiceImpl, ServiceStatus};

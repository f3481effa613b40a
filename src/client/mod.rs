//! HTTP client for the upstream ticker API.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking` (see [`AsyncTickerClient`]). The client handles
//! the per-call timeout, error mapping, and decoding of ticker payloads.

mod async_wrapper;
pub use async_wrapper::{AsyncTickerClient, TickerSource};

use crate::config::Config;
use crate::error::{TickerApiError, TickerApiResult};
use crate::metrics::{HttpTimer, Metrics};
use crate::models::TickerResponse;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client for the upstream ticker API.
///
/// Uses a single `ureq` agent so connections are pooled across retries and pairs.
#[derive(Clone)]
pub struct TickerClient {
    /// Base URL of the ticker API (e.g. "https://api.kraken.com/0/public")
    base_url: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl TickerClient {
    /// Create a new TickerClient from configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_timeout(
            config.upstream_base_url.clone(),
            Duration::from_secs(config.request_timeout),
        )
    }

    /// Create a TickerClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(10))
    }

    fn with_timeout(base_url: String, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .max_idle_connections_per_host(5)
            .build();

        Self {
            base_url,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build the ticker URL for a set of upstream symbols.
    fn ticker_url(&self, symbols: &[String]) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{}/Ticker?pair={}", base, symbols.join(","))
    }

    /// Fetch ticker data for one or more upstream symbols in a single request.
    ///
    /// A response whose `error` list is non-empty is returned as
    /// [`TickerApiError::Upstream`], even when some results are present.
    pub fn fetch_ticker(&self, symbols: &[String]) -> TickerApiResult<TickerResponse> {
        let url = self.ticker_url(symbols);
        let timer = HttpTimer::new(self.metrics.clone());

        tracing::debug!("GET {}", url);

        let response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(e) => {
                timer.complete_with_error();
                return Err(self.map_error(e));
            }
        };

        let body = match response.into_string() {
            Ok(body) => body,
            Err(e) => {
                timer.complete_with_error();
                return Err(TickerApiError::HttpError(e.to_string()));
            }
        };

        let ticker: TickerResponse = match serde_json::from_str(&body) {
            Ok(ticker) => ticker,
            Err(e) => {
                timer.complete_with_error();
                return Err(TickerApiError::JsonError(e));
            }
        };

        if !ticker.error.is_empty() {
            timer.complete_with_error();
            return Err(TickerApiError::Upstream(ticker.error));
        }

        timer.complete();
        Ok(ticker)
    }

    /// Map a ureq error to a TickerApiError.
    fn map_error(&self, error: ureq::Error) -> TickerApiError {
        match error {
            ureq::Error::Status(code, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());
                TickerApiError::ApiError {
                    status: code,
                    message,
                }
            }
            ureq::Error::Transport(transport) => match transport.kind() {
                ureq::ErrorKind::ConnectionFailed | ureq::ErrorKind::Dns => {
                    TickerApiError::HttpError("Connection failed".to_string())
                }
                ureq::ErrorKind::Io => TickerApiError::Timeout,
                _ => TickerApiError::HttpError(transport.to_string()),
            },
        }
    }
}

impl std::fmt::Debug for TickerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickerClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

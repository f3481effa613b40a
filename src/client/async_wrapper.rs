//! Async wrapper around the synchronous TickerClient.
//!
//! This module provides an async interface to the synchronous TickerClient by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime.

use crate::client::TickerClient;
use crate::error::{TickerApiError, TickerApiResult};
use crate::models::TickerResponse;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of upstream ticker data.
///
/// The refresh engine only depends on this trait, so tests can substitute
/// a scripted source for the real HTTP client.
#[async_trait]
pub trait TickerSource: Send + Sync {
    /// Fetch ticker data for the given upstream symbols in one call.
    async fn fetch_ticker(&self, symbols: &[String]) -> TickerApiResult<TickerResponse>;
}

/// Async wrapper around synchronous TickerClient.
///
/// Uses `tokio::task::spawn_blocking` to run synchronous HTTP
/// operations on a dedicated thread pool, preventing blocking
/// the async runtime.
#[derive(Clone)]
pub struct AsyncTickerClient {
    client: Arc<TickerClient>,
}

impl AsyncTickerClient {
    pub fn new(client: TickerClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl TickerSource for AsyncTickerClient {
    async fn fetch_ticker(&self, symbols: &[String]) -> TickerApiResult<TickerResponse> {
        let client = self.client.clone();
        let symbols = symbols.to_vec();

        tokio::task::spawn_blocking(move || client.fetch_ticker(&symbols))
            .await
            .map_err(|e| TickerApiError::Other(format!("Task join error: {}", e)))?
    }
}

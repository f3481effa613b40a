use async_trait::async_trait;
use ltp_service::error::{TickerApiError, TickerApiResult};
use ltp_service::models::{TickerInfo, TickerResponse};
use ltp_service::TickerSource;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Handler = dyn Fn(&[String]) -> TickerApiResult<TickerResponse> + Send + Sync;

/// Mock ticker source for testing.
///
/// Answers every call through a user-supplied handler and records the symbols
/// each call asked for, so tests can verify batch vs per-pair behaviour.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockTickerSource {
    handler: Arc<Handler>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    delay: Duration,
}

#[allow(dead_code)]
impl MockTickerSource {
    /// Create a mock that answers with `handler`.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&[String]) -> TickerApiResult<TickerResponse> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
        }
    }

    /// A mock that always returns the same response.
    pub fn always(response: TickerResponse) -> Self {
        Self::new(move |_| Ok(response.clone()))
    }

    /// A mock whose every call fails with a timeout.
    pub fn unreachable() -> Self {
        Self::new(|_| Err(TickerApiError::Timeout))
    }

    /// Sleep this long inside every call before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Symbols requested by each call, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of calls that requested more than one symbol.
    pub fn batch_call_count(&self) -> usize {
        self.calls().iter().filter(|symbols| symbols.len() > 1).count()
    }

    /// Number of calls that requested exactly `symbol` on its own.
    pub fn single_call_count(&self, symbol: &str) -> usize {
        self.calls()
            .iter()
            .filter(|symbols| symbols.len() == 1 && symbols[0] == symbol)
            .count()
    }
}

#[async_trait]
impl TickerSource for MockTickerSource {
    async fn fetch_ticker(&self, symbols: &[String]) -> TickerApiResult<TickerResponse> {
        self.calls.lock().unwrap().push(symbols.to_vec());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.handler)(symbols)
    }
}

/// Build a successful ticker response from `(upstream key, last price)` pairs.
#[allow(dead_code)]
pub fn ticker_response(entries: &[(&str, &str)]) -> TickerResponse {
    let result: HashMap<String, TickerInfo> = entries
        .iter()
        .map(|(key, price)| {
            (
                key.to_string(),
                TickerInfo {
                    c: vec![price.to_string(), "1.0".to_string()],
                },
            )
        })
        .collect();

    TickerResponse {
        error: Vec::new(),
        result,
    }
}

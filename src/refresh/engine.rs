//! Refresh engine: populates the price cache from the upstream ticker API.
//!
//! One cycle is admission, a batched fetch with retries, a per-pair fallback if
//! the batch never produced a usable response, and completion. Every error is
//! absorbed here; nothing propagates to readers.

use super::backoff::RetryPolicy;
use super::keys::{find_ticker, request_symbol};
use crate::cache::PriceCache;
use crate::client::TickerSource;
use crate::error::{TickerApiError, TickerApiResult};
use crate::metrics::Metrics;
use crate::models::{SupportedPair, TickerResponse};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Which path a completed cycle took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPath {
    /// The single batched request produced a usable response
    Batch,
    /// The batch failed and each pair was requested on its own
    Fallback,
}

/// Result of one call to [`RefreshEngine::run_refresh_cycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Another refresh was already running; nothing was done
    Skipped,
    /// The cycle ran to completion
    Completed { path: RefreshPath, resolved: usize },
}

impl RefreshOutcome {
    /// Number of pairs written during the cycle (0 when skipped).
    pub fn resolved(&self) -> usize {
        match self {
            RefreshOutcome::Skipped => 0,
            RefreshOutcome::Completed { resolved, .. } => *resolved,
        }
    }
}

/// Holds the single-flight claim and releases it when dropped,
/// so the in-flight flag is cleared on every exit path.
struct RefreshPermit<'a> {
    cache: &'a PriceCache,
}

impl<'a> RefreshPermit<'a> {
    fn acquire(cache: &'a PriceCache) -> Option<Self> {
        // Build the guard only once admitted: a denied caller must not release someone else's claim
        if cache.try_begin_refresh() {
            Some(Self { cache })
        } else {
            None
        }
    }
}

impl Drop for RefreshPermit<'_> {
    fn drop(&mut self) {
        self.cache.end_refresh();
    }
}

/// Drives cache population from a [`TickerSource`].
pub struct RefreshEngine {
    cache: PriceCache,
    source: Arc<dyn TickerSource>,
    policy: RetryPolicy,
    metrics: Metrics,
}

impl RefreshEngine {
    pub fn new(cache: PriceCache, source: Arc<dyn TickerSource>, policy: RetryPolicy) -> Self {
        Self {
            cache,
            source,
            policy,
            metrics: Metrics::new(),
        }
    }

    /// Record refresh activity into a shared metrics collector.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Run one refresh cycle, or return [`RefreshOutcome::Skipped`] if one is already running.
    ///
    /// The staleness clock is reset at the end of every cycle that runs, even
    /// if no pair resolved.
    pub async fn run_refresh_cycle(&self) -> RefreshOutcome {
        let Some(_permit) = RefreshPermit::acquire(&self.cache) else {
            debug!("Refresh already in flight, skipping");
            self.metrics.record_refresh_skipped();
            return RefreshOutcome::Skipped;
        };

        let pairs = self.cache.supported_pairs();
        let symbols: Vec<String> = pairs.iter().map(request_symbol).collect();

        let (path, resolved) = match self.fetch_with_retry(&symbols, "batch").await {
            Ok(response) => (RefreshPath::Batch, self.apply_batch(pairs, &response)),
            Err(e) => {
                warn!(error = %e, "Batched ticker request failed, falling back to per-pair requests");
                (RefreshPath::Fallback, self.refresh_pairs_individually(pairs).await)
            }
        };

        self.cache.mark_refresh_attempted();
        self.metrics
            .record_refresh_cycle(resolved, path == RefreshPath::Fallback);

        if resolved == 0 {
            error!(
                path = ?path,
                pairs = pairs.len(),
                "Refresh resolved no pairs; serving previously cached prices"
            );
        } else {
            info!(path = ?path, resolved, pairs = pairs.len(), "Price cache refreshed");
        }

        RefreshOutcome::Completed { path, resolved }
    }

    /// Call the source up to `max_retries` times, sleeping per the policy between attempts.
    ///
    /// Non-retryable errors (undecodable bodies) end the loop immediately.
    async fn fetch_with_retry(
        &self,
        symbols: &[String],
        label: &str,
    ) -> TickerApiResult<TickerResponse> {
        let max = self.policy.max_retries();
        let mut last_error = TickerApiError::Other("no attempt made".to_string());

        for attempt in 0..max {
            if attempt > 0 {
                let delay = self.policy.delay_before(attempt);
                debug!(target_symbols = %label, attempt = attempt + 1, max, ?delay, "Backing off before retry");
                tokio::time::sleep(delay).await;
            }

            match self.source.fetch_ticker(symbols).await {
                Ok(response) => return Ok(response),
                Err(e) if !e.is_retryable() => {
                    warn!(target_symbols = %label, error = %e, "Ticker response unusable, not retrying");
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        target_symbols = %label,
                        attempt = attempt + 1,
                        max,
                        error = %e,
                        "Ticker request failed"
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// Write every pair found in a batched response. Returns how many were written.
    fn apply_batch(&self, pairs: &[SupportedPair], response: &TickerResponse) -> usize {
        pairs
            .iter()
            .filter(|pair| self.apply_pair(pair, response))
            .count()
    }

    /// Look a pair up in a response and cache its price.
    ///
    /// Missing or malformed entries leave the cached value untouched.
    fn apply_pair(&self, pair: &SupportedPair, response: &TickerResponse) -> bool {
        let Some(info) = find_ticker(response, pair) else {
            warn!(pair = %pair.display, "Pair missing from ticker response");
            return false;
        };

        match info.last_trade_price() {
            Some(price) => self.cache.upsert(pair.display, price),
            None => {
                warn!(pair = %pair.display, raw = ?info.c, "Unparsable last trade price");
                false
            }
        }
    }

    /// Fetch each pair on its own; one pair failing never stops the others.
    async fn refresh_pairs_individually(&self, pairs: &[SupportedPair]) -> usize {
        let mut resolved = 0;

        for pair in pairs {
            let symbols = [request_symbol(pair)];
            match self.fetch_with_retry(&symbols, pair.display).await {
                Ok(response) => {
                    if self.apply_pair(pair, &response) {
                        resolved += 1;
                    }
                }
                Err(e) => {
                    warn!(pair = %pair.display, error = %e, "Giving up on pair for this cycle");
                }
            }
        }

        resolved
    }
}

impl std::fmt::Debug for RefreshEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshEngine")
            .field("cache", &self.cache)
            .field("policy", &self.policy)
            .finish()
    }
}

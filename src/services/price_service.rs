//! Price service layer.
//!
//! The read path: serve whatever is cached and, if it looks stale, ask for a
//! background refresh without waiting for it.

use crate::cache::PriceCache;
use crate::metrics::{Metrics, MetricsSummary};
use crate::models::PriceEntry;
use crate::refresh::RefreshSpawner;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Cache health reported by `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub last_refresh: Option<DateTime<Utc>>,
    pub stale: bool,
    pub refresh_in_flight: bool,
    pub cached_pairs: usize,
    pub metrics: MetricsSummary,
}

/// Price service trait for read operations.
///
/// Both operations are synchronous and never perform I/O.
pub trait PriceService: Send + Sync {
    /// Cached prices for the requested pairs (all pairs when empty).
    ///
    /// Names are matched case-insensitively; unknown or unresolved pairs are omitted.
    fn get_prices(&self, requested: &[String]) -> Vec<PriceEntry>;

    /// Current cache health.
    fn status(&self) -> ServiceStatus;
}

/// Implementation of PriceService over a [`PriceCache`].
pub struct PriceServiceImpl {
    cache: PriceCache,
    spawner: Arc<dyn RefreshSpawner>,
    staleness_threshold: Duration,
    metrics: Metrics,
}

impl PriceServiceImpl {
    pub fn new(
        cache: PriceCache,
        spawner: Arc<dyn RefreshSpawner>,
        staleness_threshold: Duration,
    ) -> Self {
        Self {
            cache,
            spawner,
            staleness_threshold,
            metrics: Metrics::new(),
        }
    }

    /// Report counters from a shared metrics collector in [`status`](PriceService::status).
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }
}

impl PriceService for PriceServiceImpl {
    fn get_prices(&self, requested: &[String]) -> Vec<PriceEntry> {
        let prices = self.cache.snapshot(requested);

        // Checked after the snapshot so the response never depends on the refresh
        if self.cache.is_stale(self.staleness_threshold) && !self.cache.is_refresh_in_flight() {
            tracing::debug!("Cache is stale, requesting background refresh");
            self.spawner.spawn_refresh();
        }

        prices
    }

    fn status(&self) -> ServiceStatus {
        ServiceStatus {
            last_refresh: self.cache.last_refresh_at(),
            stale: self.cache.is_stale(self.staleness_threshold),
            refresh_in_flight: self.cache.is_refresh_in_flight(),
            cached_pairs: self.cache.len(),
            metrics: self.metrics.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSpawner {
        spawned: AtomicUsize,
    }

    impl RefreshSpawner for CountingSpawner {
        fn spawn_refresh(&self) {
            self.spawned.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn service(cache: &PriceCache) -> (PriceServiceImpl, Arc<CountingSpawner>) {
        let spawner = Arc::new(CountingSpawner::default());
        let service =
            PriceServiceImpl::new(cache.clone(), spawner.clone(), Duration::from_secs(60));
        (service, spawner)
    }

    #[test]
    fn test_fresh_cache_does_not_spawn() {
        let cache = PriceCache::new();
        cache.upsert("BTC/USD", 52000.12);
        cache.mark_refresh_attempted();
        let (service, spawner) = service(&cache);

        let prices = service.get_prices(&["btc/usd".to_string()]);

        assert_eq!(prices, vec![PriceEntry::new("BTC/USD", 52000.12)]);
        assert_eq!(spawner.spawned.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stale_cache_spawns_and_still_answers() {
        let cache = PriceCache::new();
        cache.upsert("BTC/EUR", 50000.12);
        let (service, spawner) = service(&cache);

        let prices = service.get_prices(&[]);

        assert_eq!(prices, vec![PriceEntry::new("BTC/EUR", 50000.12)]);
        assert_eq!(spawner.spawned.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_no_spawn_while_refresh_in_flight() {
        let cache = PriceCache::new();
        assert!(cache.try_begin_refresh());
        let (service, spawner) = service(&cache);

        assert!(service.get_prices(&[]).is_empty());
        assert_eq!(spawner.spawned.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_status() {
        let cache = PriceCache::new();
        let (service, _) = service(&cache);

        let status = service.status();
        assert!(status.stale);
        assert!(status.last_refresh.is_none());
        assert_eq!(status.cached_pairs, 0);

        cache.upsert("BTC/USD", 1.0);
        cache.mark_refresh_attempted();
        let status = service.status();
        assert!(!status.stale);
        assert!(status.last_refresh.is_some());
        assert_eq!(status.cached_pairs, 1);
    }
}

//! Basic metrics instrumentation for tracking upstream and refresh activity.
//!
//! Provides counters and duration tracking for upstream HTTP calls and refresh cycles.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector shared by the ticker client and the refresh engine.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of upstream HTTP requests made
    http_requests_total: Arc<AtomicU64>,

    /// Total number of upstream HTTP errors
    http_errors_total: Arc<AtomicU64>,

    /// Total duration of all upstream requests in milliseconds
    http_duration_total_ms: Arc<AtomicU64>,

    /// Refresh cycles that ran to completion
    refresh_cycles_total: Arc<AtomicU64>,

    /// Refresh cycles turned away because another was in flight
    refresh_cycles_skipped: Arc<AtomicU64>,

    /// Refresh cycles that had to fall back to per-pair requests
    fallback_cycles_total: Arc<AtomicU64>,

    /// Pair prices written into the cache
    pairs_resolved_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            http_requests_total: Arc::new(AtomicU64::new(0)),
            http_errors_total: Arc::new(AtomicU64::new(0)),
            http_duration_total_ms: Arc::new(AtomicU64::new(0)),
            refresh_cycles_total: Arc::new(AtomicU64::new(0)),
            refresh_cycles_skipped: Arc::new(AtomicU64::new(0)),
            fallback_cycles_total: Arc::new(AtomicU64::new(0)),
            pairs_resolved_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record an HTTP request with duration.
    pub fn record_http_request(&self, duration: Duration) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.http_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record an HTTP error.
    pub fn record_http_error(&self) {
        self.http_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed refresh cycle and how many pairs it resolved.
    pub fn record_refresh_cycle(&self, resolved: usize, used_fallback: bool) {
        self.refresh_cycles_total.fetch_add(1, Ordering::Relaxed);
        self.pairs_resolved_total
            .fetch_add(resolved as u64, Ordering::Relaxed);
        if used_fallback {
            self.fallback_cycles_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a refresh cycle that lost the admission race.
    pub fn record_refresh_skipped(&self) {
        self.refresh_cycles_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn http_requests_total(&self) -> u64 {
        self.http_requests_total.load(Ordering::Relaxed)
    }

    pub fn http_errors_total(&self) -> u64 {
        self.http_errors_total.load(Ordering::Relaxed)
    }

    pub fn http_duration_total_ms(&self) -> u64 {
        self.http_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average HTTP request duration in milliseconds.
    pub fn http_duration_avg_ms(&self) -> f64 {
        let total = self.http_duration_total_ms.load(Ordering::Relaxed);
        let count = self.http_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    pub fn refresh_cycles_total(&self) -> u64 {
        self.refresh_cycles_total.load(Ordering::Relaxed)
    }

    pub fn refresh_cycles_skipped(&self) -> u64 {
        self.refresh_cycles_skipped.load(Ordering::Relaxed)
    }

    pub fn fallback_cycles_total(&self) -> u64 {
        self.fallback_cycles_total.load(Ordering::Relaxed)
    }

    pub fn pairs_resolved_total(&self) -> u64 {
        self.pairs_resolved_total.load(Ordering::Relaxed)
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            http_requests_total: self.http_requests_total(),
            http_errors_total: self.http_errors_total(),
            http_duration_total_ms: self.http_duration_total_ms(),
            http_duration_avg_ms: self.http_duration_avg_ms(),
            refresh_cycles_total: self.refresh_cycles_total(),
            refresh_cycles_skipped: self.refresh_cycles_skipped(),
            fallback_cycles_total: self.fallback_cycles_total(),
            pairs_resolved_total: self.pairs_resolved_total(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub http_duration_total_ms: u64,
    pub http_duration_avg_ms: f64,
    pub refresh_cycles_total: u64,
    pub refresh_cycles_skipped: u64,
    pub fallback_cycles_total: u64,
    pub pairs_resolved_total: u64,
}

/// Helper for timing HTTP requests.
pub struct HttpTimer {
    start: Instant,
    metrics: Metrics,
}

impl HttpTimer {
    /// Start timing an HTTP request.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the duration.
    pub fn complete(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
    }

    /// Complete the timing and record as an error.
    pub fn complete_with_error(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
        self.metrics.record_http_error();
    }
}

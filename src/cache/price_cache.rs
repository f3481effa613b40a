//! Concurrency-safe store for the latest price of each supported pair.
//!
//! All state sits behind one `RwLock`. Readers share it, writers are exclusive,
//! and no lock is ever held across network I/O, so a read never waits on a refresh.

use crate::models::{find_pair, PriceEntry, SupportedPair, SUPPORTED_PAIRS};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<&'static str, PriceEntry>,
    /// Monotonic time of the last refresh attempt; `None` before the first one
    last_refresh: Option<Instant>,
    /// Wall-clock twin of `last_refresh`, for reporting only
    last_refresh_at: Option<DateTime<Utc>>,
    refresh_in_flight: bool,
}

/// Shared handle to the price state.
///
/// Cloning is cheap and every clone sees the same entries (uses Arc internally),
/// so the read path and the refresh engine hold their own handles.
#[derive(Clone)]
pub struct PriceCache {
    state: Arc<RwLock<CacheState>>,
    pairs: &'static [SupportedPair],
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceCache {
    /// Create an empty cache over the built-in pair set.
    pub fn new() -> Self {
        Self::with_pairs(SUPPORTED_PAIRS)
    }

    /// Create an empty cache over a custom pair set.
    pub fn with_pairs(pairs: &'static [SupportedPair]) -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState::default())),
            pairs,
        }
    }

    pub fn supported_pairs(&self) -> &'static [SupportedPair] {
        self.pairs
    }

    // A writer that panicked cannot leave an entry half-written (entries are
    // replaced whole), so a poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the cached entries for the requested pairs.
    ///
    /// An empty request means every supported pair. Unsupported names and pairs
    /// without a cached price are skipped; duplicates are returned once, in
    /// first-requested order.
    pub fn snapshot<S: AsRef<str>>(&self, requested: &[S]) -> Vec<PriceEntry> {
        let wanted: Vec<&'static str> = if requested.is_empty() {
            self.pairs.iter().map(|pair| pair.display).collect()
        } else {
            let mut seen = HashSet::new();
            requested
                .iter()
                .filter_map(|name| find_pair(self.pairs, name.as_ref()))
                .map(|pair| pair.display)
                .filter(|display| seen.insert(*display))
                .collect()
        };

        let state = self.read();
        wanted
            .into_iter()
            .filter_map(|display| state.entries.get(display).cloned())
            .collect()
    }

    /// True if the last refresh attempt is older than `threshold`, or there has been none.
    pub fn is_stale(&self, threshold: Duration) -> bool {
        match self.read().last_refresh {
            Some(at) => at.elapsed() > threshold,
            None => true,
        }
    }

    /// Claim the right to run a refresh.
    ///
    /// Returns `false` without side effects if a refresh is already in flight.
    /// Every `true` must be paired with exactly one [`end_refresh`](Self::end_refresh).
    pub fn try_begin_refresh(&self) -> bool {
        let mut state = self.write();
        if state.refresh_in_flight {
            return false;
        }
        state.refresh_in_flight = true;
        true
    }

    /// Release the refresh claim taken by [`try_begin_refresh`](Self::try_begin_refresh).
    pub fn end_refresh(&self) {
        self.write().refresh_in_flight = false;
    }

    pub fn is_refresh_in_flight(&self) -> bool {
        self.read().refresh_in_flight
    }

    /// Insert or replace the price for one pair.
    ///
    /// Returns `false` (and stores nothing) if `display_name` is not a supported pair.
    pub fn upsert(&self, display_name: &str, amount: f64) -> bool {
        let Some(pair) = find_pair(self.pairs, display_name) else {
            tracing::warn!(pair = %display_name, "Refusing to cache unsupported pair");
            return false;
        };

        let entry = PriceEntry::new(pair.display, amount);
        self.write().entries.insert(pair.display, entry);
        true
    }

    /// Reset the staleness clock.
    ///
    /// Called once per refresh cycle whatever its outcome, so `is_stale` tracks
    /// the freshness of the last attempt, not of the cached prices.
    pub fn mark_refresh_attempted(&self) {
        let mut state = self.write();
        state.last_refresh = Some(Instant::now());
        state.last_refresh_at = Some(Utc::now());
    }

    /// Wall-clock time of the last refresh attempt.
    pub fn last_refresh_at(&self) -> Option<DateTime<Utc>> {
        self.read().last_refresh_at
    }

    /// Number of pairs that currently have a price.
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for PriceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("PriceCache")
            .field("entries", &state.entries.len())
            .field("last_refresh_at", &state.last_refresh_at)
            .field("refresh_in_flight", &state.refresh_in_flight)
            .finish()
    }
}

//! The two ways a refresh gets started: a fixed-period tick and a detached
//! spawn requested by a read that found the cache stale.

use super::engine::RefreshEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Run a refresh cycle every `period`, starting one period from now.
///
/// The task runs until aborted. Cycles that overlap with a read-triggered
/// refresh simply lose the admission race and are skipped.
pub fn spawn_periodic_refresh(engine: Arc<RefreshEngine>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let outcome = engine.run_refresh_cycle().await;
            tracing::debug!(?outcome, "Periodic refresh tick");
        }
    })
}

/// Fire-and-forget refresh trigger used by the read path.
///
/// Implementations must return without waiting for the refresh.
pub trait RefreshSpawner: Send + Sync {
    fn spawn_refresh(&self);
}

/// Spawns detached refresh cycles onto a tokio runtime.
///
/// Holds a runtime [`Handle`] so it can be called from threads outside the
/// runtime, such as the blocking HTTP server loop.
#[derive(Clone)]
pub struct TokioRefreshSpawner {
    engine: Arc<RefreshEngine>,
    runtime: Handle,
}

impl TokioRefreshSpawner {
    pub fn new(engine: Arc<RefreshEngine>, runtime: Handle) -> Self {
        Self { engine, runtime }
    }

    /// Build a spawner on the runtime of the calling task.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn current(engine: Arc<RefreshEngine>) -> Self {
        Self::new(engine, Handle::current())
    }
}

impl RefreshSpawner for TokioRefreshSpawner {
    fn spawn_refresh(&self) {
        let engine = self.engine.clone();
        // Detached; the cycle absorbs and logs its own errors
        self.runtime.spawn(async move {
            engine.run_refresh_cycle().await;
        });
    }
}

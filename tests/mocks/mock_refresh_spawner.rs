use ltp_service::RefreshSpawner;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Spawner that only counts how often a refresh was requested.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockRefreshSpawner {
    spawned: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockRefreshSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_count(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }
}

impl RefreshSpawner for MockRefreshSpawner {
    fn spawn_refresh(&self) {
        self.spawned.fetch_add(1, Ordering::SeqCst);
    }
}

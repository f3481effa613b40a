//! Cache population from the upstream ticker API.
//!
//! - **engine**: one refresh cycle (batch fetch, per-pair fallback, completion)
//! - **backoff**: retry schedule with exponential backoff and jitter
//! - **keys**: upstream symbol spellings for a pair
//! - **scheduler**: periodic ticks and read-triggered detached refreshes

pub mod backoff;
pub mod engine;
pub mod keys;
pub mod scheduler;

pub use backoff::RetryPolicy;
pub use engine::{RefreshEngine, RefreshOutcome, RefreshPath};
pub use keys::{find_ticker, resolve_upstream_key};
pub use scheduler::{spawn_periodic_refresh, RefreshSpawner, TokioRefreshSpawner};

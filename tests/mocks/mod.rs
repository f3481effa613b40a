//! Hand-written test doubles shared by the integration tests.

pub mod mock_refresh_spawner;
pub mod mock_ticker_source;

#[allow(unused_imports)]
pub use mock_refresh_spawner::MockRefreshSpawner;
#[allow(unused_imports)]
pub use mock_ticker_source::{ticker_response, MockTickerSource};

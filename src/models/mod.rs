//! Data models for pairs, cached prices, and upstream ticker payloads.

pub mod pair;
pub mod price;
pub mod ticker;

pub use pair::{find_pair, SupportedPair, SUPPORTED_PAIRS};
pub use price::{LtpResponse, PriceEntry};
pub use ticker::{TickerInfo, TickerResponse};

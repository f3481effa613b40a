//! Price cache shared by the read path and the refresh engine.

pub mod price_cache;

pub use price_cache::PriceCache;

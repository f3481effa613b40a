//! The fixed set of currency pairs the service quotes.

use serde::Serialize;

/// A currency pair as the upstream names it and as clients see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SupportedPair {
    /// Upstream base asset code (e.g. "XBT", not "BTC")
    pub base: &'static str,

    /// Upstream quote asset code
    pub quote: &'static str,

    /// Client-facing name, also the cache key (e.g. "BTC/USD")
    pub display: &'static str,
}

impl SupportedPair {
    pub const fn new(base: &'static str, quote: &'static str, display: &'static str) -> Self {
        Self {
            base,
            quote,
            display,
        }
    }
}

/// Every pair the service knows about. Nothing outside this list is ever cached.
pub const SUPPORTED_PAIRS: &[SupportedPair] = &[
    SupportedPair::new("XBT", "USD", "BTC/USD"),
    SupportedPair::new("XBT", "CHF", "BTC/CHF"),
    SupportedPair::new("XBT", "EUR", "BTC/EUR"),
];

/// Look up a pair by display name, ignoring case and surrounding whitespace.
pub fn find_pair<'a>(pairs: &'a [SupportedPair], display: &str) -> Option<&'a SupportedPair> {
    let wanted = display.trim();
    pairs
        .iter()
        .find(|pair| pair.display.eq_ignore_ascii_case(wanted))
}

//! Upstream symbol naming.
//!
//! The upstream answers for a pair under either the plain `BASEQUOTE` symbol or a
//! class-marked `XBASEZQUOTE` one (e.g. `XBTUSD` vs `XXBTZUSD`), depending on the
//! asset. Lookups must accept both.

use crate::models::{SupportedPair, TickerInfo, TickerResponse};

/// Candidate result keys for a pair, in probe order.
///
/// The first candidate is also the symbol used when requesting the pair.
pub fn resolve_upstream_key(pair: &SupportedPair) -> [String; 2] {
    [
        format!("{}{}", pair.base, pair.quote),
        format!("X{}Z{}", pair.base, pair.quote),
    ]
}

/// Symbol to put in the request for a pair.
pub fn request_symbol(pair: &SupportedPair) -> String {
    let [plain, _] = resolve_upstream_key(pair);
    plain
}

/// Find a pair's ticker in a response under whichever key spelling is present.
pub fn find_ticker<'a>(response: &'a TickerResponse, pair: &SupportedPair) -> Option<&'a TickerInfo> {
    resolve_upstream_key(pair)
        .iter()
        .find_map(|key| response.result.get(key))
}

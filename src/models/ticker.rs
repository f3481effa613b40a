//! Wire types for the upstream ticker API.

use serde::Deserialize;
use std::collections::HashMap;

/// Top-level ticker response: `{"error": [...], "result": {symbol: {...}}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TickerResponse {
    /// Application-level errors; non-empty means the call failed
    #[serde(default)]
    pub error: Vec<String>,

    /// Ticker data keyed by upstream symbol
    #[serde(default)]
    pub result: HashMap<String, TickerInfo>,
}

/// Ticker data for one upstream symbol. Only the last trade is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TickerInfo {
    /// Last trade closed: `[price, lot volume]`
    #[serde(default)]
    pub c: Vec<String>,
}

impl TickerInfo {
    /// Parse the last trade price (`c[0]`).
    ///
    /// Returns `None` when the field is absent, not a number, or not finite.
    pub fn last_trade_price(&self) -> Option<f64> {
        let raw = self.c.first()?;
        let price = raw.trim().parse::<f64>().ok()?;
        price.is_finite().then_some(price)
    }
}

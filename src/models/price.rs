//! Cached price entries and the client-facing response shape.

use serde::{Deserialize, Serialize};

/// The last traded price for one pair.
///
/// Always replaced as a whole in the cache, never field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    /// Display name of the pair (e.g. "BTC/USD")
    pub pair: String,

    /// Last traded price
    pub amount: f64,
}

impl PriceEntry {
    pub fn new(pair: impl Into<String>, amount: f64) -> Self {
        Self {
            pair: pair.into(),
            amount,
        }
    }
}

/// Body of `GET /api/v1/ltp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LtpResponse {
    pub ltp: Vec<PriceEntry>,
}

//! Application service layer.
//!
//! Services sit between the HTTP handlers and the price cache.

mod price_service;

pub use price_service::{PriceService, PriceServiceImpl, ServiceStatus};

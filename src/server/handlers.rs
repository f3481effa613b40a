//! Request routing for the HTTP front end.
//!
//! Routing is a pure function of method, URL, and service so it can be tested
//! without opening sockets.

use crate::models::LtpResponse;
use crate::services::PriceService;
use serde::Serialize;
use tiny_http::Method;

pub const LTP_PATH: &str = "/api/v1/ltp";
pub const HEALTH_PATH: &str = "/health";

/// Status code and JSON body to send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_string(value).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to serialize response");
            "{}".to_string()
        });
        Self { status, body }
    }

    fn error(status: u16, message: &str) -> Self {
        Self::json(status, &serde_json::json!({ "error": message }))
    }
}

/// Dispatch one request.
pub fn route(method: &Method, url: &str, service: &dyn PriceService) -> HttpReply {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    };

    match path {
        LTP_PATH | HEALTH_PATH if *method != Method::Get => {
            HttpReply::error(405, "Method not allowed")
        }
        LTP_PATH => handle_ltp(query, service),
        HEALTH_PATH => HttpReply::json(200, &service.status()),
        _ => HttpReply::error(404, "Not found"),
    }
}

fn handle_ltp(query: &str, service: &dyn PriceService) -> HttpReply {
    let requested = requested_pairs(query);
    let ltp = service.get_prices(&requested);
    HttpReply::json(200, &LtpResponse { ltp })
}

/// Collect every `pair` query value, percent-decoded and upper-cased.
pub fn requested_pairs(query: &str) -> Vec<String> {
    query
        .split('&')
        .filter_map(|param| {
            let (key, value) = param.split_once('=').unwrap_or((param, ""));
            (key == "pair").then_some(value)
        })
        .map(|value| {
            let value = value.replace('+', " ");
            urlencoding::decode(&value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or(value)
                .to_uppercase()
        })
        .collect()
}

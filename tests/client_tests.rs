//! Integration tests for the TickerClient using mockito for HTTP mocking.

use ltp_service::{TickerApiError, TickerClient};
use mockito::{Matcher, Server};

fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_fetch_ticker_batch() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/Ticker")
        .match_query(Matcher::UrlEncoded(
            "pair".into(),
            "XBTUSD,XBTCHF,XBTEUR".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
            "error": [],
            "result": {
                "XXBTZUSD": {"c": ["52000.12", "0.001"]},
                "XBTCHF": {"c": ["49000.12", "0.5"]},
                "XXBTZEUR": {"c": ["50000.12", "0.2"]}
            }
        }"#,
        )
        .create();

    let client = TickerClient::with_base_url(server.url());
    let response = client
        .fetch_ticker(&symbols(&["XBTUSD", "XBTCHF", "XBTEUR"]))
        .unwrap();

    mock.assert();
    assert_eq!(response.result.len(), 3);
    assert_eq!(
        response.result["XXBTZUSD"].last_trade_price(),
        Some(52000.12)
    );
    assert_eq!(client.metrics().http_requests_total(), 1);
    assert_eq!(client.metrics().http_errors_total(), 0);
}

#[test]
fn test_fetch_ticker_single_pair() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/Ticker")
        .match_query(Matcher::UrlEncoded("pair".into(), "XBTEUR".into()))
        .with_status(200)
        .with_body(r#"{"error": [], "result": {"XXBTZEUR": {"c": ["50000.12", "1.0"]}}}"#)
        .create();

    let client = TickerClient::with_base_url(format!("{}/", server.url()));
    let response = client.fetch_ticker(&symbols(&["XBTEUR"])).unwrap();

    mock.assert();
    assert!(response.result.contains_key("XXBTZEUR"));
}

#[test]
fn test_fetch_ticker_upstream_error_list() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/Ticker")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"error": ["EGeneral:Too many requests"], "result": {}}"#)
        .create();

    let client = TickerClient::with_base_url(server.url());
    let result = client.fetch_ticker(&symbols(&["XBTUSD"]));

    mock.assert();
    match result {
        Err(TickerApiError::Upstream(errors)) => {
            assert_eq!(errors, vec!["EGeneral:Too many requests"]);
        }
        other => panic!("Expected Upstream error, got: {:?}", other),
    }
    assert_eq!(client.metrics().http_errors_total(), 1);
}

#[test]
fn test_fetch_ticker_server_error() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/Ticker")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("Service Unavailable")
        .create();

    let client = TickerClient::with_base_url(server.url());
    let result = client.fetch_ticker(&symbols(&["XBTUSD"]));

    mock.assert();
    match result {
        Err(TickerApiError::ApiError { status, message }) => {
            assert_eq!(status, 503);
            assert!(message.contains("Unavailable"));
        }
        other => panic!("Expected ApiError, got: {:?}", other),
    }
}

#[test]
fn test_fetch_ticker_malformed_json() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/Ticker")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create();

    let client = TickerClient::with_base_url(server.url());
    let result = client.fetch_ticker(&symbols(&["XBTUSD"]));

    mock.assert();
    match result {
        Err(e @ TickerApiError::JsonError(_)) => assert!(!e.is_retryable()),
        other => panic!("Expected JsonError, got: {:?}", other),
    }
}

#[test]
fn test_fetch_ticker_connection_refused() {
    // Nothing listens on port 1
    let client = TickerClient::with_base_url("http://127.0.0.1:1".to_string());
    let result = client.fetch_ticker(&symbols(&["XBTUSD"]));

    let err = result.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(client.metrics().http_errors_total(), 1);
}

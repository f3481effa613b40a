//! Error types for the LTP service.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use thiserror::Error;

/// Errors that can occur when talking to the upstream ticker API.
#[derive(Error, Debug)]
pub enum TickerApiError {
    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Upstream returned a non-success status code
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Upstream answered but reported application-level errors
    #[error("Upstream reported errors: {}", .0.join(", "))]
    Upstream(Vec<String>),

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network timeout
    #[error("Request timeout")]
    Timeout,

    /// Generic error with context
    #[error("Ticker API error: {0}")]
    Other(String),
}

impl TickerApiError {
    /// Whether another attempt within the same refresh cycle may succeed.
    ///
    /// A body that does not decode will not decode on the next try either.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TickerApiError::JsonError(_))
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Errors raised by the HTTP front end.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Could not bind the listening socket
    #[error("Failed to bind {0}")]
    Bind(String),
}

/// Convenience type alias for Results with TickerApiError
pub type TickerApiResult<T> = Result<T, TickerApiError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TickerApiError::Timeout;
        assert_eq!(err.to_string(), "Request timeout");

        let err = TickerApiError::Upstream(vec![
            "EQuery:Unknown asset pair".to_string(),
            "EGeneral:Too many requests".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Upstream reported errors: EQuery:Unknown asset pair, EGeneral:Too many requests"
        );

        let err = ConfigError::InvalidValue {
            var: "MAX_RETRIES".to_string(),
            reason: "Must be at least 1".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value for MAX_RETRIES: Must be at least 1");

        let err = ServerError::Bind("0.0.0.0:8080".to_string());
        assert_eq!(err.to_string(), "Failed to bind 0.0.0.0:8080");
    }

    #[test]
    fn test_api_error_variants() {
        let err = TickerApiError::ApiError {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("Service Unavailable"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(TickerApiError::Timeout.is_retryable());
        assert!(TickerApiError::HttpError("Connection failed".into()).is_retryable());
        assert!(TickerApiError::Upstream(vec!["EService:Unavailable".into()]).is_retryable());
        assert!(TickerApiError::ApiError {
            status: 502,
            message: String::new()
        }
        .is_retryable());

        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(!TickerApiError::JsonError(json_err).is_retryable());
    }
}

//! WMATA error envelope

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Uniform `{statusCode, message}` error shape reported by the WMATA client
///
/// The API itself reports failures in this shape. Failures that did not come
/// from the API carry [`WmataError::NO_STATUS`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{message} (status {status_code})")]
pub struct WmataError {
    /// API status code, or `0` when no API status is available
    pub status_code: i64,
    /// Human-readable failure description
    pub message: String,
}

impl WmataError {
    /// Sentinel status code for failures that did not originate from the API
    pub const NO_STATUS: i64 = 0;

    /// Create an envelope from a known status code and message
    pub fn from_status(status_code: i64, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    /// Adapt an arbitrary failure, keeping only its description
    pub fn adapt(failure: &(dyn std::error::Error + '_)) -> Self {
        Self::from_status(Self::NO_STATUS, failure.to_string())
    }

    /// Whether the envelope carries a status reported by the API
    #[must_use]
    pub const fn is_api_error(&self) -> bool {
        self.status_code != Self::NO_STATUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("timed out")]
    struct TimedOut;

    #[test]
    fn from_status_passes_through() {
        let err = WmataError::from_status(404, "not found");
        assert_eq!(err.status_code, 404);
        assert_eq!(err.message, "not found");
        assert!(err.is_api_error());
    }

    #[test]
    fn adapt_uses_sentinel_and_description() {
        let err = WmataError::adapt(&TimedOut);
        assert_eq!(err, WmataError::from_status(0, "timed out"));
        assert!(!err.is_api_error());
    }

    #[test]
    fn adapt_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = WmataError::adapt(&io);
        assert_eq!(err.status_code, WmataError::NO_STATUS);
        assert_eq!(err.message, "connection refused");
    }

    #[test]
    fn uses_upstream_field_names() {
        let err = WmataError::from_status(401, "Access denied due to invalid subscription key.");
        let json = serde_json::to_value(&err).expect("serialize");
        assert_eq!(json["statusCode"], 401);
        assert_eq!(json["message"], "Access denied due to invalid subscription key.");
    }

    #[test]
    fn decodes_api_error_body() {
        let body = r#"{ "statusCode": 401, "message": "Access denied due to missing subscription key." }"#;
        let err: WmataError = serde_json::from_str(body).expect("deserialize");
        assert_eq!(err.status_code, 401);
        assert!(err.message.contains("missing subscription key"));
    }

    #[test]
    fn display_includes_status() {
        let err = WmataError::from_status(429, "Rate limit is exceeded");
        assert_eq!(err.to_string(), "Rate limit is exceeded (status 429)");
    }
}

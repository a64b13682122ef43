//! WMATA client error types

use domain::WmataError;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors that can occur while talking to the WMATA API
///
/// Serializes as the flat `{statusCode, message}` envelope; see
/// [`ClientError::to_envelope`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// The response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The API reported an error
    #[error("{message}")]
    Upstream {
        /// Status code reported by the API
        status_code: i64,
        /// Message reported by the API
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Project to the flat error envelope
    ///
    /// Upstream errors keep their status code; every other variant carries
    /// [`WmataError::NO_STATUS`] and its display text.
    #[must_use]
    pub fn to_envelope(&self) -> WmataError {
        match self {
            Self::Upstream {
                status_code,
                message,
            } => WmataError::from_status(*status_code, message.clone()),
            _ => WmataError::adapt(self),
        }
    }

    /// Returns true if the failure class is one a caller may retry
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout { .. } => true,
            Self::Upstream { status_code, .. } => {
                *status_code == 429 || (500..600).contains(status_code)
            },
            Self::Decode(_) | Self::Configuration(_) => false,
        }
    }
}

impl From<ClientError> for WmataError {
    fn from(err: ClientError) -> Self {
        err.to_envelope()
    }
}

impl From<WmataError> for ClientError {
    fn from(err: WmataError) -> Self {
        Self::Upstream {
            status_code: err.status_code,
            message: err.message,
        }
    }
}

impl Serialize for ClientError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_envelope().serialize(serializer)
    }
}

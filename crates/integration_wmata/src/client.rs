//! WMATA HTTP client
//!
//! Issues GET requests against the WMATA API, appending query parameters in
//! the order they are given, and maps every failure to [`ClientError`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use domain::{QueryItems, RadiusAtCoordinates, WmataError};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::WmataConfig;
use crate::error::ClientError;

/// Request header carrying the API subscription key
pub const API_KEY_HEADER: &str = "api_key";

/// Endpoints that accept a `Lat`/`Lon`/`Radius` search area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RadiusEndpoint {
    /// Rail station entrances near a point
    StationEntrances,
    /// Bus stops near a point
    BusStops,
    /// Live bus positions near a point
    BusPositions,
}

impl RadiusEndpoint {
    /// Path relative to the API base URL
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::StationEntrances => "Rail.svc/json/jStationEntrances",
            Self::BusStops => "Bus.svc/json/jStops",
            Self::BusPositions => "Bus.svc/json/jBusPositions",
        }
    }
}

impl fmt::Display for RadiusEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Trait for WMATA transport clients
#[async_trait]
pub trait WmataClient: Send + Sync {
    /// GET `path` with the given query parameters and return the JSON body
    async fn get_raw(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<serde_json::Value, ClientError>;

    /// Query a radius endpoint around a point
    async fn get_near(
        &self,
        endpoint: RadiusEndpoint,
        area: &RadiusAtCoordinates,
    ) -> Result<serde_json::Value, ClientError> {
        self.get_raw(endpoint.path(), &area.query_items()).await
    }

    /// Check if the API is reachable
    async fn is_healthy(&self) -> bool;
}

/// reqwest-based WMATA client
#[derive(Debug)]
pub struct HttpWmataClient {
    client: Client,
    config: WmataConfig,
}

impl HttpWmataClient {
    /// Create a new WMATA client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &WmataConfig) -> Result<Self, ClientError> {
        config.validate().map_err(ClientError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// GET `path` and decode the JSON body as `T`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Upstream`] for error responses,
    /// [`ClientError::Decode`] if the body is not a valid `T`, and
    /// [`ClientError::Transport`] or [`ClientError::Timeout`] if the request
    /// did not complete.
    #[instrument(skip(self, query), fields(params = query.len()))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ClientError> {
        let body = self.fetch(path, query).await?;
        Self::decode_body(&body)
    }

    /// Issue the request and return the body of a successful response
    async fn fetch(&self, path: &str, query: &[(String, String)]) -> Result<String, ClientError> {
        let url = endpoint_url(&self.config.base_url, path);
        debug!(%url, ?query, "Sending WMATA request");

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = self.config.api_key() {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(&e))?;

        if !status.is_success() {
            let err = Self::upstream_error(status, &body);
            warn!(%status, error = %err, "WMATA request failed");
            return Err(err);
        }

        debug!(bytes = body.len(), "WMATA response received");
        Ok(body)
    }

    fn transport_error(&self, err: &reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            ClientError::Transport(err.to_string())
        }
    }

    /// Map an error response to [`ClientError::Upstream`]
    ///
    /// The API reports errors as `{statusCode, message}`, and some service
    /// endpoints as `{"Message": ...}` without a code. Anything else falls back
    /// to the HTTP status and its reason phrase.
    fn upstream_error(status: StatusCode, body: &str) -> ClientError {
        let status_code = i64::from(status.as_u16());

        if let Ok(envelope) = serde_json::from_str::<WmataError>(body) {
            if envelope.is_api_error() {
                return envelope.into();
            }
        }

        if let Ok(service) = serde_json::from_str::<ServiceFault>(body) {
            if !service.message.is_empty() {
                return ClientError::Upstream {
                    status_code,
                    message: service.message,
                };
            }
        }

        ClientError::Upstream {
            status_code,
            message: status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string(),
        }
    }

    fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
        serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl WmataClient for HttpWmataClient {
    async fn get_raw(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<serde_json::Value, ClientError> {
        self.get_json(path, query).await
    }

    async fn is_healthy(&self) -> bool {
        self.client.get(&self.config.base_url).send().await.is_ok()
    }
}

/// Error body returned by the ASP.NET service endpoints (e.g. bad parameters)
#[derive(Debug, Deserialize)]
struct ServiceFault {
    #[serde(rename = "Message")]
    message: String,
}

/// Join the base URL and a relative path with exactly one slash
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

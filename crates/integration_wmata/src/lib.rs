//! WMATA API transport
//!
//! Sends requests to the [WMATA](https://developer.wmata.com) web API with
//! query parameters produced by the domain value objects, and reports every
//! failure through one error shape.
//!
//! # Architecture
//!
//! [`WmataClient`] defines the transport interface, implemented by
//! [`HttpWmataClient`]. Failures are raised as the tagged [`ClientError`] and
//! projected to the flat [`domain::WmataError`] envelope when serialized.
//! Response bodies are returned as JSON for the caller to decode.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::RadiusAtCoordinates;
//! use integration_wmata::{HttpWmataClient, RadiusEndpoint, WmataClient, WmataConfig};
//!
//! let config = WmataConfig::default();
//! let client = HttpWmataClient::new(&config)?;
//!
//! let area = RadiusAtCoordinates::from_lat_lon(500, 38.8977, -77.0365);
//! let entrances = client.get_near(RadiusEndpoint::StationEntrances, &area).await?;
//! ```

mod client;
mod config;
mod error;

pub use client::{API_KEY_HEADER, HttpWmataClient, RadiusEndpoint, WmataClient};
pub use config::WmataConfig;
pub use error::ClientError;

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the emission monitoring service.
//!
//! The service is consumed through the [`EmissionApi`] trait so the
//! polling layer can be driven by [`HttpEmissionApi`] in production and
//! by an in-memory fake in tests.

pub mod api;
pub mod http;

use async_trait::async_trait;
use co2_monitor_emission_models::{
    AnalysisBundle, Bounds, LocationDetail, Reading, Registry, StatusMap,
};
use strum_macros::{AsRefStr, Display};

pub use api::HttpEmissionApi;

/// Errors from talking to the monitoring service.
///
/// Every variant is a transport failure: callers log it and carry on
/// with whatever they already hold.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection, timeout, or body read failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Status code received.
        status: reqwest::StatusCode,
    },

    /// The body was not the expected JSON shape.
    #[error("Could not decode response from {url}: {source}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL cannot address an endpoint.
    #[error("Invalid service URL: {message}")]
    InvalidUrl {
        /// Description of what went wrong.
        message: String,
    },
}

/// Endpoints of the monitoring service, relative to its base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Endpoint {
    /// `GET /realtime-data`
    RealtimeData,
    /// `GET /current-status`
    CurrentStatus,
    /// `GET /locations`
    Locations,
    /// `GET /rwanda-bounds`
    RwandaBounds,
    /// `GET /eda-data`
    EdaData,
    /// `GET /location-data/{id}`
    LocationData,
}

/// Read access to the monitoring service.
#[async_trait]
pub trait EmissionApi: Send + Sync {
    /// Fetches the most recent page of readings, in arrival order.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request or decoding fails.
    async fn realtime_data(&self) -> Result<Vec<Reading>, FetchError>;

    /// Fetches the current status of every station.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request or decoding fails.
    async fn current_status(&self) -> Result<StatusMap, FetchError>;

    /// Fetches the location registry.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request or decoding fails.
    async fn locations(&self) -> Result<Registry, FetchError>;

    /// Fetches the geographic bounds of the network.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request or decoding fails.
    async fn bounds(&self) -> Result<Bounds, FetchError>;

    /// Fetches the exploratory analysis bundle.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request or decoding fails.
    async fn analysis(&self) -> Result<AnalysisBundle, FetchError>;

    /// Fetches the detail bundle for one station.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request or decoding fails, including
    /// HTTP 404 for a station without readings.
    async fn location_detail(&self, location_id: &str) -> Result<LocationDetail, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths() {
        assert_eq!(Endpoint::RealtimeData.as_ref(), "realtime-data");
        assert_eq!(Endpoint::RwandaBounds.as_ref(), "rwanda-bounds");
        assert_eq!(Endpoint::LocationData.to_string(), "location-data");
        assert_eq!(Endpoint::EdaData.as_ref(), "eda-data");
    }
}

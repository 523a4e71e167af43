//! `reqwest`-backed implementation of [`EmissionApi`].

use std::time::Duration;

use async_trait::async_trait;
use co2_monitor_emission_models::{
    AnalysisBundle, Bounds, LocationDetail, Reading, RealtimePayload, Registry, StatusMap,
};
use reqwest::Url;

use crate::{EmissionApi, Endpoint, FetchError, http};

/// Monitoring service client over HTTP.
pub struct HttpEmissionApi {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpEmissionApi {
    /// Base URL of a locally running service.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:5000/api";

    /// Creates a client for the service rooted at `base_url`, failing every
    /// request that takes longer than `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `base_url` is not an absolute
    /// hierarchical URL, or [`FetchError::Http`] if the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let parsed = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl {
            message: format!("{base_url}: {e}"),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl {
                message: format!("{base_url}: not a hierarchical URL"),
            });
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: parsed,
            client,
        })
    }

    /// Base URL all endpoints are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `endpoint` (and an optional location identity path
    /// segment, percent-encoded) against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the base URL cannot take path
    /// segments.
    pub fn endpoint_url(
        &self,
        endpoint: Endpoint,
        location_id: Option<&str>,
    ) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| FetchError::InvalidUrl {
                message: format!("{}: cannot append path segments", self.base_url),
            })?;
            segments.pop_if_empty().push(endpoint.as_ref());
            if let Some(id) = location_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, FetchError> {
        let url = self.endpoint_url(endpoint, None)?;
        http::get_json(&self.client, url).await
    }
}

#[async_trait]
impl EmissionApi for HttpEmissionApi {
    async fn realtime_data(&self) -> Result<Vec<Reading>, FetchError> {
        let payload: RealtimePayload = self.get(Endpoint::RealtimeData).await?;
        Ok(payload.into_readings())
    }

    async fn current_status(&self) -> Result<StatusMap, FetchError> {
        self.get(Endpoint::CurrentStatus).await
    }

    async fn locations(&self) -> Result<Registry, FetchError> {
        self.get(Endpoint::Locations).await
    }

    async fn bounds(&self) -> Result<Bounds, FetchError> {
        self.get(Endpoint::RwandaBounds).await
    }

    async fn analysis(&self) -> Result<AnalysisBundle, FetchError> {
        self.get(Endpoint::EdaData).await
    }

    async fn location_detail(&self, location_id: &str) -> Result<LocationDetail, FetchError> {
        let url = self.endpoint_url(Endpoint::LocationData, Some(location_id))?;
        http::get_json(&self.client, url).await
    }
}

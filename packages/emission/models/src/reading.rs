//! Raw emission readings from the real-time feed.

use serde::{Deserialize, Serialize};

use crate::{GasLevels, GeoPoint, LocationType, Timestamp};

/// One observation for one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Identity of the station this reading belongs to.
    #[serde(default)]
    pub location_name: String,
    /// When the observation was taken.
    pub timestamp: Timestamp,
    /// Predicted CO₂ emission; `None` when the service sent `null`.
    #[serde(default)]
    pub emission: Option<f64>,
    /// Gas densities at observation time.
    #[serde(default)]
    pub gas_levels: Option<GasLevels>,
    /// Station position.
    #[serde(default)]
    pub location: Option<GeoPoint>,
    /// Region display name.
    #[serde(default)]
    pub region: Option<String>,
    /// Land-use classification.
    #[serde(default)]
    pub location_type: Option<LocationType>,
    /// Provenance tag.
    #[serde(default)]
    pub source: Option<String>,
    /// `good` or `anomaly_detected`.
    #[serde(default)]
    pub data_quality: Option<String>,
    /// CO₂-equivalent of the measured gases.
    #[serde(default)]
    pub co2_equivalent: Option<f64>,
}

impl Reading {
    /// Creates a reading carrying only its station, time, and emission.
    #[must_use]
    pub const fn new(location_name: String, timestamp: Timestamp, emission: Option<f64>) -> Self {
        Self {
            location_name,
            timestamp,
            emission,
            gas_levels: None,
            location: None,
            region: None,
            location_type: None,
            source: None,
            data_quality: None,
            co2_equivalent: None,
        }
    }

    /// Emission value with a missing emission counted as zero.
    #[must_use]
    pub fn emission_or_zero(&self) -> f64 {
        self.emission.unwrap_or(0.0)
    }
}

/// Time span covered by a page of readings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    /// First reading in the page.
    #[serde(default)]
    pub start: Option<Timestamp>,
    /// Last reading in the page.
    #[serde(default)]
    pub end: Option<Timestamp>,
}

/// Body of `GET /realtime-data`.
///
/// The service wraps the page in an object, older deployments return the
/// bare list. Both are accepted; an object without `data` is an empty page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RealtimePayload {
    /// A bare list of readings.
    Bare(Vec<Reading>),
    /// The wrapped form.
    Wrapped {
        /// Readings in arrival order.
        #[serde(default)]
        data: Vec<Reading>,
        /// Number of readings in `data`.
        #[serde(default)]
        total_points: Option<u64>,
        /// Span covered by `data`.
        #[serde(default)]
        time_range: Option<TimeRange>,
    },
}

impl RealtimePayload {
    /// Unwraps the readings page in arrival order.
    #[must_use]
    pub fn into_readings(self) -> Vec<Reading> {
        match self {
            Self::Bare(data) | Self::Wrapped { data, .. } => data,
        }
    }
}

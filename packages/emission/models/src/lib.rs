#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Monitoring station and emission reading types.
//!
//! These types mirror the JSON contract of the emission monitoring
//! service. Every optional or loosely-typed field the service may omit is
//! modeled as `Option` or defaulted so that a partially populated payload
//! still deserializes; projections decide how to treat the gaps.

pub mod analysis;
pub mod detail;
pub mod reading;
pub mod snapshot;
pub mod timestamp;

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use analysis::{AnalysisBundle, CorrelationData, LocationSummary, TrendPoint};
pub use detail::{DetailStatistics, LocationDetail, Trends};
pub use reading::{Reading, RealtimePayload};
pub use snapshot::{Selection, Snapshot};
pub use timestamp::Timestamp;

/// Location registry keyed by location identity.
///
/// Iteration order is key order, which is also the order the service
/// serializes its mappings in.
pub type Registry = BTreeMap<String, Location>;

/// Current status keyed by location identity.
pub type StatusMap = BTreeMap<String, CurrentStatus>;

/// Emission status level assigned by the service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusLevel {
    /// Emission at or below 50.
    Low,
    /// Emission above 50 and at most 100.
    Medium,
    /// Emission above 100.
    High,
}

impl StatusLevel {
    /// Classifies an emission value using the service thresholds.
    #[must_use]
    pub fn classify(emission: f64) -> Self {
        if emission > 100.0 {
            Self::High
        } else if emission > 50.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Returns the alert level (1-3) paired with this status.
    #[must_use]
    pub const fn alert_level(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Returns the display color paired with this status.
    #[must_use]
    pub const fn color(self) -> StatusColor {
        match self {
            Self::Low => StatusColor::Green,
            Self::Medium => StatusColor::Orange,
            Self::High => StatusColor::Red,
        }
    }
}

/// Display color derived from a [`StatusLevel`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatusColor {
    /// Low status.
    Green,
    /// Medium status.
    Orange,
    /// High status.
    Red,
}

impl StatusColor {
    /// Hex color used for this status in rendered output.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Green => "#22c55e",
            Self::Orange => "#f97316",
            Self::Red => "#ef4444",
        }
    }
}

/// Land-use classification of a monitoring station.
///
/// Unrecognized classifications are kept verbatim in [`LocationType::Other`]
/// so they survive an export unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LocationType {
    /// Industrial zone.
    Industrial,
    /// Urban area.
    Urban,
    /// Lakeshore station.
    Coastal,
    /// Any other classification, as reported.
    Other(String),
}

impl LocationType {
    /// The three classifications the service assigns itself.
    pub const KNOWN: [Self; 3] = [Self::Industrial, Self::Urban, Self::Coastal];

    /// Returns the wire representation of this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Industrial => "industrial",
            Self::Urban => "urban",
            Self::Coastal => "coastal",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for LocationType {
    fn default() -> Self {
        Self::Other("unknown".to_string())
    }
}

impl FromStr for LocationType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "industrial" => Self::Industrial,
            "urban" => Self::Urban,
            "coastal" => Self::Coastal,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl From<String> for LocationType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(parsed) => parsed,
            Err(never) => match never {},
        }
    }
}

impl From<LocationType> for String {
    fn from(value: LocationType) -> Self {
        match value {
            LocationType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recency of a status entry relative to the service clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DataFreshness {
    /// Under 30 seconds old.
    Fresh,
    /// Under five minutes old.
    Stale,
    /// Five minutes or older.
    VeryStale,
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether this point carries no usable fix.
    ///
    /// A zero on either axis is the service's "unknown" marker, never a
    /// real station position.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_sentinel(&self) -> bool {
        self.lat == 0.0 || self.lon == 0.0
    }
}

/// Pollutant gas column densities (mol/m² fractions as reported).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GasLevels {
    /// Sulphur dioxide.
    #[serde(rename = "SO2", default)]
    pub so2: f64,
    /// Nitrogen dioxide.
    #[serde(rename = "NO2", default)]
    pub no2: f64,
    /// Carbon monoxide.
    #[serde(rename = "CO", default)]
    pub co: f64,
}

/// A monitoring station from the location registry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Latitude.
    #[serde(default)]
    pub lat: f64,
    /// Longitude.
    #[serde(default)]
    pub lon: f64,
    /// Land-use classification.
    #[serde(rename = "type", default)]
    pub location_type: LocationType,
    /// Display name of the region.
    #[serde(default)]
    pub region: String,
    /// Provenance tag (e.g. `train`, `test`, `both`, `fallback`).
    #[serde(default)]
    pub source: String,
    /// Any further fields the service attaches (`data_points`,
    /// `last_update`, ...), kept so exports reproduce the registry entry.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Location {
    /// Position of this station.
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// The latest status of one monitoring station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentStatus {
    /// Latest emission value.
    #[serde(default)]
    pub emission: f64,
    /// Status level derived from the emission.
    pub status: StatusLevel,
    /// Display color derived from the status.
    pub color: StatusColor,
    /// Gas densities of the latest reading.
    #[serde(default)]
    pub gas_levels: GasLevels,
    /// Position of the station, when known.
    #[serde(default)]
    pub location: Option<GeoPoint>,
    /// Region display name.
    #[serde(default)]
    pub region: String,
    /// Land-use classification.
    #[serde(default)]
    pub location_type: LocationType,
    /// Provenance tag.
    #[serde(default)]
    pub source: String,
    /// Alert level (1-3).
    #[serde(default)]
    pub alert_level: Option<u8>,
    /// When the latest reading was taken.
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    /// Quality flag of the latest reading.
    #[serde(default)]
    pub data_quality: Option<String>,
    /// Age bucket of the latest reading.
    #[serde(default)]
    pub data_freshness: Option<DataFreshness>,
    /// Preformatted `lat, lon` string.
    #[serde(default)]
    pub coordinates_string: Option<String>,
}

impl CurrentStatus {
    /// Position of the station, with a missing position reported as the
    /// `(0, 0)` sentinel.
    #[must_use]
    pub fn point(&self) -> GeoPoint {
        self.location.unwrap_or_default()
    }
}

/// Min/max extents of the station coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateRange {
    /// Southernmost latitude.
    pub lat_min: f64,
    /// Northernmost latitude.
    pub lat_max: f64,
    /// Westernmost longitude.
    pub lon_min: f64,
    /// Easternmost longitude.
    pub lon_max: f64,
    /// Midpoint latitude.
    #[serde(default)]
    pub lat_center: Option<f64>,
    /// Midpoint longitude.
    #[serde(default)]
    pub lon_center: Option<f64>,
}

/// Geographic bounds of the monitoring network.
///
/// With an empty registry the service only reports a default `center`,
/// `bounds`, and `zoom_level`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Map center.
    #[serde(default)]
    pub center: Option<GeoPoint>,
    /// Extents of the station coordinates.
    #[serde(default)]
    pub coordinate_range: Option<CoordinateRange>,
    /// South-west and north-east corners (`[lat, lon]`), padded by 0.1°.
    #[serde(default)]
    pub bounds: Option<[[f64; 2]; 2]>,
    /// Suggested zoom level.
    #[serde(default)]
    pub zoom_level: Option<u8>,
    /// Registry size the bounds were computed from.
    #[serde(default)]
    pub total_locations: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_without_coordinate_range() {
        let json = r#"{"center": {"lat": -1.9, "lon": 30.0}, "bounds": [[-2.8, 28.8], [-1.0, 30.9]], "zoom_level": 6}"#;
        let bounds: Bounds = serde_json::from_str(json).unwrap();
        assert!(bounds.coordinate_range.is_none());
        assert_eq!(bounds.zoom_level, Some(6));
        assert_eq!(bounds.center, Some(GeoPoint::new(-1.9, 30.0)));
    }

    #[test]
    fn status_classification_thresholds() {
        assert_eq!(StatusLevel::classify(0.0), StatusLevel::Low);
        assert_eq!(StatusLevel::classify(50.0), StatusLevel::Low);
        assert_eq!(StatusLevel::classify(50.01), StatusLevel::Medium);
        assert_eq!(StatusLevel::classify(100.0), StatusLevel::Medium);
        assert_eq!(StatusLevel::classify(100.5), StatusLevel::High);
        assert_eq!(StatusLevel::High.color(), StatusColor::Red);
        assert_eq!(StatusLevel::Medium.alert_level(), 2);
    }

    #[test]
    fn status_level_wire_names() {
        assert_eq!(StatusLevel::High.to_string(), "HIGH");
        assert_eq!("MEDIUM".parse::<StatusLevel>().unwrap(), StatusLevel::Medium);
        let level: StatusLevel = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(level, StatusLevel::Low);
    }

    #[test]
    fn location_type_keeps_unknown_values() {
        let parsed: LocationType = serde_json::from_str("\"Industrial\"").unwrap();
        assert_eq!(parsed, LocationType::Industrial);

        let other: LocationType = serde_json::from_str("\"wetland\"").unwrap();
        assert_eq!(other, LocationType::Other("wetland".to_string()));
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"wetland\"");
    }

    #[test]
    fn sentinel_points() {
        assert!(GeoPoint::new(0.0, 0.0).is_sentinel());
        assert!(GeoPoint::new(0.0, 30.1).is_sentinel());
        assert!(GeoPoint::new(-1.9, 0.0).is_sentinel());
        assert!(!GeoPoint::new(-1.9, 30.1).is_sentinel());
    }

    #[test]
    fn location_preserves_extra_fields() {
        let json = r#"{
            "lat": -1.956, "lon": 30.128, "type": "industrial",
            "region": "Kigali Industrial Zone", "source": "fallback",
            "data_points": 42, "last_update": null
        }"#;
        let location: Location = serde_json::from_str(json).unwrap();
        assert_eq!(location.location_type, LocationType::Industrial);
        assert_eq!(location.extra.get("data_points"), Some(&serde_json::json!(42)));
        assert!(location.extra.contains_key("last_update"));
    }

    #[test]
    fn current_status_tolerates_missing_optional_fields() {
        let json = r#"{"emission": 120.5, "status": "HIGH", "color": "red"}"#;
        let status: CurrentStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.status, StatusLevel::High);
        assert!(status.location.is_none());
        assert!(status.point().is_sentinel());
        assert!(status.gas_levels.so2.abs() < f64::EPSILON);
    }

    #[test]
    fn gas_levels_use_chemical_formula_keys() {
        let json = r#"{"SO2": 0.0001, "NO2": 0.00004, "CO": 0.02}"#;
        let gas: GasLevels = serde_json::from_str(json).unwrap();
        assert!((gas.co - 0.02).abs() < f64::EPSILON);
    }
}

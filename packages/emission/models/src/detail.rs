//! Per-station detail bundle returned by `GET /location-data/{id}`.

use serde::{Deserialize, Serialize};

use crate::{GasLevels, LocationType, Timestamp};

/// Time series and statistics for one station.
///
/// `trends` and `statistics` arrive as empty objects when the station has
/// fewer than two readings, which deserializes to their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationDetail {
    /// Identity of the station.
    #[serde(default)]
    pub location_name: Option<String>,
    /// Registry information for the station.
    #[serde(default)]
    pub location_info: LocationInfo,
    /// The latest reading.
    #[serde(default)]
    pub current: Option<CurrentReading>,
    /// Aggregates over the recent window.
    #[serde(default)]
    pub statistics: DetailStatistics,
    /// Index-aligned recent observations.
    #[serde(default)]
    pub trends: Trends,
    /// Size and span of the recent window.
    #[serde(default)]
    pub data_summary: Option<DataSummary>,
}

/// Registry subset embedded in a detail bundle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationInfo {
    /// Latitude.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude.
    #[serde(default)]
    pub lon: Option<f64>,
    /// Land-use classification.
    #[serde(rename = "type", default)]
    pub location_type: Option<LocationType>,
    /// Region display name.
    #[serde(default)]
    pub region: Option<String>,
    /// Provenance tag.
    #[serde(default)]
    pub source: Option<String>,
}

/// The latest reading of a station.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentReading {
    /// Latest emission.
    #[serde(default)]
    pub emission: Option<f64>,
    /// When it was taken.
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    /// Gas densities.
    #[serde(default)]
    pub gas_levels: Option<GasLevels>,
}

/// Aggregates over a station's recent window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DetailStatistics {
    /// Mean emission.
    #[serde(default)]
    pub avg_emission: Option<f64>,
    /// Minimum emission.
    #[serde(default)]
    pub min_emission: Option<f64>,
    /// Maximum emission.
    #[serde(default)]
    pub max_emission: Option<f64>,
    /// Standard deviation of emission.
    #[serde(default)]
    pub std_emission: Option<f64>,
    /// Mean SO₂ density.
    #[serde(default)]
    pub avg_so2: Option<f64>,
    /// Mean NO₂ density.
    #[serde(default)]
    pub avg_no2: Option<f64>,
    /// Mean CO density.
    #[serde(default)]
    pub avg_co: Option<f64>,
    /// Share of readings flagged `good` (0-1).
    #[serde(default)]
    pub data_quality_score: Option<f64>,
}

/// Direction of the recent emission trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmissionTrend {
    /// Last five readings average more than 10% above the five before.
    Increasing,
    /// Last five readings average more than 10% below the five before.
    Decreasing,
    /// Neither.
    Stable,
}

/// Parallel arrays of recent observations.
///
/// Index `i` across every array describes one observation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trends {
    /// Observation instants.
    #[serde(default)]
    pub timestamps: Vec<Timestamp>,
    /// CO₂ emissions.
    #[serde(default)]
    pub emissions: Vec<f64>,
    /// SO₂ densities.
    #[serde(default)]
    pub so2_levels: Vec<f64>,
    /// NO₂ densities.
    #[serde(default)]
    pub no2_levels: Vec<f64>,
    /// CO densities.
    #[serde(default)]
    pub co_levels: Vec<f64>,
    /// Direction of the recent trend.
    #[serde(default)]
    pub emission_trend: Option<EmissionTrend>,
}

impl Trends {
    /// Number of complete observations (the shortest array's length).
    #[must_use]
    pub fn len(&self) -> usize {
        [
            self.timestamps.len(),
            self.emissions.len(),
            self.so2_levels.len(),
            self.no2_levels.len(),
            self.co_levels.len(),
        ]
        .into_iter()
        .min()
        .unwrap_or(0)
    }

    /// Whether there are no complete observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every array has the same length.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        let n = self.timestamps.len();
        self.emissions.len() == n
            && self.so2_levels.len() == n
            && self.no2_levels.len() == n
            && self.co_levels.len() == n
    }
}

/// Size and span of a station's recent window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DataSummary {
    /// Number of readings in the window.
    #[serde(default)]
    pub total_readings: u64,
    /// Hours between first and last reading.
    #[serde(default)]
    pub time_span_hours: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_reading_detail_has_empty_trends() {
        let json = r#"{
            "location_name": "Kigali-1",
            "location_info": {},
            "current": {"emission": 40.0, "timestamp": "2024-05-01T12:00:00"},
            "trends": {},
            "statistics": {},
            "data_summary": {"total_readings": 1}
        }"#;
        let detail: LocationDetail = serde_json::from_str(json).unwrap();
        assert!(detail.trends.is_empty());
        assert!(detail.trends.is_aligned());
        assert!(detail.statistics.avg_emission.is_none());
        assert_eq!(detail.data_summary.unwrap().total_readings, 1);
    }

    #[test]
    fn full_detail() {
        let json = r#"{
            "location_name": "Kigali-1",
            "location_info": {"lat": -1.95, "lon": 30.06, "type": "urban", "region": "Kigali"},
            "trends": {
                "timestamps": ["2024-05-01T12:00:00", "2024-05-01T12:00:03"],
                "emissions": [40.0, 42.0],
                "so2_levels": [0.0001, 0.0002],
                "no2_levels": [0.00004, 0.00005],
                "co_levels": [0.016, 0.017],
                "emission_trend": "stable"
            },
            "statistics": {"avg_emission": 41.0, "min_emission": 40.0, "max_emission": 42.0}
        }"#;
        let detail: LocationDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.trends.len(), 2);
        assert!(detail.trends.is_aligned());
        assert_eq!(detail.trends.emission_trend, Some(EmissionTrend::Stable));
        assert_eq!(detail.location_info.location_type, Some(LocationType::Urban));
    }

    #[test]
    fn misaligned_trends_report_shortest_length() {
        let trends = Trends {
            emissions: vec![1.0, 2.0, 3.0],
            so2_levels: vec![0.1, 0.2],
            no2_levels: vec![0.1, 0.2, 0.3],
            co_levels: vec![0.1, 0.2, 0.3],
            timestamps: Vec::new(),
            emission_trend: None,
        };
        assert_eq!(trends.len(), 0);
        assert!(!trends.is_aligned());
    }
}

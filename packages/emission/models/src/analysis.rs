//! The exploratory analysis bundle served by `GET /eda-data`.
//!
//! Fetched once per session; every field defaults to empty so a sparse
//! bundle still renders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{LocationType, Timestamp};

/// Aggregates for the analysis panels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisBundle {
    /// Emission samples for the distribution histogram.
    #[serde(default)]
    pub distribution_data: Vec<f64>,
    /// Feature correlations with emission.
    #[serde(default)]
    pub correlation_data: CorrelationData,
    /// Weekly emission estimates per station.
    #[serde(default)]
    pub emission_trends: Vec<TrendPoint>,
    /// Registry breakdowns.
    #[serde(default)]
    pub location_summary: LocationSummary,
    /// Feed health figures.
    #[serde(default)]
    pub data_quality_metrics: Option<DataQualityMetrics>,
}

/// Ordered feature names with parallel correlation coefficients.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrelationData {
    /// Feature names.
    #[serde(default)]
    pub features: Vec<String>,
    /// Correlation with emission, index-aligned with `features`.
    #[serde(default)]
    pub correlations: Vec<f64>,
}

impl CorrelationData {
    /// Iterates `(feature, correlation)` pairs, stopping at the shorter array.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, f64)> {
        self.features
            .iter()
            .map(String::as_str)
            .zip(self.correlations.iter().copied())
    }
}

/// One point of the per-type emission trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Week the estimate applies to.
    pub date: Timestamp,
    /// Estimated emission.
    pub emission: f64,
    /// Land-use classification of the station.
    #[serde(rename = "type")]
    pub location_type: LocationType,
    /// Station identity.
    #[serde(default)]
    pub location: Option<String>,
    /// Region display name.
    #[serde(default)]
    pub region: Option<String>,
}

/// Registry breakdowns by classification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocationSummary {
    /// Registry size.
    #[serde(default)]
    pub total_locations: Option<u64>,
    /// Station count per location type.
    #[serde(default)]
    pub location_types: BTreeMap<String, u64>,
    /// Station count per region.
    #[serde(default)]
    pub regions: BTreeMap<String, u64>,
    /// Station count per provenance tag.
    #[serde(default)]
    pub data_sources: BTreeMap<String, u64>,
}

/// Feed health figures.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataQualityMetrics {
    /// Readings held by the service.
    #[serde(default)]
    pub total_data_points: Option<u64>,
    /// Stations with a reading among the most recent 100.
    #[serde(default)]
    pub active_locations: Option<u64>,
    /// Human-readable refresh cadence.
    #[serde(default)]
    pub update_frequency: Option<String>,
    /// Human-readable coverage area.
    #[serde(default)]
    pub coverage_area: Option<String>,
}

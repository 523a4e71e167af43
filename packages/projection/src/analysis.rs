//! Panels derived from the one-shot analysis bundle.

use co2_monitor_emission_models::{
    AnalysisBundle, CorrelationData, LocationSummary, LocationType, TrendPoint,
};

use crate::color::{AMBER, BLUE, GREEN, RED};
use crate::series::{Axis, Series, SeriesPoint};

/// Bins of the emission distribution histogram.
pub const HISTOGRAM_BINS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Counts `values` into `bins` equal-width bins spanning their range.
///
/// The last bin is closed so the maximum lands in it. Non-finite values
/// are ignored; if every value is equal there is one zero-width bin.
#[must_use]
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let (Some(min), Some(max)) = (
        finite.iter().copied().reduce(f64::min),
        finite.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }
    if max <= min {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: finite.len(),
        }];
    }

    #[allow(clippy::cast_precision_loss)]
    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let i = i as f64;
            HistogramBin {
                start: width.mul_add(i, min),
                end: width.mul_add(i + 1.0, min),
                count: 0,
            }
        })
        .collect();

    for v in finite {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = (((v - min) / width) as usize).min(bins - 1);
        out[index].count += 1;
    }
    out
}

/// One bar of the feature-correlation chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationBar {
    pub feature: String,
    pub correlation: f64,
    pub color: &'static str,
}

/// Green above 0.05, amber above 0.03, red otherwise.
#[must_use]
pub fn correlation_color(correlation: f64) -> &'static str {
    if correlation > 0.05 {
        GREEN
    } else if correlation > 0.03 {
        AMBER
    } else {
        RED
    }
}

#[must_use]
pub fn correlation_bars(data: &CorrelationData) -> Vec<CorrelationBar> {
    data.pairs()
        .map(|(feature, correlation)| CorrelationBar {
            feature: feature.to_string(),
            correlation,
            color: correlation_color(correlation),
        })
        .collect()
}

/// One emission trend line per known location type, in bundle order.
///
/// Always three lines; a type without points gets an empty one.
#[must_use]
pub fn type_trend_lines(trends: &[TrendPoint]) -> Vec<Series> {
    LocationType::KNOWN
        .iter()
        .map(|kind| {
            let (name, color) = match kind {
                LocationType::Industrial => ("Industrial Areas", RED),
                LocationType::Urban => ("Urban Areas", BLUE),
                LocationType::Coastal | LocationType::Other(_) => ("Coastal Areas", GREEN),
            };
            Series {
                name: name.to_string(),
                color,
                axis: Axis::Emission,
                points: trends
                    .iter()
                    .filter(|p| p.location_type == *kind)
                    .map(|p| SeriesPoint {
                        x: p.date,
                        y: p.emission,
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Station count of one location type and its share of the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeShare {
    pub location_type: String,
    pub count: u64,
    /// Percent of the registry, 0 when the registry is empty.
    pub percent: f64,
}

#[must_use]
pub fn type_distribution(summary: &LocationSummary, registry_len: usize) -> Vec<TypeShare> {
    summary
        .location_types
        .iter()
        .map(|(kind, &count)| {
            #[allow(clippy::cast_precision_loss)]
            let percent = if registry_len == 0 {
                0.0
            } else {
                count as f64 / registry_len as f64 * 100.0
            };
            TypeShare {
                location_type: kind.clone(),
                count,
                percent,
            }
        })
        .collect()
}

/// Station count for each known type, 0 when the summary omits it.
#[must_use]
pub fn known_type_counts(summary: &LocationSummary) -> Vec<(LocationType, u64)> {
    LocationType::KNOWN
        .iter()
        .map(|kind| {
            let count = summary.location_types.get(kind.as_str()).copied().unwrap_or(0);
            (kind.clone(), count)
        })
        .collect()
}

/// Everything derived from the analysis bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView {
    pub histogram: Vec<HistogramBin>,
    pub correlations: Vec<CorrelationBar>,
    pub trend_lines: Vec<Series>,
    pub type_counts: Vec<(LocationType, u64)>,
    pub type_distribution: Vec<TypeShare>,
}

#[must_use]
pub fn analysis_view(bundle: &AnalysisBundle, registry_len: usize) -> AnalysisView {
    AnalysisView {
        histogram: histogram(&bundle.distribution_data, HISTOGRAM_BINS),
        correlations: correlation_bars(&bundle.correlation_data),
        trend_lines: type_trend_lines(&bundle.emission_trends),
        type_counts: known_type_counts(&bundle.location_summary),
        type_distribution: type_distribution(&bundle.location_summary, registry_len),
    }
}

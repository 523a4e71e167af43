//! Time series for the emission and gas charts.

use co2_monitor_emission_models::{LocationDetail, Reading, Registry, Timestamp};
use strum_macros::{AsRefStr, Display};

use crate::color::{AMBER, BLUE, GREEN, RED, SERIES_PALETTE};
use crate::units::{CO_TO_PPM, NO2_TO_PPM, SO2_TO_PPM};

/// Registry entries charted when no station is selected.
pub const MAX_CHARTED_LOCATIONS: usize = 5;

/// Most recent readings charted per station.
pub const MAX_POINTS_PER_LOCATION: usize = 20;

/// Which y-axis a series is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Axis {
    /// CO₂ emission.
    Emission,
    /// SO₂ and NO₂ ppm.
    Gas,
    /// CO ppm, on its own scale.
    GasSecondary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub x: Timestamp,
    pub y: f64,
}

/// One line on a time chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: &'static str,
    pub axis: Axis,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    /// The y values in x order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.y)
    }
}

/// One line per registry entry (first [`MAX_CHARTED_LOCATIONS`], registry
/// order) holding its latest [`MAX_POINTS_PER_LOCATION`] readings in
/// arrival order.
///
/// Stations without readings are skipped but keep their palette slot.
#[must_use]
pub fn multi_location_series(registry: &Registry, readings: &[Reading]) -> Vec<Series> {
    registry
        .iter()
        .take(MAX_CHARTED_LOCATIONS)
        .enumerate()
        .filter_map(|(index, (id, location))| {
            let mine: Vec<&Reading> = readings.iter().filter(|r| r.location_name == *id).collect();
            if mine.is_empty() {
                return None;
            }
            let recent = &mine[mine.len().saturating_sub(MAX_POINTS_PER_LOCATION)..];

            let name = if location.region.is_empty() {
                id.clone()
            } else {
                location.region.clone()
            };

            Some(Series {
                name,
                color: SERIES_PALETTE[index % SERIES_PALETTE.len()],
                axis: Axis::Emission,
                points: recent
                    .iter()
                    .map(|r| SeriesPoint {
                        x: r.timestamp,
                        y: r.emission_or_zero(),
                    })
                    .collect(),
            })
        })
        .collect()
}

/// One line per trend array of the selected station, gases in ppm.
///
/// Every line covers the same observations; arrays longer than the
/// shortest one are cut to it.
#[must_use]
pub fn location_series(detail: &LocationDetail) -> Vec<Series> {
    let trends = &detail.trends;
    let n = trends.len();
    let line = |name: &str, color, axis, values: &[f64], scale: f64| Series {
        name: name.to_string(),
        color,
        axis,
        points: trends
            .timestamps
            .iter()
            .zip(values)
            .take(n)
            .map(|(&x, &y)| SeriesPoint { x, y: y * scale })
            .collect(),
    };

    vec![
        line("CO₂ Emissions", BLUE, Axis::Emission, &trends.emissions, 1.0),
        line("SO₂", RED, Axis::Gas, &trends.so2_levels, SO2_TO_PPM),
        line("NO₂", AMBER, Axis::Gas, &trends.no2_levels, NO2_TO_PPM),
        line("CO", GREEN, Axis::GasSecondary, &trends.co_levels, CO_TO_PPM),
    ]
}

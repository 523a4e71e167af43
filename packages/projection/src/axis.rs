//! Y-axis range fitting for the emission chart.

use crate::series::Series;

/// Minimum padding added above and below the data.
pub const MIN_PADDING: f64 = 5.0;

/// A closed axis range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Range used when there is nothing to fit.
    pub const DEFAULT: Self = Self {
        min: 0.0,
        max: 150.0,
    };
}

impl Default for AxisRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Fits a range around every y value of `series`.
///
/// Pads by a tenth of the data span (at least [`MIN_PADDING`]) on both
/// sides and never extends below zero.
#[must_use]
pub fn optimal_y_range(series: &[Series]) -> AxisRange {
    fit(series.iter().flat_map(Series::values))
}

/// [`optimal_y_range`] over raw values.
#[must_use]
pub fn fit(values: impl IntoIterator<Item = f64>) -> AxisRange {
    let Some((min, max)) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    else {
        return AxisRange::DEFAULT;
    };

    let padding = ((max - min) * 0.1).max(MIN_PADDING);
    AxisRange {
        min: (min - padding).max(0.0),
        max: max + padding,
    }
}

//! Gas-versus-emission scatter for the selected station.

use co2_monitor_emission_models::LocationDetail;

use crate::color::{AMBER, GREEN, RED};
use crate::units::{CO_TO_PPM, NO2_TO_PPM, SO2_TO_PPM};

/// Gas ppm on x against CO₂ emission on y, one point per observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub name: &'static str,
    pub x_label: &'static str,
    pub color: &'static str,
    pub points: Vec<(f64, f64)>,
}

/// SO₂, NO₂, and CO scatters built straight from the trend arrays,
/// index-aligned and in observation order.
#[must_use]
pub fn correlation_scatter(detail: &LocationDetail) -> Vec<ScatterSeries> {
    let trends = &detail.trends;
    let n = trends.len();
    let scatter = |name, x_label, color, gas: &[f64], scale: f64| ScatterSeries {
        name,
        x_label,
        color,
        points: gas
            .iter()
            .zip(&trends.emissions)
            .take(n)
            .map(|(&g, &e)| (g * scale, e))
            .collect(),
    };

    vec![
        scatter("SO₂ vs CO₂", "SO₂ (ppm)", RED, &trends.so2_levels, SO2_TO_PPM),
        scatter("NO₂ vs CO₂", "NO₂ (ppm)", AMBER, &trends.no2_levels, NO2_TO_PPM),
        scatter("CO vs CO₂", "CO (ppm)", GREEN, &trends.co_levels, CO_TO_PPM),
    ]
}

#[cfg(test)]
mod tests {
    use co2_monitor_emission_models::{Timestamp, Trends};

    use super::*;

    #[test]
    fn pairs_by_index_without_sorting() {
        let t = Timestamp::parse("2024-05-01").unwrap();
        let detail = LocationDetail {
            trends: Trends {
                timestamps: vec![t, t, t],
                emissions: vec![90.0, 60.0, 75.0],
                so2_levels: vec![0.000_3, 0.000_1, 0.000_2],
                no2_levels: vec![0.000_01, 0.000_02, 0.000_03],
                co_levels: vec![0.01, 0.03, 0.02],
                emission_trend: None,
            },
            ..LocationDetail::default()
        };

        let scatters = correlation_scatter(&detail);

        assert_eq!(scatters.len(), 3);
        let so2: Vec<f64> = scatters[0].points.iter().map(|p| p.1).collect();
        assert_eq!(so2, vec![90.0, 60.0, 75.0]);
        assert!((scatters[0].points[0].0 - 300.0).abs() < 1e-9);
        assert!((scatters[2].points[1].0 - 30.0).abs() < 1e-9);
        assert_eq!(scatters[1].x_label, "NO₂ (ppm)");
    }

    #[test]
    fn missing_trends_give_empty_scatters() {
        let scatters = correlation_scatter(&LocationDetail::default());
        assert!(scatters.iter().all(|s| s.points.is_empty()));
    }
}

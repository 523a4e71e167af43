//! Network-wide and per-station figures.

use co2_monitor_emission_models::{
    GeoPoint, LocationDetail, LocationType, Registry, StatusLevel, StatusMap,
};

use crate::units::{CO_TO_PPM, NO2_TO_PPM, SO2_TO_PPM};

/// Headline figures for the whole network.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SummaryStats {
    /// Registry size.
    pub station_count: usize,
    /// Sum of current emissions.
    pub total_emission: f64,
    /// Mean current emission, 0 with no status entries.
    pub mean_emission: f64,
    /// Stations currently at [`StatusLevel::High`].
    pub high_count: usize,
}

#[must_use]
pub fn summary(registry: Option<&Registry>, status: Option<&StatusMap>) -> SummaryStats {
    let station_count = registry.map_or(0, Registry::len);
    let Some(status) = status.filter(|s| !s.is_empty()) else {
        return SummaryStats {
            station_count,
            ..SummaryStats::default()
        };
    };

    let total_emission: f64 = status.values().map(|s| s.emission).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean_emission = total_emission / status.len() as f64;

    SummaryStats {
        station_count,
        total_emission,
        mean_emission,
        high_count: status
            .values()
            .filter(|s| s.status == StatusLevel::High)
            .count(),
    }
}

/// Average gas levels of the selected station, in ppm.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GasSummary {
    pub so2: Option<f64>,
    pub no2: Option<f64>,
    pub co: Option<f64>,
}

#[must_use]
pub fn gas_summary(detail: &LocationDetail) -> GasSummary {
    let stats = &detail.statistics;
    GasSummary {
        so2: stats.avg_so2.map(|v| v * SO2_TO_PPM),
        no2: stats.avg_no2.map(|v| v * NO2_TO_PPM),
        co: stats.avg_co.map(|v| v * CO_TO_PPM),
    }
}

/// Header for the selected station.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub location_id: String,
    pub region: String,
    pub point: Option<GeoPoint>,
    pub location_type: Option<LocationType>,
    pub source: Option<String>,
    pub current_emission: Option<f64>,
    pub avg_emission: Option<f64>,
    pub min_emission: Option<f64>,
    pub max_emission: Option<f64>,
}

#[must_use]
pub fn detail_panel(location_id: &str, detail: &LocationDetail) -> DetailPanel {
    let info = &detail.location_info;
    DetailPanel {
        location_id: location_id.to_string(),
        region: info
            .region
            .clone()
            .unwrap_or_else(|| "Selected Location".to_string()),
        point: info.lat.zip(info.lon).map(|(lat, lon)| GeoPoint::new(lat, lon)),
        location_type: info.location_type.clone(),
        source: info.source.clone(),
        current_emission: detail.current.as_ref().and_then(|c| c.emission),
        avg_emission: detail.statistics.avg_emission,
        min_emission: detail.statistics.min_emission,
        max_emission: detail.statistics.max_emission,
    }
}

#[cfg(test)]
mod tests {
    use co2_monitor_emission_models::{CurrentStatus, GasLevels, Location};
    use co2_monitor_emission_models::detail::{DetailStatistics, LocationInfo};

    use super::*;

    fn status(emission: f64) -> CurrentStatus {
        let level = StatusLevel::classify(emission);
        CurrentStatus {
            emission,
            status: level,
            color: level.color(),
            gas_levels: GasLevels::default(),
            location: None,
            region: String::new(),
            location_type: LocationType::Industrial,
            source: String::new(),
            alert_level: None,
            timestamp: None,
            data_quality: None,
            data_freshness: None,
            coordinates_string: None,
        }
    }

    #[test]
    fn empty_inputs_give_zeroes() {
        let stats = summary(Some(&Registry::new()), Some(&StatusMap::new()));
        assert_eq!(stats, SummaryStats::default());
        assert!(!stats.mean_emission.is_nan());

        assert_eq!(summary(None, None), SummaryStats::default());
    }

    #[test]
    fn totals_means_and_high_count() {
        let registry: Registry = (0..4)
            .map(|i| (format!("L{i}"), Location::default()))
            .collect();
        let status = StatusMap::from([
            ("L0".to_string(), status(30.0)),
            ("L1".to_string(), status(120.0)),
            ("L2".to_string(), status(150.0)),
        ]);

        let stats = summary(Some(&registry), Some(&status));

        assert_eq!(stats.station_count, 4);
        assert!((stats.total_emission - 300.0).abs() < f64::EPSILON);
        assert!((stats.mean_emission - 100.0).abs() < f64::EPSILON);
        assert_eq!(stats.high_count, 2);
    }

    #[test]
    fn gas_summary_converts_present_averages() {
        let detail = LocationDetail {
            statistics: DetailStatistics {
                avg_so2: Some(0.000_2),
                avg_co: Some(0.025),
                ..DetailStatistics::default()
            },
            ..LocationDetail::default()
        };

        let gas = gas_summary(&detail);
        assert!((gas.so2.unwrap() - 200.0).abs() < 1e-9);
        assert!(gas.no2.is_none());
        assert!((gas.co.unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn panel_tolerates_sparse_detail() {
        let panel = detail_panel("Kigali-1", &LocationDetail::default());
        assert_eq!(panel.region, "Selected Location");
        assert!(panel.point.is_none());
        assert!(panel.current_emission.is_none());

        let detail = LocationDetail {
            location_info: LocationInfo {
                lat: Some(-1.95),
                lon: Some(30.06),
                region: Some("Kigali City".to_string()),
                ..LocationInfo::default()
            },
            ..LocationDetail::default()
        };
        let panel = detail_panel("Kigali-1", &detail);
        assert_eq!(panel.point, Some(GeoPoint::new(-1.95, 30.06)));
        assert_eq!(panel.region, "Kigali City");
    }
}

//! Display unit conversions for gas densities.
//!
//! The service reports column densities; the dashboard shows them as
//! ppm-like figures by fixed scaling. SO₂ and NO₂ are six orders of
//! magnitude smaller than CO, hence the different factors.

use co2_monitor_emission_models::GasLevels;

/// SO₂ density to displayed ppm.
pub const SO2_TO_PPM: f64 = 1e6;
/// NO₂ density to displayed ppm.
pub const NO2_TO_PPM: f64 = 1e6;
/// CO density to displayed ppm.
pub const CO_TO_PPM: f64 = 1e3;

/// Gas levels in displayed ppm.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GasPpm {
    pub so2: f64,
    pub no2: f64,
    pub co: f64,
}

impl From<GasLevels> for GasPpm {
    fn from(levels: GasLevels) -> Self {
        Self {
            so2: levels.so2 * SO2_TO_PPM,
            no2: levels.no2 * NO2_TO_PPM,
            co: levels.co * CO_TO_PPM,
        }
    }
}

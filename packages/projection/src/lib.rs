#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pure derivations of renderable views from a dashboard [`Snapshot`].
//!
//! Nothing here performs I/O or reads ambient state except
//! [`export::write_export`]. Every projection tolerates absent series and
//! sparse payloads by returning an empty result or a default range.

pub mod analysis;
pub mod axis;
pub mod color;
pub mod export;
pub mod map;
pub mod scatter;
pub mod series;
pub mod stats;
pub mod units;

use co2_monitor_emission_models::{LocationDetail, Registry, Selection, Snapshot};

pub use analysis::{AnalysisView, analysis_view};
pub use axis::{AxisRange, optimal_y_range};
pub use export::{ExportError, export_filename, export_locations, export_preview, write_export};
pub use map::{MapLayer, MapMarker, MapPoint, MapViewport, StationCard, map_points};
pub use scatter::ScatterSeries;
pub use series::{Axis, Series, SeriesPoint};
pub use stats::{DetailPanel, GasSummary, SummaryStats};

/// A set of lines sharing one fitted y-axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeChart {
    pub series: Vec<Series>,
    pub y_range: AxisRange,
}

impl TimeChart {
    #[must_use]
    pub fn new(series: Vec<Series>) -> Self {
        let y_range = optimal_y_range(&series);
        Self { series, y_range }
    }
}

/// Everything shown for the selected station once its detail arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub panel: DetailPanel,
    /// SO₂ and NO₂ on the primary gas axis, CO on the secondary one.
    pub gas_chart: Vec<Series>,
    pub gas_summary: GasSummary,
    pub scatter: Vec<ScatterSeries>,
}

/// The whole dashboard for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub selection: Selection,
    pub layer: MapLayer,
    pub viewport: MapViewport,
    pub markers: Vec<MapMarker>,
    pub cards: Vec<StationCard>,
    pub emission_chart: TimeChart,
    /// Present only while a station is selected and its detail is loaded.
    pub detail: Option<DetailView>,
    pub summary: SummaryStats,
    pub analysis: Option<AnalysisView>,
}

/// Detail in `snapshot` that belongs to the current selection.
///
/// A detail naming a different station is treated as absent.
fn selected_detail<'a>(snapshot: &'a Snapshot, selection: &Selection) -> Option<&'a LocationDetail> {
    let id = selection.location_id()?;
    snapshot
        .detail
        .as_deref()
        .filter(|detail| detail.location_name.as_deref().is_none_or(|name| name == id))
}

/// The emission time chart.
///
/// Without a selection it charts the first registry entries from the
/// readings page; with one it charts the station's emission trend, which
/// is empty until the detail arrives.
#[must_use]
pub fn emission_chart(snapshot: &Snapshot, selection: &Selection) -> TimeChart {
    let series = match selection {
        Selection::Unselected => match (&snapshot.registry, &snapshot.readings) {
            (Some(registry), Some(readings)) => {
                series::multi_location_series(registry, readings)
            }
            _ => Vec::new(),
        },
        Selection::Selected(_) => selected_detail(snapshot, selection)
            .map(|detail| {
                series::location_series(detail)
                    .into_iter()
                    .filter(|s| s.axis == Axis::Emission)
                    .collect()
            })
            .unwrap_or_default(),
    };
    TimeChart::new(series)
}

fn detail_view(location_id: &str, detail: &LocationDetail) -> DetailView {
    DetailView {
        panel: stats::detail_panel(location_id, detail),
        gas_chart: series::location_series(detail)
            .into_iter()
            .filter(|s| s.axis != Axis::Emission)
            .collect(),
        gas_summary: stats::gas_summary(detail),
        scatter: scatter::correlation_scatter(detail),
    }
}

/// Projects `snapshot` into every dashboard view at once.
#[must_use]
pub fn project(snapshot: &Snapshot, selection: &Selection, layer: MapLayer) -> DashboardView {
    let registry = snapshot.registry.as_deref();
    let status = snapshot.status.as_deref();

    let (markers, cards) = status.map_or_else(
        || (Vec::new(), Vec::new()),
        |status| {
            (
                map::markers(&map_points(status), layer),
                map::station_cards(status, selection),
            )
        },
    );

    let detail = selection
        .location_id()
        .zip(selected_detail(snapshot, selection))
        .map(|(id, detail)| detail_view(id, detail));

    DashboardView {
        selection: selection.clone(),
        layer,
        viewport: map::viewport(snapshot.bounds.as_deref()),
        markers,
        cards,
        emission_chart: emission_chart(snapshot, selection),
        detail,
        summary: stats::summary(registry, status),
        analysis: snapshot
            .analysis
            .as_deref()
            .map(|bundle| analysis_view(bundle, registry.map_or(0, Registry::len))),
    }
}

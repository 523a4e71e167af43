//! Plain-text rendering of a [`DashboardView`].

use std::fmt::{self, Display, Formatter};

use co2_monitor_emission_models::Selection;
use co2_monitor_projection::analysis::AnalysisView;
use co2_monitor_projection::{DashboardView, DetailView, MapLayer, Series, TimeChart};

/// Markers listed before the rest is summarized as a count.
const MAX_LISTED_MARKERS: usize = 10;

/// Displays a whole dashboard view as terminal text.
pub struct DashboardText<'a>(pub &'a DashboardView);

impl Display for DashboardText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let view = self.0;
        let s = &view.summary;

        writeln!(f, "=== CO₂ Emission Monitor ===")?;
        writeln!(
            f,
            "Stations: {}  Total: {:.2}  Mean: {:.2}  High: {}",
            s.station_count, s.total_emission, s.mean_emission, s.high_count,
        )?;
        match &view.selection {
            Selection::Unselected => writeln!(f, "Selection: none")?,
            Selection::Selected(id) => writeln!(f, "Selection: {id}")?,
        }

        write_map(f, view)?;
        write_cards(f, view)?;
        write_chart(f, "Emissions", &view.emission_chart)?;
        if let Some(detail) = &view.detail {
            write_detail(f, detail)?;
        } else if view.selection.is_selected() {
            writeln!(f)?;
            writeln!(f, "Loading station detail...")?;
        }
        if let Some(analysis) = &view.analysis {
            write_analysis(f, analysis)?;
        }
        Ok(())
    }
}

fn write_map(f: &mut Formatter<'_>, view: &DashboardView) -> fmt::Result {
    let vp = &view.viewport;
    writeln!(f)?;
    writeln!(
        f,
        "Map [{}] centre {:.3}, {:.3}  lat {:.2}..{:.2}  lon {:.2}..{:.2}",
        view.layer,
        vp.center.lat,
        vp.center.lon,
        vp.lat_range.0,
        vp.lat_range.1,
        vp.lon_range.0,
        vp.lon_range.1,
    )?;
    if view.markers.is_empty() {
        return writeln!(f, "  (no positioned stations)");
    }
    let value_label = match view.layer {
        MapLayer::Emissions => "CO₂",
        MapLayer::GasLevels => "SO₂ ppm",
    };
    for marker in view.markers.iter().take(MAX_LISTED_MARKERS) {
        writeln!(
            f,
            "  {:<20} {:>8.3} {:>8.3}  size {:>4.1}  {value_label} {:>8.2}  {}",
            marker.location_id,
            marker.point.lat,
            marker.point.lon,
            marker.size,
            marker.color_value,
            marker.color,
        )?;
    }
    if view.markers.len() > MAX_LISTED_MARKERS {
        writeln!(f, "  ... {} more", view.markers.len() - MAX_LISTED_MARKERS)?;
    }
    Ok(())
}

fn write_cards(f: &mut Formatter<'_>, view: &DashboardView) -> fmt::Result {
    if view.cards.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "Stations")?;
    for card in &view.cards {
        let marker = if card.selected { '>' } else { ' ' };
        let position = card.point.map_or_else(
            || "unknown position".to_string(),
            |p| format!("{:.3}, {:.3}", p.lat, p.lon),
        );
        writeln!(
            f,
            "{marker} {:<20} {:<24} {:<10} {:>8.2} {:<6}  {position}  SO₂ {:.3} NO₂ {:.3} CO {:.2}",
            card.location_id,
            card.region,
            card.location_type.as_str(),
            card.emission,
            card.status,
            card.gas.so2,
            card.gas.no2,
            card.gas.co,
        )?;
    }
    Ok(())
}

fn write_series(f: &mut Formatter<'_>, series: &Series) -> fmt::Result {
    let latest = series
        .points
        .last()
        .map_or_else(|| "-".to_string(), |p| format!("{:.2} at {}", p.y, p.x));
    writeln!(
        f,
        "  {:<24} [{}] {} points, latest {latest}",
        series.name,
        series.axis,
        series.points.len(),
    )
}

fn write_chart(f: &mut Formatter<'_>, title: &str, chart: &TimeChart) -> fmt::Result {
    writeln!(f)?;
    writeln!(
        f,
        "{title} (y {:.1}..{:.1})",
        chart.y_range.min, chart.y_range.max
    )?;
    if chart.series.is_empty() {
        return writeln!(f, "  (no data)");
    }
    for series in &chart.series {
        write_series(f, series)?;
    }
    Ok(())
}

fn write_optional(f: &mut Formatter<'_>, label: &str, value: Option<f64>) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{label} {v:.2}  "),
        None => write!(f, "{label} N/A  "),
    }
}

fn write_detail(f: &mut Formatter<'_>, detail: &DetailView) -> fmt::Result {
    let panel = &detail.panel;
    writeln!(f)?;
    writeln!(f, "{} ({})", panel.region, panel.location_id)?;
    if let Some(point) = panel.point {
        writeln!(f, "  Coordinates: {:.4}, {:.4}", point.lat, point.lon)?;
    }
    if let Some(kind) = &panel.location_type {
        writeln!(f, "  Type: {kind}")?;
    }
    if let Some(source) = &panel.source {
        writeln!(f, "  Source: {source}")?;
    }

    write!(f, "  ")?;
    write_optional(f, "Current", panel.current_emission)?;
    write_optional(f, "Avg", panel.avg_emission)?;
    write_optional(f, "Min", panel.min_emission)?;
    write_optional(f, "Max", panel.max_emission)?;
    writeln!(f)?;

    let gas = &detail.gas_summary;
    write!(f, "  Avg ppm: ")?;
    write_optional(f, "SO₂", gas.so2)?;
    write_optional(f, "NO₂", gas.no2)?;
    write_optional(f, "CO", gas.co)?;
    writeln!(f)?;

    writeln!(f, "Gas levels")?;
    for series in &detail.gas_chart {
        write_series(f, series)?;
    }
    writeln!(f, "Correlation with CO₂")?;
    for scatter in &detail.scatter {
        writeln!(f, "  {:<12} {} points", scatter.name, scatter.points.len())?;
    }
    Ok(())
}

fn write_analysis(f: &mut Formatter<'_>, analysis: &AnalysisView) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "Analysis")?;
    if let Some(peak) = analysis.histogram.iter().max_by_key(|bin| bin.count) {
        writeln!(
            f,
            "  Most common emission: {:.1}..{:.1} ({} samples)",
            peak.start, peak.end, peak.count,
        )?;
    }
    for bar in &analysis.correlations {
        writeln!(f, "  {:<24} {:>7.3}", bar.feature, bar.correlation)?;
    }
    for share in &analysis.type_distribution {
        writeln!(
            f,
            "  {:<12} {:>4} stations ({:.1}%)",
            share.location_type, share.count, share.percent,
        )?;
    }
    Ok(())
}

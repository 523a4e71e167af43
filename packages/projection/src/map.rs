//! Station markers, viewport, and station cards for the network map.

use co2_monitor_emission_models::{
    Bounds, CurrentStatus, GeoPoint, LocationType, Selection, StatusColor, StatusLevel, StatusMap,
};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::color::{ColorScale, EMISSION_SCALE, Rgb, SO2_SCALE};
use crate::units::{GasPpm, SO2_TO_PPM};

/// Center used until bounds arrive.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(-1.9, 30.0);
/// Longitude window used until bounds arrive.
pub const DEFAULT_LON_RANGE: (f64, f64) = (28.5, 31.0);
/// Latitude window used until bounds arrive.
pub const DEFAULT_LAT_RANGE: (f64, f64) = (-3.0, -1.0);
/// Margin around the station extents.
pub const VIEWPORT_PADDING: f64 = 0.2;

/// Station cards shown above the map.
pub const MAX_STATION_CARDS: usize = 20;

/// Which encoding the map markers use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, AsRefStr, EnumString, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum MapLayer {
    /// Size and color by CO₂ emission.
    #[default]
    Emissions,
    /// Size and color by SO₂.
    GasLevels,
}

impl MapLayer {
    /// The other layer.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Emissions => Self::GasLevels,
            Self::GasLevels => Self::Emissions,
        }
    }
}

/// Size and color-driving value of one marker under one encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerEncoding {
    pub size: f64,
    pub color_value: f64,
}

impl MarkerEncoding {
    /// Emission-weighted: size grows with emission within `[15, 35]`.
    #[must_use]
    pub fn emission(emission: f64) -> Self {
        Self {
            size: emission.mul_add(0.5, 15.0).clamp(15.0, 35.0),
            color_value: emission,
        }
    }

    /// SO₂-weighted: size grows with SO₂ from a floor of 10.
    #[must_use]
    pub fn so2(so2: f64) -> Self {
        Self {
            size: so2.mul_add(1e7, 10.0).max(10.0),
            color_value: so2 * SO2_TO_PPM,
        }
    }
}

/// A station with a usable position, carrying both encodings.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub location_id: String,
    pub point: GeoPoint,
    pub emission: f64,
    pub status: StatusLevel,
    pub region: String,
    pub location_type: LocationType,
    pub source: String,
    pub gas: GasPpm,
    pub by_emission: MarkerEncoding,
    pub by_so2: MarkerEncoding,
}

impl MapPoint {
    fn from_status(location_id: &str, status: &CurrentStatus) -> Option<Self> {
        let point = status.point();
        if point.is_sentinel() {
            return None;
        }
        Some(Self {
            location_id: location_id.to_string(),
            point,
            emission: status.emission,
            status: status.status,
            region: status.region.clone(),
            location_type: status.location_type.clone(),
            source: status.source.clone(),
            gas: GasPpm::from(status.gas_levels),
            by_emission: MarkerEncoding::emission(status.emission),
            by_so2: MarkerEncoding::so2(status.gas_levels.so2),
        })
    }

    #[must_use]
    pub const fn encoding(&self, layer: MapLayer) -> MarkerEncoding {
        match layer {
            MapLayer::Emissions => self.by_emission,
            MapLayer::GasLevels => self.by_so2,
        }
    }

    /// Hover text for `layer`, one fact per line.
    #[must_use]
    pub fn hover_text(&self, layer: MapLayer) -> String {
        match layer {
            MapLayer::Emissions => format!(
                "{}\n\
                 Location Type: {}\n\
                 Coordinates: {:.3}, {:.3}\n\
                 CO₂ Emission: {:.2}\n\
                 Status: {}\n\
                 SO₂: {:.3} ppm\n\
                 NO₂: {:.3} ppm\n\
                 CO: {:.2} ppm\n\
                 Data Source: {}",
                self.region,
                self.location_type,
                self.point.lat,
                self.point.lon,
                self.emission,
                self.status,
                self.gas.so2,
                self.gas.no2,
                self.gas.co,
                self.source,
            ),
            MapLayer::GasLevels => format!("{}\nSO₂: {:.3} ppm", self.region, self.gas.so2),
        }
    }
}

/// Every status entry with a usable position, in status-map order.
///
/// Entries with a zero latitude or longitude (or no position at all) are
/// left out.
#[must_use]
pub fn map_points(status: &StatusMap) -> Vec<MapPoint> {
    status
        .iter()
        .filter_map(|(id, entry)| MapPoint::from_status(id, entry))
        .collect()
}

/// A marker ready to draw. Clicking it selects `location_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub location_id: String,
    pub point: GeoPoint,
    pub size: f64,
    pub color_value: f64,
    pub color: Rgb,
    pub hover_text: String,
}

/// Encodes `points` for `layer`, stretching its color scale over the
/// points' own value range.
#[must_use]
pub fn markers(points: &[MapPoint], layer: MapLayer) -> Vec<MapMarker> {
    let scale: ColorScale = match layer {
        MapLayer::Emissions => EMISSION_SCALE,
        MapLayer::GasLevels => SO2_SCALE,
    };
    let (min, max) = points
        .iter()
        .map(|p| p.encoding(layer).color_value)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    points
        .iter()
        .map(|p| {
            let encoding = p.encoding(layer);
            MapMarker {
                location_id: p.location_id.clone(),
                point: p.point,
                size: encoding.size,
                color_value: encoding.color_value,
                color: scale.over(encoding.color_value, min, max),
                hover_text: p.hover_text(layer),
            }
        })
        .collect()
}

/// Visible map window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center: GeoPoint,
    pub lon_range: (f64, f64),
    pub lat_range: (f64, f64),
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            lon_range: DEFAULT_LON_RANGE,
            lat_range: DEFAULT_LAT_RANGE,
        }
    }
}

/// Fits the viewport to the station extents, padded by
/// [`VIEWPORT_PADDING`].
#[must_use]
pub fn viewport(bounds: Option<&Bounds>) -> MapViewport {
    let mut view = MapViewport::default();
    let Some(bounds) = bounds else {
        return view;
    };
    if let Some(center) = bounds.center {
        view.center = center;
    }
    if let Some(range) = bounds.coordinate_range {
        view.lon_range = (range.lon_min - VIEWPORT_PADDING, range.lon_max + VIEWPORT_PADDING);
        view.lat_range = (range.lat_min - VIEWPORT_PADDING, range.lat_max + VIEWPORT_PADDING);
    }
    view
}

/// Summary tile for one station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationCard {
    pub location_id: String,
    pub region: String,
    pub status: StatusLevel,
    pub color: StatusColor,
    pub emission: f64,
    pub point: Option<GeoPoint>,
    pub gas: GasPpm,
    pub location_type: LocationType,
    pub selected: bool,
}

/// The first [`MAX_STATION_CARDS`] status entries, positioned or not.
#[must_use]
pub fn station_cards(status: &StatusMap, selection: &Selection) -> Vec<StationCard> {
    status
        .iter()
        .take(MAX_STATION_CARDS)
        .map(|(id, entry)| StationCard {
            location_id: id.clone(),
            region: if entry.region.is_empty() {
                "Unknown Region".to_string()
            } else {
                entry.region.clone()
            },
            status: entry.status,
            color: entry.color,
            emission: entry.emission,
            point: entry.location,
            gas: GasPpm::from(entry.gas_levels),
            location_type: entry.location_type.clone(),
            selected: selection.location_id() == Some(id.as_str()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use co2_monitor_emission_models::{CoordinateRange, GasLevels};

    use super::*;

    fn status(lat: f64, lon: f64, emission: f64, so2: f64) -> CurrentStatus {
        let level = StatusLevel::classify(emission);
        CurrentStatus {
            emission,
            status: level,
            color: level.color(),
            gas_levels: GasLevels {
                so2,
                no2: 0.000_04,
                co: 0.02,
            },
            location: Some(GeoPoint::new(lat, lon)),
            region: "Kigali City".to_string(),
            location_type: LocationType::Urban,
            source: "train".to_string(),
            alert_level: None,
            timestamp: None,
            data_quality: None,
            data_freshness: None,
            coordinates_string: None,
        }
    }

    #[test]
    fn excludes_sentinel_coordinates_and_keeps_the_rest_once() {
        let mut map = StatusMap::new();
        map.insert("origin".to_string(), status(0.0, 0.0, 10.0, 0.0));
        map.insert("no-lat".to_string(), status(0.0, 30.1, 10.0, 0.0));
        map.insert("no-lon".to_string(), status(-1.9, 0.0, 10.0, 0.0));
        map.insert("a".to_string(), status(-1.95, 30.06, 10.0, 0.0));
        map.insert("b".to_string(), status(-2.6, 29.74, 10.0, 0.0));
        let mut unplaced = status(1.0, 1.0, 10.0, 0.0);
        unplaced.location = None;
        map.insert("unplaced".to_string(), unplaced);

        let ids: Vec<String> = map_points(&map).into_iter().map(|p| p.location_id).collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn emission_marker_size_is_clamped() {
        assert!((MarkerEncoding::emission(0.0).size - 15.0).abs() < f64::EPSILON);
        assert!((MarkerEncoding::emission(20.0).size - 25.0).abs() < f64::EPSILON);
        assert!((MarkerEncoding::emission(500.0).size - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn so2_marker_size_has_floor() {
        let encoding = MarkerEncoding::so2(0.000_001);
        assert!((encoding.size - 20.0).abs() < 1e-9);
        assert!((encoding.color_value - 1.0).abs() < 1e-9);
        assert!((MarkerEncoding::so2(-0.5).size - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn marker_colors_span_the_scale() {
        let map = StatusMap::from([
            ("a".to_string(), status(-1.9, 30.0, 20.0, 0.0)),
            ("b".to_string(), status(-1.8, 30.1, 120.0, 0.0)),
        ]);
        let markers = markers(&map_points(&map), MapLayer::Emissions);
        assert_eq!(markers[0].color.to_string(), "#22c55e");
        assert_eq!(markers[1].color.to_string(), "#ef4444");
        assert_eq!(markers[1].location_id, "b");
    }

    #[test]
    fn hover_text_depends_on_layer() {
        let map = StatusMap::from([("a".to_string(), status(-1.9, 30.0, 88.5, 0.000_12))]);
        let point = &map_points(&map)[0];

        let full = point.hover_text(MapLayer::Emissions);
        assert!(full.contains("CO₂ Emission: 88.50"));
        assert!(full.contains("Status: MEDIUM"));
        assert!(full.contains("SO₂: 120.000 ppm"));
        assert!(full.contains("CO: 20.00 ppm"));

        assert_eq!(
            point.hover_text(MapLayer::GasLevels),
            "Kigali City\nSO₂: 120.000 ppm"
        );
    }

    #[test]
    fn viewport_defaults_and_padding() {
        assert_eq!(viewport(None), MapViewport::default());

        let bounds = Bounds {
            center: Some(GeoPoint::new(-2.0, 29.9)),
            coordinate_range: Some(CoordinateRange {
                lat_min: -2.5,
                lat_max: -1.5,
                lon_min: 29.0,
                lon_max: 30.5,
                lat_center: None,
                lon_center: None,
            }),
            ..Bounds::default()
        };
        let view = viewport(Some(&bounds));
        assert_eq!(view.center, GeoPoint::new(-2.0, 29.9));
        assert!((view.lon_range.0 - 28.8).abs() < 1e-9);
        assert!((view.lat_range.1 - -1.3).abs() < 1e-9);
    }

    #[test]
    fn layer_names_and_toggle() {
        assert_eq!(MapLayer::GasLevels.to_string(), "gas-levels");
        assert_eq!("emissions".parse::<MapLayer>().unwrap(), MapLayer::Emissions);
        assert_eq!(MapLayer::Emissions.toggled(), MapLayer::GasLevels);
    }

    #[test]
    fn cards_include_unplaced_stations_and_mark_selection() {
        let mut map = StatusMap::new();
        for i in 0..25 {
            map.insert(format!("s{i:02}"), status(0.0, 0.0, 10.0, 0.0));
        }
        let cards = station_cards(&map, &Selection::Selected("s03".to_string()));
        assert_eq!(cards.len(), MAX_STATION_CARDS);
        assert!(cards[3].selected);
        assert_eq!(cards.iter().filter(|c| c.selected).count(), 1);
    }
}

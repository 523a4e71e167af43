//! JSON export of the registry joined with current status.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use co2_monitor_emission_models::{LocationType, Registry, StatusMap};
use serde::Serialize;
use serde_json::{Map, Value};

/// Status written for stations without a status entry.
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

/// Registry entries shown in the export preview.
pub const PREVIEW_LEN: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Every registry field of each station plus `current_emission` (0 when
/// unknown) and `current_status` (`"UNKNOWN"` when unknown), keyed by
/// location identity.
///
/// The two current fields win over same-named registry fields.
///
/// # Errors
///
/// * If a registry entry cannot be represented as JSON
pub fn export_locations(
    registry: &Registry,
    status: &StatusMap,
) -> Result<BTreeMap<String, Map<String, Value>>, ExportError> {
    registry
        .iter()
        .map(|(id, location)| {
            let mut record = match serde_json::to_value(location)? {
                Value::Object(fields) => fields,
                _ => Map::new(),
            };
            let current = status.get(id);
            record.insert(
                "current_emission".to_string(),
                Value::from(current.map_or(0.0, |s| s.emission)),
            );
            record.insert(
                "current_status".to_string(),
                Value::from(current.map_or(UNKNOWN_STATUS, |s| s.status.as_ref())),
            );
            Ok((id.clone(), record))
        })
        .collect()
}

/// `rwanda_co2_locations_<YYYY-MM-DD>.json`
#[must_use]
pub fn export_filename(date: NaiveDate) -> String {
    format!("rwanda_co2_locations_{}.json", date.format("%Y-%m-%d"))
}

/// Pretty-printed JSON of [`export_locations`].
///
/// # Errors
///
/// * If serialization fails
pub fn to_json_pretty(registry: &Registry, status: &StatusMap) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&export_locations(
        registry, status,
    )?)?)
}

/// Writes the export for `date` into `dir` and returns the file path.
///
/// # Errors
///
/// * If serialization fails
/// * If the file cannot be written
pub fn write_export(
    dir: &Path,
    date: NaiveDate,
    registry: &Registry,
    status: &StatusMap,
) -> Result<PathBuf, ExportError> {
    let json = to_json_pretty(registry, status)?;
    let path = dir.join(export_filename(date));
    std::fs::write(&path, json).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    log::info!("Exported {} locations to {}", registry.len(), path.display());
    Ok(path)
}

/// Short form of a station shown before exporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRecord {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub region: String,
    /// Emission to two decimals, `"N/A"` without a status entry.
    pub current_emission: String,
}

/// The first [`PREVIEW_LEN`] registry entries in short form.
#[must_use]
pub fn export_preview(registry: &Registry, status: &StatusMap) -> BTreeMap<String, PreviewRecord> {
    registry
        .iter()
        .take(PREVIEW_LEN)
        .map(|(id, location)| {
            let record = PreviewRecord {
                lat: location.lat,
                lon: location.lon,
                location_type: location.location_type.clone(),
                region: location.region.clone(),
                current_emission: status
                    .get(id)
                    .map_or_else(|| "N/A".to_string(), |s| format!("{:.2}", s.emission)),
            };
            (id.clone(), record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use co2_monitor_emission_models::{CurrentStatus, GasLevels, Location, StatusLevel};
    use serde_json::json;

    use super::*;

    fn location(region: &str) -> Location {
        Location {
            lat: -1.95,
            lon: 30.06,
            location_type: LocationType::Industrial,
            region: region.to_string(),
            source: "train".to_string(),
            extra: BTreeMap::from([
                ("data_points".to_string(), json!(12)),
                ("current_emission".to_string(), json!(1.0)),
            ]),
        }
    }

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
    fn empty_inputs_export_empty_mapping() {
        let records = export_locations(&Registry::new(), &StatusMap::new()).unwrap();
        assert!(records.is_empty());
        assert_eq!(to_json_pretty(&Registry::new(), &StatusMap::new()).unwrap(), "{}");
    }

    #[test]
    fn joins_status_and_defaults_missing_entries() {
        let registry = Registry::from([
            ("a".to_string(), location("Kigali")),
            ("b".to_string(), location("Huye")),
        ]);
        let status = StatusMap::from([("a".to_string(), status(120.5))]);

        let records = export_locations(&registry, &status).unwrap();

        let a = &records["a"];
        assert_eq!(a["current_emission"], json!(120.5));
        assert_eq!(a["current_status"], json!("HIGH"));
        assert_eq!(a["type"], json!("industrial"));
        assert_eq!(a["data_points"], json!(12));
        assert_eq!(a["region"], json!("Kigali"));

        let b = &records["b"];
        assert_eq!(b["current_emission"], json!(0.0));
        assert_eq!(b["current_status"], json!("UNKNOWN"));
    }

    #[test]
    fn filename_encodes_date() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(export_filename(date), "rwanda_co2_locations_2024-05-01.json");
    }

    #[test]
    fn writes_pretty_json_file() {
        let dir = std::env::temp_dir().join("co2_monitor_export_test");
        std::fs::create_dir_all(&dir).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let registry = Registry::from([("a".to_string(), location("Kigali"))]);

        let path = write_export(&dir, date, &registry, &StatusMap::new()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n  \"a\": {"));
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["a"]["current_status"], json!("UNKNOWN"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = std::env::temp_dir().join("co2_monitor_export_missing/nested");
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let err = write_export(&dir, date, &Registry::new(), &StatusMap::new()).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }

    #[test]
    fn preview_takes_first_five_with_formatted_emission() {
        let registry: Registry = (0..7)
            .map(|i| (format!("L{i}"), location("R")))
            .collect();
        let status = StatusMap::from([("L0".to_string(), status(42.0))]);

        let preview = export_preview(&registry, &status);

        assert_eq!(preview.len(), PREVIEW_LEN);
        assert_eq!(preview["L0"].current_emission, "42.00");
        assert_eq!(preview["L1"].current_emission, "N/A");
    }
}

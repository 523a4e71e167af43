//! Last-known value of every synchronized series.
//!
//! Each series lives in its own lock, so a replace is atomic for that
//! series alone. Readers may observe a new registry next to an old
//! status map; they never observe half of a registry.

use std::sync::{Arc, PoisonError, RwLock};

use co2_monitor_emission_models::{
    AnalysisBundle, Bounds, LocationDetail, Reading, Registry, Snapshot, StatusMap,
};
use strum_macros::{AsRefStr, Display, EnumIter};

/// Names of the series held by a [`SnapshotStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SeriesName {
    Readings,
    Status,
    Registry,
    Bounds,
    Analysis,
    Detail,
}

/// A freshly fetched value for one series.
#[derive(Debug, Clone)]
pub enum SeriesValue {
    Readings(Vec<Reading>),
    Status(StatusMap),
    Registry(Registry),
    Bounds(Bounds),
    Analysis(AnalysisBundle),
    Detail(LocationDetail),
}

impl SeriesValue {
    /// The series this value belongs to.
    #[must_use]
    pub const fn name(&self) -> SeriesName {
        match self {
            Self::Readings(_) => SeriesName::Readings,
            Self::Status(_) => SeriesName::Status,
            Self::Registry(_) => SeriesName::Registry,
            Self::Bounds(_) => SeriesName::Bounds,
            Self::Analysis(_) => SeriesName::Analysis,
            Self::Detail(_) => SeriesName::Detail,
        }
    }

    /// The value installed when the first fetch of `name` fails.
    ///
    /// Only list- and mapping-shaped series have an empty form; bounds,
    /// analysis, and detail stay absent instead.
    #[must_use]
    pub fn empty(name: SeriesName) -> Option<Self> {
        match name {
            SeriesName::Readings => Some(Self::Readings(Vec::new())),
            SeriesName::Status => Some(Self::Status(StatusMap::new())),
            SeriesName::Registry => Some(Self::Registry(Registry::new())),
            SeriesName::Bounds | SeriesName::Analysis | SeriesName::Detail => None,
        }
    }
}

type Slot<T> = RwLock<Option<Arc<T>>>;

fn read_slot<T>(slot: &Slot<T>) -> Option<Arc<T>> {
    slot.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn write_slot<T>(slot: &Slot<T>, value: Option<Arc<T>>) {
    *slot.write().unwrap_or_else(PoisonError::into_inner) = value;
}

fn fill_slot<T>(slot: &Slot<T>, value: T) -> bool {
    let mut guard = slot.write().unwrap_or_else(PoisonError::into_inner);
    if guard.is_some() {
        return false;
    }
    *guard = Some(Arc::new(value));
    true
}

/// Holds the last-replaced value of each series.
///
/// Once [`SnapshotStore::seal`] returns, every mutating call is a no-op;
/// a write racing with `seal` either lands before it or not at all.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    readings: Slot<Vec<Reading>>,
    status: Slot<StatusMap>,
    registry: Slot<Registry>,
    bounds: Slot<Bounds>,
    analysis: Slot<AnalysisBundle>,
    detail: Slot<LocationDetail>,
    sealed: RwLock<bool>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` unless the store has been sealed, returning whether it ran.
    fn mutate(&self, f: impl FnOnce()) -> bool {
        let sealed = self.sealed.read().unwrap_or_else(PoisonError::into_inner);
        if *sealed {
            return false;
        }
        f();
        true
    }

    /// Swaps the series `value` belongs to for `value`.
    ///
    /// Returns `false` if the store is sealed.
    pub fn replace(&self, value: SeriesValue) -> bool {
        self.mutate(|| match value {
            SeriesValue::Readings(v) => write_slot(&self.readings, Some(Arc::new(v))),
            SeriesValue::Status(v) => write_slot(&self.status, Some(Arc::new(v))),
            SeriesValue::Registry(v) => write_slot(&self.registry, Some(Arc::new(v))),
            SeriesValue::Bounds(v) => write_slot(&self.bounds, Some(Arc::new(v))),
            SeriesValue::Analysis(v) => write_slot(&self.analysis, Some(Arc::new(v))),
            SeriesValue::Detail(v) => write_slot(&self.detail, Some(Arc::new(v))),
        })
    }

    /// Installs `value` only if its series has never held a value.
    ///
    /// Returns `true` if it was installed.
    pub fn replace_if_absent(&self, value: SeriesValue) -> bool {
        let mut installed = false;
        self.mutate(|| {
            installed = match value {
                SeriesValue::Readings(v) => fill_slot(&self.readings, v),
                SeriesValue::Status(v) => fill_slot(&self.status, v),
                SeriesValue::Registry(v) => fill_slot(&self.registry, v),
                SeriesValue::Bounds(v) => fill_slot(&self.bounds, v),
                SeriesValue::Analysis(v) => fill_slot(&self.analysis, v),
                SeriesValue::Detail(v) => fill_slot(&self.detail, v),
            };
        });
        installed
    }

    /// Resets `name` to absent.
    ///
    /// Returns `false` if the store is sealed.
    pub fn clear(&self, name: SeriesName) -> bool {
        self.mutate(|| match name {
            SeriesName::Readings => write_slot(&self.readings, None),
            SeriesName::Status => write_slot(&self.status, None),
            SeriesName::Registry => write_slot(&self.registry, None),
            SeriesName::Bounds => write_slot(&self.bounds, None),
            SeriesName::Analysis => write_slot(&self.analysis, None),
            SeriesName::Detail => write_slot(&self.detail, None),
        })
    }

    /// Whether `name` currently holds a value.
    #[must_use]
    pub fn contains(&self, name: SeriesName) -> bool {
        match name {
            SeriesName::Readings => self.readings().is_some(),
            SeriesName::Status => self.status().is_some(),
            SeriesName::Registry => self.registry().is_some(),
            SeriesName::Bounds => self.bounds().is_some(),
            SeriesName::Analysis => self.analysis().is_some(),
            SeriesName::Detail => self.detail().is_some(),
        }
    }

    #[must_use]
    pub fn readings(&self) -> Option<Arc<Vec<Reading>>> {
        read_slot(&self.readings)
    }

    #[must_use]
    pub fn status(&self) -> Option<Arc<StatusMap>> {
        read_slot(&self.status)
    }

    #[must_use]
    pub fn registry(&self) -> Option<Arc<Registry>> {
        read_slot(&self.registry)
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Arc<Bounds>> {
        read_slot(&self.bounds)
    }

    #[must_use]
    pub fn analysis(&self) -> Option<Arc<AnalysisBundle>> {
        read_slot(&self.analysis)
    }

    #[must_use]
    pub fn detail(&self) -> Option<Arc<LocationDetail>> {
        read_slot(&self.detail)
    }

    /// Captures the current value of every series.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            readings: self.readings(),
            status: self.status(),
            registry: self.registry(),
            bounds: self.bounds(),
            analysis: self.analysis(),
            detail: self.detail(),
        }
    }

    /// Permanently rejects further mutation.
    ///
    /// Blocks until any in-progress write has finished.
    pub fn seal(&self) {
        *self.sealed.write().unwrap_or_else(PoisonError::into_inner) = true;
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        *self.sealed.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use co2_monitor_emission_models::{CurrentStatus, StatusLevel};
    use strum::IntoEnumIterator as _;

    use super::*;

    fn status_map(emission: f64) -> StatusMap {
        let level = StatusLevel::classify(emission);
        let status = CurrentStatus {
            emission,
            status: level,
            color: level.color(),
            gas_levels: co2_monitor_emission_models::GasLevels::default(),
            location: None,
            region: "Kigali".to_string(),
            location_type: co2_monitor_emission_models::LocationType::Urban,
            source: "test".to_string(),
            alert_level: None,
            timestamp: None,
            data_quality: None,
            data_freshness: None,
            coordinates_string: None,
        };
        StatusMap::from([("Kigali-1".to_string(), status)])
    }

    #[test]
    fn absent_before_first_replace() {
        let store = SnapshotStore::new();
        for name in SeriesName::iter() {
            assert!(!store.contains(name), "{name} should start absent");
        }
        let snapshot = store.snapshot();
        assert!(snapshot.readings.is_none());
        assert!(snapshot.detail.is_none());
    }

    #[test]
    fn replace_swaps_one_series_only() {
        let store = SnapshotStore::new();
        assert!(store.replace(SeriesValue::Registry(Registry::new())));
        assert!(store.replace(SeriesValue::Status(status_map(40.0))));
        assert!(store.replace(SeriesValue::Status(status_map(120.0))));

        let status = store.status().unwrap();
        assert_eq!(status["Kigali-1"].status, StatusLevel::High);
        assert!(store.registry().unwrap().is_empty());
        assert!(!store.contains(SeriesName::Readings));
    }

    #[test]
    fn held_snapshot_survives_replace() {
        let store = SnapshotStore::new();
        store.replace(SeriesValue::Status(status_map(40.0)));
        let before = store.snapshot();
        store.replace(SeriesValue::Status(status_map(120.0)));

        let held = before.status.unwrap();
        assert_eq!(held["Kigali-1"].status, StatusLevel::Low);
    }

    #[test]
    fn replace_if_absent_only_fills_empty_slots() {
        let store = SnapshotStore::new();
        assert!(store.replace_if_absent(SeriesValue::Status(status_map(40.0))));
        assert!(!store.replace_if_absent(SeriesValue::Status(StatusMap::new())));
        assert_eq!(store.status().unwrap().len(), 1);
    }

    #[test]
    fn clear_resets_to_absent() {
        let store = SnapshotStore::new();
        store.replace(SeriesValue::Detail(LocationDetail::default()));
        assert!(store.clear(SeriesName::Detail));
        assert!(store.detail().is_none());
    }

    #[test]
    fn sealed_store_rejects_writes_but_keeps_values() {
        let store = SnapshotStore::new();
        store.replace(SeriesValue::Status(status_map(40.0)));
        store.seal();

        assert!(store.is_sealed());
        assert!(!store.replace(SeriesValue::Status(StatusMap::new())));
        assert!(!store.replace_if_absent(SeriesValue::Readings(Vec::new())));
        assert!(!store.clear(SeriesName::Status));
        assert_eq!(store.status().unwrap().len(), 1);
        assert!(store.readings().is_none());
    }

    #[test]
    fn empty_forms() {
        assert!(matches!(
            SeriesValue::empty(SeriesName::Readings),
            Some(SeriesValue::Readings(v)) if v.is_empty()
        ));
        assert!(SeriesValue::empty(SeriesName::Bounds).is_none());
        assert!(SeriesValue::empty(SeriesName::Detail).is_none());
        assert_eq!(
            SeriesValue::empty(SeriesName::Registry).map(|v| v.name()),
            Some(SeriesName::Registry)
        );
    }

    #[test]
    fn series_names_are_snake_case() {
        assert_eq!(SeriesName::Readings.to_string(), "readings");
        assert_eq!(SeriesName::Analysis.as_ref(), "analysis");
    }
}

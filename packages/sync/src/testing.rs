//! In-memory [`EmissionApi`] with switchable failures and latency.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use co2_monitor_client::{EmissionApi, FetchError};
use co2_monitor_emission_models::{
    AnalysisBundle, Bounds, CurrentStatus, GasLevels, GeoPoint, Location, LocationDetail,
    LocationType, Reading, Registry, StatusLevel, StatusMap, Timestamp,
};

const STATIONS: [(&str, f64, f64, f64); 2] = [
    ("Kigali-1", -1.956, 30.128, 120.0),
    ("Musanze-2", -1.499, 29.635, 35.0),
];

#[derive(Default)]
pub struct FakeApi {
    failing: AtomicBool,
    status_failing: AtomicBool,
    primary_delay: Mutex<Duration>,
    detail_delays: Mutex<BTreeMap<String, Duration>>,
    realtime_calls: AtomicUsize,
    status_calls: AtomicUsize,
    analysis_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl FakeApi {
    pub fn healthy() -> Self {
        Self::default()
    }

    /// Makes every endpoint fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_status_failing(&self, failing: bool) {
        self.status_failing.store(failing, Ordering::SeqCst);
    }

    /// Latency of each of the four primary endpoints.
    pub fn set_primary_delay(&self, delay: Duration) {
        *self.primary_delay.lock().unwrap() = delay;
    }

    pub fn set_detail_delay(&self, location_id: &str, delay: Duration) {
        self.detail_delays
            .lock()
            .unwrap()
            .insert(location_id.to_string(), delay);
    }

    pub fn realtime_calls(&self) -> usize {
        self.realtime_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn analysis_calls(&self) -> usize {
        self.analysis_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    async fn primary(&self) -> Result<(), FetchError> {
        let delay = *self.primary_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.check()
    }

    fn check(&self) -> Result<(), FetchError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::InvalidUrl {
                message: "service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl EmissionApi for FakeApi {
    async fn realtime_data(&self) -> Result<Vec<Reading>, FetchError> {
        self.realtime_calls.fetch_add(1, Ordering::SeqCst);
        self.primary().await?;
        let at = |raw: &str| Timestamp::parse(raw).unwrap();
        Ok(vec![
            Reading::new("Kigali-1".to_string(), at("2024-05-01T12:00:00"), Some(118.0)),
            Reading::new("Musanze-2".to_string(), at("2024-05-01T12:00:00"), Some(36.0)),
            Reading::new("Kigali-1".to_string(), at("2024-05-01T12:00:03"), Some(120.0)),
        ])
    }

    async fn current_status(&self) -> Result<StatusMap, FetchError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.primary().await?;
        if self.status_failing.load(Ordering::SeqCst) {
            return Err(FetchError::InvalidUrl {
                message: "status unavailable".to_string(),
            });
        }
        Ok(STATIONS
            .iter()
            .map(|&(id, lat, lon, emission)| {
                let level = StatusLevel::classify(emission);
                let status = CurrentStatus {
                    emission,
                    status: level,
                    color: level.color(),
                    gas_levels: GasLevels::default(),
                    location: Some(GeoPoint::new(lat, lon)),
                    region: id.to_string(),
                    location_type: LocationType::Urban,
                    source: "fake".to_string(),
                    alert_level: Some(level.alert_level()),
                    timestamp: None,
                    data_quality: None,
                    data_freshness: None,
                    coordinates_string: None,
                };
                (id.to_string(), status)
            })
            .collect())
    }

    async fn locations(&self) -> Result<Registry, FetchError> {
        self.primary().await?;
        Ok(STATIONS
            .iter()
            .map(|&(id, lat, lon, _)| {
                let location = Location {
                    lat,
                    lon,
                    location_type: LocationType::Urban,
                    region: id.to_string(),
                    source: "fake".to_string(),
                    extra: BTreeMap::new(),
                };
                (id.to_string(), location)
            })
            .collect())
    }

    async fn bounds(&self) -> Result<Bounds, FetchError> {
        self.primary().await?;
        Ok(Bounds {
            center: Some(GeoPoint::new(-1.9, 30.0)),
            ..Bounds::default()
        })
    }

    async fn analysis(&self) -> Result<AnalysisBundle, FetchError> {
        self.analysis_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(AnalysisBundle::default())
    }

    async fn location_detail(&self, location_id: &str) -> Result<LocationDetail, FetchError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.detail_delays.lock().unwrap().get(location_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check()?;
        Ok(LocationDetail {
            location_name: Some(location_id.to_string()),
            ..LocationDetail::default()
        })
    }
}

//! Primary polling loop and the one-shot analysis fetch.

use std::sync::Arc;
use std::time::Duration;

use co2_monitor_client::{EmissionApi, FetchError};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

use crate::SyncPhase;
use crate::store::{SeriesName, SeriesValue, SnapshotStore};

/// Polls the four primary series every `period`, starting immediately.
///
/// Each tick runs in its own task, so a tick slower than `period` does
/// not hold back the next one. Aborting this future aborts every
/// in-flight tick with it.
pub(crate) async fn run_primary(
    api: Arc<dyn EmissionApi>,
    store: Arc<SnapshotStore>,
    period: Duration,
    phase: watch::Sender<SyncPhase>,
) {
    let phase = Arc::new(phase);
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut waves = JoinSet::new();
    let mut first = true;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let phase = first.then(|| phase.clone());
                first = false;
                waves.spawn(primary_wave(api.clone(), store.clone(), phase));
            }
            Some(joined) = waves.join_next() => {
                if let Err(e) = joined {
                    if e.is_panic() {
                        log::error!("Primary poll panicked: {e}");
                    }
                }
            }
        }
    }
}

/// Fetches all primary series concurrently, then applies each result on
/// its own.
///
/// `phase` is only passed to the first wave, which flips the sync to
/// [`SyncPhase::Ready`] once every fetch has settled.
async fn primary_wave(
    api: Arc<dyn EmissionApi>,
    store: Arc<SnapshotStore>,
    phase: Option<Arc<watch::Sender<SyncPhase>>>,
) {
    let (readings, status, registry, bounds) = tokio::join!(
        api.realtime_data(),
        api.current_status(),
        api.locations(),
        api.bounds(),
    );

    apply(&store, SeriesName::Readings, readings.map(SeriesValue::Readings));
    apply(&store, SeriesName::Status, status.map(SeriesValue::Status));
    apply(&store, SeriesName::Registry, registry.map(SeriesValue::Registry));
    apply(&store, SeriesName::Bounds, bounds.map(SeriesValue::Bounds));

    if let Some(phase) = phase {
        phase.send_replace(SyncPhase::Ready);
        log::info!("Initial load complete");
    }
}

/// Applies one fetch result to the store.
///
/// A failure never touches a series that already holds a value. If the
/// series has never held one, it gets its empty form so projections
/// degrade instead of waiting forever.
pub(crate) fn apply(
    store: &SnapshotStore,
    name: SeriesName,
    result: Result<SeriesValue, FetchError>,
) {
    let e = match result {
        Ok(value) => {
            store.replace(value);
            return;
        }
        Err(e) => e,
    };

    if let Some(empty) = SeriesValue::empty(name) {
        if store.replace_if_absent(empty) {
            log::warn!("Failed to load {name}, starting empty: {e}");
            return;
        }
    }

    if store.contains(name) {
        log::warn!("Failed to refresh {name}, keeping previous value: {e}");
    } else {
        log::warn!("Failed to load {name}: {e}");
    }
}

/// Fetches the analysis bundle once.
pub(crate) async fn load_analysis(api: Arc<dyn EmissionApi>, store: Arc<SnapshotStore>) {
    match api.analysis().await {
        Ok(bundle) => {
            store.replace(SeriesValue::Analysis(bundle));
            log::debug!("Analysis bundle loaded");
        }
        Err(e) => log::warn!("Failed to load {}: {e}", SeriesName::Analysis),
    }
}

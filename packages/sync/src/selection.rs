//! Which station is selected, and the detail poll that follows it.
//!
//! Every detail fetch is tagged with the selection generation and
//! location it was dispatched for. A result is applied only while that
//! tag is still current, so a slow response for a previous selection can
//! never overwrite the detail of a newer one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use co2_monitor_client::{EmissionApi, FetchError};
use co2_monitor_emission_models::{LocationDetail, Selection};
use tokio::runtime::Handle;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

use crate::store::{SeriesName, SeriesValue, SnapshotStore};

#[derive(Debug, Default)]
struct State {
    selection: Selection,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<State>,
    store: Arc<SnapshotStore>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply_detail(
        &self,
        generation: u64,
        location_id: &str,
        result: Result<LocationDetail, FetchError>,
    ) {
        let state = self.lock();
        if state.generation != generation || state.selection.location_id() != Some(location_id) {
            log::debug!("Dropping stale detail response for {location_id}");
            return;
        }

        match result {
            Ok(detail) => {
                self.store.replace(SeriesValue::Detail(detail));
            }
            Err(e) => {
                log::warn!("Failed to load detail for {location_id}: {e}");
                self.store.clear(SeriesName::Detail);
            }
        }
    }
}

/// Owns the current [`Selection`] and the lifetime of its detail poll.
pub struct SelectionController {
    shared: Arc<Shared>,
    api: Arc<dyn EmissionApi>,
    period: Duration,
    runtime: Handle,
}

impl SelectionController {
    /// Creates an unselected controller whose detail polls run on
    /// `runtime` every `period`.
    #[must_use]
    pub fn new(
        api: Arc<dyn EmissionApi>,
        store: Arc<SnapshotStore>,
        period: Duration,
        runtime: Handle,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::default()),
                store,
            }),
            api,
            period,
            runtime,
        }
    }

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.shared.lock().selection.clone()
    }

    /// Selects `location_id` and (re)starts its detail poll with an
    /// immediate fetch.
    ///
    /// Ids missing from the current registry are ignored. Re-selecting
    /// the current id keeps the detail already shown; selecting a
    /// different one clears it first.
    ///
    /// Returns whether the selection was accepted.
    pub fn select(&self, location_id: &str) -> bool {
        let store = &self.shared.store;
        let known = store
            .registry()
            .is_some_and(|registry| registry.contains_key(location_id));
        if !known {
            log::warn!("Ignoring selection of unknown location {location_id}");
            return false;
        }

        let mut state = self.shared.lock();
        if store.is_sealed() {
            return false;
        }

        if let Some(task) = state.task.take() {
            task.abort();
        }
        state.generation = state.generation.wrapping_add(1);
        if state.selection.location_id() != Some(location_id) {
            store.clear(SeriesName::Detail);
        }
        state.selection = Selection::Selected(location_id.to_string());

        state.task = Some(self.runtime.spawn(detail_loop(
            self.shared.clone(),
            self.api.clone(),
            location_id.to_string(),
            state.generation,
            self.period,
        )));

        log::info!("Selected {location_id}");
        true
    }

    /// Returns to [`Selection::Unselected`], stopping the detail poll and
    /// discarding the detail value.
    pub fn clear(&self) {
        let mut state = self.shared.lock();
        if let Some(task) = state.task.take() {
            task.abort();
        }
        state.generation = state.generation.wrapping_add(1);
        let previous = std::mem::take(&mut state.selection);
        self.shared.store.clear(SeriesName::Detail);

        if let Selection::Selected(id) = previous {
            log::info!("Cleared selection of {id}");
        }
    }

    /// Stops the detail poll without changing the selection.
    pub(crate) fn stop(&self) {
        let mut state = self.shared.lock();
        if let Some(task) = state.task.take() {
            task.abort();
        }
        state.generation = state.generation.wrapping_add(1);
    }
}

impl Drop for SelectionController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Fetches `location_id`'s detail immediately and then every `period`.
async fn detail_loop(
    shared: Arc<Shared>,
    api: Arc<dyn EmissionApi>,
    location_id: String,
    generation: u64,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut fetches = JoinSet::new();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let api = api.clone();
                let id = location_id.clone();
                fetches.spawn(async move { api.location_detail(&id).await });
            }
            Some(joined) = fetches.join_next() => {
                match joined {
                    Ok(result) => shared.apply_detail(generation, &location_id, result),
                    Err(e) if e.is_panic() => {
                        log::error!("Detail poll for {location_id} panicked: {e}");
                    }
                    Err(_) => {}
                }
            }
        }
    }
}

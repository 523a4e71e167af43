#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Keeps a client-side snapshot of the monitoring service current.
//!
//! [`DashboardSync`] owns everything with a lifetime: the primary poll,
//! the one-shot analysis fetch, and the [`SelectionController`] with its
//! detail poll. Dropping it (or calling [`DashboardSync::shutdown`])
//! seals the [`SnapshotStore`] and cancels every task, after which no
//! fetch result can change the store.
//!
//! The primary poll does not wait for a slow tick before starting the
//! next one. Two ticks may therefore be in flight at once, and whichever
//! settles last wins for each series.

pub mod poller;
pub mod selection;
pub mod store;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use std::time::Duration;

use co2_monitor_client::EmissionApi;
use co2_monitor_emission_models::{Selection, Snapshot};
use strum_macros::{AsRefStr, Display};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub use selection::SelectionController;
pub use store::{SeriesName, SeriesValue, SnapshotStore};

/// Errors starting the sync.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// [`DashboardSync::start`] was called outside a Tokio runtime.
    #[error("No Tokio runtime to run the pollers on: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Poll periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Period of the primary poll.
    pub poll_interval: Duration,
    /// Period of the detail poll while a station is selected.
    pub detail_interval: Duration,
}

impl SyncConfig {
    /// Period both polls use unless configured otherwise.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Self::DEFAULT_INTERVAL,
            detail_interval: Self::DEFAULT_INTERVAL,
        }
    }
}

/// Whether the first wave of primary fetches has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SyncPhase {
    Loading,
    Ready,
}

/// Running sync against one monitoring service.
pub struct DashboardSync {
    store: Arc<SnapshotStore>,
    selection: SelectionController,
    phase: watch::Receiver<SyncPhase>,
    tasks: Vec<JoinHandle<()>>,
}

impl DashboardSync {
    /// Starts the primary poll and the analysis fetch on the current
    /// Tokio runtime. The first primary tick fires immediately.
    ///
    /// # Errors
    ///
    /// * If called outside a Tokio runtime
    pub fn start(api: Arc<dyn EmissionApi>, config: SyncConfig) -> Result<Self, SyncError> {
        let runtime = Handle::try_current()?;
        let store = Arc::new(SnapshotStore::new());
        let (phase_tx, phase_rx) = watch::channel(SyncPhase::Loading);

        log::info!(
            "Starting sync (poll every {:?}, detail every {:?})",
            config.poll_interval,
            config.detail_interval,
        );

        let tasks = vec![
            runtime.spawn(poller::run_primary(
                api.clone(),
                store.clone(),
                config.poll_interval,
                phase_tx,
            )),
            runtime.spawn(poller::load_analysis(api.clone(), store.clone())),
        ];

        let selection =
            SelectionController::new(api, store.clone(), config.detail_interval, runtime);

        Ok(Self {
            store,
            selection,
            phase: phase_rx,
            tasks,
        })
    }

    /// The store the pollers write to.
    #[must_use]
    pub const fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Captures the current value of every series.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        *self.phase.borrow()
    }

    /// Waits until the first wave of primary fetches has settled.
    ///
    /// Returns immediately once ready, and also if the sync was torn down
    /// before getting there.
    pub async fn wait_until_ready(&self) {
        let mut phase = self.phase.clone();
        let _ = phase.wait_for(|p| *p == SyncPhase::Ready).await;
    }

    /// See [`SelectionController::select`].
    pub fn select(&self, location_id: &str) -> bool {
        self.selection.select(location_id)
    }

    /// See [`SelectionController::clear`].
    pub fn clear_selection(&self) {
        self.selection.clear();
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection.selection()
    }

    /// Stops every poll. The last snapshot stays readable through any
    /// [`SnapshotStore`] handle obtained earlier.
    pub fn shutdown(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.store.is_sealed() {
            return;
        }
        self.store.seal();
        self.selection.stop();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        log::info!("Sync stopped");
    }
}

impl Drop for DashboardSync {
    fn drop(&mut self) {
        self.teardown();
    }
}

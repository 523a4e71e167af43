//! Operations shared by the subcommands and the interactive menu.

use std::path::{Path, PathBuf};
use std::time::Duration;

use co2_monitor_cli_utils::{LoadingSpinner, MultiProgress};
use co2_monitor_emission_models::{Registry, Snapshot, StatusMap};
use co2_monitor_projection::{ExportError, MapLayer, export_preview, project, write_export};
use co2_monitor_sync::DashboardSync;
use tokio::time::MissedTickBehavior;

use crate::render::DashboardText;

/// Waits for the first wave behind a spinner.
///
/// Returns `false` if interrupted with Ctrl-C first.
pub async fn wait_until_ready(sync: &DashboardSync, multi: &MultiProgress) -> bool {
    let spinner = LoadingSpinner::new(multi, "Loading emission data...");
    tokio::select! {
        () = sync.wait_until_ready() => {
            spinner.finish_and_clear();
            true
        }
        _ = tokio::signal::ctrl_c() => {
            spinner.finish("Interrupted");
            false
        }
    }
}

/// Renders the dashboard every `period` until Ctrl-C, or until `ticks`
/// renders when given.
pub async fn watch(sync: &DashboardSync, layer: MapLayer, ticks: Option<u64>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut rendered = 0_u64;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let view = project(&sync.snapshot(), &sync.selection(), layer);
                println!("{}", DashboardText(&view));
                rendered += 1;
                if ticks.is_some_and(|n| rendered >= n) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Stopping watch");
                break;
            }
        }
    }
}

fn registry_and_status(snapshot: &Snapshot) -> (Registry, StatusMap) {
    (
        snapshot.registry.as_deref().cloned().unwrap_or_default(),
        snapshot.status.as_deref().cloned().unwrap_or_default(),
    )
}

/// Prints the short preview of what [`export`] would write.
///
/// # Errors
///
/// * If the preview cannot be serialized
pub fn print_export_preview(snapshot: &Snapshot) -> Result<(), serde_json::Error> {
    let (registry, status) = registry_and_status(snapshot);
    println!("{} locations, first entries:", registry.len());
    println!(
        "{}",
        serde_json::to_string_pretty(&export_preview(&registry, &status))?
    );
    Ok(())
}

/// Writes today's export into `dir`.
///
/// # Errors
///
/// * If the export cannot be serialized or written
pub fn export(snapshot: &Snapshot, dir: &Path) -> Result<PathBuf, ExportError> {
    let (registry, status) = registry_and_status(snapshot);
    let date = chrono::Local::now().date_naive();
    write_export(dir, date, &registry, &status)
}

pub fn print_locations(snapshot: &Snapshot) {
    let Some(registry) = snapshot.registry.as_deref().filter(|r| !r.is_empty()) else {
        println!("No locations available.");
        return;
    };
    println!("{:<20} {:<12} {:<28} {:>9} {:>9}", "ID", "TYPE", "REGION", "LAT", "LON");
    for (id, location) in registry {
        println!(
            "{:<20} {:<12} {:<28} {:>9.4} {:>9.4}",
            id,
            location.location_type.as_str(),
            location.region,
            location.lat,
            location.lon,
        );
    }
    println!("\n{} locations", registry.len());
}

//! Menu-driven dashboard session using `dialoguer`.

use co2_monitor_cli_utils::{MultiProgress, choose};
use co2_monitor_projection::MapLayer;
use co2_monitor_sync::DashboardSync;
use dialoguer::Confirm;

use crate::config::DashboardConfig;
use crate::session;

/// Top-level actions of the interactive menu.
enum Action {
    Watch,
    SelectLocation,
    ClearSelection,
    ToggleLayer,
    Export,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Watch,
        Self::SelectLocation,
        Self::ClearSelection,
        Self::ToggleLayer,
        Self::Export,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Watch => "Watch dashboard (Ctrl-C to return)",
            Self::SelectLocation => "Select location",
            Self::ClearSelection => "Clear selection",
            Self::ToggleLayer => "Toggle map layer",
            Self::Export => "Export locations",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the menu loop against an already started sync until the user
/// quits.
///
/// # Errors
///
/// * If the terminal cannot be read
/// * If an export fails
pub async fn run(
    sync: &DashboardSync,
    config: &DashboardConfig,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    if !session::wait_until_ready(sync, multi).await {
        return Ok(());
    }

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let mut layer = MapLayer::default();

    loop {
        let prompt = format!(
            "Layer: {layer}, selection: {}",
            sync.selection().location_id().unwrap_or("none")
        );
        let Some(idx) = choose(&prompt, &labels, 0)? else {
            break;
        };

        match Action::ALL[idx] {
            Action::Watch => {
                session::watch(sync, layer, None, config.sync_config().poll_interval).await;
            }
            Action::SelectLocation => select_location(sync)?,
            Action::ClearSelection => {
                sync.clear_selection();
                println!("Selection cleared.");
            }
            Action::ToggleLayer => {
                layer = layer.toggled();
                println!("Map layer: {layer}");
            }
            Action::Export => export(sync, config)?,
            Action::Quit => break,
        }
    }

    Ok(())
}

fn select_location(sync: &DashboardSync) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = sync.snapshot();
    let Some(registry) = snapshot.registry.as_deref().filter(|r| !r.is_empty()) else {
        println!("No locations available.");
        return Ok(());
    };

    let ids: Vec<&String> = registry.keys().collect();
    let labels: Vec<String> = registry
        .iter()
        .map(|(id, location)| format!("{id} ({}, {})", location.region, location.location_type))
        .collect();
    let current = sync
        .selection()
        .location_id()
        .and_then(|id| ids.iter().position(|candidate| *candidate == id))
        .unwrap_or(0);

    if let Some(idx) = choose("Select a location", &labels, current)? {
        if sync.select(ids[idx]) {
            println!("Selected {}.", ids[idx]);
        } else {
            println!("{} is no longer available.", ids[idx]);
        }
    }
    Ok(())
}

fn export(sync: &DashboardSync, config: &DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = sync.snapshot();
    session::print_export_preview(&snapshot)?;

    let confirmed = Confirm::new()
        .with_prompt(format!("Write export to {}?", config.export_dir.display()))
        .default(true)
        .interact()?;
    if confirmed {
        let path = session::export(&snapshot, &config.export_dir)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

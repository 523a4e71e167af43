#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal dashboard for the CO2 emission monitoring service.
//!
//! Keeps a snapshot of the service's readings, station status, registry,
//! bounds, and analysis in sync, and renders the derived dashboard views
//! as text. Without a subcommand an interactive menu is shown.

mod config;
mod interactive;
mod render;
mod session;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use co2_monitor_client::{EmissionApi, HttpEmissionApi};
use co2_monitor_projection::MapLayer;
use co2_monitor_sync::DashboardSync;

use crate::config::DashboardConfig;

#[derive(Parser)]
#[command(name = "co2_monitor", about = "CO2 emission monitoring dashboard")]
struct Cli {
    /// TOML config file (overrides `CO2_MONITOR_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Base URL of the emission service API (overrides config and `CO2_MONITOR_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the dashboard every poll period until Ctrl-C
    Watch {
        /// Location to select once the first data has loaded
        #[arg(long)]
        location: Option<String>,
        /// Map layer: `emissions` or `gas-levels`
        #[arg(long, default_value = "emissions")]
        layer: MapLayer,
        /// Stop after this many renders
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Export the location registry joined with current status as JSON
    Export {
        /// Output directory (defaults to `export_dir` from the config)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// List the monitored locations
    Locations,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = co2_monitor_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = DashboardConfig::load(cli.config.as_deref())?
        .with_api_url(cli.api_url)
        .normalized();

    let api: Arc<dyn EmissionApi> = Arc::new(HttpEmissionApi::new(
        &config.api_base_url,
        config.request_timeout(),
    )?);
    log::info!("Using emission service at {}", config.api_base_url);

    let sync = DashboardSync::start(api, config.sync_config())?;

    match cli.command {
        None => interactive::run(&sync, &config, &multi).await?,
        Some(Commands::Watch {
            location,
            layer,
            ticks,
        }) => {
            if session::wait_until_ready(&sync, &multi).await {
                if let Some(id) = location {
                    if !sync.select(&id) {
                        log::warn!("Location {id} is not in the registry, showing all locations");
                    }
                }
                session::watch(&sync, layer, ticks, config.sync_config().poll_interval).await;
            }
        }
        Some(Commands::Export { dir }) => {
            if session::wait_until_ready(&sync, &multi).await {
                let snapshot = sync.snapshot();
                session::print_export_preview(&snapshot)?;
                let dir = dir.unwrap_or_else(|| config.export_dir.clone());
                let path = session::export(&snapshot, &dir)?;
                println!("Wrote {}", path.display());
            }
        }
        Some(Commands::Locations) => {
            if session::wait_until_ready(&sync, &multi).await {
                session::print_locations(&sync.snapshot());
            }
        }
    }

    sync.shutdown();
    Ok(())
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing shared by the CO2 monitor binaries.
//!
//! [`init_logger`] routes `log` output through `indicatif-log-bridge` so a
//! [`LoadingSpinner`] drawn on the returned [`MultiProgress`] is suspended
//! while log lines are written.

use std::time::Duration;

use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// A steadily ticking spinner shown while waiting on the network.
pub struct LoadingSpinner {
    bar: ProgressBar,
}

impl LoadingSpinner {
    #[must_use]
    pub fn new(multi: &MultiProgress, message: &str) -> Self {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar }
    }

    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Stops the spinner, leaving `message` in its place.
    pub fn finish(self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    pub fn finish_and_clear(self) {
        self.bar.finish_and_clear();
    }
}

/// Prompts for one of `labels`.
///
/// Returns `None` when the prompt is dismissed with Esc or `q`.
///
/// # Errors
///
/// * If the terminal cannot be read
pub fn choose<T: std::fmt::Display>(
    prompt: &str,
    labels: &[T],
    default: usize,
) -> Result<Option<usize>, dialoguer::Error> {
    Select::new()
        .with_prompt(prompt)
        .items(labels)
        .default(default)
        .interact_opt()
}

/// Initializes `pretty_env_logger` (filtered by `RUST_LOG`) behind
/// `indicatif-log-bridge`.
///
/// Returns the [`MultiProgress`] every spinner must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // Already set when called twice.
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}

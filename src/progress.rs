//! Terminal progress display for applying a mods update
//!
//! Shows a spinner until the executor knows how much work there is, then a
//! percentage bar. Implements [`ProgressObserver`] so it can be handed
//! straight to the plan executor.

use crate::sync::{ApplyPhase, ProgressObserver, ProgressUpdate};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Progress reporter for the update workflow
pub struct Progress {
    /// Whether progress display is enabled (disabled in quiet/json mode)
    enabled: bool,
    /// Current bar; the executor reports through `&self`
    bar: Mutex<Option<ActiveBar>>,
}

struct ActiveBar {
    bar: ProgressBar,
    determinate: bool,
}

fn phase_message(phase: ApplyPhase) -> &'static str {
    match phase {
        ApplyPhase::Downloading => "Downloading mods",
        ApplyPhase::Deleting => "Removing old mods",
    }
}

fn spinner_bar() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn percent_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}%")
        .map(|s| s.progress_chars("█▓▒░"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

impl Progress {
    /// Create a new progress reporter
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            bar: Mutex::new(None),
        }
    }

    /// Create a disabled progress reporter
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Show a spinner with a message for an indeterminate operation
    pub fn spinner(&self, message: &str) {
        if !self.enabled {
            return;
        }
        let bar = spinner_bar();
        bar.set_message(message.to_string());
        self.replace(Some(ActiveBar {
            bar,
            determinate: false,
        }));
    }

    /// Finish and clear the current bar
    pub fn finish_and_clear(&self) {
        self.replace(None);
    }

    fn replace(&self, next: Option<ActiveBar>) {
        let Ok(mut slot) = self.bar.lock() else {
            return;
        };
        if let Some(old) = slot.take() {
            old.bar.finish_and_clear();
        }
        *slot = next;
    }

    fn update(&self, update: ProgressUpdate) {
        let Ok(mut slot) = self.bar.lock() else {
            return;
        };
        let wanted_determinate = !update.indeterminate;
        let reuse = slot
            .as_ref()
            .is_some_and(|active| active.determinate == wanted_determinate);

        if !reuse {
            if let Some(old) = slot.take() {
                old.bar.finish_and_clear();
            }
            let bar = if wanted_determinate {
                percent_bar()
            } else {
                spinner_bar()
            };
            *slot = Some(ActiveBar {
                bar,
                determinate: wanted_determinate,
            });
        }

        if let Some(active) = slot.as_ref() {
            active.bar.set_message(phase_message(update.phase));
            if wanted_determinate {
                active.bar.set_position(u64::from(update.percent));
            }
        }
    }
}

impl ProgressObserver for Progress {
    fn report_progress(&self, update: ProgressUpdate) {
        if self.enabled {
            self.update(update);
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        if let Ok(slot) = self.bar.get_mut() {
            if let Some(active) = slot.take() {
                active.bar.finish_and_clear();
            }
        }
    }
}

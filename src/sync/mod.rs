//! Mods directory synchronization
//!
//! This module provides:
//! - Local mods directory snapshot
//! - Mod set differ producing the download/delete plan
//! - Plan executor with progress reporting

mod differ;
mod executor;
mod local;

pub use differ::compute_plan;
pub use executor::{download_url, ApplyOutcome, ModsUpdateResult, UpdatePlanExecutor};
pub use local::LocalMods;

use serde::Serialize;

/// Which part of the plan is being applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyPhase {
    Downloading,
    Deleting,
}

/// One progress notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub phase: ApplyPhase,
    /// True until the amount of work is known
    pub indeterminate: bool,
    /// 0..=100, meaningful only when not indeterminate
    pub percent: u8,
}

impl ProgressUpdate {
    pub fn indeterminate(phase: ApplyPhase) -> Self {
        Self {
            phase,
            indeterminate: true,
            percent: 0,
        }
    }

    pub fn determinate(phase: ApplyPhase, percent: u8) -> Self {
        Self {
            phase,
            indeterminate: false,
            percent: percent.min(100),
        }
    }
}

/// Receives progress notifications from the executor
///
/// Called synchronously from the task applying the plan; implementations
/// must not block.
pub trait ProgressObserver: Send + Sync {
    fn report_progress(&self, update: ProgressUpdate);
}

impl<F> ProgressObserver for F
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report_progress(&self, update: ProgressUpdate) {
        self(update)
    }
}

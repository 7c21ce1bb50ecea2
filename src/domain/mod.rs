//! Core domain models for modsync
//!
//! This module contains the fundamental types used throughout the application:
//! - Launcher version numbers and their format-aware ordering
//! - The persisted record of installed mods
//! - Check outcomes and the download/delete plan
//! - Terminal states and the context of an update pass

mod plan;
mod records;
mod state;
mod version;

pub use plan::{AppCheckResult, ModsCheckResult, UpdatePlan};
pub use records::{ModRecordSet, MOD_RECORD_PREFIX};
pub use state::{SyncPhase, SyncState, UpdateContext};
pub use version::{VersionFormat, VersionNumber};

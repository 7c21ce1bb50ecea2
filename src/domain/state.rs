//! Update pass states and the context carried between steps

use super::{ModsCheckResult, VersionNumber};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Non-terminal phases of an update pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    CheckingAppVersion,
    CheckingMods,
    ModsUpdating,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncPhase::Idle => "idle",
            SyncPhase::CheckingAppVersion => "checking_app_version",
            SyncPhase::CheckingMods => "checking_mods",
            SyncPhase::ModsUpdating => "mods_updating",
        };
        f.write_str(name)
    }
}

/// Terminal state of one update pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncState {
    /// A newer launcher exists; mods are not checked until it is installed
    AppUpdateAvailable { remote_version: String },
    /// Plan applied completely
    SyncOk { downloaded: usize, deleted: usize },
    /// A download failed; files written before the failure remain
    SyncFailed { downloaded: usize, message: String },
    /// Mods already match the manifest
    NoUpdateNeeded,
    /// Mods check could not produce a plan
    ModCheckFailed {
        outcome: ModsCheckResult,
        message: String,
    },
    /// Transport failure during the launcher version check
    ConnectionIssue { message: String },
    /// No mods manifest endpoint is configured
    UpdatesDisabled,
}

impl SyncState {
    /// Returns true if the pass ended in a state the user should act on
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SyncState::SyncFailed { .. }
                | SyncState::ModCheckFailed { .. }
                | SyncState::ConnectionIssue { .. }
        )
    }

    /// Short machine-friendly name of the state
    pub fn name(&self) -> &'static str {
        match self {
            SyncState::AppUpdateAvailable { .. } => "app_update_available",
            SyncState::SyncOk { .. } => "sync_ok",
            SyncState::SyncFailed { .. } => "sync_failed",
            SyncState::NoUpdateNeeded => "no_update_needed",
            SyncState::ModCheckFailed { .. } => "mod_check_failed",
            SyncState::ConnectionIssue { .. } => "connection_issue",
            SyncState::UpdatesDisabled => "updates_disabled",
        }
    }
}

/// Immutable facts gathered during a pass
///
/// Each step returns an extended copy instead of mutating shared fields, so
/// the presentation layer only ever sees a finished snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateContext {
    /// Version of the running launcher
    pub app_version: VersionNumber,
    /// Version published by the server, once fetched
    pub remote_version: Option<VersionNumber>,
    /// Profile whose mods directory is synchronized
    pub profile_name: Option<String>,
    /// Resolved mods directory, once known
    pub target_directory: Option<PathBuf>,
    /// Where a newer launcher can be downloaded
    pub launcher_download_url: Option<String>,
    pub website_url: Option<String>,
    /// News text, if it was loaded
    pub news: Option<String>,
}

impl UpdateContext {
    pub fn new(app_version: VersionNumber) -> Self {
        Self {
            app_version,
            remote_version: None,
            profile_name: None,
            target_directory: None,
            launcher_download_url: None,
            website_url: None,
            news: None,
        }
    }

    pub fn with_remote_version(self, remote_version: VersionNumber) -> Self {
        Self {
            remote_version: Some(remote_version),
            ..self
        }
    }

    pub fn with_profile_name(self, profile_name: Option<String>) -> Self {
        Self {
            profile_name,
            ..self
        }
    }

    pub fn with_target_directory(self, target_directory: Option<PathBuf>) -> Self {
        Self {
            target_directory,
            ..self
        }
    }

    pub fn with_links(
        self,
        launcher_download_url: Option<String>,
        website_url: Option<String>,
    ) -> Self {
        Self {
            launcher_download_url,
            website_url,
            ..self
        }
    }

    pub fn with_news(self, news: Option<String>) -> Self {
        Self { news, ..self }
    }
}

//! Check outcomes and the download/delete plan

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use crate::error::FetchError;

/// Outcome of checking the launcher version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppCheckResult {
    /// No version endpoint configured
    UpdateUrlNotSet,
    /// Server unreachable
    NoConnection,
    /// Transport failure or malformed response
    ConnectionIssue,
    /// Endpoint returned 404 or no version line
    NotFound,
    /// Local launcher is current
    NoUpdateAvailable,
    /// A newer launcher is published
    UpdateFound,
}

/// Outcome of checking the mods manifest against the local installation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModsCheckResult {
    /// No manifest endpoint configured
    UpdateUrlNotSet,
    /// Server unreachable
    NoConnection,
    /// Transport failure or malformed response
    ConnectionIssue,
    /// Manifest missing (404) or empty
    NotFound,
    /// Local mods already match the manifest
    NoUpdateAvailable,
    /// Profile path could not be resolved
    NoTargetDirectory,
    /// Profile resolved but has no `mods` directory
    NoTargetModDirectory,
    /// There is something to download or delete
    UpdateFound,
}

impl AppCheckResult {
    /// Map a transport failure to a check outcome
    pub fn from_fetch_error(error: &FetchError) -> Self {
        match error {
            FetchError::NotFound { .. } => AppCheckResult::NotFound,
            FetchError::Connect { .. } => AppCheckResult::NoConnection,
            _ => AppCheckResult::ConnectionIssue,
        }
    }
}

impl ModsCheckResult {
    /// Map a transport failure to a check outcome
    pub fn from_fetch_error(error: &FetchError) -> Self {
        match error {
            FetchError::NotFound { .. } => ModsCheckResult::NotFound,
            FetchError::Connect { .. } => ModsCheckResult::NoConnection,
            _ => ModsCheckResult::ConnectionIssue,
        }
    }
}

impl fmt::Display for ModsCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ModsCheckResult::UpdateUrlNotSet => "mods manifest URL is not configured",
            ModsCheckResult::NoConnection => "could not connect to the update server",
            ModsCheckResult::ConnectionIssue => "connection problem while checking mods",
            ModsCheckResult::NotFound => "mods manifest not found on the update server",
            ModsCheckResult::NoUpdateAvailable => "mods are up to date",
            ModsCheckResult::NoTargetDirectory => "profile directory is invalid, set it manually",
            ModsCheckResult::NoTargetModDirectory => "could not find the profile mods directory",
            ModsCheckResult::UpdateFound => "mods update found",
        };
        f.write_str(text)
    }
}

/// Result of diffing the remote manifest against the local mods directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePlan {
    pub outcome: ModsCheckResult,
    /// Resolved mods directory, set only when diffing ran
    pub target_directory: Option<PathBuf>,
    /// Remote names missing locally (original casing)
    pub to_download: BTreeSet<String>,
    /// Recorded names that are on disk but gone from the manifest
    pub to_delete: BTreeSet<String>,
    /// Diagnostic for directory resolution failures
    pub error_detail: Option<String>,
}

impl UpdatePlan {
    /// Creates a plan that carries only an outcome
    pub fn failed(outcome: ModsCheckResult) -> Self {
        Self {
            outcome,
            target_directory: None,
            to_download: BTreeSet::new(),
            to_delete: BTreeSet::new(),
            error_detail: None,
        }
    }

    /// Creates a plan for an unresolvable profile directory
    pub fn no_target_directory(detail: impl Into<String>) -> Self {
        Self {
            error_detail: Some(detail.into()),
            ..Self::failed(ModsCheckResult::NoTargetDirectory)
        }
    }

    /// Creates a plan from computed sets; the outcome follows from them
    pub fn computed(
        target_directory: impl Into<PathBuf>,
        to_download: BTreeSet<String>,
        to_delete: BTreeSet<String>,
    ) -> Self {
        let outcome = if to_download.is_empty() && to_delete.is_empty() {
            ModsCheckResult::NoUpdateAvailable
        } else {
            ModsCheckResult::UpdateFound
        };
        Self {
            outcome,
            target_directory: Some(target_directory.into()),
            to_download,
            to_delete,
            error_detail: None,
        }
    }

    /// Returns true if the plan has work to apply
    pub fn has_updates(&self) -> bool {
        self.outcome == ModsCheckResult::UpdateFound
    }

    /// Human-readable message for a failed check
    pub fn failure_message(&self) -> String {
        match &self.error_detail {
            Some(detail) => detail.clone(),
            None => self.outcome.to_string(),
        }
    }
}

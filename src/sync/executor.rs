//! Applying an update plan to the mods directory
//!
//! Downloads run first, one file at a time. The first failed download stops
//! the apply: files written so far stay on disk and stay recorded, and the
//! delete phase is skipped. Deletions are best-effort and never fail the
//! result.

use crate::domain::{ModRecordSet, UpdatePlan};
use crate::error::{FetchError, IoError};
use crate::fetch::Transport;
use crate::sync::{ApplyPhase, ProgressObserver, ProgressUpdate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Overall result of applying a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModsUpdateResult {
    UpdateOk,
    DownloadError,
}

/// What an apply did, including the updated record set
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub result: ModsUpdateResult,
    /// Record set after the apply, to be persisted by the caller
    pub records: ModRecordSet,
    /// Files downloaded and written, in order
    pub downloaded: Vec<String>,
    /// Files removed from disk
    pub deleted: Vec<String>,
    /// Reason for [`ModsUpdateResult::DownloadError`]
    pub error: Option<String>,
}

impl ApplyOutcome {
    pub fn is_ok(&self) -> bool {
        self.result == ModsUpdateResult::UpdateOk
    }
}

/// Errors that abort the download phase
#[derive(Debug, thiserror::Error)]
enum DownloadFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("refusing to write unsafe file name '{0}'")]
    UnsafeName(String),
    #[error("no download URL is configured")]
    NoBaseUrl,
}

/// Executes [`UpdatePlan`]s against a transport
pub struct UpdatePlanExecutor<'a> {
    transport: &'a dyn Transport,
    download_base_url: Option<String>,
}

impl<'a> UpdatePlanExecutor<'a> {
    /// Create an executor downloading from `{download_base_url}/mods/{name}`
    pub fn new(transport: &'a dyn Transport, download_base_url: Option<String>) -> Self {
        Self {
            transport,
            download_base_url,
        }
    }

    /// Apply `plan`, starting from the `recorded` set of installed mods
    pub async fn apply(
        &self,
        plan: &UpdatePlan,
        recorded: &ModRecordSet,
        progress: &dyn ProgressObserver,
    ) -> ApplyOutcome {
        let mut outcome = ApplyOutcome {
            result: ModsUpdateResult::UpdateOk,
            records: recorded.clone(),
            downloaded: Vec::new(),
            deleted: Vec::new(),
            error: None,
        };

        let Some(target) = plan.target_directory.as_deref() else {
            outcome.result = ModsUpdateResult::DownloadError;
            outcome.error = Some("plan has no target directory".to_string());
            return outcome;
        };

        progress.report_progress(ProgressUpdate::indeterminate(ApplyPhase::Downloading));

        let total = plan.to_download.len();
        for (index, name) in plan.to_download.iter().enumerate() {
            if let Err(e) = self.download_one(target, name).await {
                warn!(file = %name, error = %e, "download failed, aborting update");
                outcome.result = ModsUpdateResult::DownloadError;
                outcome.error = Some(format!("failed to download {}: {}", name, e));
                return outcome;
            }

            info!(file = %name, "downloaded mod");
            outcome.records.insert(name.clone());
            outcome.downloaded.push(name.clone());
            progress.report_progress(ProgressUpdate::determinate(
                ApplyPhase::Downloading,
                percent(index + 1, total),
            ));
        }

        let total = plan.to_delete.len();
        for (index, name) in plan.to_delete.iter().enumerate() {
            if delete_one(target, name).await {
                outcome.records.remove(name);
                outcome.deleted.push(name.clone());
            }
            progress.report_progress(ProgressUpdate::determinate(
                ApplyPhase::Deleting,
                percent(index + 1, total),
            ));
        }

        outcome
    }

    async fn download_one(&self, target: &Path, name: &str) -> Result<(), DownloadFailure> {
        if !is_safe_file_name(name) {
            return Err(DownloadFailure::UnsafeName(name.to_string()));
        }
        let base = self
            .download_base_url
            .as_deref()
            .ok_or(DownloadFailure::NoBaseUrl)?;

        let bytes = self.transport.fetch_bytes(&download_url(base, name)).await?;
        write_atomically(&target.join(name), &bytes).await?;
        Ok(())
    }
}

/// Build the download URL for a mod file
///
/// The name is percent-encoded; spaces become `%20`, never `+`.
pub fn download_url(base: &str, name: &str) -> String {
    format!(
        "{}/mods/{}",
        base.trim_end_matches('/'),
        urlencoding::encode(name)
    )
}

fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (completed * 100 / total).min(100) as u8
}

/// A manifest entry must name a plain file inside the mods directory
fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

/// Write to a `.part` sibling, then rename into place
async fn write_atomically(dest: &Path, bytes: &[u8]) -> Result<(), IoError> {
    let tmp = part_path(dest);
    if let Err(e) = tokio::fs::write(&tmp, bytes).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(IoError::generic(&tmp, e));
    }
    if let Err(e) = tokio::fs::rename(&tmp, dest).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(IoError::generic(dest, e));
    }
    Ok(())
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// Remove a recorded file; failures are logged and swallowed
///
/// Returns true if the file was removed.
async fn delete_one(target: &Path, name: &str) -> bool {
    if !is_safe_file_name(name) {
        warn!(file = %name, "skipping deletion of unsafe file name");
        return false;
    }
    let path = target.join(name);
    let is_file = tokio::fs::metadata(&path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return false;
    }
    match tokio::fs::remove_file(&path).await {
        Ok(()) => {
            info!(file = %name, "deleted obsolete mod");
            true
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to delete obsolete mod, leaving it in place");
            false
        }
    }
}

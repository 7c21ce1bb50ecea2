//! Mod set diffing
//!
//! Turns the remote manifest, the record of previously installed mods and
//! the current directory listing into a download/delete plan:
//! - download every manifest entry with no case-insensitive match on disk
//! - delete recorded entries that are still on disk but gone from the
//!   manifest
//!
//! Files the user added by hand are never in the record set and so are
//! never scheduled for deletion.

use crate::domain::{ModRecordSet, ModsCheckResult, UpdatePlan};
use crate::sync::LocalMods;
use std::collections::{BTreeSet, HashSet};

/// Compute the plan for one sync cycle
///
/// An empty manifest yields [`ModsCheckResult::NotFound`] regardless of local
/// state; an absent directory yields [`ModsCheckResult::NoTargetModDirectory`].
pub fn compute_plan(
    remote_manifest: &[String],
    recorded: &ModRecordSet,
    local: &LocalMods,
) -> UpdatePlan {
    if remote_manifest.is_empty() {
        return UpdatePlan::failed(ModsCheckResult::NotFound);
    }

    let Some(files) = local.files() else {
        return UpdatePlan::failed(ModsCheckResult::NoTargetModDirectory);
    };

    let installed: HashSet<String> = files.iter().map(|name| name.to_lowercase()).collect();
    let remote_lower: HashSet<String> = remote_manifest
        .iter()
        .map(|name| name.to_lowercase())
        .collect();

    // Case-insensitive duplicates in the manifest are downloaded once
    let mut seen = HashSet::new();
    let to_download: BTreeSet<String> = remote_manifest
        .iter()
        .filter(|name| {
            let lower = name.to_lowercase();
            !installed.contains(&lower) && seen.insert(lower)
        })
        .cloned()
        .collect();

    let to_delete: BTreeSet<String> = recorded
        .iter()
        .filter(|name| files.contains(*name) && !remote_lower.contains(&name.to_lowercase()))
        .cloned()
        .collect();

    UpdatePlan::computed(local.directory(), to_download, to_delete)
}

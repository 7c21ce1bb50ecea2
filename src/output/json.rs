//! JSON output formatter for machine processing
//!
//! The terminal state is flattened into the top-level object, so consumers
//! dispatch on the `state` field. Context fields never repeat a key the
//! state already carries.

use crate::domain::SyncState;
use crate::orchestrator::SyncReport;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// JSON representation of a report
#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    state: &'a SyncState,
    app_version: String,
    /// Omitted when the state carries its own `remote_version`
    #[serde(skip_serializing_if = "Option::is_none")]
    remote_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_directory: Option<&'a PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    launcher_download_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    website_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    news: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<JsonPlan<'a>>,
}

/// Planned changes
#[derive(Serialize)]
struct JsonPlan<'a> {
    download: Vec<&'a str>,
    delete: Vec<&'a str>,
}

/// Render a report as pretty-printed JSON followed by a newline
pub fn render_json(report: &SyncReport, writer: &mut dyn Write) -> std::io::Result<()> {
    let context = &report.context;
    let remote_version = match report.state {
        SyncState::AppUpdateAvailable { .. } => None,
        _ => context.remote_version.map(|v| v.to_string()),
    };
    let output = JsonOutput {
        state: &report.state,
        app_version: context.app_version.to_string(),
        remote_version,
        profile_name: context.profile_name.as_deref(),
        target_directory: context.target_directory.as_ref(),
        launcher_download_url: context.launcher_download_url.as_deref(),
        website_url: context.website_url.as_deref(),
        news: context.news.as_deref(),
        plan: report.plan.as_ref().map(|plan| JsonPlan {
            download: plan.to_download.iter().map(String::as_str).collect(),
            delete: plan.to_delete.iter().map(String::as_str).collect(),
        }),
    };
    serde_json::to_writer_pretty(&mut *writer, &output)?;
    writeln!(writer)
}

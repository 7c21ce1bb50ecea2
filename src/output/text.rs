//! Text output formatter for human-readable display
//!
//! This module provides:
//! - One colored outcome line per terminal state
//! - Launcher download hint when a newer launcher exists
//! - Planned file lists in verbose mode

use crate::domain::{SyncState, UpdatePlan};
use crate::orchestrator::SyncReport;
use crate::output::{OutputConfig, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Render a report as human-readable text
pub fn render_text(
    report: &SyncReport,
    config: &OutputConfig,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    let paint = Painter { color: config.color };

    if config.show_news && config.verbosity != Verbosity::Quiet {
        if let Some(news) = report.context.news.as_deref() {
            writeln!(writer, "{}", paint.header("News"))?;
            for line in news.lines() {
                writeln!(writer, "  {}", line)?;
            }
            writeln!(writer)?;
        }
    }

    writeln!(writer, "{}", status_line(&report.state, &paint))?;

    if config.verbosity == Verbosity::Quiet {
        return Ok(());
    }

    if let SyncState::AppUpdateAvailable { .. } = report.state {
        writeln!(
            writer,
            "  Current version: {}",
            paint.dim(&report.context.app_version.to_string())
        )?;
        if let Some(url) = report.context.launcher_download_url.as_deref() {
            writeln!(writer, "  Download: {}", url)?;
        }
    }

    if let SyncState::ModCheckFailed { .. } = report.state {
        if let Some(website) = report.context.website_url.as_deref() {
            writeln!(writer, "  More information: {}", website)?;
        }
    }

    if config.verbosity == Verbosity::Verbose {
        if let Some(dir) = report.context.target_directory.as_deref() {
            writeln!(writer, "  Mods directory: {}", dir.display())?;
        }
        if let Some(plan) = report.plan.as_ref() {
            write_plan(plan, &paint, writer)?;
        }
    }

    Ok(())
}

fn status_line(state: &SyncState, paint: &Painter) -> String {
    match state {
        SyncState::AppUpdateAvailable { remote_version } => paint.warn(&format!(
            "A new launcher version is available: {}",
            remote_version
        )),
        SyncState::SyncOk {
            downloaded,
            deleted,
        } => paint.ok(&format!(
            "Mods updated: {} downloaded, {} removed",
            downloaded, deleted
        )),
        SyncState::SyncFailed {
            downloaded,
            message,
        } => paint.error(&format!(
            "Mods update failed after {} download(s): {}",
            downloaded, message
        )),
        SyncState::NoUpdateNeeded => paint.ok("Mods are up to date"),
        SyncState::ModCheckFailed { message, .. } => {
            paint.error(&format!("Mods check failed: {}", message))
        }
        SyncState::ConnectionIssue { message } => {
            paint.error(&format!("Could not check for updates: {}", message))
        }
        SyncState::UpdatesDisabled => paint.dim("Updates are disabled"),
    }
}

/// Write the planned downloads (`+`) and deletions (`-`)
fn write_plan(plan: &UpdatePlan, paint: &Painter, writer: &mut dyn Write) -> std::io::Result<()> {
    if plan.to_download.is_empty() && plan.to_delete.is_empty() {
        return Ok(());
    }
    writeln!(writer)?;
    for name in &plan.to_download {
        writeln!(writer, "  {} {}", paint.ok("+"), name)?;
    }
    for name in &plan.to_delete {
        writeln!(writer, "  {} {}", paint.error("-"), name)?;
    }
    Ok(())
}

struct Painter {
    color: bool,
}

impl Painter {
    fn ok(&self, s: &str) -> String {
        if self.color {
            s.green().to_string()
        } else {
            s.to_string()
        }
    }

    fn warn(&self, s: &str) -> String {
        if self.color {
            s.yellow().bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn error(&self, s: &str) -> String {
        if self.color {
            s.red().to_string()
        } else {
            s.to_string()
        }
    }

    fn dim(&self, s: &str) -> String {
        if self.color {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }

    fn header(&self, s: &str) -> String {
        if self.color {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModsCheckResult, UpdateContext, VersionNumber};
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn plain(verbosity: Verbosity) -> OutputConfig {
        OutputConfig {
            verbosity,
            color: false,
            ..Default::default()
        }
    }

    fn report(state: SyncState) -> SyncReport {
        SyncReport {
            state,
            context: UpdateContext::new(VersionNumber::three_part(1, 2, 3))
                .with_links(
                    Some("https://example.com/launcher".into()),
                    Some("https://example.com".into()),
                )
                .with_news(Some("Server restart tonight".into())),
            plan: None,
            records: None,
        }
    }

    fn render(report: &SyncReport, config: &OutputConfig) -> String {
        let mut output = Vec::new();
        render_text(report, config, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    /// Writer that rejects every write
    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sync_ok_line() {
        let text = render(
            &report(SyncState::SyncOk {
                downloaded: 2,
                deleted: 1,
            }),
            &plain(Verbosity::Normal),
        );
        assert_eq!(text, "Mods updated: 2 downloaded, 1 removed\n");
    }

    #[test]
    fn test_write_error_is_propagated() {
        let result = render_text(
            &report(SyncState::NoUpdateNeeded),
            &plain(Verbosity::Normal),
            &mut Closed,
        );
        assert_eq!(
            result.unwrap_err().kind(),
            std::io::ErrorKind::BrokenPipe
        );
    }

    #[test]
    fn test_app_update_shows_download_link() {
        let text = render(
            &report(SyncState::AppUpdateAvailable {
                remote_version: "1.3.0".into(),
            }),
            &plain(Verbosity::Normal),
        );
        assert!(text.contains("A new launcher version is available: 1.3.0"));
        assert!(text.contains("Current version: 1.2.3"));
        assert!(text.contains("Download: https://example.com/launcher"));
    }

    #[test]
    fn test_quiet_prints_only_status() {
        let text = render(
            &report(SyncState::AppUpdateAvailable {
                remote_version: "1.3.0".into(),
            }),
            &plain(Verbosity::Quiet),
        );
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_mod_check_failure_links_website() {
        let text = render(
            &report(SyncState::ModCheckFailed {
                outcome: ModsCheckResult::NoTargetModDirectory,
                message: "could not find the profile mods directory".into(),
            }),
            &plain(Verbosity::Normal),
        );
        assert!(text.starts_with("Mods check failed: could not find"));
        assert!(text.contains("More information: https://example.com"));
    }

    #[test]
    fn test_news_only_when_requested() {
        let state = SyncState::NoUpdateNeeded;
        let without = render(&report(state.clone()), &plain(Verbosity::Normal));
        assert!(!without.contains("Server restart"));

        let config = OutputConfig {
            show_news: true,
            ..plain(Verbosity::Normal)
        };
        let with = render(&report(state), &config);
        assert!(with.starts_with("News\n  Server restart tonight\n"));
    }

    #[test]
    fn test_verbose_lists_plan() {
        let mut report = report(SyncState::SyncOk {
            downloaded: 1,
            deleted: 1,
        });
        report.plan = Some(UpdatePlan::computed(
            PathBuf::from("/p/mods"),
            BTreeSet::from(["new.jar".to_string()]),
            BTreeSet::from(["old.jar".to_string()]),
        ));
        report.context = report
            .context
            .with_target_directory(Some(PathBuf::from("/p/mods")));

        let text = render(&report, &plain(Verbosity::Verbose));
        assert!(text.contains("Mods directory: /p/mods"));
        assert!(text.contains("  + new.jar"));
        assert!(text.contains("  - old.jar"));
    }
}

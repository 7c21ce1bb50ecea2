//! Output formatting for update reports
//!
//! This module provides:
//! - Text output for human-readable display
//! - JSON output for machine processing
//! - Exit code mapping for terminal states
//!
//! Renderers only read the finished [`SyncReport`] and write to any
//! `std::io::Write`.

mod json;
mod text;

pub use json::render_json;
pub use text::render_text;

use crate::domain::SyncState;
use crate::orchestrator::SyncReport;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only the outcome line
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Adds the planned file lists and context details
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    /// Include the news text in text output
    pub show_news: bool,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            show_news: false,
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, verbose: bool, quiet: bool, news: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self {
            format,
            verbosity,
            show_news: news,
            color: true,
        }
    }
}

/// Render a report in the configured format
pub fn render(
    report: &SyncReport,
    config: &OutputConfig,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    match config.format {
        OutputFormat::Text => render_text(report, config, writer),
        OutputFormat::Json => render_json(report, writer),
    }
}

/// Process exit code for a terminal state
///
/// `0` when nothing needs attention, `2` when the pass failed. Fatal errors
/// (`1`) never produce a report.
pub fn exit_code(state: &SyncState) -> u8 {
    if state.is_failure() {
        2
    } else {
        0
    }
}

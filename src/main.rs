//! modsync - Modpack launcher updater CLI tool
//!
//! One run performs one update pass:
//! - Checks whether a newer launcher is published
//! - Synchronizes the profile's mods directory with the server manifest
//! - Persists the installed mod records for the next run

use anyhow::Context;
use clap::Parser;
use modsync::cli::CliArgs;
use modsync::config::{LocalSettings, ServerConfig};
use modsync::orchestrator::Orchestrator;
use modsync::output::{exit_code, render, OutputConfig};
use modsync::profile::{default_game_dir, LauncherProfile, ManualProfile, ProfileResolver};
use modsync::progress::Progress;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "modsync=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let server = ServerConfig::load(&args.config)?;
    let mut settings = LocalSettings::load(&args.settings)?;
    let resolver = select_resolver(&args, &server, &mut settings);

    let mut orchestrator = Orchestrator::new(server, resolver)?;
    if args.verbose {
        eprintln!("modsync v{}", orchestrator.app_version());
        eprintln!("Settings: {}", settings.path().display());
    }

    let progress = Progress::new(args.show_progress());
    let recorded = settings.records();
    let report = orchestrator.run_once(&recorded, &progress).await;
    progress.finish_and_clear();

    // Output results
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.news);
    let mut stdout = io::stdout().lock();
    render(&report, &output_config, &mut stdout)?;
    stdout.flush()?;

    // Records change only when the plan was applied, even partially
    if let Some(records) = report.records.as_ref() {
        info!(count = records.len(), "saving mod records");
        settings.set_records(records);
    }
    settings
        .save()
        .with_context(|| format!("could not save {}", settings.path().display()))?;

    Ok(ExitCode::from(exit_code(&report.state)))
}

/// Pick how the profile directory is found, persisting CLI overrides
///
/// `--profile` switches to a manual path; `--game-dir` switches back to
/// launcher metadata. Without either, the saved choice is used.
fn select_resolver(
    args: &CliArgs,
    server: &ServerConfig,
    settings: &mut LocalSettings,
) -> Box<dyn ProfileResolver> {
    if let Some(game_dir) = args.game_dir.as_deref() {
        settings.set_game_path(game_dir);
        settings.set_profile_path_auto(true);
    }
    if let Some(profile) = args.profile.as_deref() {
        settings.set_profile_path(profile);
        settings.set_profile_path_auto(false);
    }

    let manual = || -> Box<dyn ProfileResolver> {
        Box::new(ManualProfile::new(settings.profile_path().unwrap_or_default()))
    };

    if !settings.profile_path_auto() {
        return manual();
    }
    match (server.profile_name.as_deref(), settings.game_path().or_else(default_game_dir)) {
        (Some(name), Some(game_dir)) => Box::new(LauncherProfile::new(game_dir, name)),
        _ => manual(),
    }
}

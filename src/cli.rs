//! CLI argument parsing module for modsync

use clap::Parser;
use std::path::PathBuf;

/// Modpack launcher updater
#[derive(Parser, Debug, Clone)]
#[command(
    name = "modsync",
    version,
    about = "Check for launcher updates and synchronize a modpack's mods directory"
)]
pub struct CliArgs {
    /// Update server configuration
    #[arg(short, long, default_value = "server.toml")]
    pub config: PathBuf,

    /// Local settings file (created on first run)
    #[arg(short, long, default_value = "settings.toml")]
    pub settings: PathBuf,

    /// Use this profile directory instead of the launcher's profile metadata
    #[arg(short, long)]
    pub profile: Option<PathBuf>,

    /// Game directory containing launcher_profiles.json
    #[arg(short, long)]
    pub game_dir: Option<PathBuf>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Show the server news
    #[arg(long)]
    pub news: bool,
}

impl CliArgs {
    /// Whether the progress bar should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["modsync"]);
        assert_eq!(args.config, PathBuf::from("server.toml"));
        assert_eq!(args.settings, PathBuf::from("settings.toml"));
        assert!(args.profile.is_none());
        assert!(args.game_dir.is_none());
        assert!(!args.json);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(!args.news);
        assert!(args.show_progress());
    }

    #[test]
    fn test_paths() {
        let args = CliArgs::parse_from([
            "modsync",
            "--config",
            "/etc/modsync/server.toml",
            "-s",
            "/home/me/.modsync.toml",
            "--profile",
            "/games/minecart",
            "-g",
            "/games",
        ]);
        assert_eq!(args.config, PathBuf::from("/etc/modsync/server.toml"));
        assert_eq!(args.settings, PathBuf::from("/home/me/.modsync.toml"));
        assert_eq!(args.profile, Some(PathBuf::from("/games/minecart")));
        assert_eq!(args.game_dir, Some(PathBuf::from("/games")));
    }

    #[test]
    fn test_quiet_flags() {
        let args = CliArgs::parse_from(["modsync", "-q"]);
        assert!(args.quiet);
        assert!(!args.show_progress());
    }

    #[test]
    fn test_json_disables_progress() {
        let args = CliArgs::parse_from(["modsync", "--json", "--news"]);
        assert!(args.json);
        assert!(args.news);
        assert!(!args.show_progress());
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(CliArgs::try_parse_from(["modsync", "--dry-run"]).is_err());
    }
}

//! Update orchestrator for coordinating one update pass
//!
//! This module provides:
//! - Workflow coordination: news → launcher version → mods check → apply
//! - Translation of check outcomes into a terminal [`SyncState`]
//! - The updated mod record set for the caller to persist
//!
//! A pass never loops or retries on its own. `run_once` takes `&mut self`,
//! so two passes can never overlap on the same orchestrator.

use crate::config::ServerConfig;
use crate::domain::{
    AppCheckResult, ModRecordSet, ModsCheckResult, SyncPhase, SyncState, UpdateContext,
    UpdatePlan, VersionNumber,
};
use crate::error::AppError;
use crate::fetch::{fetch_manifest, fetch_version_line, HttpClient, Transport};
use crate::profile::{mods_directory, ProfileResolver};
use crate::sync::{compute_plan, LocalMods, ModsUpdateResult, ProgressObserver, UpdatePlanExecutor};
use tracing::{debug, info, warn};

/// Orchestrator for the update workflow
pub struct Orchestrator {
    /// Server endpoints
    server: ServerConfig,
    /// Version of the running launcher
    app_version: VersionNumber,
    /// Transport for all server requests
    transport: Box<dyn Transport>,
    /// Resolves the profile directory
    resolver: Box<dyn ProfileResolver>,
    /// Current phase, `Idle` between passes
    phase: SyncPhase,
}

/// Result of one update pass
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Terminal state reached
    pub state: SyncState,
    /// Facts gathered during the pass
    pub context: UpdateContext,
    /// Plan computed by the mods check, if it ran
    pub plan: Option<UpdatePlan>,
    /// Updated record set; `None` unless the plan was applied
    pub records: Option<ModRecordSet>,
}

/// Outcome of the launcher version check
#[derive(Debug, Clone)]
pub struct AppCheck {
    pub result: AppCheckResult,
    pub remote_version: Option<VersionNumber>,
    /// Diagnostic for failed checks
    pub message: Option<String>,
}

impl AppCheck {
    fn new(result: AppCheckResult) -> Self {
        Self {
            result,
            remote_version: None,
            message: None,
        }
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Orchestrator {
    /// Create a new orchestrator talking to the server over HTTP
    pub fn new(server: ServerConfig, resolver: Box<dyn ProfileResolver>) -> Result<Self, AppError> {
        let client = HttpClient::new()?;
        Self::with_transport(server, Box::new(client), resolver)
    }

    /// Create an orchestrator with a custom transport
    ///
    /// Fails if the local launcher version is malformed.
    pub fn with_transport(
        server: ServerConfig,
        transport: Box<dyn Transport>,
        resolver: Box<dyn ProfileResolver>,
    ) -> Result<Self, AppError> {
        let app_version = server.app_version()?;
        Ok(Self {
            server,
            app_version,
            transport,
            resolver,
            phase: SyncPhase::Idle,
        })
    }

    pub fn app_version(&self) -> VersionNumber {
        self.app_version
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Run one full update pass
    ///
    /// `recorded` is the record set persisted by the previous pass. The
    /// returned report carries the updated set only if the plan executor
    /// ran; otherwise the caller's set must stay untouched.
    pub async fn run_once(
        &mut self,
        recorded: &ModRecordSet,
        progress: &dyn ProgressObserver,
    ) -> SyncReport {
        let context = UpdateContext::new(self.app_version)
            .with_profile_name(self.server.profile_name.clone())
            .with_links(
                self.server.download_launcher_url.clone(),
                self.server.website_url.clone(),
            );
        let context = context.with_news(self.load_news().await);

        let report = self.run_checks(context, recorded, progress).await;
        info!(state = report.state.name(), "update pass finished");
        self.transition(SyncPhase::Idle);
        report
    }

    async fn run_checks(
        &mut self,
        context: UpdateContext,
        recorded: &ModRecordSet,
        progress: &dyn ProgressObserver,
    ) -> SyncReport {
        // Step 1: Launcher version
        self.transition(SyncPhase::CheckingAppVersion);
        let app_check = self.check_app_update().await;
        let context = match app_check.remote_version {
            Some(remote) => context.with_remote_version(remote),
            None => context,
        };

        match app_check.result {
            AppCheckResult::UpdateFound => {
                let remote_version = context
                    .remote_version
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                return finished(SyncState::AppUpdateAvailable { remote_version }, context);
            }
            AppCheckResult::NotFound
            | AppCheckResult::NoConnection
            | AppCheckResult::ConnectionIssue => {
                let message = app_check
                    .message
                    .unwrap_or_else(|| "launcher version check failed".to_string());
                return finished(SyncState::ConnectionIssue { message }, context);
            }
            AppCheckResult::UpdateUrlNotSet => {
                info!("launcher version URL not configured, skipping version check");
            }
            AppCheckResult::NoUpdateAvailable => {}
        }

        // Step 2: Mods manifest
        self.transition(SyncPhase::CheckingMods);
        if self.server.update_files_url.is_none() {
            info!("mods manifest URL not configured, updates disabled");
            return finished(SyncState::UpdatesDisabled, context);
        }

        let plan = self.check_mods_update(recorded).await;
        let context = context.with_target_directory(plan.target_directory.clone());

        match plan.outcome {
            ModsCheckResult::UpdateFound => {}
            ModsCheckResult::NoUpdateAvailable => {
                return SyncReport {
                    state: SyncState::NoUpdateNeeded,
                    context,
                    plan: Some(plan),
                    records: None,
                };
            }
            outcome => {
                return SyncReport {
                    state: SyncState::ModCheckFailed {
                        outcome,
                        message: plan.failure_message(),
                    },
                    context,
                    plan: Some(plan),
                    records: None,
                };
            }
        }

        // Step 3: Apply
        self.transition(SyncPhase::ModsUpdating);
        info!(
            download = plan.to_download.len(),
            delete = plan.to_delete.len(),
            "applying mods update"
        );
        let executor = UpdatePlanExecutor::new(
            &*self.transport,
            self.server.update_download_url.clone(),
        );
        let outcome = executor.apply(&plan, recorded, progress).await;

        let state = match outcome.result {
            ModsUpdateResult::UpdateOk => SyncState::SyncOk {
                downloaded: outcome.downloaded.len(),
                deleted: outcome.deleted.len(),
            },
            ModsUpdateResult::DownloadError => SyncState::SyncFailed {
                downloaded: outcome.downloaded.len(),
                message: outcome
                    .error
                    .unwrap_or_else(|| "mods download failed".to_string()),
            },
        };

        SyncReport {
            state,
            context,
            plan: Some(plan),
            records: Some(outcome.records),
        }
    }

    /// Compare the published launcher version with the running one
    pub async fn check_app_update(&self) -> AppCheck {
        let Some(url) = self.server.update_url.as_deref() else {
            return AppCheck::new(AppCheckResult::UpdateUrlNotSet);
        };

        let line = match fetch_version_line(&*self.transport, url).await {
            Ok(Some(line)) => line,
            Ok(None) => {
                return AppCheck::new(AppCheckResult::NotFound)
                    .with_message(format!("no version published at {}", url));
            }
            Err(e) => {
                warn!(error = %e, "launcher version check failed");
                return AppCheck::new(AppCheckResult::from_fetch_error(&e))
                    .with_message(e.to_string());
            }
        };

        let remote = match VersionNumber::parse(&line) {
            Ok(remote) => remote,
            Err(e) => {
                warn!(error = %e, "server published a malformed launcher version");
                return AppCheck::new(AppCheckResult::ConnectionIssue).with_message(e.to_string());
            }
        };

        let result = if remote.is_greater_than(&self.app_version) {
            info!(local = %self.app_version, remote = %remote, "launcher update available");
            AppCheckResult::UpdateFound
        } else {
            debug!(local = %self.app_version, remote = %remote, "launcher is current");
            AppCheckResult::NoUpdateAvailable
        };

        AppCheck {
            result,
            remote_version: Some(remote),
            message: None,
        }
    }

    /// Resolve the mods directory, fetch the manifest and compute the plan
    pub async fn check_mods_update(&self, recorded: &ModRecordSet) -> UpdatePlan {
        let Some(url) = self.server.update_files_url.as_deref() else {
            return UpdatePlan::failed(ModsCheckResult::UpdateUrlNotSet);
        };

        let profile = match self.resolver.resolve() {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "profile directory could not be resolved");
                return UpdatePlan::no_target_directory(e.detail);
            }
        };

        let manifest = match fetch_manifest(&*self.transport, url).await {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!(error = %e, "mods manifest check failed");
                return UpdatePlan::failed(ModsCheckResult::from_fetch_error(&e));
            }
        };

        let local = match LocalMods::scan(mods_directory(&profile)).await {
            Ok(local) => local,
            Err(e) => {
                warn!(error = %e, "mods directory could not be listed");
                return UpdatePlan {
                    error_detail: Some(e.to_string()),
                    ..UpdatePlan::failed(ModsCheckResult::NoTargetModDirectory)
                };
            }
        };

        let plan = compute_plan(&manifest, recorded, &local);
        info!(
            outcome = ?plan.outcome,
            download = plan.to_download.len(),
            delete = plan.to_delete.len(),
            "mods check finished"
        );
        plan
    }

    /// Fetch the news text; failures only log
    pub async fn load_news(&self) -> Option<String> {
        let url = self.server.news_url.as_deref()?;
        match self.transport.fetch_text(url).await {
            Ok(news) => Some(news),
            Err(e) => {
                warn!(error = %e, "failed to load news");
                None
            }
        }
    }

    fn transition(&mut self, next: SyncPhase) {
        debug!(from = %self.phase, to = %next, "phase transition");
        self.phase = next;
    }
}

fn finished(state: SyncState, context: UpdateContext) -> SyncReport {
    SyncReport {
        state,
        context,
        plan: None,
        records: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, ProfileError};
    use crate::fetch::testing::FakeTransport;
    use crate::sync::ProgressUpdate;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const VERSION_URL: &str = "http://s/version.txt";
    const MODS_URL: &str = "http://s/mods.txt";
    const BASE_URL: &str = "http://s/files";

    struct FixedDir(PathBuf);

    impl ProfileResolver for FixedDir {
        fn resolve(&self) -> Result<PathBuf, ProfileError> {
            Ok(self.0.clone())
        }
    }

    struct Unresolvable;

    impl ProfileResolver for Unresolvable {
        fn resolve(&self) -> Result<PathBuf, ProfileError> {
            Err(ProfileError::new("profile 'Minecart' not found"))
        }
    }

    fn server() -> ServerConfig {
        ServerConfig {
            update_url: Some(VERSION_URL.into()),
            update_files_url: Some(MODS_URL.into()),
            update_download_url: Some(BASE_URL.into()),
            download_launcher_url: Some("http://s/launcher".into()),
            profile_name: Some("Minecart".into()),
            app_version: Some("1.2.3".into()),
            ..Default::default()
        }
    }

    fn profile_with_mods(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("mods")).unwrap();
        for file in files {
            fs::write(dir.path().join("mods").join(file), b"x").unwrap();
        }
        dir
    }

    fn orchestrator(
        server: ServerConfig,
        transport: FakeTransport,
        resolver: Box<dyn ProfileResolver>,
    ) -> Orchestrator {
        Orchestrator::with_transport(server, Box::new(transport), resolver).unwrap()
    }

    fn no_progress() -> impl ProgressObserver {
        |_: ProgressUpdate| {}
    }

    #[test]
    fn test_malformed_local_version_is_fatal() {
        let server = ServerConfig {
            app_version: Some("one.two".into()),
            ..server()
        };
        let result = Orchestrator::with_transport(
            server,
            Box::new(FakeTransport::new()),
            Box::new(Unresolvable),
        );
        assert!(matches!(result, Err(AppError::Version(_))));
    }

    #[tokio::test]
    async fn test_app_update_stops_before_mods() {
        let profile = profile_with_mods(&[]);
        let transport = FakeTransport::new()
            .with_text(VERSION_URL, "1.2.4\n")
            .with_text(MODS_URL, "a.jar\n");
        let mut orch = orchestrator(
            server(),
            transport,
            Box::new(FixedDir(profile.path().to_path_buf())),
        );

        let report = orch.run_once(&ModRecordSet::new(), &no_progress()).await;

        assert_eq!(
            report.state,
            SyncState::AppUpdateAvailable {
                remote_version: "1.2.4".into()
            }
        );
        assert!(report.plan.is_none());
        assert!(report.records.is_none());
        assert_eq!(
            report.context.launcher_download_url.as_deref(),
            Some("http://s/launcher")
        );
        assert_eq!(orch.phase(), SyncPhase::Idle);
    }

    #[tokio::test]
    async fn test_version_endpoint_missing_is_connection_issue() {
        let mut orch = orchestrator(server(), FakeTransport::new(), Box::new(Unresolvable));
        let report = orch.run_once(&ModRecordSet::new(), &no_progress()).await;
        assert!(matches!(report.state, SyncState::ConnectionIssue { .. }));
    }

    #[tokio::test]
    async fn test_malformed_remote_version_is_connection_issue() {
        let transport = FakeTransport::new().with_text(VERSION_URL, "<html>oops</html>");
        let mut orch = orchestrator(server(), transport, Box::new(Unresolvable));
        let report = orch.run_once(&ModRecordSet::new(), &no_progress()).await;
        assert!(matches!(report.state, SyncState::ConnectionIssue { .. }));
    }

    #[tokio::test]
    async fn test_unset_version_url_continues_with_mods() {
        let profile = profile_with_mods(&["a.jar"]);
        let server = ServerConfig {
            update_url: None,
            ..server()
        };
        let transport = FakeTransport::new().with_text(MODS_URL, "a.jar\n");
        let mut orch = orchestrator(
            server,
            transport,
            Box::new(FixedDir(profile.path().to_path_buf())),
        );

        let report = orch.run_once(&ModRecordSet::new(), &no_progress()).await;
        assert_eq!(report.state, SyncState::NoUpdateNeeded);
    }

    #[tokio::test]
    async fn test_unset_mods_url_disables_updates() {
        let server = ServerConfig {
            update_files_url: None,
            ..server()
        };
        let transport = FakeTransport::new().with_text(VERSION_URL, "1.2.3");
        let mut orch = orchestrator(server, transport, Box::new(Unresolvable));
        let report = orch.run_once(&ModRecordSet::new(), &no_progress()).await;
        assert_eq!(report.state, SyncState::UpdatesDisabled);
    }

    #[tokio::test]
    async fn test_unresolvable_profile_is_mod_check_failure() {
        let transport = FakeTransport::new()
            .with_text(VERSION_URL, "1.2.3")
            .with_text(MODS_URL, "a.jar");
        let mut orch = orchestrator(server(), transport, Box::new(Unresolvable));

        let report = orch.run_once(&ModRecordSet::new(), &no_progress()).await;
        assert_eq!(
            report.state,
            SyncState::ModCheckFailed {
                outcome: ModsCheckResult::NoTargetDirectory,
                message: "profile 'Minecart' not found".into(),
            }
        );
        assert!(report.records.is_none());
    }

    #[tokio::test]
    async fn test_missing_mods_directory() {
        let profile = TempDir::new().unwrap();
        let transport = FakeTransport::new()
            .with_text(VERSION_URL, "1.2.3")
            .with_text(MODS_URL, "a.jar");
        let mut orch = orchestrator(
            server(),
            transport,
            Box::new(FixedDir(profile.path().to_path_buf())),
        );

        let report = orch.run_once(&ModRecordSet::new(), &no_progress()).await;
        assert!(matches!(
            report.state,
            SyncState::ModCheckFailed {
                outcome: ModsCheckResult::NoTargetModDirectory,
                ..
            }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_mod_counts_as_installed() {
        let shared = TempDir::new().unwrap();
        fs::write(shared.path().join("shared.jar"), b"shared").unwrap();
        let profile = profile_with_mods(&[]);
        let link = profile.path().join("mods").join("shared.jar");
        std::os::unix::fs::symlink(shared.path().join("shared.jar"), &link).unwrap();

        let transport = FakeTransport::new()
            .with_text(VERSION_URL, "1.2.3")
            .with_text(MODS_URL, "shared.jar\n");
        let mut orch = orchestrator(
            server(),
            transport,
            Box::new(FixedDir(profile.path().to_path_buf())),
        );

        let report = orch.run_once(&ModRecordSet::new(), &no_progress()).await;

        assert_eq!(report.state, SyncState::NoUpdateNeeded);
        assert_eq!(
            report.plan.map(|p| p.outcome),
            Some(ModsCheckResult::NoUpdateAvailable)
        );
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    }

    #[tokio::test]
    async fn test_manifest_connection_failure_is_mod_check_failure() {
        let profile = profile_with_mods(&[]);
        let transport = FakeTransport::new()
            .with_text(VERSION_URL, "1.2.3")
            .with_error(MODS_URL, FetchError::connect(MODS_URL, "refused"));
        let mut orch = orchestrator(
            server(),
            transport,
            Box::new(FixedDir(profile.path().to_path_buf())),
        );

        let report = orch.run_once(&ModRecordSet::new(), &no_progress()).await;
        assert!(matches!(
            report.state,
            SyncState::ModCheckFailed {
                outcome: ModsCheckResult::NoConnection,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_full_sync() {
        let profile = profile_with_mods(&["keep.jar", "old.jar"]);
        let transport = FakeTransport::new()
            .with_text(VERSION_URL, "1.2.0.0")
            .with_text(MODS_URL, "keep.jar\nnew mod.jar\n")
            .with_bytes("http://s/files/mods/new%20mod.jar", b"NEW");
        let mut orch = orchestrator(
            server(),
            transport,
            Box::new(FixedDir(profile.path().to_path_buf())),
        );
        let recorded: ModRecordSet = ["keep.jar", "old.jar"].into_iter().collect();

        let report = orch.run_once(&recorded, &no_progress()).await;

        assert_eq!(
            report.state,
            SyncState::SyncOk {
                downloaded: 1,
                deleted: 1
            }
        );
        let mods = profile.path().join("mods");
        assert_eq!(fs::read(mods.join("new mod.jar")).unwrap(), b"NEW");
        assert!(!mods.join("old.jar").exists());
        assert_eq!(
            report.records.unwrap(),
            ["keep.jar", "new mod.jar"].into_iter().collect::<ModRecordSet>()
        );
        assert_eq!(report.context.target_directory, Some(mods));
        assert_eq!(
            report.context.remote_version,
            Some(VersionNumber::four_part(1, 2, 0, 0))
        );
    }

    #[tokio::test]
    async fn test_second_pass_is_idempotent() {
        let profile = profile_with_mods(&[]);
        let transport = FakeTransport::new()
            .with_text(VERSION_URL, "1.2.3")
            .with_text(MODS_URL, "a.jar\nb.jar\n")
            .with_bytes("http://s/files/mods/a.jar", b"a")
            .with_bytes("http://s/files/mods/b.jar", b"b");
        let mut orch = orchestrator(
            server(),
            transport,
            Box::new(FixedDir(profile.path().to_path_buf())),
        );

        let first = orch.run_once(&ModRecordSet::new(), &no_progress()).await;
        assert!(matches!(first.state, SyncState::SyncOk { downloaded: 2, .. }));

        let records = first.records.unwrap();
        let second = orch.run_once(&records, &no_progress()).await;
        assert_eq!(second.state, SyncState::NoUpdateNeeded);
        assert!(second.records.is_none());
    }

    #[tokio::test]
    async fn test_download_failure_keeps_partial_records() {
        let profile = profile_with_mods(&[]);
        let transport = FakeTransport::new()
            .with_text(VERSION_URL, "1.2.3")
            .with_text(MODS_URL, "a.jar\nb.jar\nc.jar\n")
            .with_bytes("http://s/files/mods/a.jar", b"a");
        let mut orch = orchestrator(
            server(),
            transport,
            Box::new(FixedDir(profile.path().to_path_buf())),
        );

        let report = orch.run_once(&ModRecordSet::new(), &no_progress()).await;

        assert!(matches!(
            report.state,
            SyncState::SyncFailed { downloaded: 1, .. }
        ));
        assert_eq!(
            report.records.unwrap(),
            ["a.jar"].into_iter().collect::<ModRecordSet>()
        );
    }

    #[tokio::test]
    async fn test_news_is_loaded_and_optional() {
        let server = ServerConfig {
            news_url: Some("http://s/news.html".into()),
            update_files_url: None,
            ..server()
        };
        let transport = FakeTransport::new()
            .with_text(VERSION_URL, "1.2.3")
            .with_text("http://s/news.html", "<p>Server restart</p>");
        let mut orch = orchestrator(server.clone(), transport, Box::new(Unresolvable));
        let report = orch.run_once(&ModRecordSet::new(), &no_progress()).await;
        assert_eq!(report.context.news.as_deref(), Some("<p>Server restart</p>"));

        let transport = FakeTransport::new().with_text(VERSION_URL, "1.2.3");
        let mut orch = orchestrator(server, transport, Box::new(Unresolvable));
        let report = orch.run_once(&ModRecordSet::new(), &no_progress()).await;
        assert!(report.context.news.is_none());
        assert_eq!(report.state, SyncState::UpdatesDisabled);
    }
}

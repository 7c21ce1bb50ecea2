//! Configuration files
//!
//! - `ServerConfig`: endpoints of the update server (read-only)
//! - `LocalSettings`: flat key/value settings persisted between runs,
//!   including the installed mod records

use crate::domain::{ModRecordSet, VersionNumber};
use crate::error::{AppError, ConfigError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const GAME_PATH_KEY: &str = "game_path";
const PROFILE_PATH_KEY: &str = "profile_path";
const PROFILE_PATH_AUTO_KEY: &str = "profile_path_auto";

/// Update server endpoints
///
/// Every URL is optional; an unset URL disables the check that needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Version text endpoint
    pub update_url: Option<String>,
    /// Mods manifest endpoint
    pub update_files_url: Option<String>,
    /// Base URL for `/mods/{name}` downloads
    pub update_download_url: Option<String>,
    /// Where a newer launcher can be downloaded
    pub download_launcher_url: Option<String>,
    pub website_url: Option<String>,
    pub news_url: Option<String>,
    /// Launcher profile whose mods are synchronized
    pub profile_name: Option<String>,
    /// Overrides the version of the running launcher
    pub app_version: Option<String>,
}

impl ServerConfig {
    /// Read and validate a server configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        Self::parse(&content, path)
    }

    /// Parse configuration text; `path` is used for error messages only
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(content)
            .map_err(|e| ConfigError::toml_parse_error(path, e.to_string()))?;
        config.normalized().validated()
    }

    /// Version of the running launcher
    ///
    /// A malformed override is fatal: without a local version no check can
    /// be trusted.
    pub fn app_version(&self) -> Result<VersionNumber, AppError> {
        let raw = self
            .app_version
            .as_deref()
            .unwrap_or(env!("CARGO_PKG_VERSION"));
        Ok(VersionNumber::parse(raw)?)
    }

    /// Treat empty strings as unset
    fn normalized(self) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            update_url: clean(self.update_url),
            update_files_url: clean(self.update_files_url),
            update_download_url: clean(self.update_download_url),
            download_launcher_url: clean(self.download_launcher_url),
            website_url: clean(self.website_url),
            news_url: clean(self.news_url),
            profile_name: clean(self.profile_name),
            app_version: clean(self.app_version),
        }
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let urls = [
            ("update_url", &self.update_url),
            ("update_files_url", &self.update_files_url),
            ("update_download_url", &self.update_download_url),
            ("download_launcher_url", &self.download_launcher_url),
            ("website_url", &self.website_url),
            ("news_url", &self.news_url),
        ];
        for (key, value) in urls {
            if let Some(value) = value {
                if !is_http_url(value) {
                    return Err(ConfigError::InvalidUrl {
                        key: key.to_string(),
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(self)
    }
}

fn is_http_url(value: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        value
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
            && value.len() > scheme.len()
    })
}

/// Settings persisted between runs as a flat TOML table of strings
#[derive(Debug, Clone)]
pub struct LocalSettings {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl LocalSettings {
    /// Load settings; a missing file yields empty settings
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                values: BTreeMap::new(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::read_error(&path, e))?;
        let table: toml::Table = toml::from_str(&content)
            .map_err(|e| ConfigError::toml_parse_error(&path, e.to_string()))?;

        let mut values = BTreeMap::new();
        for (key, value) in table {
            match value {
                toml::Value::String(s) => {
                    values.insert(key, s);
                }
                toml::Value::Boolean(b) => {
                    values.insert(key, b.to_string());
                }
                toml::Value::Integer(i) => {
                    values.insert(key, i.to_string());
                }
                other => {
                    warn!(key = %key, kind = other.type_str(), "ignoring non-scalar setting");
                }
            }
        }

        Ok(Self { path, values })
    }

    /// Write settings back to their file, creating parent directories
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::write_error(parent, e))?;
            }
        }
        let content = toml::to_string(&self.values)
            .map_err(|e| ConfigError::toml_parse_error(&self.path, e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| ConfigError::write_error(&self.path, e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).filter(|v| !v.is_empty()).map(PathBuf::from)
    }

    /// Missing or unparsable flags default to `true` (automatic detection)
    fn get_flag(&self, key: &str) -> bool {
        self.get(key).map_or(true, |v| v != "false")
    }

    pub fn game_path(&self) -> Option<PathBuf> {
        self.get_path(GAME_PATH_KEY)
    }

    pub fn set_game_path(&mut self, path: &Path) {
        self.set(GAME_PATH_KEY, path.to_string_lossy());
    }

    pub fn profile_path(&self) -> Option<PathBuf> {
        self.get_path(PROFILE_PATH_KEY)
    }

    pub fn set_profile_path(&mut self, path: &Path) {
        self.set(PROFILE_PATH_KEY, path.to_string_lossy());
    }

    /// Whether the profile is resolved from launcher metadata
    pub fn profile_path_auto(&self) -> bool {
        self.get_flag(PROFILE_PATH_AUTO_KEY)
    }

    pub fn set_profile_path_auto(&mut self, auto: bool) {
        self.set(PROFILE_PATH_AUTO_KEY, auto.to_string());
    }

    /// Mods installed by previous syncs
    pub fn records(&self) -> ModRecordSet {
        ModRecordSet::from_properties(&self.values)
    }

    pub fn set_records(&mut self, records: &ModRecordSet) {
        records.write_properties(&mut self.values);
    }
}

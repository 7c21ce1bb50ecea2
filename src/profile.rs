//! Profile path resolution
//!
//! The mods directory lives at `{profile}/mods`. The profile directory is
//! either given by the user or read from the game launcher's
//! `launcher_profiles.json`, where the profile is looked up by name and its
//! `gameDir` used (profiles without `gameDir` share the game directory).

use crate::error::ProfileError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the mods subdirectory inside a profile
pub const MODS_DIR_NAME: &str = "mods";

/// Launcher metadata file inside the game directory
const LAUNCHER_PROFILES_FILE: &str = "launcher_profiles.json";

/// Resolves the profile directory whose mods are synchronized
pub trait ProfileResolver: Send + Sync {
    fn resolve(&self) -> Result<PathBuf, ProfileError>;
}

/// Mods directory of a profile
pub fn mods_directory(profile: &Path) -> PathBuf {
    profile.join(MODS_DIR_NAME)
}

/// Standard game directory for the current user, if it can be located
pub fn default_game_dir() -> Option<PathBuf> {
    game_dir_from(
        std::env::var_os("APPDATA").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn game_dir_from(appdata: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    if cfg!(windows) {
        if let Some(appdata) = appdata {
            return Some(appdata.join(".minecraft"));
        }
    }
    let home = home?;
    if cfg!(target_os = "macos") {
        Some(home.join("Library").join("Application Support").join("minecraft"))
    } else {
        Some(home.join(".minecraft"))
    }
}

/// Profile directory chosen by the user
#[derive(Debug, Clone)]
pub struct ManualProfile {
    path: PathBuf,
}

impl ManualProfile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProfileResolver for ManualProfile {
    fn resolve(&self) -> Result<PathBuf, ProfileError> {
        if self.path.as_os_str().is_empty() {
            return Err(ProfileError::new("profile path is not set"));
        }
        if !self.path.is_dir() {
            return Err(ProfileError::new(format!(
                "profile directory {} does not exist",
                self.path.display()
            )));
        }
        Ok(self.path.clone())
    }
}

/// Profile looked up by name in the launcher metadata
#[derive(Debug, Clone)]
pub struct LauncherProfile {
    game_dir: PathBuf,
    profile_name: String,
}

#[derive(Debug, Deserialize)]
struct LauncherProfiles {
    #[serde(default)]
    profiles: BTreeMap<String, LauncherProfileEntry>,
}

#[derive(Debug, Deserialize)]
struct LauncherProfileEntry {
    name: Option<String>,
    #[serde(rename = "gameDir")]
    game_dir: Option<PathBuf>,
}

impl LauncherProfile {
    pub fn new(game_dir: impl Into<PathBuf>, profile_name: impl Into<String>) -> Self {
        Self {
            game_dir: game_dir.into(),
            profile_name: profile_name.into(),
        }
    }

    fn read_profiles(&self) -> Result<LauncherProfiles, ProfileError> {
        let path = self.game_dir.join(LAUNCHER_PROFILES_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ProfileError::new(format!(
                "cannot read launcher profiles {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ProfileError::new(format!(
                "cannot parse launcher profiles {}: {}",
                path.display(),
                e
            ))
        })
    }
}

impl ProfileResolver for LauncherProfile {
    fn resolve(&self) -> Result<PathBuf, ProfileError> {
        let profiles = self.read_profiles()?;

        // Match the display name first, then the profile key
        let entry = profiles
            .profiles
            .values()
            .find(|p| p.name.as_deref() == Some(self.profile_name.as_str()))
            .or_else(|| profiles.profiles.get(&self.profile_name))
            .ok_or_else(|| {
                ProfileError::new(format!(
                    "profile '{}' not found in launcher profiles",
                    self.profile_name
                ))
            })?;

        let dir = match &entry.game_dir {
            Some(dir) if dir.is_relative() => self.game_dir.join(dir),
            Some(dir) => dir.clone(),
            None => self.game_dir.clone(),
        };

        if !dir.is_dir() {
            return Err(ProfileError::new(format!(
                "profile '{}' points to missing directory {}",
                self.profile_name,
                dir.display()
            )));
        }
        Ok(dir)
    }
}

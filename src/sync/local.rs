//! Snapshot of the local mods directory

use crate::error::IoError;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File names found in the mods directory, or its absence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMods {
    directory: PathBuf,
    listing: Option<BTreeSet<String>>,
}

impl LocalMods {
    /// List regular files directly inside `directory`
    ///
    /// A missing directory is not an error; it yields an absent snapshot.
    /// Symlinks count as the file they point to; dangling links are skipped.
    /// File names that are not valid UTF-8 cannot appear in a manifest and
    /// are skipped.
    pub async fn scan(directory: impl Into<PathBuf>) -> Result<Self, IoError> {
        let directory = directory.into();
        let is_dir = fs::metadata(&directory)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Ok(Self::absent(directory));
        }

        let mut entries = fs::read_dir(&directory)
            .await
            .map_err(|e| IoError::generic(&directory, e))?;
        let mut files = BTreeSet::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| IoError::generic(&directory, e))?
        {
            // fs::metadata follows symlinks, unlike DirEntry::file_type
            let is_file = fs::metadata(entry.path())
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Ok(name) = entry.file_name().into_string() {
                files.insert(name);
            }
        }

        Ok(Self::present(directory, files))
    }

    /// Snapshot of an existing directory with the given file names
    pub fn present<I, S>(directory: impl Into<PathBuf>, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            directory: directory.into(),
            listing: Some(files.into_iter().map(Into::into).collect()),
        }
    }

    /// Snapshot of a directory that does not exist
    pub fn absent(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            listing: None,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File names, `None` if the directory is absent
    pub fn files(&self) -> Option<&BTreeSet<String>> {
        self.listing.as_ref()
    }

    pub fn exists(&self) -> bool {
        self.listing.is_some()
    }
}

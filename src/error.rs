//! Application error types using thiserror
//!
//! Error hierarchy:
//! - VersionError: Malformed version strings (fatal for the local version)
//! - FetchError: Transport failures talking to the update server
//! - ProfileError: Profile path could not be resolved
//! - ConfigError: Unreadable or invalid configuration/settings files
//! - IoError: File system operation failures
//!
//! Expected outcomes of an update pass (no update, connection issue, missing
//! directory) are *not* errors; they are reported through result enums in
//! [`crate::domain`]. These types cover the failures underneath them.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Version parsing errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Transport errors
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors produced while parsing a version string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The string is not a dot-delimited list of at least three integers
    #[error("malformed version '{input}': {reason}")]
    Malformed { input: String, reason: String },
}

/// Errors related to fetching data from the update server
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Resource does not exist (HTTP 404)
    #[error("resource not found: {url}")]
    NotFound { url: String },

    /// Could not connect to the server at all
    #[error("failed to connect to {url}: {message}")]
    Connect { url: String, message: String },

    /// Request timed out
    #[error("timeout while fetching {url}")]
    Timeout { url: String },

    /// Any other transport failure or non-success status
    #[error("failed to fetch {url}: {message}")]
    Network { url: String, message: String },

    /// Response body could not be read or understood
    #[error("invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },
}

/// The profile directory could not be resolved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{detail}")]
pub struct ProfileError {
    /// Human-readable explanation shown to the user
    pub detail: String,
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("failed to read configuration file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a configuration file
    #[error("failed to write configuration file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// Invalid URL in configuration
    #[error("invalid URL for '{key}': {value}")]
    InvalidUrl { key: String, value: String },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Generic IO error
    #[error("IO error at {path}: {source}")]
    Generic {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VersionError {
    /// Creates a new Malformed error
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        VersionError::Malformed {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

impl FetchError {
    /// Creates a new NotFound error
    pub fn not_found(url: impl Into<String>) -> Self {
        FetchError::NotFound { url: url.into() }
    }

    /// Creates a new Connect error
    pub fn connect(url: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::Connect {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(url: impl Into<String>) -> Self {
        FetchError::Timeout { url: url.into() }
    }

    /// Creates a new Network error
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(url: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::InvalidResponse {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Returns true if the retry loop should try again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::Connect { .. } | FetchError::Timeout { .. } | FetchError::Network { .. }
        )
    }
}

impl ProfileError {
    /// Creates a new ProfileError
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl IoError {
    /// Creates a new Generic IO error
    pub fn generic(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Generic {
            path: path.into(),
            source,
        }
    }
}

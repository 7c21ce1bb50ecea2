//! Transport boundary for talking to the update server
//!
//! This module provides:
//! - The `Transport` trait: "fetch text / bytes from URL"
//! - HTTP client implementation with retry logic
//! - Helpers for the plain-text version and mods manifest endpoints

mod client;
mod manifest;

pub use client::HttpClient;
pub use manifest::{fetch_manifest, fetch_version_line, parse_manifest_lines};

use crate::error::FetchError;
use async_trait::async_trait;

/// Capability to fetch resources from the update server
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch a resource as UTF-8 text
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;

    /// Fetch a resource as raw bytes
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

//! modsync - Modpack launcher updater library
//!
//! This library provides the core functionality for keeping a modpack
//! installation current:
//! - Launcher version check (`domain::VersionNumber`)
//! - Mods manifest diffing (`sync::compute_plan`)
//! - Plan application with progress (`sync::UpdatePlanExecutor`)
//! - One-pass update workflow (`orchestrator::Orchestrator`)

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod orchestrator;
pub mod output;
pub mod profile;
pub mod progress;
pub mod sync;

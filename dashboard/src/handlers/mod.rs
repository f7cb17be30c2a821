//! Command handlers module
//!
//! This module contains handler functions for CLI commands, organized by feature.
//! CommandContext carries the resolved configuration shared across handlers.

use anyhow::Result;
use std::path::PathBuf;

use crate::config::DashboardFileConfig;
use crate::store::RunStore;

pub mod runs;

pub use runs::run_runs_command;

#[cfg(feature = "web")]
pub mod web;

#[cfg(feature = "web")]
pub use web::run_web;

// =============================================================================
// CommandContext - resolved settings
// =============================================================================

/// Shared context for command handlers.
pub struct CommandContext {
    pub storage_root: PathBuf,
    pub verbose: u8,
    pub file_config: DashboardFileConfig,
}

impl CommandContext {
    /// Create a new CommandContext from CLI args and file config
    pub fn new(
        storage_root: Option<String>,
        verbose: u8,
        file_config: DashboardFileConfig,
    ) -> Result<Self> {
        // Resolve with priority: CLI/env > config file > defaults
        let storage_root = file_config.resolve_storage_root(storage_root.as_deref())?;
        tracing::debug!("Using storage root {}", storage_root.display());

        Ok(Self {
            storage_root,
            verbose,
            file_config,
        })
    }

    /// Open a reader over the resolved storage root
    pub fn store(&self) -> RunStore {
        RunStore::open(&self.storage_root)
    }

    /// Check if verbose mode is enabled (any -v flag)
    pub fn is_verbose(&self) -> bool {
        self.verbose >= 1
    }
}

//! Configuration loading

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::store::RunStore;

/// Config file name searched for from the current directory upwards
pub const CONFIG_FILE_NAME: &str = ".dashboard.toml";

/// Find a config file by walking up the directory tree, then checking global config.
///
/// Search order:
/// 1. Current directory and parent directories (walking up to root)
/// 2. Global config at ~/.config/hive/
///
/// Returns the path if found, None otherwise.
fn find_config_file(filename: &str) -> Option<PathBuf> {
    let start = std::env::current_dir().ok()?;

    if let Some(found) = find_upwards(&start, filename) {
        return Some(found);
    }

    // Fallback: Check global config
    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("hive").join(filename);
        if global_path.exists() {
            return Some(global_path);
        }
    }

    None
}

fn find_upwards(start: &Path, filename: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.exists())
}

// ============================================================================
// Dashboard Configuration (.dashboard.toml)
// ============================================================================

/// Top-level dashboard configuration (from .dashboard.toml)
#[derive(Debug, Default, Deserialize)]
pub struct DashboardFileConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub web: WebSectionConfig,
}

/// Storage configuration section
#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one `<id>.json` file per run.
    /// `~` and `$VARS` are expanded.
    pub root: Option<String>,
}

/// Web server configuration section
#[derive(Debug, Deserialize)]
pub struct WebSectionConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

impl Default for WebSectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl DashboardFileConfig {
    /// Load config from .dashboard.toml
    ///
    /// Search order:
    /// 1. Walk up directory tree from cwd looking for .dashboard.toml
    /// 2. Check ~/.config/hive/.dashboard.toml (global fallback)
    /// 3. Fall back to defaults
    pub fn load() -> Result<Self> {
        if let Some(config_path) = find_config_file(CONFIG_FILE_NAME) {
            tracing::debug!("Loading config from: {}", config_path.display());
            return Self::load_from_path(&config_path);
        }

        tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
        Ok(Self::default())
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the storage root with priority: explicit > config file > default
    pub fn resolve_storage_root(&self, explicit: Option<&str>) -> Result<PathBuf> {
        match explicit.or(self.storage.root.as_deref()) {
            Some(raw) => expand_path(raw),
            None => RunStore::default_root(),
        }
    }
}

/// Expand `~` and environment variables in a configured path
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .with_context(|| format!("Failed to expand path: {}", raw))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = DashboardFileConfig::default();
        assert!(config.storage.root.is_none());
        assert_eq!(config.web.host, "127.0.0.1");
        assert_eq!(config.web.port, 3001);
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config = DashboardFileConfig::from_toml("[web]\nport = 8080\n").unwrap();
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.web.host, "127.0.0.1");
        assert!(config.storage.root.is_none());
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[storage]\nroot = \"/srv/hive/runs\"\n").unwrap();

        let config = DashboardFileConfig::load_from_path(&path).unwrap();
        assert_eq!(config.storage.root.as_deref(), Some("/srv/hive/runs"));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(DashboardFileConfig::from_toml("[storage\nroot = 1").is_err());
    }

    #[test]
    fn test_storage_root_precedence() {
        let config = DashboardFileConfig::from_toml("[storage]\nroot = \"/from/config\"\n").unwrap();

        assert_eq!(
            config.resolve_storage_root(Some("/from/flag")).unwrap(),
            PathBuf::from("/from/flag")
        );
        assert_eq!(
            config.resolve_storage_root(None).unwrap(),
            PathBuf::from("/from/config")
        );
    }

    #[test]
    fn test_tilde_expansion() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            expand_path("~/.hive/storage/runs").unwrap(),
            home.join(".hive/storage/runs")
        );
    }

    #[test]
    fn test_find_upwards() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();

        assert_eq!(
            find_upwards(&nested, CONFIG_FILE_NAME),
            Some(dir.path().join(CONFIG_FILE_NAME))
        );
    }
}

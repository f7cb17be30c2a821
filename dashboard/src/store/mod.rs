//! Run store reader
//!
//! Reads run records persisted by the agent framework as one JSON file per
//! run under a storage root (by default `~/.hive/storage/runs`).
//!
//! The reader never writes and never caches: every call re-scans the
//! directory. Failures are contained per file; a missing storage root reads
//! as an empty store.

pub mod error;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use types::{
    parse_timestamp, Decision, DecisionOption, Outcome, RunMetrics, RunRecord, RunStatus,
    RunSummary,
};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// File extension of run records
const RUN_FILE_SUFFIX: &str = ".json";

/// Read-only view over a directory of run files
#[derive(Debug, Clone)]
pub struct RunStore {
    root: PathBuf,
}

impl RunStore {
    /// Create a reader over the given storage root.
    ///
    /// The directory does not need to exist yet.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the default storage root (`~/.hive/storage/runs`)
    pub fn default_root() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".hive").join("storage").join("runs"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the storage root currently exists
    pub fn is_available(&self) -> bool {
        self.root.is_dir()
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// List every readable run, newest first.
    ///
    /// Ordered by `created_at` (falling back to `started_at`) descending.
    /// Runs without a usable timestamp sort last; ties keep filename order.
    pub fn list_summaries(&self) -> Vec<RunSummary> {
        let Some(files) = self.run_files() else {
            return Vec::new();
        };

        let mut runs: Vec<RunSummary> = files
            .iter()
            .filter_map(|path| match Self::read_record(path) {
                Ok(record) => Some(record.summarize(&file_stem(path))),
                Err(e) => {
                    tracing::error!("Error reading run file {}: {}", file_name(path), e);
                    None
                }
            })
            .collect();

        // Stable sort: equal keys stay in filename order
        runs.sort_by_key(|run| std::cmp::Reverse(run.timestamp()));

        tracing::debug!("Listed {} runs from {}", runs.len(), self.root.display());
        runs
    }

    /// Get the full record for a run.
    ///
    /// Probes `<id>.json` first. When no such file exists, scans every run
    /// file and returns the first whose embedded `id` matches.
    pub fn get_by_id(&self, id: &str) -> Option<RunRecord> {
        if id.is_empty() {
            return None;
        }

        if is_plain_file_name(id) {
            let exact = self.root.join(format!("{}{}", id, RUN_FILE_SUFFIX));
            if exact.is_file() {
                tracing::debug!("Exact match for run {} at {}", id, exact.display());
                return match Self::read_record(&exact) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::error!("Failed to fetch run {}: {}", id, e);
                        None
                    }
                };
            }
        }

        tracing::debug!("No file named after run {}, scanning storage", id);
        self.run_files()?.iter().find_map(|path| {
            Self::read_record(path)
                .ok()
                .filter(|record| record.id.as_deref() == Some(id))
        })
    }

    /// Resolve a run from a full ID or a unique ID prefix
    pub fn find_by_prefix(&self, prefix: &str) -> StoreResult<RunRecord> {
        if let Some(record) = self.get_by_id(prefix) {
            return Ok(record);
        }

        let matches: Vec<RunSummary> = self
            .list_summaries()
            .into_iter()
            .filter(|run| !prefix.is_empty() && run.id.starts_with(prefix))
            .collect();

        match matches.as_slice() {
            [] => Err(StoreError::NotFound(prefix.to_string())),
            [only] => self
                .get_by_id(&only.id)
                .ok_or_else(|| StoreError::NotFound(prefix.to_string())),
            _ => Err(StoreError::Ambiguous {
                prefix: prefix.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Read and parse a single run file
    pub fn read_record(path: &Path) -> StoreResult<RunRecord> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Run files under the root, sorted by file name.
    ///
    /// `None` when the root is missing or cannot be read.
    fn run_files(&self) -> Option<Vec<PathBuf>> {
        if !self.root.exists() {
            tracing::warn!("Storage directory not found: {}", self.root.display());
            return None;
        }

        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("Failed to read storage directory {}: {}", self.root.display(), e);
                return None;
            }
        };

        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| file_name(path).ends_with(RUN_FILE_SUFFIX))
            .collect();
        files.sort();
        Some(files)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    let name = file_name(path);
    name.strip_suffix(RUN_FILE_SUFFIX).unwrap_or(&name).to_string()
}

/// Whether `id` can name a file directly inside the storage root
fn is_plain_file_name(id: &str) -> bool {
    id != "." && id != ".." && !id.contains(['/', '\\']) && !id.contains('\0')
}

// ============================================================================
// Tests
// ============================================================================

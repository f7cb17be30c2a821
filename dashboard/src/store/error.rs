//! Run store errors

use std::path::PathBuf;

/// Errors raised while reading run files.
///
/// Listing and lookup contain these per file; they only reach callers through
/// [`RunStore::read_record`](super::RunStore::read_record) and
/// [`RunStore::find_by_prefix`](super::RunStore::find_by_prefix).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No run found with ID prefix: {0}")]
    NotFound(String),

    #[error("Ambiguous ID prefix '{prefix}', matches {count} runs")]
    Ambiguous { prefix: String, count: usize },
}

pub type StoreResult<T> = Result<T, StoreError>;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid report {path}: {source}")]
    InvalidReport {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("json encoding error: {0}")]
    Serialize(#[from] serde_json::Error),
}

// error.rs — Error types for the document stores.
//
// Store errors are the structural failures of the pipeline: a missing
// input file or unparseable JSON aborts a resolution run outright,
// unlike the per-owner and per-step problems the engine downgrades to
// warnings.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The project has no discovered snapshot yet.
    #[error("no discovered snapshot at {0}")]
    MissingDiscoveredFile(PathBuf),

    /// The project has no overrides catalogue yet.
    #[error("no permission overrides at {0}")]
    MissingOverridesFile(PathBuf),

    /// A document file exists but does not parse.
    #[error("malformed JSON in {path}: {source}")]
    MalformedJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The snapshot violated a model invariant (duplicate addresses).
    #[error(transparent)]
    Model(#[from] cs_model::ModelError),
}

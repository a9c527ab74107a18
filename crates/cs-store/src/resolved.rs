// resolved.rs — Append-side store for resolution results.
//
// A resolution run either produces a complete document or nothing, so
// the write is atomic at the file level: serialize to a temp file next
// to the target, then rename over it. Readers never observe a
// half-written document.

use std::fs;
use std::path::{Path, PathBuf};

use cs_model::ResolvedDocument;

use crate::error::StoreError;

/// File name of the resolved output inside a project directory.
pub const RESOLVED_FILE: &str = "resolved-permissions.json";

/// Store for a project's resolved permissions.
pub struct ResolvedStore {
    path: PathBuf,
}

impl ResolvedStore {
    /// Create a store for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            path: project_dir.as_ref().join(RESOLVED_FILE),
        }
    }

    /// Write the whole document atomically (temp file + rename).
    pub fn save(&self, document: &ResolvedDocument) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(document).map_err(|source| {
            StoreError::MalformedJson {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(
            path = %self.path.display(),
            contracts = document.contracts.len(),
            "wrote resolved permissions"
        );
        Ok(())
    }

    /// Read back a previously written document.
    pub fn load(&self) -> Result<Option<ResolvedDocument>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let document =
            serde_json::from_str(&raw).map_err(|source| StoreError::MalformedJson {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(document))
    }
}

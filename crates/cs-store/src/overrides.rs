// overrides.rs — Read/write store for the curator catalogue.
//
// Two shapes exist on disk. The current shape groups function
// overrides under their contract address. The legacy shape is a flat
// top-level `overrides` array whose entries carry their own
// `contractAddress`; it is accepted on read and migrated to the
// grouped shape in memory. Saves always write the grouped shape.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Deserialize;

use cs_model::{Address, FunctionOverride, OverridesDocument};

use crate::error::StoreError;

/// File name of the overrides catalogue inside a project directory.
pub const OVERRIDES_FILE: &str = "permission-overrides.json";

/// Store for a project's permission overrides.
pub struct OverridesStore {
    path: PathBuf,
}

/// The legacy flat shape: one entry per function, self-addressed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyOverride {
    contract_address: Address,
    #[serde(flatten)]
    function: FunctionOverride,
}

#[derive(Debug, Deserialize)]
struct LegacyDocument {
    overrides: Vec<LegacyOverride>,
}

impl OverridesStore {
    /// Create a store for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            path: project_dir.as_ref().join(OVERRIDES_FILE),
        }
    }

    /// Load the catalogue, migrating the legacy flat shape if found.
    pub fn load(&self) -> Result<OverridesDocument, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::MissingOverridesFile(self.path.clone()));
        }
        let raw = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|source| StoreError::MalformedJson {
                path: self.path.clone(),
                source,
            })?;

        if value.get("overrides").is_some_and(|v| v.is_array()) {
            let legacy: LegacyDocument =
                serde_json::from_value(value).map_err(|source| StoreError::MalformedJson {
                    path: self.path.clone(),
                    source,
                })?;
            tracing::info!(
                path = %self.path.display(),
                entries = legacy.overrides.len(),
                "migrating legacy flat overrides to contract-grouped shape"
            );
            let mut document = OverridesDocument::new();
            for entry in legacy.overrides {
                document.upsert_function(entry.contract_address, entry.function);
            }
            return Ok(document);
        }

        serde_json::from_value(value).map_err(|source| StoreError::MalformedJson {
            path: self.path.clone(),
            source,
        })
    }

    /// Save the catalogue, refreshing its `lastModified` stamp.
    pub fn save(&self, document: &mut OverridesDocument) -> Result<(), StoreError> {
        document.last_modified = Utc::now();
        let json = serde_json::to_string_pretty(document).map_err(|source| {
            StoreError::MalformedJson {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "saved overrides catalogue");
        Ok(())
    }
}

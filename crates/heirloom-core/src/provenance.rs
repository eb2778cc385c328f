//! Durable provenance records for downloaded assets.
//!
//! The store is a single JSON document:
//!
//! ```json
//! {
//!   "sources": {},
//!   "downloads": {
//!     "jefferson_portrait": { "asset_id": "jefferson_portrait", ... }
//!   }
//! }
//! ```
//!
//! It is loaded once per run, mutated in memory, and rewritten whole at the
//! end. `sources` is reserved and carried through untouched.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::atomic::{PersistError, write_json_atomic};
use crate::catalog::{AssetDescriptor, Metadata};

/// Timestamp format used for `downloaded_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What is known about one successfully downloaded asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub asset_id: String,
    pub name: String,
    pub url: String,
    /// Where the file was written, relative to the project root.
    pub local_path: String,
    pub source_org: String,
    #[serde(default)]
    pub description: String,
    pub asset_type: String,
    #[serde(default)]
    pub metadata: Metadata,
    /// Local wall-clock time, see [`TIMESTAMP_FORMAT`].
    pub downloaded_at: String,
    /// Lowercase hex MD5 of the file contents.
    pub file_hash: String,
    /// Size in bytes. Zero means "not recorded" and is never checked.
    #[serde(default)]
    pub file_size: u64,
}

impl ProvenanceRecord {
    /// Snapshot `asset` together with the facts of its download.
    pub fn from_asset(
        asset: &AssetDescriptor,
        downloaded_at: impl Into<String>,
        file_hash: impl Into<String>,
        file_size: u64,
    ) -> Self {
        Self {
            asset_id: asset.id.clone(),
            name: asset.name.clone(),
            url: asset.url.clone(),
            local_path: asset.target_path.clone(),
            source_org: asset.source_org.clone(),
            description: asset.description.clone(),
            asset_type: asset.asset_type.clone(),
            metadata: asset.metadata.clone(),
            downloaded_at: downloaded_at.into(),
            file_hash: file_hash.into(),
            file_size,
        }
    }

    /// The recorded file under `root`. Absolute paths are used as-is.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.local_path)
    }
}

/// Errors loading or saving the provenance store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read provenance store {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Provenance store {} is corrupt", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Mapping of asset id to provenance record, plus reserved source entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceStore {
    #[serde(default)]
    sources: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    downloads: IndexMap<String, ProvenanceRecord>,
}

impl ProvenanceStore {
    /// Load the store at `path`, or an empty store if the file does not exist.
    ///
    /// Unparseable content is an error; it is never silently replaced.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No provenance store at {}, starting empty", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let store: Self = serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            "Loaded {} provenance records from {}",
            store.downloads.len(),
            path.display()
        );
        Ok(store)
    }

    /// Rewrite the whole store at `path`.
    pub fn persist(&self, path: &Path) -> Result<(), StoreError> {
        write_json_atomic(path, self)?;
        tracing::debug!("Saved {} provenance records to {}", self.downloads.len(), path.display());
        Ok(())
    }

    /// Insert or replace the record for `id`. Existing ids keep their position.
    pub fn upsert(&mut self, id: impl Into<String>, record: ProvenanceRecord) {
        self.downloads.insert(id.into(), record);
    }

    pub fn get(&self, id: &str) -> Option<&ProvenanceRecord> {
        self.downloads.get(id)
    }

    pub fn len(&self) -> usize {
        self.downloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.downloads.is_empty()
    }

    /// Records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = (&str, &ProvenanceRecord)> {
        self.downloads.iter().map(|(id, record)| (id.as_str(), record))
    }

    /// Reserved source entries, preserved verbatim.
    pub fn sources(&self) -> &IndexMap<String, serde_json::Value> {
        &self.sources
    }
}

//! The fetch-or-skip acquisition loop.
//!
//! Assets are processed strictly one after another in catalog order. Each
//! asset either already exists on disk (trusted as-is), is downloaded and
//! recorded, or fails; a failure is logged and never stops the run.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;

use crate::catalog::{AssetDescriptor, Catalog};
use crate::fetch::{FetchError, Fetcher};
use crate::hash::file_md5;
use crate::layout::ProjectLayout;
use crate::provenance::{ProvenanceRecord, ProvenanceStore, TIMESTAMP_FORMAT};

/// Default pause after each asset.
pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(1);

/// Progress callback for acquisition events.
pub type ProgressCallback = Arc<dyn Fn(&AcquireEvent<'_>) + Send + Sync>;

/// Something that happened to one asset during a run.
#[derive(Debug)]
pub enum AcquireEvent<'a> {
    /// Processing of `asset` began.
    Started { asset: &'a AssetDescriptor },
    /// The destination already existed; nothing was fetched.
    AlreadyPresent {
        asset: &'a AssetDescriptor,
        path: &'a Path,
    },
    /// The asset was fetched, written and recorded.
    Downloaded {
        asset: &'a AssetDescriptor,
        record: &'a ProvenanceRecord,
    },
    Failed {
        asset: &'a AssetDescriptor,
        error: &'a AssetError,
    },
}

/// Why a single asset could not be acquired.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to hash {}: {source}", path.display())]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-asset outcome of a run, keyed by asset id in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AcquisitionResults(IndexMap<String, bool>);

impl AcquisitionResults {
    pub fn get(&self, id: &str) -> Option<bool> {
        self.0.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn successful(&self) -> usize {
        self.0.values().filter(|ok| **ok).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.successful()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(id, ok)| (id.as_str(), *ok))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, bool)> for AcquisitionResults {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Downloads catalog assets into a project and records their provenance.
pub struct AcquisitionEngine<F> {
    fetcher: F,
    layout: ProjectLayout,
    throttle: Duration,
    progress: Option<ProgressCallback>,
}

impl<F: Fetcher> AcquisitionEngine<F> {
    pub fn new(fetcher: F, layout: ProjectLayout) -> Self {
        Self {
            fetcher,
            layout,
            throttle: DEFAULT_THROTTLE,
            progress: None,
        }
    }

    /// Set the pause taken after every asset.
    #[must_use]
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Set a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Process every asset in `catalog`, updating `store` in memory.
    ///
    /// Never fails as a whole: the result has exactly one entry per catalog
    /// asset. The store is not persisted here.
    pub fn acquire(&self, catalog: &Catalog, store: &mut ProvenanceStore) -> AcquisitionResults {
        let mut results = IndexMap::with_capacity(catalog.len());

        for asset in catalog {
            let ok = self.acquire_one(asset, store);
            results.insert(asset.id.clone(), ok);

            if !self.throttle.is_zero() {
                std::thread::sleep(self.throttle);
            }
        }

        AcquisitionResults(results)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(asset = %asset.id))]
    fn acquire_one(&self, asset: &AssetDescriptor, store: &mut ProvenanceStore) -> bool {
        self.emit(&AcquireEvent::Started { asset });

        let path = asset.destination(self.layout.root());
        if path.exists() {
            tracing::debug!("Asset {} already present at {}", asset.id, path.display());
            self.emit(&AcquireEvent::AlreadyPresent { asset, path: &path });
            return true;
        }

        match self.download(asset, &path) {
            Ok(record) => {
                tracing::info!(
                    "Downloaded {} ({} bytes, md5 {})",
                    asset.id,
                    record.file_size,
                    record.file_hash
                );
                self.emit(&AcquireEvent::Downloaded {
                    asset,
                    record: &record,
                });
                store.upsert(asset.id.clone(), record);
                true
            }
            Err(error) => {
                tracing::warn!("Failed to acquire {}: {}", asset.id, error);
                self.emit(&AcquireEvent::Failed {
                    asset,
                    error: &error,
                });
                false
            }
        }
    }

    fn download(&self, asset: &AssetDescriptor, path: &Path) -> Result<ProvenanceRecord, AssetError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| AssetError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let body = self.fetcher.fetch(&asset.url)?;

        let record = write_and_record(asset, path, &body);
        if record.is_err() {
            // An unrecorded file would be trusted as complete on the next run.
            let _ = std::fs::remove_file(path);
        }
        record
    }

    fn emit(&self, event: &AcquireEvent<'_>) {
        if let Some(ref callback) = self.progress {
            callback(event);
        }
    }
}

fn write_and_record(
    asset: &AssetDescriptor,
    path: &Path,
    body: &[u8],
) -> Result<ProvenanceRecord, AssetError> {
    std::fs::write(path, body).map_err(|source| AssetError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    let hash_err = |source| AssetError::Hash {
        path: path.to_path_buf(),
        source,
    };
    let file_hash = file_md5(path).map_err(hash_err)?;
    let file_size = std::fs::metadata(path).map(|m| m.len()).map_err(hash_err)?;

    let downloaded_at = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    Ok(ProvenanceRecord::from_asset(asset, downloaded_at, file_hash, file_size))
}

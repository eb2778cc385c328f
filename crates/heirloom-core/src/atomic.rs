//! Whole-document JSON rewrites.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Errors writing a JSON document to disk.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Serialize `value` as pretty JSON and replace `path` with it.
///
/// The document is written to a temp file in the destination directory and
/// renamed over the target, so readers never observe a half-written file.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(|source| PersistError::CreateDir {
        path: parent.clone(),
        source,
    })?;

    let contents = serde_json::to_string_pretty(value).map_err(|source| PersistError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    let write_err = |source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    };

    // Same directory keeps the rename on one filesystem.
    let mut temp_file = tempfile::NamedTempFile::new_in(&parent).map_err(write_err)?;
    temp_file.write_all(contents.as_bytes()).map_err(write_err)?;
    temp_file.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}

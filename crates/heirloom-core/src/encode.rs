//! Base64 encoding of signing files for CI secret stores.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("{} does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Encode the contents of `path` as a single padded base64 line.
pub fn encode_file(path: &Path) -> Result<String, EncodeError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            EncodeError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            EncodeError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    Ok(STANDARD.encode(bytes))
}

/// `NAME=<encoded>`, ready to paste into an environment editor.
pub fn wrap_env_var(name: &str, encoded: &str) -> String {
    format!("{name}={encoded}")
}

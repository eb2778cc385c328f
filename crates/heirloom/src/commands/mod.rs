pub mod acquire;
pub mod catalog;
pub mod completions;
pub mod encode;
pub mod signing_env;

use std::path::Path;

use anyhow::{Context, Result};
use heirloom_core::Catalog;

/// Load `path` if given, otherwise the bundled catalog.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => {
            tracing::debug!("Loading catalog from {}", path.display());
            Catalog::load(path).with_context(|| format!("Invalid catalog: {}", path.display()))
        }
        None => Catalog::bundled().context("Bundled catalog is invalid"),
    }
}

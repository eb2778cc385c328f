//! Where a project keeps its assets and bookkeeping files.

use std::path::{Path, PathBuf};

use crate::config::PathSettings;

/// Resolved file locations for one project root.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    provenance_path: PathBuf,
    report_path: PathBuf,
    scaffold: Vec<PathBuf>,
}

impl ProjectLayout {
    /// Resolve `paths` against `root`.
    pub fn new(root: impl Into<PathBuf>, paths: &PathSettings) -> Self {
        let root = root.into();
        Self {
            provenance_path: root.join(&paths.provenance),
            report_path: root.join(&paths.report),
            scaffold: paths.scaffold.iter().map(|dir| root.join(dir)).collect(),
            root,
        }
    }

    /// Layout with the default file locations.
    pub fn with_defaults(root: impl Into<PathBuf>) -> Self {
        Self::new(root, &PathSettings::default())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Provenance store document.
    pub fn provenance_path(&self) -> &Path {
        &self.provenance_path
    }

    /// Run report document.
    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Resolve a project-relative path.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Create the scaffold directories.
    pub fn prepare(&self) -> std::io::Result<()> {
        for dir in &self.scaffold {
            std::fs::create_dir_all(dir)?;
        }
        tracing::debug!("Prepared {} directories under {}", self.scaffold.len(), self.root.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_creates_default_scaffold() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::with_defaults(dir.path());
        layout.prepare().unwrap();

        for sub in ["assets/maps", "assets/audio/vo", "tools"] {
            assert!(dir.path().join(sub).is_dir(), "{sub} missing");
        }
        assert_eq!(layout.provenance_path(), dir.path().join("data/SourceLog.json"));
        assert_eq!(layout.report_path(), dir.path().join("tools/download_log.json"));
    }

    #[test]
    fn test_custom_paths() {
        let paths = PathSettings {
            provenance: PathBuf::from("meta/prov.json"),
            scaffold: Vec::new(),
            ..PathSettings::default()
        };
        let layout = ProjectLayout::new("/proj", &paths);
        assert_eq!(layout.provenance_path(), Path::new("/proj/meta/prov.json"));
        assert_eq!(layout.resolve("x/a.jpg"), Path::new("/proj/x/a.jpg"));
    }
}

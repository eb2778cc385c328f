//! Per-project settings.
//!
//! Settings live in an optional `heirloom.toml` at the project root. Every
//! key has a default, so the file only needs the values being changed.
//!
//! # Example
//!
//! ```toml
//! [acquire]
//! timeout_secs = 60
//! throttle_ms = 250
//!
//! [paths]
//! catalog = "tools/catalog.toml"
//! scaffold = ["assets/maps", "assets/portraits", "tools"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::fetch::DEFAULT_USER_AGENT;

/// Errors reading `heirloom.toml`.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub acquire: AcquireSettings,
    pub paths: PathSettings,
}

/// Network behaviour of an acquisition run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AcquireSettings {
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Pause after every asset, successful or not.
    pub throttle_ms: u64,
    pub user_agent: String,
}

impl Default for AcquireSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            throttle_ms: 1000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// File locations, relative to the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathSettings {
    pub provenance: PathBuf,
    pub report: PathBuf,
    /// Custom catalog; the bundled one is used when unset.
    pub catalog: Option<PathBuf>,
    /// Directories created before every acquisition run.
    pub scaffold: Vec<PathBuf>,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            provenance: PathBuf::from("data/SourceLog.json"),
            report: PathBuf::from("tools/download_log.json"),
            catalog: None,
            scaffold: [
                "assets/maps",
                "assets/interiors",
                "assets/portraits",
                "assets/audio/music",
                "assets/audio/sfx",
                "assets/audio/vo",
                "tools",
            ]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
        }
    }
}

impl Settings {
    /// Settings file name, looked up in the project root.
    pub const FILE_NAME: &'static str = "heirloom.toml";

    /// Load settings for the project at `root`, or defaults if there is no file.
    pub fn load(root: &Path) -> Result<Self, SettingsError> {
        let path = root.join(Self::FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| SettingsError::Read {
            path: path.clone(),
            source,
        })?;
        let settings = toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.acquire.timeout_secs)
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.acquire.throttle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.throttle(), Duration::from_secs(1));
        assert_eq!(settings.acquire.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(settings.paths.provenance, PathBuf::from("data/SourceLog.json"));
        assert_eq!(settings.paths.scaffold.len(), 7);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let settings = Settings::from_toml_str("[acquire]\nthrottle_ms = 0\n").unwrap();
        assert_eq!(settings.throttle(), Duration::ZERO);
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.paths, PathSettings::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Settings::from_toml_str("[acquire]\nretries = 3\n").is_err());
    }

    #[test]
    fn test_load_without_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load(dir.path()).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(Settings::FILE_NAME), "[paths\n").unwrap();
        let err = Settings::load(dir.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }
}

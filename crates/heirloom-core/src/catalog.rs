//! Asset catalog definitions.
//!
//! The catalog is data, not code: entries live in a TOML file that is parsed
//! once into an immutable, ordered collection. The default catalog ships
//! inside the binary; a custom file can be loaded with [`Catalog::load`].
//!
//! # Catalog format
//!
//! ```toml
//! [[asset]]
//! id = "jefferson_portrait"
//! name = "Thomas Jefferson Portrait by Rembrandt Peale"
//! url = "https://upload.wikimedia.org/wikipedia/commons/1/1e/Thomas_Jefferson_by_Rembrandt_Peale%2C_1800.jpg"
//! description = "1800 portrait by Rembrandt Peale"
//! source_org = "Wikimedia Commons"
//! asset_type = "portrait"
//! target_path = "assets/portraits/jefferson.jpg"
//!
//! [asset.metadata]
//! subject = "Thomas Jefferson"
//! year = 1800
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The catalog bundled with the tool.
const BUNDLED_CATALOG: &str = include_str!("../catalog/declaration.toml");

/// A single free-form provenance fact.
///
/// Metadata has no schema across asset types, so values stay scalar and
/// untyped beyond what TOML/JSON can express.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// Ordered, string-keyed provenance facts.
pub type Metadata = IndexMap<String, MetadataValue>;

/// A downloadable historical asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// Unique, stable identifier. Used as the provenance key.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Source location.
    pub url: String,
    #[serde(default)]
    pub description: String,
    /// Attribution string.
    pub source_org: String,
    /// Open category tag (map, portrait, document, building, interior, ...).
    pub asset_type: String,
    /// Destination path relative to the project root.
    pub target_path: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl AssetDescriptor {
    /// Destination of this asset under `root`.
    pub fn destination(&self, root: &Path) -> PathBuf {
        root.join(&self.target_path)
    }
}

/// Errors raised while loading or validating a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {origin}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Duplicate asset id '{0}' in catalog")]
    DuplicateId(String),

    #[error("Assets '{first}' and '{second}' both write to {target_path}")]
    DuplicateTargetPath {
        target_path: String,
        first: String,
        second: String,
    },

    #[error("Asset '{id}' has an invalid {field}: {reason}")]
    InvalidField {
        id: String,
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "asset")]
    assets: Vec<AssetDescriptor>,
}

/// Immutable, ordered collection of asset descriptors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    assets: Vec<AssetDescriptor>,
}

impl Catalog {
    /// The catalog bundled into the tool.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::parse(BUNDLED_CATALOG, "<bundled>")
    }

    /// Load a catalog from a TOML file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse a catalog from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        Self::parse(content, "<string>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content).map_err(|source| CatalogError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        Self::from_assets(file.assets)
    }

    /// Build a catalog from descriptors, enforcing id and target uniqueness.
    pub fn from_assets(assets: Vec<AssetDescriptor>) -> Result<Self, CatalogError> {
        let mut ids: HashSet<&str> = HashSet::with_capacity(assets.len());
        let mut targets: HashMap<PathBuf, &str> = HashMap::with_capacity(assets.len());

        for asset in &assets {
            validate_fields(asset)?;
            if !ids.insert(asset.id.as_str()) {
                return Err(CatalogError::DuplicateId(asset.id.clone()));
            }
            if let Some(first) = targets.insert(target_key(&asset.target_path), asset.id.as_str()) {
                return Err(CatalogError::DuplicateTargetPath {
                    target_path: asset.target_path.clone(),
                    first: first.to_string(),
                    second: asset.id.clone(),
                });
            }
        }

        Ok(Self { assets })
    }

    /// All assets in catalog order.
    pub fn assets(&self) -> &[AssetDescriptor] {
        &self.assets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssetDescriptor> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Get an asset by id.
    pub fn get(&self, id: &str) -> Option<&AssetDescriptor> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Restrict the catalog to one asset type (exact match).
    ///
    /// An unknown type yields an empty catalog, not an error.
    #[must_use]
    pub fn filter_by_type(&self, asset_type: &str) -> Self {
        Self {
            assets: self
                .assets
                .iter()
                .filter(|a| a.asset_type == asset_type)
                .cloned()
                .collect(),
        }
    }

    /// Distinct asset types in first-seen order.
    pub fn asset_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for asset in &self.assets {
            if !types.contains(&asset.asset_type.as_str()) {
                types.push(&asset.asset_type);
            }
        }
        types
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a AssetDescriptor;
    type IntoIter = std::slice::Iter<'a, AssetDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}

fn validate_fields(asset: &AssetDescriptor) -> Result<(), CatalogError> {
    let invalid = |field, reason| CatalogError::InvalidField {
        id: asset.id.clone(),
        field,
        reason,
    };

    if asset.id.trim().is_empty() {
        return Err(invalid("id", "must not be empty"));
    }
    if asset.url.trim().is_empty() {
        return Err(invalid("url", "must not be empty"));
    }
    if asset.target_path.trim().is_empty() {
        return Err(invalid("target_path", "must not be empty"));
    }

    // Destinations are joined onto the project root and must stay inside it.
    let target = Path::new(&asset.target_path);
    if target.is_absolute() || target.has_root() {
        return Err(invalid("target_path", "must be relative"));
    }
    if target
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(invalid("target_path", "must not leave the project root"));
    }

    // serde_json writes NaN and infinities as null.
    if asset
        .metadata
        .values()
        .any(|v| matches!(v, MetadataValue::Float(f) if !f.is_finite()))
    {
        return Err(invalid("metadata", "must not contain NaN or infinite numbers"));
    }

    Ok(())
}

/// `target_path` with `.` segments and repeated separators folded away.
fn target_key(target_path: &str) -> PathBuf {
    Path::new(target_path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

//! Read-only integrity check of recorded downloads.

use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::hash::file_md5;
use crate::provenance::ProvenanceStore;

/// Verification knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerifyOptions {
    /// Also recompute the MD5 of each file and compare it to the record.
    pub rehash: bool,
}

/// What was found for one recorded asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Valid,
    Missing,
    SizeMismatch { expected: u64, actual: u64 },
    HashMismatch { expected: String, actual: String },
    /// The file exists but could not be inspected.
    Unreadable { reason: String },
}

impl VerifyOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for VerifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => f.write_str("valid"),
            Self::Missing => f.write_str("missing"),
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch (expected {expected} bytes, found {actual})")
            }
            Self::HashMismatch { expected, actual } => {
                write!(f, "hash mismatch (expected {expected}, found {actual})")
            }
            Self::Unreadable { reason } => write!(f, "unreadable ({reason})"),
        }
    }
}

/// Verification result for one record.
#[derive(Debug, Clone)]
pub struct VerifiedAsset {
    pub name: String,
    pub local_path: PathBuf,
    pub outcome: VerifyOutcome,
}

/// Results of [`verify`], in store order.
#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    assets: IndexMap<String, VerifiedAsset>,
}

impl VerificationReport {
    pub fn passed(&self) -> usize {
        self.assets.values().filter(|a| a.outcome.is_valid()).count()
    }

    pub fn total(&self) -> usize {
        self.assets.len()
    }

    pub fn all_valid(&self) -> bool {
        self.passed() == self.total()
    }

    /// Id to pass/fail.
    pub fn results(&self) -> IndexMap<&str, bool> {
        self.assets
            .iter()
            .map(|(id, a)| (id.as_str(), a.outcome.is_valid()))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&VerifiedAsset> {
        self.assets.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VerifiedAsset)> {
        self.assets.iter().map(|(id, a)| (id.as_str(), a))
    }

    /// Console lines: one per failed asset, then the tally.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for asset in self.assets.values() {
            match &asset.outcome {
                VerifyOutcome::Valid => {}
                VerifyOutcome::Missing => {
                    let _ = writeln!(out, "  Missing: {}", asset.name);
                }
                VerifyOutcome::SizeMismatch { .. } => {
                    let _ = writeln!(out, "  Size mismatch: {}", asset.name);
                }
                VerifyOutcome::HashMismatch { .. } => {
                    let _ = writeln!(out, "  Hash mismatch: {}", asset.name);
                }
                VerifyOutcome::Unreadable { reason } => {
                    let _ = writeln!(out, "  Unreadable: {} ({reason})", asset.name);
                }
            }
        }
        let _ = writeln!(out, "Asset verification: {}/{} valid", self.passed(), self.total());
        out
    }
}

/// Check every record in `store` against the files under `root`.
///
/// A record fails if its file is missing, or if it has a nonzero recorded
/// size that differs from the file. With `rehash`, a differing MD5 also
/// fails it. Nothing is written.
pub fn verify(store: &ProvenanceStore, root: &Path, options: &VerifyOptions) -> VerificationReport {
    let assets = store
        .records()
        .map(|(id, record)| {
            let local_path = record.resolve(root);
            let outcome = check(&local_path, record.file_size, &record.file_hash, options);
            if !outcome.is_valid() {
                tracing::info!("Asset {} failed verification: {}", id, outcome);
            }
            (
                id.to_string(),
                VerifiedAsset {
                    name: record.name.clone(),
                    local_path,
                    outcome,
                },
            )
        })
        .collect();

    VerificationReport { assets }
}

fn check(path: &Path, expected_size: u64, expected_hash: &str, options: &VerifyOptions) -> VerifyOutcome {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return VerifyOutcome::Missing,
        Err(e) => return VerifyOutcome::Unreadable { reason: e.to_string() },
    };

    let actual = metadata.len();
    if expected_size > 0 && actual != expected_size {
        return VerifyOutcome::SizeMismatch {
            expected: expected_size,
            actual,
        };
    }

    if options.rehash {
        match file_md5(path) {
            Ok(hash) if !hash.eq_ignore_ascii_case(expected_hash) => {
                return VerifyOutcome::HashMismatch {
                    expected: expected_hash.to_string(),
                    actual: hash,
                };
            }
            Ok(_) => {}
            Err(e) => return VerifyOutcome::Unreadable { reason: e.to_string() },
        }
    }

    VerifyOutcome::Valid
}

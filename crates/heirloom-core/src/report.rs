//! Run reports.
//!
//! A report summarises one acquisition run. It is written once to
//! `tools/download_log.json` and replaces whatever report was there before.

use std::fmt::Write as _;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::acquire::AcquisitionResults;
use crate::atomic::{PersistError, write_json_atomic};
use crate::catalog::Catalog;
use crate::provenance::TIMESTAMP_FORMAT;

/// Width of the console separator line.
pub const SEPARATOR_WIDTH: usize = 60;

/// Headline numbers for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub timestamp: String,
    pub total_assets: usize,
    pub successful_downloads: usize,
    pub failed_downloads: usize,
    /// Formatted percentage, e.g. `"66.7%"`.
    pub success_rate: String,
}

/// Roll-up for one asset type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSummary {
    pub total: usize,
    pub successful: usize,
    pub assets: Vec<String>,
}

/// The persisted report document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub download_session: SessionSummary,
    pub asset_results: IndexMap<String, bool>,
    /// Keyed by asset type in first-seen catalog order.
    pub asset_summary_by_type: IndexMap<String, TypeSummary>,
}

/// Format `successful / total` as a percentage with one decimal.
///
/// An empty run reports `"0.0%"`.
pub fn success_rate(successful: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", successful as f64 / total as f64 * 100.0)
}

impl RunReport {
    /// Build a report from a run's results and the catalog that produced them.
    pub fn generate(results: &AcquisitionResults, catalog: &Catalog) -> Self {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        Self::generate_at(results, catalog, timestamp)
    }

    fn generate_at(results: &AcquisitionResults, catalog: &Catalog, timestamp: String) -> Self {
        let total = results.len();
        let successful = results.successful();

        let mut by_type: IndexMap<String, TypeSummary> = IndexMap::new();
        for asset in catalog {
            let summary = by_type.entry(asset.asset_type.clone()).or_default();
            summary.total += 1;
            summary.assets.push(asset.id.clone());
            if results.get(&asset.id).unwrap_or(false) {
                summary.successful += 1;
            }
        }

        Self {
            download_session: SessionSummary {
                timestamp,
                total_assets: total,
                successful_downloads: successful,
                failed_downloads: total - successful,
                success_rate: success_rate(successful, total),
            },
            asset_results: results.iter().map(|(id, ok)| (id.to_string(), ok)).collect(),
            asset_summary_by_type: by_type,
        }
    }

    /// Write the report to `path`, replacing any previous report.
    pub fn persist(&self, path: &Path) -> Result<(), PersistError> {
        write_json_atomic(path, self)
    }

    /// Console summary block printed at the end of a run.
    pub fn render_summary(&self, report_path: &Path, store_path: &Path) -> String {
        let session = &self.download_session;
        let mut out = String::new();

        let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
        let _ = writeln!(out, "DOWNLOAD COMPLETE");
        let _ = writeln!(
            out,
            "Successful: {}/{} ({})",
            session.successful_downloads, session.total_assets, session.success_rate
        );
        let _ = writeln!(out, "Report saved: {}", report_path.display());
        let _ = writeln!(out, "Source log updated: {}", store_path.display());
        let _ = writeln!(out);
        let _ = writeln!(out, "Assets by Type:");
        for (asset_type, summary) in &self.asset_summary_by_type {
            let _ = writeln!(
                out,
                "  {}: {}/{}",
                title_case(asset_type),
                summary.successful,
                summary.total
            );
        }

        out
    }
}

/// Capitalise the first letter of every word, lowercase the rest.
///
/// A word starts after any non-alphabetic character, so `"stained_glass"`
/// becomes `"Stained_Glass"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AssetDescriptor, Metadata};

    fn asset(id: &str, asset_type: &str) -> AssetDescriptor {
        AssetDescriptor {
            id: id.to_string(),
            name: id.to_uppercase(),
            url: format!("https://example.org/{id}"),
            description: String::new(),
            source_org: "Test".to_string(),
            asset_type: asset_type.to_string(),
            target_path: format!("x/{id}.jpg"),
            metadata: Metadata::new(),
        }
    }

    #[test]
    fn test_success_rate() {
        assert_eq!(success_rate(2, 3), "66.7%");
        assert_eq!(success_rate(3, 3), "100.0%");
        assert_eq!(success_rate(0, 0), "0.0%");
        assert_eq!(success_rate(1, 8), "12.5%");
    }

    #[test]
    fn test_generate_groups_by_type_in_catalog_order() {
        let catalog = Catalog::from_assets(vec![
            asset("m1", "map"),
            asset("p1", "portrait"),
            asset("m2", "map"),
        ])
        .unwrap();
        let results: AcquisitionResults = [
            ("m1".to_string(), true),
            ("p1".to_string(), false),
            ("m2".to_string(), true),
        ]
        .into_iter()
        .collect();

        let report = RunReport::generate_at(&results, &catalog, "2026-07-04 09:00:00".to_string());

        assert_eq!(report.download_session.total_assets, 3);
        assert_eq!(report.download_session.failed_downloads, 1);
        assert_eq!(report.download_session.success_rate, "66.7%");

        let types: Vec<&str> = report.asset_summary_by_type.keys().map(String::as_str).collect();
        assert_eq!(types, vec!["map", "portrait"]);
        let maps = &report.asset_summary_by_type["map"];
        assert_eq!((maps.successful, maps.total), (2, 2));
        assert_eq!(maps.assets, vec!["m1", "m2"]);
    }

    #[test]
    fn test_empty_run() {
        let report = RunReport::generate(&AcquisitionResults::default(), &Catalog::default());
        assert_eq!(report.download_session.success_rate, "0.0%");
        assert!(report.asset_summary_by_type.is_empty());

        let text = report.render_summary(Path::new("tools/log.json"), Path::new("data/src.json"));
        assert!(text.contains("Successful: 0/0 (0.0%)"));
        assert!(text.ends_with("Assets by Type:\n"));
    }

    #[test]
    fn test_render_summary() {
        let catalog = Catalog::from_assets(vec![asset("d1", "document")]).unwrap();
        let results: AcquisitionResults = [("d1".to_string(), true)].into_iter().collect();
        let report = RunReport::generate(&results, &catalog);

        let text = report.render_summary(Path::new("r.json"), Path::new("s.json"));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "-".repeat(60));
        assert_eq!(lines[1], "DOWNLOAD COMPLETE");
        assert_eq!(lines[2], "Successful: 1/1 (100.0%)");
        assert_eq!(lines[3], "Report saved: r.json");
        assert_eq!(lines[4], "Source log updated: s.json");
        assert_eq!(lines[5], "");
        assert_eq!(lines[7], "  Document: 1/1");
    }

    #[test]
    fn test_persisted_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools/download_log.json");
        let catalog = Catalog::from_assets(vec![asset("a", "map")]).unwrap();
        let results: AcquisitionResults = [("a".to_string(), false)].into_iter().collect();
        RunReport::generate(&results, &catalog).persist(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["download_session"]["failed_downloads"], 1);
        assert_eq!(value["asset_results"]["a"], false);
        assert_eq!(value["asset_summary_by_type"]["map"]["assets"][0], "a");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("portrait"), "Portrait");
        assert_eq!(title_case("stained_glass"), "Stained_Glass");
        assert_eq!(title_case("HABS drawing"), "Habs Drawing");
        assert_eq!(title_case(""), "");
    }
}

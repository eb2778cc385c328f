//! One complete acquisition run: load, acquire, persist, report.

use std::path::PathBuf;

use crate::acquire::{AcquisitionEngine, AcquisitionResults};
use crate::atomic::PersistError;
use crate::catalog::Catalog;
use crate::fetch::Fetcher;
use crate::provenance::{ProvenanceStore, StoreError};
use crate::report::RunReport;

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to create project directories under {}", root.display())]
    Prepare {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save run report")]
    Report(#[source] PersistError),
}

/// Everything a caller needs to present a finished run.
#[derive(Debug)]
pub struct RunOutcome {
    pub results: AcquisitionResults,
    pub report: RunReport,
    pub store_path: PathBuf,
    pub report_path: PathBuf,
}

/// Run `catalog` through `engine` and persist the store and report.
///
/// The provenance store is loaded before anything else, so a corrupt store
/// stops the run before any network traffic. Per-asset failures do not
/// make this return an error.
#[tracing::instrument(level = "info", name = "acquire::run", skip_all, fields(assets = catalog.len()))]
pub fn run_acquisition<F: Fetcher>(
    engine: &AcquisitionEngine<F>,
    catalog: &Catalog,
) -> Result<RunOutcome, RunError> {
    let layout = engine.layout();
    let store_path = layout.provenance_path().to_path_buf();
    let report_path = layout.report_path().to_path_buf();

    let mut store = ProvenanceStore::load(&store_path)?;

    layout.prepare().map_err(|source| RunError::Prepare {
        root: layout.root().to_path_buf(),
        source,
    })?;

    let results = engine.acquire(catalog, &mut store);
    tracing::info!(
        "Acquired {}/{} assets",
        results.successful(),
        results.len()
    );

    store.persist(&store_path)?;

    let report = RunReport::generate(&results, catalog);
    report.persist(&report_path).map_err(RunError::Report)?;

    Ok(RunOutcome {
        results,
        report,
        store_path,
        report_path,
    })
}

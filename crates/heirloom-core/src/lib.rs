//! Catalog-driven acquisition of historical assets with provenance tracking.
//!
//! The pipeline is sequential and deliberately simple:
//!
//! 1. A [`Catalog`] of [`AssetDescriptor`]s is loaded from TOML.
//! 2. An [`AcquisitionEngine`] walks it in order. Files that already exist are
//!    trusted; the rest are fetched through a [`Fetcher`], written, hashed and
//!    recorded in the [`ProvenanceStore`].
//! 3. The store and a [`RunReport`] are persisted as JSON.
//!
//! [`verify`] re-checks recorded files without touching the network.
//!
//! The crate also carries two small helpers for the mobile signing workflow:
//! [`signing`] (which secrets are present) and [`encode`] (base64 a file).
//!
//! # Example
//!
//! ```no_run
//! use heirloom_core::{AcquisitionEngine, Catalog, HttpFetcher, ProjectLayout, run_acquisition};
//!
//! let catalog = Catalog::bundled()?.filter_by_type("portrait");
//! let engine = AcquisitionEngine::new(HttpFetcher::default(), ProjectLayout::with_defaults("."));
//! let outcome = run_acquisition(&engine, &catalog)?;
//! println!("{} of {} assets present", outcome.results.successful(), outcome.results.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod acquire;
mod atomic;
pub mod catalog;
pub mod config;
pub mod encode;
pub mod fetch;
pub mod hash;
pub mod layout;
pub mod provenance;
pub mod report;
pub mod run;
pub mod signing;
pub mod verify;

pub use acquire::{AcquireEvent, AcquisitionEngine, AcquisitionResults, AssetError, ProgressCallback};
pub use atomic::PersistError;
pub use catalog::{AssetDescriptor, Catalog, CatalogError, Metadata, MetadataValue};
pub use config::{Settings, SettingsError};
pub use encode::EncodeError;
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use layout::ProjectLayout;
pub use provenance::{ProvenanceRecord, ProvenanceStore, StoreError};
pub use report::RunReport;
pub use run::{RunError, RunOutcome, run_acquisition};
pub use signing::SigningCheck;
pub use verify::{VerificationReport, VerifyOptions, VerifyOutcome, verify};

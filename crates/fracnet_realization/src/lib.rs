//! Realization driver, batches and reports for fracnet.
//!
//! This crate provides:
//! - [`RealizationDriver`]: seed, sample, filter and report one realization
//! - Sequential and rayon-parallel batch runners with per-realization seeds
//! - The [`OutputDestination`] abstraction with directory and memory sinks
//! - TSV and JSON reports with an xxh64 fingerprint per realization
//! - The [`Renderer`] boundary and a plain-text [`PolylineRenderer`]
//! - Pole aggregation over a finished batch
//!
//! # Determinism
//!
//! Realization `i` of a batch runs with seed `seed + i` and touches nothing
//! but its own destination, so running it alone with that seed produces
//! byte-identical reports.
//!
//! # Example
//!
//! ```rust,ignore
//! use fracnet_realization::{directory_factory, run_batch_parallel, RealizationDriver};
//!
//! let driver = RealizationDriver::new(GenerationSettings::load("settings.json")?);
//! let result = run_batch_parallel(&driver, directory_factory(Path::new("out")));
//! assert!(result.all_passed());
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod batch;
pub mod destination;
pub mod driver;
pub mod error;
pub mod poles;
pub mod render;
pub mod report;

pub use batch::{
    batch_destinations, directory_factory, realization_dir_name, realization_seed, run_batch,
    run_batch_parallel, BatchResult, RealizationOutcome,
};
pub use destination::{DirectoryDestination, MemoryDestination, OutputDestination};
pub use driver::{FractureSource, RealizationDriver, RealizationSummary};
pub use error::{Error, Result};
pub use poles::{collect_poles, poles_report, POLES_REPORT};
pub use render::{render_model, PolylineRenderer, Renderer};
pub use report::{NetworkSummary, ReportSet};

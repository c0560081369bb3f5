//! Benchmark result loading and reconciliation for tput-compare.
//!
//! This crate turns two independently produced sets of benchmark results
//! into comparable latency/throughput points:
//!
//! - a directory of per-run JSON documents from the harness under test
//!   (the *measured* series), and
//! - one JSON array of runs from a reference benchmark suite (the
//!   *reference* series).
//!
//! # Quick Start
//!
//! ```no_run
//! use tput_compare_benchmarks::{compare, CompareConfig};
//!
//! let config = CompareConfig::default();
//! let comparison = compare("results/", "agg_gptoss_1k1k.json", &config)?;
//!
//! for point in &comparison.reconciled.measured {
//!     println!("C{}: {:.1} tok/s ({})", point.concurrency, point.throughput, point.basis);
//! }
//! # Ok::<(), tput_compare_benchmarks::CompareError>(())
//! ```
//!
//! # Modules
//!
//! - [`result`] - Record types and typed field accessors
//! - [`io`] - Loading both result formats from disk
//! - [`selection`] - One reference run per concurrency
//! - [`reconcile`] - Comparable throughput and latency values
//! - [`markdown`] - Markdown summary generation
//! - [`config`] - Comparison settings

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod io;
pub mod markdown;
pub mod reconcile;
pub mod result;
pub mod selection;

pub use config::{CompareConfig, HardwareClass};
pub use error::{CompareError, Result};
pub use reconcile::{ReconciledPoint, Reconciliation, ThroughputBasis};
pub use result::{BenchmarkRecord, MeasuredRun, ReferenceRun};
pub use selection::ReferenceSelection;

use std::path::Path;
use tracing::info;

/// Everything loaded and derived for one comparison.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Measured runs placed on the concurrency axis, before the
    /// reliability filter.
    pub measured: Vec<MeasuredRun>,
    /// Reference runs after hardware filtering and selection.
    pub reference: ReferenceSelection,
    /// Comparable points for both series.
    pub reconciled: Reconciliation,
}

/// Load both result sets and reconcile them.
///
/// This is the main entrypoint of the crate.
///
/// # Errors
///
/// Returns an error if either path is missing, the reference file is
/// malformed, no measured run could be placed on the concurrency axis, or
/// no reference run matched the target hardware class.
pub fn compare(
    results_dir: impl AsRef<Path>,
    reference_file: impl AsRef<Path>,
    config: &CompareConfig,
) -> Result<Comparison> {
    let results_dir = results_dir.as_ref();
    let reference_file = reference_file.as_ref();

    if !results_dir.exists() {
        return Err(CompareError::MissingDirectory(results_dir.to_path_buf()));
    }
    if !reference_file.exists() {
        return Err(CompareError::MissingFile(reference_file.to_path_buf()));
    }

    info!(path = %results_dir.display(), "Loading measured results");
    let measured = io::read_measured_dir(results_dir)?;
    info!(count = measured.len(), "Loaded measured results");

    info!(path = %reference_file.display(), "Loading reference results");
    let reference = io::load_reference(reference_file, config)?;
    info!(
        selected = reference.best_per_concurrency.len(),
        filtered = reference.all_filtered.len(),
        "Selected reference configurations (one per concurrency)"
    );

    if measured.is_empty() {
        return Err(CompareError::NoMeasuredResults(results_dir.to_path_buf()));
    }
    if reference.is_empty() {
        return Err(CompareError::NoReferenceResults(reference_file.to_path_buf()));
    }

    let reconciled = reconcile::reconcile(&measured, &reference, config);

    Ok(Comparison {
        measured,
        reference,
        reconciled,
    })
}

// Copyright 2025 tput-compare Contributors
// SPDX-License-Identifier: Apache-2.0

//! Reconciliation of measured and reference runs onto comparable values.
//!
//! The measured deployment always runs on a fixed number of accelerator
//! units. A reference run with the same parallelism degree is compared per
//! unit; any other degree implies a different unit count, so both sides are
//! compared on aggregate throughput instead.
//!
//! # Example
//!
//! ```
//! use tput_compare_benchmarks::reconcile::{reconcile, ThroughputBasis};
//! use tput_compare_benchmarks::{CompareConfig, MeasuredRun, ReferenceSelection};
//! use serde_json::json;
//!
//! let reference = ReferenceSelection::from_filtered(
//!     vec![serde_json::from_value(json!({"conc": 16, "tp": 8, "tput_per_gpu": 400.0})).unwrap()],
//!     8,
//! );
//! let measured = vec![MeasuredRun::new(
//!     16,
//!     "conc16.json",
//!     serde_json::from_value(json!({"completed": 100, "total_token_throughput": 3200.0})).unwrap(),
//! )];
//!
//! let reconciled = reconcile(&measured, &reference, &CompareConfig::default());
//! assert_eq!(reconciled.measured[0].throughput, 400.0);
//! assert_eq!(reconciled.measured[0].basis, ThroughputBasis::PerUnit);
//! ```

use crate::config::CompareConfig;
use crate::result::{MeasuredRun, ReferenceRun};
use crate::selection::ReferenceSelection;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// What a reconciled throughput value measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThroughputBasis {
    /// Tokens per second per accelerator unit.
    PerUnit,
    /// Tokens per second across every unit serving the run.
    Aggregate,
}

impl ThroughputBasis {
    /// Short label used in chart annotations.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PerUnit => "per GPU",
            Self::Aggregate => "total",
        }
    }
}

impl fmt::Display for ThroughputBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One comparable point on the latency/throughput plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledPoint {
    /// Concurrency of the run.
    pub concurrency: u32,
    /// Median end-to-end latency in seconds.
    pub latency_secs: f64,
    /// Comparable throughput in tokens per second.
    pub throughput: f64,
    /// Meaning of `throughput`.
    pub basis: ThroughputBasis,
    /// Parallelism degree of the reference run, when there is one.
    pub degree: Option<u32>,
    /// Descriptive label, e.g. `TP8 (per GPU)`.
    pub label: String,
}

impl ReconciledPoint {
    /// Annotation lines drawn next to the point.
    pub fn annotation(&self) -> Vec<String> {
        let mut lines = vec![format!("C{}", self.concurrency)];
        if self.degree.is_some() {
            lines.push(self.label.clone());
        }
        lines
    }
}

/// Both series reduced to comparable points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Reliable measured runs, ascending by concurrency.
    pub measured: Vec<ReconciledPoint>,
    /// Selected reference runs, ascending by concurrency.
    pub reference: Vec<ReconciledPoint>,
}

/// Whether a measured run completed enough requests to be trusted.
///
/// A run fails when it completed fewer than `min_completed` requests, or
/// when it issued a known number of requests and completed less than
/// `min_completion_ratio` of them.
pub fn is_reliable(completed: u64, total: u64, config: &CompareConfig) -> bool {
    if completed < config.min_completed {
        return false;
    }
    total == 0 || completed as f64 / total as f64 >= config.min_completion_ratio
}

/// Comparable point for a selected reference run.
pub fn reference_point(run: &ReferenceRun, config: &CompareConfig) -> ReconciledPoint {
    let degree = run.degree();
    let (throughput, basis) = if config.is_preferred_degree(degree) {
        (run.throughput_per_unit(), ThroughputBasis::PerUnit)
    } else {
        (
            run.throughput_per_unit() * f64::from(degree),
            ThroughputBasis::Aggregate,
        )
    };

    ReconciledPoint {
        concurrency: run.concurrency(),
        latency_secs: run.median_e2el_secs(),
        throughput,
        basis,
        degree: Some(degree),
        label: format!("TP{} ({})", degree, basis),
    }
}

/// Comparable point for a measured run, given the reference selection.
///
/// The measured aggregate is divided by the unit count only when the
/// reference selection at the same concurrency used the preferred degree.
/// Without a reference run at that concurrency the aggregate is kept.
pub fn measured_point(
    run: &MeasuredRun,
    reference: &ReferenceSelection,
    config: &CompareConfig,
) -> ReconciledPoint {
    let per_unit = reference
        .best_at(run.concurrency)
        .map_or(false, |r| config.is_preferred_degree(r.degree()));

    let (throughput, basis) = if per_unit {
        (
            run.total_throughput() / f64::from(config.accelerator_units),
            ThroughputBasis::PerUnit,
        )
    } else {
        (run.total_throughput(), ThroughputBasis::Aggregate)
    };

    ReconciledPoint {
        concurrency: run.concurrency,
        latency_secs: run.median_e2el_secs(),
        throughput,
        basis,
        degree: None,
        label: format!("C{}", run.concurrency),
    }
}

/// Reconcile measured runs against the reference selection.
///
/// Unreliable measured runs and runs at concurrency zero are logged and
/// dropped.
pub fn reconcile(
    measured: &[MeasuredRun],
    reference: &ReferenceSelection,
    config: &CompareConfig,
) -> Reconciliation {
    let reference_points = reference
        .best_per_concurrency
        .iter()
        .map(|run| reference_point(run, config))
        .collect();

    let mut measured_points = Vec::with_capacity(measured.len());
    for run in measured {
        if run.concurrency == 0 {
            debug!(path = %run.source.display(), "Skipping run at concurrency 0");
            continue;
        }

        let completed = run.completed();
        let total = run.total_requests();
        if !is_reliable(completed, total, config) {
            warn!(
                concurrency = run.concurrency,
                completed,
                total,
                "Skipping CONC={}: only {}/{} requests completed (unreliable)",
                run.concurrency,
                completed,
                total
            );
            continue;
        }

        measured_points.push(measured_point(run, reference, config));
    }

    Reconciliation {
        measured: measured_points,
        reference: reference_points,
    }
}

// Copyright 2025 tput-compare Contributors
// SPDX-License-Identifier: Apache-2.0

//! Representative reference run per concurrency.
//!
//! Reference suites sweep several parallelism degrees at each concurrency.
//! One run is kept per concurrency, preferring the degree that matches the
//! measured deployment and otherwise the best per-unit throughput.
//!
//! The rule is applied in input order and is order-dependent:
//!
//! 1. the first run seen for a concurrency becomes the incumbent;
//! 2. a later run with the preferred degree always replaces the incumbent;
//! 3. a later run with another degree replaces the incumbent only when the
//!    incumbent does not have the preferred degree and the candidate's
//!    per-unit throughput is strictly higher.

use crate::result::ReferenceRun;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Two-tier preference key of a reference run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preference {
    /// Tier 1: the run uses the preferred parallelism degree.
    pub preferred_degree: bool,
    /// Tier 2: per-unit throughput.
    pub throughput_per_unit: f64,
}

impl Preference {
    /// Compute the preference of a run.
    pub fn of(run: &ReferenceRun, preferred_degree: u32) -> Self {
        Self {
            preferred_degree: run.degree() == preferred_degree,
            throughput_per_unit: run.throughput_per_unit(),
        }
    }

    /// Whether a later candidate with this preference takes over from `incumbent`.
    ///
    /// Tier 1 wins outright, even against an incumbent that is also tier 1.
    /// Tier 2 only competes against another tier-2 incumbent.
    pub fn supersedes(&self, incumbent: &Preference) -> bool {
        match (self.preferred_degree, incumbent.preferred_degree) {
            (true, _) => true,
            (false, true) => false,
            (false, false) => self.throughput_per_unit > incumbent.throughput_per_unit,
        }
    }
}

/// Loader B output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceSelection {
    /// One run per concurrency, ascending by concurrency.
    pub best_per_concurrency: Vec<ReferenceRun>,
    /// Every run that passed the hardware filter, in input order.
    pub all_filtered: Vec<ReferenceRun>,
}

impl ReferenceSelection {
    /// Select the representative runs from the filtered set.
    pub fn from_filtered(all_filtered: Vec<ReferenceRun>, preferred_degree: u32) -> Self {
        let best_per_concurrency = select_best_per_concurrency(&all_filtered, preferred_degree);
        Self {
            best_per_concurrency,
            all_filtered,
        }
    }

    /// Selected run at a concurrency.
    ///
    /// The first match wins, which only matters if the list was built by
    /// hand with duplicate concurrencies.
    pub fn best_at(&self, concurrency: u32) -> Option<&ReferenceRun> {
        self.best_per_concurrency
            .iter()
            .find(|r| r.concurrency() == concurrency)
    }

    /// Whether no run survived the hardware filter.
    pub fn is_empty(&self) -> bool {
        self.best_per_concurrency.is_empty()
    }
}

/// Apply the selection rule to runs in input order.
///
/// Returns one run per concurrency value, sorted ascending by concurrency.
pub fn select_best_per_concurrency(
    runs: &[ReferenceRun],
    preferred_degree: u32,
) -> Vec<ReferenceRun> {
    let mut best: BTreeMap<u32, (&ReferenceRun, Preference)> = BTreeMap::new();

    for run in runs {
        let candidate = Preference::of(run, preferred_degree);
        match best.entry(run.concurrency()) {
            Entry::Vacant(slot) => {
                slot.insert((run, candidate));
            }
            Entry::Occupied(mut slot) => {
                if candidate.supersedes(&slot.get().1) {
                    slot.insert((run, candidate));
                }
            }
        }
    }

    best.into_values().map(|(run, _)| run.clone()).collect()
}

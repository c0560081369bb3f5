// Copyright 2025 tput-compare Contributors
// SPDX-License-Identifier: Apache-2.0

//! Detailed chart: every filtered reference run, the selected ones
//! highlighted, plus the reconciled measured points.
//!
//! Reference runs are plotted with their raw per-unit throughput so the
//! whole configuration space is visible; only the measured series is
//! reconciled.

use crate::draw::{self, FONT, TITLE_FONT_SIZE};
use crate::style::{degree_style, Marker, MEASURED, REFERENCE_BEST};
use crate::{axis_upper, chart_title, note_lines, trend_order};
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tput_compare_benchmarks::{CompareConfig, Reconciliation, ReferenceRun, ReferenceSelection};
use tracing::debug;

/// Pixel size of the detailed chart.
pub const DETAILED_SIZE: (u32, u32) = (2100, 1350);

const RUN_MARKER_SIZE: u32 = 7;
const BEST_MARKER_SIZE: u32 = 14;
const MEASURED_MARKER_SIZE: u32 = 11;

/// Filtered reference runs grouped by parallelism degree, ascending.
pub fn runs_by_degree(runs: &[ReferenceRun]) -> BTreeMap<u32, Vec<&ReferenceRun>> {
    let mut groups: BTreeMap<u32, Vec<&ReferenceRun>> = BTreeMap::new();
    for run in runs {
        groups.entry(run.degree()).or_default().push(run);
    }
    groups
}

/// Render the detailed chart to `path`.
pub fn plot_detailed(
    reconciled: &Reconciliation,
    reference: &ReferenceSelection,
    config: &CompareConfig,
    path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(path, DETAILED_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let raw = |run: &ReferenceRun| (run.median_e2el_secs(), run.throughput_per_unit());

    let x_max = axis_upper(
        reference
            .all_filtered
            .iter()
            .map(|run| raw(run).0)
            .chain(reconciled.measured.iter().map(|p| p.latency_secs)),
    );
    let y_max = axis_upper(
        reference
            .all_filtered
            .iter()
            .map(|run| raw(run).1)
            .chain(reconciled.measured.iter().map(|p| p.throughput)),
    );
    debug!(x_max, y_max, "Detailed chart axes");

    let mut chart = ChartBuilder::on(&root)
        .caption(chart_title(config, true), (FONT, TITLE_FONT_SIZE))
        .margin(30)
        .x_label_area_size(70)
        .y_label_area_size(110)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .context("Failed to build detailed chart")?;
    draw::configure_mesh(&mut chart)?;

    for (degree, runs) in runs_by_degree(&reference.all_filtered) {
        let (marker, colour) = degree_style(degree);
        for run in runs {
            let at = draw::to_pixel(&chart, raw(run));
            draw::draw_marker(&root, at, marker, RUN_MARKER_SIZE, colour.mix(0.5), 1)?;
        }
        draw::legend_entry(
            &mut chart,
            &format!("{} TP{} (all)", config.reference_name, degree),
            marker,
            colour,
        )?;
    }

    if reconciled.measured.len() > 1 {
        let line = trend_order(&reconciled.measured);
        draw::draw_trend(&mut chart, line, MEASURED.mix(0.5), 2)?;
    }

    for run in &reference.best_per_concurrency {
        let at = draw::to_pixel(&chart, raw(run));
        draw::draw_marker(
            &root,
            at,
            Marker::Star,
            BEST_MARKER_SIZE,
            REFERENCE_BEST.mix(0.9),
            2,
        )?;
        let lines = vec![
            format!("C{}", run.concurrency()),
            format!("TP{}", run.degree()),
        ];
        draw::draw_annotation(&root, at, (14, -48), &lines, REFERENCE_BEST, 2)?;
    }
    draw::legend_entry(
        &mut chart,
        &format!("{} (best per CONC)", config.reference_name),
        Marker::Star,
        REFERENCE_BEST,
    )?;

    for point in &reconciled.measured {
        let at = draw::to_pixel(&chart, (point.latency_secs, point.throughput));
        draw::draw_marker(
            &root,
            at,
            Marker::Square,
            MEASURED_MARKER_SIZE,
            MEASURED.mix(0.9),
            2,
        )?;
        draw::draw_annotation(&root, at, (14, 14), &point.annotation(), MEASURED, 2)?;
    }
    draw::legend_entry(
        &mut chart,
        &format!("{} ({} GPUs)", config.measured_name, config.accelerator_units),
        Marker::Square,
        MEASURED,
    )?;
    draw::draw_legend(&mut chart)?;

    draw::draw_note(&chart, &root, &note_lines(reconciled, config, true))?;

    root.present()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(value: serde_json::Value) -> ReferenceRun {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_runs_grouped_by_ascending_degree() {
        let runs = vec![
            run(json!({"conc": 4, "tp": 8})),
            run(json!({"conc": 4, "tp": 2})),
            run(json!({"conc": 8, "tp": 8})),
        ];

        let groups = runs_by_degree(&runs);
        let degrees: Vec<u32> = groups.keys().copied().collect();
        assert_eq!(degrees, vec![2, 8]);
        assert_eq!(groups[&8].len(), 2);
        assert_eq!(groups[&8][1].concurrency(), 8);
    }
}

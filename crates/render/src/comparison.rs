// Copyright 2025 tput-compare Contributors
// SPDX-License-Identifier: Apache-2.0

//! Comparison chart: reconciled reference points against measured points.

use crate::draw::{self, FONT, TITLE_FONT_SIZE};
use crate::style::{Marker, MEASURED, REFERENCE};
use crate::{axis_upper, chart_title, note_lines, trend_order};
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;
use tput_compare_benchmarks::{CompareConfig, Reconciliation};
use tracing::debug;

/// Pixel size of the comparison chart.
pub const COMPARISON_SIZE: (u32, u32) = (1800, 1200);

const REFERENCE_MARKER_SIZE: u32 = 9;
const MEASURED_MARKER_SIZE: u32 = 9;

/// Render the comparison chart to `path`.
pub fn plot_comparison(
    reconciled: &Reconciliation,
    config: &CompareConfig,
    path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(path, COMPARISON_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let points = reconciled.reference.iter().chain(&reconciled.measured);
    let x_max = axis_upper(points.clone().map(|p| p.latency_secs));
    let y_max = axis_upper(points.map(|p| p.throughput));
    debug!(x_max, y_max, "Comparison chart axes");

    let mut chart = ChartBuilder::on(&root)
        .caption(chart_title(config, false), (FONT, TITLE_FONT_SIZE))
        .margin(30)
        .x_label_area_size(70)
        .y_label_area_size(110)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .context("Failed to build comparison chart")?;
    draw::configure_mesh(&mut chart)?;

    if reconciled.reference.len() > 1 {
        let line = trend_order(&reconciled.reference);
        draw::draw_trend(&mut chart, line, REFERENCE.mix(0.3), 2)?;
    }
    if reconciled.measured.len() > 1 {
        let line = trend_order(&reconciled.measured);
        draw::draw_trend(&mut chart, line, MEASURED.mix(0.3), 2)?;
    }

    for point in &reconciled.reference {
        let at = draw::to_pixel(&chart, (point.latency_secs, point.throughput));
        draw::draw_marker(
            &root,
            at,
            Marker::Circle,
            REFERENCE_MARKER_SIZE,
            REFERENCE.mix(0.8),
            1,
        )?;
        draw::draw_annotation(&root, at, (12, -44), &point.annotation(), REFERENCE, 1)?;
    }

    for point in &reconciled.measured {
        let at = draw::to_pixel(&chart, (point.latency_secs, point.throughput));
        draw::draw_marker(
            &root,
            at,
            Marker::Square,
            MEASURED_MARKER_SIZE,
            MEASURED.mix(0.8),
            1,
        )?;
        draw::draw_annotation(&root, at, (12, 12), &point.annotation(), MEASURED, 1)?;
    }

    draw::legend_entry(&mut chart, &config.reference_name, Marker::Circle, REFERENCE)?;
    draw::legend_entry(
        &mut chart,
        &format!("{} ({} GPUs)", config.measured_name, config.accelerator_units),
        Marker::Square,
        MEASURED,
    )?;
    draw::draw_legend(&mut chart)?;

    draw::draw_note(&chart, &root, &note_lines(reconciled, config, false))?;

    root.present()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensure_fonts;
    use tempfile::TempDir;
    use tput_compare_benchmarks::{ReconciledPoint, ThroughputBasis};

    fn point(concurrency: u32, latency_secs: f64, throughput: f64) -> ReconciledPoint {
        ReconciledPoint {
            concurrency,
            latency_secs,
            throughput,
            basis: ThroughputBasis::Aggregate,
            degree: Some(2),
            label: format!("TP2 ({})", ThroughputBasis::Aggregate),
        }
    }

    #[test]
    fn test_plot_with_trend_lines() {
        ensure_fonts().unwrap();
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("comparison.png");

        let reconciled = Reconciliation {
            measured: vec![point(64, 4.0, 9000.0), point(16, 2.0, 5000.0)],
            reference: vec![point(16, 2.2, 4800.0), point(32, 3.0, 7000.0)],
        };
        plot_comparison(&reconciled, &CompareConfig::default(), &path).unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_plot_single_points_without_trend() {
        ensure_fonts().unwrap();
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("single.png");

        let reconciled = Reconciliation {
            measured: vec![point(8, 1.0, 2400.0)],
            reference: Vec::new(),
        };
        plot_comparison(&reconciled, &CompareConfig::default(), &path).unwrap();

        assert!(path.exists());
    }
}

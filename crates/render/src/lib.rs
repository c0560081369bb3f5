//! Latency/throughput charts for tput-compare.
//!
//! Two PNG charts are rendered from a [`Comparison`]:
//!
//! - a comparison chart with one reconciled point per concurrency for each
//!   series, and
//! - a detailed chart with every filtered reference run by parallelism
//!   degree, the selected runs highlighted.
//!
//! Text is rendered with an embedded font, so no system fonts are needed.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod comparison;
pub mod detailed;
mod draw;
pub mod style;

pub use comparison::plot_comparison;
pub use detailed::plot_detailed;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use plotters::style::FontStyle;
use std::path::{Path, PathBuf};
use tput_compare_benchmarks::{
    CompareConfig, Comparison, ReconciledPoint, Reconciliation, ThroughputBasis,
};
use tracing::info;

static FONTS: Lazy<std::result::Result<(), String>> = Lazy::new(|| {
    plotters::style::register_font(
        "sans-serif",
        FontStyle::Normal,
        dejavu::sans_mono::regular(),
    )
    .map_err(|_| "embedded font could not be loaded".to_string())
});

/// Register the embedded font with the text renderer. Idempotent.
pub fn ensure_fonts() -> Result<()> {
    (*FONTS).clone().map_err(|e| anyhow!(e))
}

/// Upper axis bound: 110% of the largest value.
///
/// Falls back to 1.0 when there are no finite positive values, so an axis
/// never collapses to an empty range.
pub fn axis_upper(values: impl IntoIterator<Item = f64>) -> f64 {
    let max = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// `(latency, throughput)` pairs ordered by concurrency for trend lines.
pub fn trend_order(points: &[ReconciledPoint]) -> Vec<(f64, f64)> {
    let mut ordered: Vec<&ReconciledPoint> = points.iter().collect();
    ordered.sort_by(|a, b| {
        a.concurrency
            .cmp(&b.concurrency)
            .then(a.latency_secs.total_cmp(&b.latency_secs))
            .then(a.throughput.total_cmp(&b.throughput))
    });
    ordered
        .into_iter()
        .map(|p| (p.latency_secs, p.throughput))
        .collect()
}

/// Chart title. The detailed chart marks the reference series as covering
/// every configuration.
pub fn chart_title(config: &CompareConfig, detailed: bool) -> String {
    let scope = if detailed { " (all configs)" } else { "" };
    format!(
        "Token Throughput vs End-to-End Latency: {}{} vs {} ({})",
        config.reference_name, scope, config.measured_name, config.workload
    )
}

fn concurrencies(points: &[ReconciledPoint], basis: ThroughputBasis) -> String {
    let mut values: Vec<u32> = points
        .iter()
        .filter(|p| p.basis == basis)
        .map(|p| p.concurrency)
        .collect();
    values.sort_unstable();
    values.dedup();

    if values.is_empty() {
        "none".to_string()
    } else {
        values
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Lines of the note box explaining how throughput was reconciled.
pub fn note_lines(reconciled: &Reconciliation, config: &CompareConfig, detailed: bool) -> Vec<String> {
    let units = config.accelerator_units;
    let mut lines = vec![
        format!(
            "Fair comparison: per-GPU throughput where {} runs TP{} (CONC={}),",
            config.reference_name,
            units,
            concurrencies(&reconciled.measured, ThroughputBasis::PerUnit),
        ),
        format!(
            "total throughput where it runs a different TP (CONC={}).",
            concurrencies(&reconciled.measured, ThroughputBasis::Aggregate),
        ),
        format!(
            "{} uses {} GPUs; {} uses TP{} where available, best TP otherwise.",
            config.measured_name, units, config.reference_name, units
        ),
    ];
    if detailed {
        lines.push(format!(
            "{} points show raw per-GPU throughput; stars mark the selected run per concurrency.",
            config.reference_name
        ));
    }
    lines
}

/// Paths of the rendered charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCharts {
    /// Comparison chart.
    pub comparison: PathBuf,
    /// Detailed chart.
    pub detailed: PathBuf,
}

/// Render both charts into `output_dir`.
///
/// # Errors
///
/// Returns an error if the embedded font cannot be registered or either
/// chart cannot be drawn or written.
pub fn render_all(
    comparison: &Comparison,
    output_dir: impl AsRef<Path>,
    config: &CompareConfig,
) -> Result<RenderedCharts> {
    ensure_fonts()?;
    let output_dir = output_dir.as_ref();

    let comparison_path = output_dir.join(&config.comparison_file);
    plot_comparison(&comparison.reconciled, config, &comparison_path)
        .with_context(|| format!("Failed to render {}", comparison_path.display()))?;
    info!(path = %comparison_path.display(), "Rendered comparison chart");

    let detailed_path = output_dir.join(&config.detailed_file);
    plot_detailed(
        &comparison.reconciled,
        &comparison.reference,
        config,
        &detailed_path,
    )
    .with_context(|| format!("Failed to render {}", detailed_path.display()))?;
    info!(path = %detailed_path.display(), "Rendered detailed chart");

    Ok(RenderedCharts {
        comparison: comparison_path,
        detailed: detailed_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;
    use tput_compare_benchmarks::compare;

    fn point(concurrency: u32, latency_secs: f64, throughput: f64, basis: ThroughputBasis) -> ReconciledPoint {
        ReconciledPoint {
            concurrency,
            latency_secs,
            throughput,
            basis,
            degree: None,
            label: format!("C{}", concurrency),
        }
    }

    #[test]
    fn test_axis_upper_pads_maximum() {
        assert!((axis_upper(vec![1.0, 2.0, 10.0]) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_upper_fallback() {
        assert_eq!(axis_upper(Vec::new()), 1.0);
        assert_eq!(axis_upper(vec![0.0, -3.0]), 1.0);
        assert_eq!(axis_upper(vec![f64::NAN]), 1.0);
    }

    #[test]
    fn test_trend_order_sorts_by_concurrency() {
        let points = vec![
            point(32, 3.0, 300.0, ThroughputBasis::Aggregate),
            point(4, 1.0, 100.0, ThroughputBasis::PerUnit),
            point(16, 2.0, 200.0, ThroughputBasis::Aggregate),
        ];
        assert_eq!(
            trend_order(&points),
            vec![(1.0, 100.0), (2.0, 200.0), (3.0, 300.0)]
        );
    }

    #[test]
    fn test_note_lists_concurrencies_per_basis() {
        let reconciled = Reconciliation {
            measured: vec![
                point(8, 1.0, 100.0, ThroughputBasis::PerUnit),
                point(4, 1.0, 100.0, ThroughputBasis::PerUnit),
                point(64, 1.0, 100.0, ThroughputBasis::Aggregate),
            ],
            reference: Vec::new(),
        };
        let config = CompareConfig::default();

        let lines = note_lines(&reconciled, &config, false);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("CONC=4,8"));
        assert!(lines[1].contains("CONC=64"));
        assert_eq!(note_lines(&reconciled, &config, true).len(), 4);

        let empty = Reconciliation {
            measured: Vec::new(),
            reference: Vec::new(),
        };
        assert!(note_lines(&empty, &config, false)[0].contains("CONC=none"));
    }

    #[test]
    fn test_title_names_both_series() {
        let config = CompareConfig::default();
        assert_eq!(
            chart_title(&config, false),
            "Token Throughput vs End-to-End Latency: B200 TensorRT vs Baseten Optimized (GPT-OSS-120B, 1k/1k)"
        );
        assert_eq!(
            chart_title(&config, true),
            "Token Throughput vs End-to-End Latency: B200 TensorRT (all configs) vs Baseten Optimized (GPT-OSS-120B, 1k/1k)"
        );
    }

    #[test]
    fn test_render_all_writes_both_charts() {
        let tmp = TempDir::new().unwrap();
        let runs = tmp.path().join("runs");
        fs::create_dir(&runs).unwrap();

        for (conc, tput, e2el) in [(4, 3200.0, 1250.0), (16, 9000.0, 2100.0), (64, 20000.0, 4800.0)] {
            fs::write(
                runs.join(format!("conc{}.json", conc)),
                json!({
                    "completed": 100,
                    "total_token_throughput": tput,
                    "median_e2el_ms": e2el,
                })
                .to_string(),
            )
            .unwrap();
        }

        let reference = tmp.path().join("agg.json");
        fs::write(
            &reference,
            json!([
                {"hw": "b200-trt", "conc": 4, "tp": 8, "tput_per_gpu": 380.0, "median_e2el": 1.25},
                {"hw": "b200-trt", "conc": 4, "tp": 2, "tput_per_gpu": 900.0, "median_e2el": 1.9},
                {"hw": "b200-trt", "conc": 16, "tp": 4, "tput_per_gpu": 1500.0, "median_e2el": 2.0},
                {"hw": "b200", "framework": "trt", "conc": 64, "tp": 1, "tput_per_gpu": 3000.0, "median_e2el": 5.0},
            ])
            .to_string(),
        )
        .unwrap();

        let config = CompareConfig::default();
        let comparison = compare(&runs, &reference, &config).unwrap();
        let out = tmp.path().join("charts");
        fs::create_dir(&out).unwrap();

        let rendered = render_all(&comparison, &out, &config).unwrap();
        assert_eq!(rendered.comparison, out.join("baseten_vs_b200_comparison.png"));
        assert_eq!(rendered.detailed, out.join("baseten_vs_b200_detailed.png"));
        assert!(fs::metadata(&rendered.comparison).unwrap().len() > 0);
        assert!(fs::metadata(&rendered.detailed).unwrap().len() > 0);
    }
}

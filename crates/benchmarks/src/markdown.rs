//! Markdown output generation for reconciled results.
//!
//! This module renders the reconciled series as a table keyed by
//! concurrency, so the numbers behind the charts can be read or pasted
//! into a report.

use crate::reconcile::{ReconciledPoint, Reconciliation};
use std::collections::BTreeMap;
use std::fmt::Write;

fn cell(point: Option<&ReconciledPoint>) -> (String, String, String) {
    match point {
        Some(p) => (
            format!("{:.2}", p.latency_secs),
            format!("{:.1}", p.throughput),
            p.basis.to_string(),
        ),
        None => ("-".to_string(), "-".to_string(), "-".to_string()),
    }
}

/// Generate a markdown summary of both series side by side.
pub fn generate_summary(
    reconciled: &Reconciliation,
    measured_name: &str,
    reference_name: &str,
) -> String {
    let mut rows: BTreeMap<u32, (Option<&ReconciledPoint>, Option<&ReconciledPoint>)> =
        BTreeMap::new();
    for point in &reconciled.measured {
        rows.entry(point.concurrency).or_default().0 = Some(point);
    }
    for point in &reconciled.reference {
        rows.entry(point.concurrency).or_default().1 = Some(point);
    }

    let mut output = String::new();

    writeln!(output, "# Throughput Comparison").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Generated: {}", chrono::Utc::now().to_rfc3339()).unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "| Concurrency | {m} e2e (s) | {m} tok/s | {r} config | {r} e2e (s) | {r} tok/s | Basis |",
        m = measured_name,
        r = reference_name
    )
    .unwrap();
    writeln!(output, "|-------------|------|------|------|------|------|-------|").unwrap();

    for (concurrency, (measured, reference)) in &rows {
        let (m_latency, m_tput, m_basis) = cell(*measured);
        let (r_latency, r_tput, r_basis) = cell(*reference);
        let config = reference
            .and_then(|p| p.degree)
            .map_or_else(|| "-".to_string(), |tp| format!("TP{}", tp));
        let basis = if measured.is_some() { m_basis } else { r_basis };

        writeln!(
            output,
            "| {} | {} | {} | {} | {} | {} | {} |",
            concurrency, m_latency, m_tput, config, r_latency, r_tput, basis
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "---").unwrap();
    writeln!(
        output,
        "{}: {} points, {}: {} points",
        measured_name,
        reconciled.measured.len(),
        reference_name,
        reconciled.reference.len()
    )
    .unwrap();

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::ThroughputBasis;

    fn point(concurrency: u32, throughput: f64, degree: Option<u32>) -> ReconciledPoint {
        ReconciledPoint {
            concurrency,
            latency_secs: 1.25,
            throughput,
            basis: ThroughputBasis::PerUnit,
            degree,
            label: String::new(),
        }
    }

    #[test]
    fn test_summary_aligns_rows_by_concurrency() {
        let reconciled = Reconciliation {
            measured: vec![point(4, 410.0, None), point(16, 400.0, None)],
            reference: vec![point(4, 380.0, Some(8)), point(8, 390.0, Some(8))],
        };

        let summary = generate_summary(&reconciled, "Measured", "Reference");
        assert!(summary.starts_with("# Throughput Comparison"));
        assert!(summary.contains("| 4 | 1.25 | 410.0 | TP8 | 1.25 | 380.0 | per GPU |"));
        assert!(summary.contains("| 8 | - | - | TP8 | 1.25 | 390.0 | per GPU |"));
        assert!(summary.contains("| 16 | 1.25 | 400.0 | - | - | - | per GPU |"));
        assert!(summary.contains("Measured: 2 points, Reference: 2 points"));
    }

    #[test]
    fn test_summary_empty() {
        let summary = generate_summary(&Reconciliation::default(), "A", "B");
        assert!(summary.contains("A: 0 points, B: 0 points"));
    }
}

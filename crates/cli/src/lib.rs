//! CLI for tput-compare.
//!
//! Loads a directory of measured benchmark results and a reference results
//! file, reconciles them, renders both comparison charts next to the
//! measured results and prints a markdown summary.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use std::ffi::OsString;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use tput_compare_benchmarks::markdown::generate_summary;
use tput_compare_benchmarks::{compare, CompareConfig};
use tput_compare_render::render_all;
use tracing_subscriber::EnvFilter;

/// Compare measured token throughput and latency against a reference suite.
#[derive(Parser, Debug)]
#[command(name = "tput-compare")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory of per-run JSON results; charts are written here too.
    pub results_dir: PathBuf,

    /// JSON array of reference benchmark runs.
    pub reference_json: PathBuf,
}

/// Install the stderr log subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

/// Parse `args`, run the comparison and return the process exit code.
///
/// Usage, status lines and diagnostics are all written to `out`. Help and
/// version requests exit 0; missing arguments and any failure exit 1.
pub fn execute<I, T>(args: I, out: &mut impl Write) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = write!(out, "{}", e.render());
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
        }
    };

    match run(&cli, out) {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(out, "Error: {:#}", e);
            1
        }
    }
}

/// Run one comparison, writing status lines and the summary to `out`.
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if loading, reconciliation or
/// rendering fails.
pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let config = CompareConfig::new();

    writeln!(
        out,
        "Comparing {} against {}",
        cli.results_dir.display(),
        cli.reference_json.display()
    )?;
    let comparison = compare(&cli.results_dir, &cli.reference_json, &config)?;

    writeln!(
        out,
        "  Found {} {} results",
        comparison.measured.len(),
        config.measured_name
    )?;
    writeln!(
        out,
        "  Found {} best {} configurations (one per concurrency)",
        comparison.reference.best_per_concurrency.len(),
        config.reference_name
    )?;
    writeln!(
        out,
        "  Found {} total {} data points",
        comparison.reference.all_filtered.len(),
        config.reference_name
    )?;

    let charts = render_all(&comparison, &cli.results_dir, &config)?;
    writeln!(
        out,
        "{} Saved comparison plot: {}",
        "✓".green(),
        charts.comparison.display()
    )?;
    writeln!(
        out,
        "{} Saved detailed comparison plot: {}",
        "✓".green(),
        charts.detailed.display()
    )?;

    writeln!(out)?;
    write!(
        out,
        "{}",
        generate_summary(
            &comparison.reconciled,
            &config.measured_name,
            &config.reference_name
        )
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let runs = tmp.path().join("runs");
        fs::create_dir(&runs).unwrap();
        fs::write(
            runs.join("conc8.json"),
            json!({"completed": 50, "total_token_throughput": 2400.0, "median_e2el_ms": 1500.0})
                .to_string(),
        )
        .unwrap();

        fs::write(
            tmp.path().join("agg.json"),
            json!([{"hw": "b200-trt", "conc": 8, "tp": 8, "tput_per_gpu": 310.0, "median_e2el": 1.4}])
                .to_string(),
        )
        .unwrap();
        tmp
    }

    fn invoke(args: &[&Path]) -> (i32, String) {
        let mut argv = vec![PathBuf::from("tput-compare")];
        argv.extend(args.iter().map(|p| p.to_path_buf()));

        let mut out = Vec::new();
        let code = execute(argv, &mut out);
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_two_positional_arguments() {
        let cli = Cli::try_parse_from(["tput-compare", "runs", "agg.json"]).unwrap();
        assert_eq!(cli.results_dir, PathBuf::from("runs"));
        assert_eq!(cli.reference_json, PathBuf::from("agg.json"));
    }

    #[test]
    fn test_missing_arguments_print_usage_and_fail() {
        let (code, out) = invoke(&[Path::new("runs")]);
        assert_eq!(code, 1);
        assert!(out.contains("Usage"));

        let (code, _) = invoke(&[]);
        assert_eq!(code, 1);
    }

    #[test]
    fn test_help_and_version_succeed() {
        let mut out = Vec::new();
        assert_eq!(execute(["tput-compare", "--help"], &mut out), 0);
        assert!(String::from_utf8(out).unwrap().contains("REFERENCE_JSON"));

        let mut out = Vec::new();
        assert_eq!(execute(["tput-compare", "--version"], &mut out), 0);
        assert!(String::from_utf8(out).unwrap().contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_success_writes_charts_and_summary() {
        let tmp = fixture();
        let runs = tmp.path().join("runs");

        let (code, out) = invoke(&[&runs, &tmp.path().join("agg.json")]);
        assert_eq!(code, 0);
        assert!(out.contains("Saved comparison plot"));
        assert!(out.contains("| 8 | 1.50 | 300.0 | TP8 | 1.40 | 310.0 | per GPU |"));
        assert!(runs.join("baseten_vs_b200_comparison.png").exists());
        assert!(runs.join("baseten_vs_b200_detailed.png").exists());
    }

    #[test]
    fn test_missing_paths_reported_on_output() {
        let tmp = fixture();

        let (code, out) = invoke(&[&tmp.path().join("missing"), &tmp.path().join("agg.json")]);
        assert_eq!(code, 1);
        assert!(out.contains("Error: Results directory not found"));

        let (code, out) = invoke(&[&tmp.path().join("runs"), &tmp.path().join("missing.json")]);
        assert_eq!(code, 1);
        assert!(out.contains("Error: Reference results file not found"));
    }

    #[test]
    fn test_empty_series_fail() {
        let tmp = fixture();
        let empty = tmp.path().join("empty");
        fs::create_dir(&empty).unwrap();

        let (code, out) = invoke(&[&empty, &tmp.path().join("agg.json")]);
        assert_eq!(code, 1);
        assert!(out.contains("Error: No measured results found"));

        let other_hw = tmp.path().join("h100.json");
        fs::write(&other_hw, json!([{"hw": "h100", "conc": 8, "tp": 8}]).to_string()).unwrap();
        let (code, out) = invoke(&[&tmp.path().join("runs"), &other_hw]);
        assert_eq!(code, 1);
        assert!(out.contains("Error: No reference results"));
    }
}

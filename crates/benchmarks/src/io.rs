//! I/O operations for benchmark results.
//!
//! This module reads the two result formats from the filesystem: a
//! directory holding one JSON document per measured run, and a single JSON
//! array of reference runs.

use crate::config::CompareConfig;
use crate::error::{CompareError, Result};
use crate::result::{keys, BenchmarkRecord, MeasuredRun, ReferenceRun};
use crate::selection::ReferenceSelection;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

static CONCURRENCY_IN_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"conc(\d+)").expect("concurrency pattern is valid"));

/// Extract a concurrency from a file stem such as `run_conc42_tp8`.
pub fn concurrency_from_name(stem: &str) -> Option<u32> {
    CONCURRENCY_IN_NAME
        .captures(stem)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Resolve the concurrency of a measured run from its metadata, falling back
/// to the file name.
pub fn resolve_concurrency(record: &BenchmarkRecord, path: &Path) -> Option<u32> {
    record.get_u32(keys::MAX_CONCURRENCY).or_else(|| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .and_then(concurrency_from_name)
    })
}

/// Read one measured run document.
pub fn read_record(path: impl AsRef<Path>) -> Result<BenchmarkRecord> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| CompareError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CompareError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let io_err = |source| CompareError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load every measured run from a results directory.
///
/// Files that cannot be read or parsed are logged and skipped, as are runs
/// whose concurrency cannot be resolved. The result is sorted by
/// concurrency; runs sharing a concurrency keep their file-name order.
pub fn read_measured_dir(dir: impl AsRef<Path>) -> Result<Vec<MeasuredRun>> {
    let dir = dir.as_ref();
    let mut runs = Vec::new();

    for path in json_files(dir)? {
        let record = match read_record(&path) {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not load result file");
                continue;
            }
        };

        match resolve_concurrency(&record, &path) {
            Some(concurrency) => runs.push(MeasuredRun::new(concurrency, path, record)),
            None => {
                debug!(path = %path.display(), "No concurrency in metadata or file name, dropping");
            }
        }
    }

    runs.sort_by_key(|r| r.concurrency);
    Ok(runs)
}

/// Read a reference results file as a list of runs.
///
/// Any parse failure is fatal: the file is produced by one tool in one go,
/// so a partial read would be misleading.
pub fn read_reference_file(path: impl AsRef<Path>) -> Result<Vec<ReferenceRun>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| CompareError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CompareError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the reference file, filter it to the configured hardware class and
/// select one run per concurrency.
pub fn load_reference(path: impl AsRef<Path>, config: &CompareConfig) -> Result<ReferenceSelection> {
    let all = read_reference_file(path)?;
    let total = all.len();

    let filtered: Vec<ReferenceRun> = all
        .into_iter()
        .filter(|run| config.hardware.matches(run))
        .collect();
    info!(
        matched = filtered.len(),
        total,
        "Filtered reference runs to target hardware class"
    );

    Ok(ReferenceSelection::from_filtered(
        filtered,
        config.accelerator_units,
    ))
}

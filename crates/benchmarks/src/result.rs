//! Benchmark record types.
//!
//! Both inputs are loose JSON documents produced by different tools, so a
//! record is kept as an opaque key/value map and read through lenient typed
//! accessors. [`MeasuredRun`] and [`ReferenceRun`] name the fields each
//! source uses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Field names used by the two result formats.
pub mod keys {
    /// Configured concurrency of a measured run.
    pub const MAX_CONCURRENCY: &str = "max_concurrency";
    /// Requests that completed during a measured run.
    pub const COMPLETED: &str = "completed";
    /// Requests issued during a measured run.
    pub const TOTAL_REQUESTS: &str = "total_requests";
    /// Prompts issued, used when `total_requests` is missing.
    pub const NUM_PROMPTS: &str = "num_prompts";
    /// Aggregate token throughput of a measured run (tok/s).
    pub const TOTAL_TOKEN_THROUGHPUT: &str = "total_token_throughput";
    /// Median end-to-end latency of a measured run (ms).
    pub const MEDIAN_E2EL_MS: &str = "median_e2el_ms";

    /// Concurrency of a reference run.
    pub const CONC: &str = "conc";
    /// Parallelism degree of a reference run.
    pub const TP: &str = "tp";
    /// Per-unit token throughput of a reference run (tok/s).
    pub const TPUT_PER_GPU: &str = "tput_per_gpu";
    /// Median end-to-end latency of a reference run (s).
    pub const MEDIAN_E2EL: &str = "median_e2el";
    /// Hardware tag of a reference run.
    pub const HW: &str = "hw";
    /// Framework tag of a reference run.
    pub const FRAMEWORK: &str = "framework";
}

/// One benchmark run as an opaque mapping of field names to JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkRecord {
    /// Raw fields of the run.
    pub fields: Map<String, Value>,
}

impl BenchmarkRecord {
    /// Get a numeric field, or `None` when it is missing or not a number.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64)
    }

    /// Get a non-negative integral field.
    ///
    /// Floats with no fractional part are accepted since some producers
    /// write counts as `16.0`.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        let value = self.fields.get(key)?;
        if let Some(n) = value.as_u64() {
            return Some(n);
        }
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    }

    /// Get an integral field that must fit a `u32`.
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get_u64(key).and_then(|n| u32::try_from(n).ok())
    }

    /// Get a string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// A run from the benchmark harness under test, placed on the concurrency axis.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredRun {
    /// Resolved concurrency, from metadata or the file name.
    pub concurrency: u32,
    /// File the run was loaded from.
    pub source: PathBuf,
    /// Raw record.
    pub record: BenchmarkRecord,
}

impl MeasuredRun {
    /// Create a measured run.
    pub fn new(concurrency: u32, source: impl Into<PathBuf>, record: BenchmarkRecord) -> Self {
        Self {
            concurrency,
            source: source.into(),
            record,
        }
    }

    /// Completed request count, zero when absent.
    pub fn completed(&self) -> u64 {
        self.record.get_u64(keys::COMPLETED).unwrap_or(0)
    }

    /// Issued request count.
    ///
    /// Falls back to `num_prompts`, then to the completed count, so a run
    /// without either field reports full completion.
    pub fn total_requests(&self) -> u64 {
        self.record
            .get_u64(keys::TOTAL_REQUESTS)
            .or_else(|| self.record.get_u64(keys::NUM_PROMPTS))
            .unwrap_or_else(|| self.completed())
    }

    /// Aggregate token throughput across every accelerator unit.
    pub fn total_throughput(&self) -> f64 {
        self.record
            .get_f64(keys::TOTAL_TOKEN_THROUGHPUT)
            .unwrap_or(0.0)
    }

    /// Median end-to-end latency in milliseconds.
    pub fn median_e2el_ms(&self) -> f64 {
        self.record.get_f64(keys::MEDIAN_E2EL_MS).unwrap_or(0.0)
    }

    /// Median end-to-end latency in seconds.
    pub fn median_e2el_secs(&self) -> f64 {
        self.median_e2el_ms() / 1000.0
    }
}

/// A run from the reference benchmark suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceRun {
    /// Raw record.
    pub record: BenchmarkRecord,
}

impl ReferenceRun {
    /// Concurrency, zero when absent.
    pub fn concurrency(&self) -> u32 {
        self.record.get_u32(keys::CONC).unwrap_or(0)
    }

    /// Parallelism degree (units serving one replica), zero when absent.
    pub fn degree(&self) -> u32 {
        self.record.get_u32(keys::TP).unwrap_or(0)
    }

    /// Per-unit token throughput.
    pub fn throughput_per_unit(&self) -> f64 {
        self.record.get_f64(keys::TPUT_PER_GPU).unwrap_or(0.0)
    }

    /// Median end-to-end latency in seconds.
    pub fn median_e2el_secs(&self) -> f64 {
        self.record.get_f64(keys::MEDIAN_E2EL).unwrap_or(0.0)
    }

    /// Hardware tag.
    pub fn hardware(&self) -> Option<&str> {
        self.record.get_str(keys::HW)
    }

    /// Framework tag.
    pub fn framework(&self) -> Option<&str> {
        self.record.get_str(keys::FRAMEWORK)
    }
}

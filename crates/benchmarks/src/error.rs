// Copyright 2025 tput-compare Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for loading and reconciling benchmark results.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a comparison run.
///
/// Per-file problems in the measured results directory are not represented
/// here: those files are logged and skipped by the loader.
#[derive(Debug, Error)]
pub enum CompareError {
    /// The measured results directory does not exist
    #[error("Results directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// The reference results file does not exist
    #[error("Reference results file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// Reading a file or listing a directory failed
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A document could not be parsed as the expected JSON shape
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        /// Path of the malformed document
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// No measured result could be placed on the concurrency axis
    #[error("No measured results found in {}", .0.display())]
    NoMeasuredResults(PathBuf),

    /// No reference record matched the target hardware class
    #[error("No reference results for the target hardware class in {}", .0.display())]
    NoReferenceResults(PathBuf),
}

/// Result type for comparison operations.
pub type Result<T> = std::result::Result<T, CompareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = CompareError::MissingDirectory(PathBuf::from("/tmp/runs"));
        assert_eq!(err.to_string(), "Results directory not found: /tmp/runs");

        let err = CompareError::NoReferenceResults(PathBuf::from("agg.json"));
        assert!(err.to_string().contains("agg.json"));
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CompareError::Parse {
            path: PathBuf::from("agg.json"),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("Failed to parse agg.json"));
    }
}

// Copyright 2025 tput-compare Contributors
// SPDX-License-Identifier: Apache-2.0

//! Comparison settings.
//!
//! These are fixed for a given comparison and are built in code; nothing is
//! read from disk or the environment.

use crate::result::ReferenceRun;
use serde::{Deserialize, Serialize};

/// Accelerator units used by the measured deployment.
pub const DEFAULT_ACCELERATOR_UNITS: u32 = 8;

/// Minimum completed requests for a measured run to be trusted.
pub const DEFAULT_MIN_COMPLETED: u64 = 10;

/// Minimum completed/issued ratio for a measured run to be trusted.
pub const DEFAULT_MIN_COMPLETION_RATIO: f64 = 0.5;

/// Hardware/framework class a reference record must belong to.
///
/// A record matches when its hardware tag is one of `tags`, or when the tag
/// equals `bare_tag` and the framework tag equals `framework`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareClass {
    /// Hardware tags that already name the backend.
    pub tags: Vec<String>,
    /// Hardware tag that needs a framework tag to qualify.
    pub bare_tag: String,
    /// Framework tag paired with `bare_tag`.
    pub framework: String,
}

impl Default for HardwareClass {
    fn default() -> Self {
        Self {
            tags: vec!["b200-trt".to_string(), "b200-nvs".to_string()],
            bare_tag: "b200".to_string(),
            framework: "trt".to_string(),
        }
    }
}

impl HardwareClass {
    /// Check raw hardware and framework tags against the class.
    pub fn matches_tags(&self, hardware: Option<&str>, framework: Option<&str>) -> bool {
        match hardware {
            Some(hw) if self.tags.iter().any(|t| t == hw) => true,
            Some(hw) => hw == self.bare_tag && framework == Some(self.framework.as_str()),
            None => false,
        }
    }

    /// Check a reference run against the class.
    pub fn matches(&self, run: &ReferenceRun) -> bool {
        self.matches_tags(run.hardware(), run.framework())
    }
}

/// Settings for one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Accelerator units behind the measured deployment. Reference runs
    /// with this parallelism degree are preferred and compared per unit.
    pub accelerator_units: u32,
    /// Minimum completed requests for a measured run.
    pub min_completed: u64,
    /// Minimum completed/issued ratio for a measured run.
    pub min_completion_ratio: f64,
    /// Reference hardware filter.
    pub hardware: HardwareClass,
    /// Display name of the measured series.
    pub measured_name: String,
    /// Display name of the reference series.
    pub reference_name: String,
    /// Workload description used in chart titles.
    pub workload: String,
    /// File name of the best-of comparison chart.
    pub comparison_file: String,
    /// File name of the all-configurations chart.
    pub detailed_file: String,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            accelerator_units: DEFAULT_ACCELERATOR_UNITS,
            min_completed: DEFAULT_MIN_COMPLETED,
            min_completion_ratio: DEFAULT_MIN_COMPLETION_RATIO,
            hardware: HardwareClass::default(),
            measured_name: "Baseten Optimized".to_string(),
            reference_name: "B200 TensorRT".to_string(),
            workload: "GPT-OSS-120B, 1k/1k".to_string(),
            comparison_file: "baseten_vs_b200_comparison.png".to_string(),
            detailed_file: "baseten_vs_b200_detailed.png".to_string(),
        }
    }
}

impl CompareConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a reference degree matches the measured deployment.
    pub fn is_preferred_degree(&self, degree: u32) -> bool {
        degree == self.accelerator_units
    }
}

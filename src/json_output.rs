//! JSON output format for comparison results
//!
//! Field names and numeric semantics (score fractions in [0, 1], vital
//! milliseconds, unitless CLS) are part of the contract with downstream
//! renderers and must not drift.

use crate::analysis::ComparisonResult;
use crate::metrics::Metrics;
use serde::{Deserialize, Serialize};

/// Format version identifier
pub const FORMAT_VERSION: &str = "1.0";

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// Normalized URL of the analyzed page
    pub url: String,
    /// Collection timestamp of the current run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_time: Option<String>,
    /// Baseline strategy the comparison used
    pub strategy: String,
    /// Number of historical runs behind the baseline
    pub baseline_runs: usize,
    /// Whether the current run was compared against itself (no baseline)
    pub self_comparison: bool,
    /// Current run's normalized metrics
    pub current: Metrics,
    /// Comparison against the baseline
    pub comparison: ComparisonResult,
}

impl JsonReport {
    pub fn new(
        url: String,
        fetch_time: Option<String>,
        strategy: String,
        baseline_runs: usize,
        self_comparison: bool,
        current: Metrics,
        comparison: ComparisonResult,
    ) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            format: "faro-comparison".to_string(),
            url,
            fetch_time,
            strategy,
            baseline_runs,
            self_comparison,
            current,
            comparison,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// Statistical baseline synthesis and regression classification
//
// This module owns the two algorithmic pieces of the analyzer:
//
// - Percentile baseline synthesis over a historical metrics series, with
//   direction-aware semantics per metric family (score keys keep the
//   requested percentile, timing keys take the complement, so a "p75
//   baseline" is a strict guard in both directions).
// - Threshold/severity comparison of a current snapshot against a baseline,
//   classifying each metric as regression, improvement, or unchanged.
//
// Both are pure functions over in-memory values; determinism on identical
// inputs is a correctness requirement.

mod baseline;
mod compare;
mod thresholds;

pub use baseline::{build_median_baseline, build_percentile_baseline, percentile_of};
pub use compare::{compare, ComparisonResult, MetricComparison, OverallScore};
pub use thresholds::{CompareConfig, Severity, VitalThreshold};

// Metric-by-metric comparison of a current snapshot against a baseline
//
// Scores regress when they drop past the flat band; vitals regress when
// they grow past their dual threshold. A metric present on only one side is
// excluded entirely. Regression and improvement lists are sorted most
// actionable first: severity rank, then change magnitude.

use crate::analysis::thresholds::{CompareConfig, Severity};
use crate::filter::MetricFilter;
use crate::metrics::{Metrics, ScoreKind, VitalKind};
use serde::{Deserialize, Serialize};

/// One compared metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricComparison {
    pub metric: String,
    pub base_value: f64,
    pub current_value: f64,
    /// current − base
    pub diff: f64,
    pub diff_percent: f64,
    pub is_regression: bool,
    pub is_improvement: bool,
    pub severity: Severity,
}

/// Coarse summary from the performance score alone; absent values default
/// to 0 here (and only here)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallScore {
    pub base: f64,
    pub current: f64,
    pub diff: f64,
}

/// Terminal output of one comparison run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub regressions: Vec<MetricComparison>,
    pub improvements: Vec<MetricComparison>,
    pub unchanged: Vec<MetricComparison>,
    pub overall_score: OverallScore,
}

impl ComparisonResult {
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }

    /// Number of metrics that were comparable on both sides
    pub fn total_compared(&self) -> usize {
        self.regressions.len() + self.improvements.len() + self.unchanged.len()
    }

    /// Drop comparisons whose metric name the filter rejects
    pub fn retain_metrics(&mut self, filter: &MetricFilter) {
        self.regressions.retain(|c| filter.matches(&c.metric));
        self.improvements.retain(|c| filter.matches(&c.metric));
        self.unchanged.retain(|c| filter.matches(&c.metric));
    }
}

/// Diff `current` against `baseline`, metric by metric.
pub fn compare(current: &Metrics, baseline: &Metrics, config: &CompareConfig) -> ComparisonResult {
    let mut regressions = Vec::new();
    let mut improvements = Vec::new();
    let mut unchanged = Vec::new();

    let mut route = |comparison: MetricComparison| {
        if comparison.is_regression {
            regressions.push(comparison);
        } else if comparison.is_improvement {
            improvements.push(comparison);
        } else {
            unchanged.push(comparison);
        }
    };

    for kind in ScoreKind::ALL {
        let (Some(base), Some(cur)) = (baseline.scores.get(kind), current.scores.get(kind)) else {
            continue;
        };
        let diff = cur - base;
        route(MetricComparison {
            metric: kind.display_name().to_string(),
            base_value: base,
            current_value: cur,
            diff,
            diff_percent: percent_change(base, diff),
            is_regression: diff <= -config.score_threshold,
            is_improvement: diff >= config.score_threshold,
            severity: Severity::for_score(diff),
        });
    }

    for kind in VitalKind::ALL {
        let (Some(base), Some(cur)) = (
            baseline.core_web_vitals.get(kind),
            current.core_web_vitals.get(kind),
        ) else {
            continue;
        };
        let diff = cur - base;
        let threshold = config.vital_threshold(kind, base);
        route(MetricComparison {
            metric: kind.display_name().to_string(),
            base_value: base,
            current_value: cur,
            diff,
            diff_percent: percent_change(base, diff),
            is_regression: diff >= threshold,
            is_improvement: diff <= -threshold,
            severity: Severity::for_vital(kind, diff),
        });
    }

    sort_most_actionable_first(&mut regressions);
    sort_most_actionable_first(&mut improvements);

    let base = baseline.scores.performance.unwrap_or(0.0);
    let cur = current.scores.performance.unwrap_or(0.0);
    ComparisonResult {
        regressions,
        improvements,
        unchanged,
        overall_score: OverallScore {
            base,
            current: cur,
            diff: cur - base,
        },
    }
}

fn percent_change(base: f64, diff: f64) -> f64 {
    if base == 0.0 {
        if diff == 0.0 {
            0.0
        } else if diff > 0.0 {
            100.0
        } else {
            -100.0
        }
    } else {
        diff / base * 100.0
    }
}

fn sort_most_actionable_first(comparisons: &mut [MetricComparison]) {
    comparisons.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| b.diff.abs().total_cmp(&a.diff.abs()))
    });
}

//! Metric filtering for -e expressions
//!
//! Supports:
//! - Individual metrics: -e LCP,CLS or -e "Performance Score"
//! - Metric families: -e scores, -e vitals
//! - Regex patterns: -e /Score$/

use crate::metrics::{ScoreKind, VitalKind};
use anyhow::{bail, Context, Result};
use regex::Regex;
use std::collections::HashSet;

/// Metric filter that determines which comparisons to report
#[derive(Debug, Clone)]
pub struct MetricFilter {
    mode: FilterMode,
}

#[derive(Debug, Clone)]
enum FilterMode {
    /// No filter = report every metric
    All,
    /// Lowercased display names to include
    Names(HashSet<String>),
    /// Regex over display names
    Pattern(Regex),
}

impl MetricFilter {
    /// Create a filter that reports all metrics
    pub fn all() -> Self {
        Self {
            mode: FilterMode::All,
        }
    }

    /// Parse a filter expression: a /regex/ pattern, or a comma-separated
    /// list of metric names and families
    pub fn from_expr(expr: &str) -> Result<Self> {
        let expr = expr.trim();
        if expr.is_empty() {
            bail!("Empty metric filter expression. Expected metric names, families, or /regex/");
        }

        if let Some(pattern) = expr
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            let regex = Regex::new(pattern)
                .with_context(|| format!("Invalid metric filter pattern: /{pattern}/"))?;
            return Ok(Self {
                mode: FilterMode::Pattern(regex),
            });
        }

        let mut names = HashSet::new();
        for part in expr.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            // Check for metric families
            match part {
                "scores" => {
                    names.extend(
                        ScoreKind::ALL
                            .iter()
                            .map(|kind| kind.display_name().to_ascii_lowercase()),
                    );
                }
                "vitals" => {
                    names.extend(
                        VitalKind::ALL
                            .iter()
                            .map(|kind| kind.display_name().to_ascii_lowercase()),
                    );
                }
                _ => {
                    // Individual metric name
                    names.insert(part.to_ascii_lowercase());
                }
            }
        }

        if names.is_empty() {
            bail!("Metric filter expression matched nothing: {expr}");
        }

        Ok(Self {
            mode: FilterMode::Names(names),
        })
    }

    /// Check if a metric should be reported
    pub fn matches(&self, metric: &str) -> bool {
        match &self.mode {
            FilterMode::All => true,
            FilterMode::Names(names) => names.contains(&metric.to_ascii_lowercase()),
            FilterMode::Pattern(regex) => regex.is_match(metric),
        }
    }
}

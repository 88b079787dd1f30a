// Noise thresholds and severity buckets for metric comparison
//
// Score metrics use a flat percentage-point band. Each Core Web Vital uses
// the larger of an absolute floor and a relative fraction of the baseline:
// the absolute floor absorbs tiny noise on fast baselines, the relative
// fraction absorbs proportional noise on slow ones.
//
// Severity buckets by change magnitude alone, orthogonal to the
// regression/improvement direction and to the noise thresholds.

use crate::metrics::VitalKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Magnitude classification of a metric change. Declaration order is the
/// presentation order: most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Bucket a score diff: fractions of the [0, 1] score scale
    pub fn for_score(diff: f64) -> Self {
        let magnitude = diff.abs();
        if magnitude >= 0.20 {
            Self::Critical
        } else if magnitude >= 0.10 {
            Self::High
        } else if magnitude >= 0.05 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Bucket a vital diff: CLS on its unitless scale, everything else in
    /// milliseconds
    pub fn for_vital(kind: VitalKind, diff: f64) -> Self {
        let magnitude = diff.abs();
        match kind {
            VitalKind::Cls => {
                if magnitude >= 0.10 {
                    Self::Critical
                } else if magnitude >= 0.05 {
                    Self::High
                } else if magnitude >= 0.02 {
                    Self::Medium
                } else {
                    Self::Low
                }
            }
            _ => {
                if magnitude >= 1000.0 {
                    Self::Critical
                } else if magnitude >= 500.0 {
                    Self::High
                } else if magnitude >= 200.0 {
                    Self::Medium
                } else {
                    Self::Low
                }
            }
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => f.write_str("critical"),
            Self::High => f.write_str("high"),
            Self::Medium => f.write_str("medium"),
            Self::Low => f.write_str("low"),
        }
    }
}

/// Dual noise threshold for one vital: the effective threshold for a given
/// baseline is max(absolute, relative · baseline)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalThreshold {
    /// Absolute floor, in the metric's own unit
    pub absolute: f64,
    /// Fraction of the baseline value
    pub relative: f64,
}

impl VitalThreshold {
    pub fn for_baseline(self, base: f64) -> f64 {
        self.absolute.max(self.relative * base.abs())
    }
}

/// Comparison thresholds
///
/// `default()` is the absolute/relative-band table; `legacy()` preserves the
/// older flat-1%-score / fixed-per-metric variant for consumers that still
/// expect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Flat band for score metrics, in score points
    pub score_threshold: f64,

    pub fcp: VitalThreshold,
    pub lcp: VitalThreshold,
    pub tbt: VitalThreshold,
    pub cls: VitalThreshold,
    pub speed_index: VitalThreshold,
    pub tti: VitalThreshold,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.02,
            fcp: VitalThreshold { absolute: 100.0, relative: 0.10 },
            lcp: VitalThreshold { absolute: 150.0, relative: 0.10 },
            tbt: VitalThreshold { absolute: 50.0, relative: 0.15 },
            cls: VitalThreshold { absolute: 0.02, relative: 0.15 },
            speed_index: VitalThreshold { absolute: 200.0, relative: 0.10 },
            tti: VitalThreshold { absolute: 200.0, relative: 0.10 },
        }
    }
}

impl CompareConfig {
    /// The older comparator's tables: flat 1% score band, fixed per-metric
    /// thresholds with no relative component
    pub fn legacy() -> Self {
        Self {
            score_threshold: 0.01,
            fcp: VitalThreshold { absolute: 100.0, relative: 0.0 },
            lcp: VitalThreshold { absolute: 150.0, relative: 0.0 },
            tbt: VitalThreshold { absolute: 50.0, relative: 0.0 },
            cls: VitalThreshold { absolute: 0.02, relative: 0.0 },
            speed_index: VitalThreshold { absolute: 200.0, relative: 0.0 },
            tti: VitalThreshold { absolute: 200.0, relative: 0.0 },
        }
    }

    fn vital(&self, kind: VitalKind) -> VitalThreshold {
        match kind {
            VitalKind::Fcp => self.fcp,
            VitalKind::Lcp => self.lcp,
            VitalKind::Tbt => self.tbt,
            VitalKind::Cls => self.cls,
            VitalKind::SpeedIndex => self.speed_index,
            VitalKind::Tti => self.tti,
        }
    }

    /// Effective noise threshold for a vital at a given baseline value
    pub fn vital_threshold(&self, kind: VitalKind, base: f64) -> f64 {
        self.vital(kind).for_baseline(base)
    }

    /// Validate threshold tables
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..1.0).contains(&self.score_threshold) || self.score_threshold <= 0.0 {
            return Err(format!(
                "score_threshold must be in (0, 1), got {}",
                self.score_threshold
            ));
        }
        for kind in VitalKind::ALL {
            let threshold = self.vital(kind);
            if threshold.absolute < 0.0 {
                return Err(format!(
                    "{} absolute threshold must be non-negative, got {}",
                    kind.display_name(),
                    threshold.absolute
                ));
            }
            if !(0.0..=1.0).contains(&threshold.relative) {
                return Err(format!(
                    "{} relative threshold must be in [0, 1], got {}",
                    kind.display_name(),
                    threshold.relative
                ));
            }
        }
        Ok(())
    }
}

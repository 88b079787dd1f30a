//! Normalized metrics snapshot and the extractor that produces it
//!
//! `extract` flattens one raw report into the three metric families the
//! comparator understands: category scores (higher is better, fractions in
//! [0, 1]), Core Web Vitals (lower is better, milliseconds except the
//! unitless CLS), and improvement opportunities. A key absent on either side
//! of a later comparison means "incomparable for this metric" and is never
//! coerced to zero.

use crate::report::RawReport;
use serde::{Deserialize, Serialize};

/// Category score keys (higher is better)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreKind {
    Performance,
    Accessibility,
    BestPractices,
    Seo,
}

impl ScoreKind {
    pub const ALL: [ScoreKind; 4] = [
        ScoreKind::Performance,
        ScoreKind::Accessibility,
        ScoreKind::BestPractices,
        ScoreKind::Seo,
    ];

    /// Category id used in raw reports
    pub fn category_id(self) -> &'static str {
        match self {
            Self::Performance => "performance",
            Self::Accessibility => "accessibility",
            Self::BestPractices => "best-practices",
            Self::Seo => "seo",
        }
    }

    /// Metric name used in comparison output
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Performance => "Performance Score",
            Self::Accessibility => "Accessibility Score",
            Self::BestPractices => "Best Practices Score",
            Self::Seo => "SEO Score",
        }
    }
}

/// Core Web Vital keys (lower is better)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VitalKind {
    Fcp,
    Lcp,
    Tbt,
    Cls,
    SpeedIndex,
    Tti,
}

impl VitalKind {
    pub const ALL: [VitalKind; 6] = [
        VitalKind::Fcp,
        VitalKind::Lcp,
        VitalKind::Tbt,
        VitalKind::Cls,
        VitalKind::SpeedIndex,
        VitalKind::Tti,
    ];

    /// Audit id the vital is extracted from
    pub fn audit_id(self) -> &'static str {
        match self {
            Self::Fcp => "first-contentful-paint",
            Self::Lcp => "largest-contentful-paint",
            Self::Tbt => "total-blocking-time",
            Self::Cls => "cumulative-layout-shift",
            Self::SpeedIndex => "speed-index",
            Self::Tti => "interactive",
        }
    }

    /// Metric name used in comparison output
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Fcp => "FCP",
            Self::Lcp => "LCP",
            Self::Tbt => "TBT",
            Self::Cls => "CLS",
            Self::SpeedIndex => "Speed Index",
            Self::Tti => "TTI",
        }
    }
}

/// Category scores for one run; None means the category was not scored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_practices: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<f64>,
}

impl CategoryScores {
    pub fn get(&self, kind: ScoreKind) -> Option<f64> {
        match kind {
            ScoreKind::Performance => self.performance,
            ScoreKind::Accessibility => self.accessibility,
            ScoreKind::BestPractices => self.best_practices,
            ScoreKind::Seo => self.seo,
        }
    }

    pub fn set(&mut self, kind: ScoreKind, value: Option<f64>) {
        match kind {
            ScoreKind::Performance => self.performance = value,
            ScoreKind::Accessibility => self.accessibility = value,
            ScoreKind::BestPractices => self.best_practices = value,
            ScoreKind::Seo => self.seo = value,
        }
    }
}

/// Core Web Vitals for one run; milliseconds except the unitless CLS
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreWebVitals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fcp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tbt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cls: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tti: Option<f64>,
}

impl CoreWebVitals {
    pub fn get(&self, kind: VitalKind) -> Option<f64> {
        match kind {
            VitalKind::Fcp => self.fcp,
            VitalKind::Lcp => self.lcp,
            VitalKind::Tbt => self.tbt,
            VitalKind::Cls => self.cls,
            VitalKind::SpeedIndex => self.speed_index,
            VitalKind::Tti => self.tti,
        }
    }

    pub fn set(&mut self, kind: VitalKind, value: Option<f64>) {
        match kind {
            VitalKind::Fcp => self.fcp = value,
            VitalKind::Lcp => self.lcp = value,
            VitalKind::Tbt => self.tbt = value,
            VitalKind::Cls => self.cls = value,
            VitalKind::SpeedIndex => self.speed_index = value,
            VitalKind::Tti => self.tti = value,
        }
    }
}

/// An improvement opportunity surfaced by one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings_bytes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Normalized snapshot of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub scores: CategoryScores,
    pub core_web_vitals: CoreWebVitals,
    pub opportunities: Vec<Opportunity>,
}

/// Flatten one raw report into a metrics snapshot. Pure function.
pub fn extract(report: &RawReport) -> Metrics {
    let mut scores = CategoryScores::default();
    for kind in ScoreKind::ALL {
        scores.set(kind, report.category_score(kind.category_id()));
    }

    let mut core_web_vitals = CoreWebVitals::default();
    for kind in VitalKind::ALL {
        core_web_vitals.set(kind, report.audit_numeric(kind.audit_id()));
    }

    let mut opportunities: Vec<Opportunity> = report
        .audits
        .iter()
        .filter_map(|(id, audit)| {
            let details = audit.details.as_ref()?;
            if details.detail_type.as_deref() != Some("opportunity") {
                return None;
            }
            // Score of exactly 1 means nothing left to improve; null means
            // the audit was informational or errored.
            match audit.score {
                Some(score) if score != 1.0 => {}
                _ => return None,
            }
            Some(Opportunity {
                id: id.clone(),
                title: audit.title.clone().unwrap_or_default(),
                description: audit.description.clone(),
                savings_ms: details.overall_savings_ms,
                savings_bytes: details.overall_savings_bytes,
                score: audit.score,
            })
        })
        .collect();

    // Stable sort: ties keep the report's audit order
    opportunities.sort_by(|a, b| {
        b.savings_ms
            .unwrap_or(0.0)
            .total_cmp(&a.savings_ms.unwrap_or(0.0))
    });

    Metrics {
        scores,
        core_web_vitals,
        opportunities,
    }
}

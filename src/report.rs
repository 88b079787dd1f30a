//! Raw Lighthouse report model
//!
//! One `RawReport` is a single collected run, deserialized from the JSON a
//! Lighthouse run writes to disk. Reports are read once per analysis and
//! never mutated; everything downstream works on values derived from them.
//!
//! Audits are kept in an ordered map so that downstream tie-breaks follow
//! the iteration order of the original document.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One collected audit run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReport {
    /// URL the collection was asked to audit (preferred identity)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_url: Option<String>,

    /// URL the page actually resolved to after redirects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,

    /// ISO-8601 collection timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_time: Option<String>,

    /// Category id → category result (score may be null)
    #[serde(default)]
    pub categories: IndexMap<String, Category>,

    /// Audit id → audit result, in document order
    #[serde(default)]
    pub audits: IndexMap<String, Audit>,
}

/// A scored category (performance, accessibility, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    /// Score in [0, 1]; null means the category was not scored
    #[serde(default)]
    pub score: Option<f64>,
}

/// A single audit result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    #[serde(default)]
    pub score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<AuditDetails>,
}

/// Structured audit details; only the fields the extractor needs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDetails {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub detail_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_savings_ms: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_savings_bytes: Option<f64>,
}

impl RawReport {
    /// Load and parse a report from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("failed to read report file {}", path_ref.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("invalid report file {}", path_ref.display()))
    }

    /// Parse a report from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid report JSON")
    }

    /// URL identity source: requestedUrl preferred over finalUrl
    pub fn preferred_url(&self) -> &str {
        self.requested_url
            .as_deref()
            .or(self.final_url.as_deref())
            .unwrap_or_default()
    }

    /// Parsed collection timestamp; unparsable or missing values collapse to
    /// the epoch so ordering stays total
    pub fn fetch_timestamp(&self) -> DateTime<Utc> {
        self.fetch_time
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Score for a category id, with null treated as absent
    pub fn category_score(&self, id: &str) -> Option<f64> {
        self.categories.get(id).and_then(|category| category.score)
    }

    /// Numeric value of an audit; a missing audit or a missing numericValue
    /// both yield None
    pub fn audit_numeric(&self, id: &str) -> Option<f64> {
        self.audits.get(id).and_then(|audit| audit.numeric_value)
    }
}

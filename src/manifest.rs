//! Collection manifest support
//!
//! The collection step optionally writes a `manifest.json` alongside the
//! report files, listing each run and flagging one representative run per
//! URL. The manifest is a selection hint only; the analysis core never
//! requires it.

use crate::select::normalize_url;
use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Manifest file name written next to the report snapshots
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// One run entry in the collection manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub url: String,

    /// Path of the run's report file, as written by the collector
    pub json_path: String,

    #[serde(default)]
    pub is_representative_run: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ManifestSummary>,
}

/// Category score summary the collector attaches to each run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_practices: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<f64>,
}

/// Load and parse a collection manifest
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<ManifestEntry>> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        bail!("Manifest file not found: {}", path_ref.display());
    }
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("failed to read manifest {}", path_ref.display()))?;
    let entries: Vec<ManifestEntry> =
        serde_json::from_str(&contents).context("invalid manifest JSON")?;
    Ok(entries)
}

/// Pick the representative entry per normalized URL: the flagged run when
/// one exists, otherwise the URL's first listed run.
pub fn representative_runs(entries: &[ManifestEntry]) -> IndexMap<String, &ManifestEntry> {
    let mut representatives: IndexMap<String, &ManifestEntry> = IndexMap::new();
    for entry in entries {
        let key = normalize_url(&entry.url);
        let replace = match representatives.get(&key) {
            Some(existing) => !existing.is_representative_run && entry.is_representative_run,
            None => true,
        };
        if replace {
            representatives.insert(key, entry);
        }
    }
    representatives
}

/// File name components of the representative runs, for matching against
/// loaded report files
pub fn representative_file_names(entries: &[ManifestEntry]) -> HashSet<String> {
    representative_runs(entries)
        .values()
        .filter_map(|entry| {
            Path::new(&entry.json_path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .collect()
}

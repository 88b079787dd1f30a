//! Report directory loading with deterministic ordering
//!
//! Discovers collected report files (`lhr-*.json`, the collection step's
//! naming convention), parses each, and returns them newest-first. A single
//! unparsable file is skipped with a warning; the load only fails outright
//! when the directory is missing, empty of candidates, or every candidate
//! fails to parse.

use crate::error::{AnalysisError, Result};
use crate::report::RawReport;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name prefix for collected report snapshots
pub const REPORT_FILE_PREFIX: &str = "lhr-";
/// File name suffix for collected report snapshots
pub const REPORT_FILE_SUFFIX: &str = ".json";

/// A parsed report plus the provenance the selector needs
#[derive(Debug, Clone)]
pub struct LoadedReport {
    pub file_name: String,
    pub path: PathBuf,
    pub fetched_at: DateTime<Utc>,
    pub report: RawReport,
}

/// Load every well-formed report in `dir`, ordered by fetch timestamp
/// descending, ties broken by file name descending.
///
/// The tie-break makes the order fully deterministic across repeated runs on
/// identical inputs, including when several reports share a timestamp or all
/// fail to parse one (unparsable timestamps collapse to the epoch).
pub fn load_reports(dir: &Path) -> Result<Vec<LoadedReport>> {
    if !dir.is_dir() {
        return Err(AnalysisError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut candidates: Vec<(String, PathBuf)> = Vec::new();
    let entries = fs::read_dir(dir).map_err(|source| AnalysisError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| AnalysisError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(REPORT_FILE_PREFIX)
            && name.ends_with(REPORT_FILE_SUFFIX)
            && entry.path().is_file()
        {
            candidates.push((name, entry.path()));
        }
    }

    if candidates.is_empty() {
        return Err(AnalysisError::NoReportsFound(dir.to_path_buf()));
    }

    // Lexical order first: a stable secondary order independent of
    // filesystem enumeration order.
    candidates.sort_by(|a, b| a.0.cmp(&b.0));
    let candidate_count = candidates.len();

    let mut reports: Vec<LoadedReport> = Vec::with_capacity(candidate_count);
    for (file_name, path) in candidates {
        match RawReport::from_file(&path) {
            Ok(report) => {
                let fetched_at = report.fetch_timestamp();
                debug!(file = %file_name, fetched_at = %fetched_at, "loaded report");
                reports.push(LoadedReport {
                    file_name,
                    path,
                    fetched_at,
                    report,
                });
            }
            Err(err) => {
                warn!(file = %path.display(), error = %err, "skipping unparsable report file");
            }
        }
    }

    if reports.is_empty() {
        return Err(AnalysisError::AllReportsUnparsable {
            dir: dir.to_path_buf(),
            count: candidate_count,
        });
    }

    reports.sort_by(|a, b| {
        b.fetched_at
            .cmp(&a.fetched_at)
            .then_with(|| b.file_name.cmp(&a.file_name))
    });

    Ok(reports)
}

//! Error taxonomy for report loading, baseline synthesis, and comparison
//!
//! Recoverable conditions (a single unparsable report file) are absorbed at
//! the point of failure with a warning; everything here is fatal and
//! propagates to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the analysis core
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("report directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("no report files found in {0}")]
    NoReportsFound(PathBuf),

    #[error("all {count} report files in {dir} failed to parse")]
    AllReportsUnparsable { dir: PathBuf, count: usize },

    #[error("baseline series is empty")]
    EmptySeries,

    #[error("percentile must be in (0, 100], got {0}")]
    InvalidPercentile(f64),

    #[error("unknown baseline strategy: {0} (expected latest, same-url, median, or p<N>)")]
    InvalidStrategy(String),

    #[error("need at least one report to analyze, found {0}")]
    InsufficientReports(usize),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

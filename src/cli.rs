//! CLI argument parsing for Faro

use crate::select::BaselineStrategy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for comparison results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "faro")]
#[command(version)]
#[command(about = "Deterministic Lighthouse report regression analysis", long_about = None)]
pub struct Cli {
    /// Directory containing collected report files (lhr-*.json)
    #[arg(long = "dir", value_name = "DIR", default_value = ".lighthouseci")]
    pub dir: PathBuf,

    /// Baseline selection strategy: latest, same-url, median, or p<N>
    #[arg(
        short = 's',
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "same-url"
    )]
    pub strategy: BaselineStrategy,

    /// Filter reported metrics (e.g. -e LCP,CLS, -e scores, or -e /Score$/)
    #[arg(short = 'e', long = "metrics", value_name = "EXPR")]
    pub metrics: Option<String>,

    /// Use the legacy flat-threshold tables instead of the dual bands
    #[arg(long = "legacy-thresholds")]
    pub legacy_thresholds: bool,

    /// Restrict analysis to representative runs listed in manifest.json
    #[arg(long = "use-manifest")]
    pub use_manifest: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Exit non-zero when regressions remain after filtering
    #[arg(long = "fail-on-regression")]
    pub fail_on_regression: bool,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

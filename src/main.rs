use anyhow::{bail, Result};
use clap::Parser;
use faro::analysis::{self, CompareConfig, ComparisonResult, MetricComparison};
use faro::cli::{Cli, OutputFormat};
use faro::filter::MetricFilter;
use faro::json_output::JsonReport;
use faro::loader::{self, LoadedReport};
use faro::manifest;
use faro::metrics::{self, Metrics};
use faro::select::{self, BaselineStrategy, ReportPair};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Keep only the representative runs the collection manifest names.
/// The manifest is a hint: if nothing matches, the full set stands.
fn apply_manifest_hint(dir: &std::path::Path, reports: &mut Vec<LoadedReport>) -> Result<()> {
    let entries = manifest::load_manifest(dir.join(manifest::MANIFEST_FILE_NAME))?;
    let representative = manifest::representative_file_names(&entries);
    let before = reports.len();
    let retained: Vec<LoadedReport> = reports
        .iter()
        .filter(|r| representative.contains(&r.file_name))
        .cloned()
        .collect();
    if retained.is_empty() {
        warn!("manifest names no loaded report files; ignoring manifest hint");
    } else {
        info!(
            before,
            after = retained.len(),
            "restricted analysis to representative runs"
        );
        *reports = retained;
    }
    Ok(())
}

/// Synthesize a percentile baseline when the strategy calls for one and the
/// candidate series can support it; otherwise fall back to the single
/// selected baseline report. None means no baseline exists at all.
fn resolve_baseline(pair: &ReportPair, strategy: BaselineStrategy) -> Result<Option<Metrics>> {
    if let Some(percentile) = strategy.synthesis_percentile() {
        if pair.baseline_candidates.len() >= 2 {
            let series: Vec<Metrics> = pair
                .baseline_candidates
                .iter()
                .map(|r| metrics::extract(&r.report))
                .collect();
            return Ok(Some(analysis::build_percentile_baseline(
                &series, percentile,
            )?));
        }
    }
    Ok(pair.baseline.as_ref().map(|r| metrics::extract(&r.report)))
}

fn print_comparison_line(comparison: &MetricComparison) {
    println!(
        "  [{}] {}: {:.3} -> {:.3} ({:+.3}, {:+.1}%)",
        comparison.severity,
        comparison.metric,
        comparison.base_value,
        comparison.current_value,
        comparison.diff,
        comparison.diff_percent
    );
}

fn print_text_report(
    url: &str,
    strategy: BaselineStrategy,
    self_comparison: bool,
    result: &ComparisonResult,
) {
    println!("=== Faro Comparison ===");
    println!("URL: {url}");
    println!("Strategy: {strategy}");
    if self_comparison {
        println!("No baseline available; current run compared against itself.");
    }
    println!(
        "Overall performance: {:.3} -> {:.3} ({:+.3})",
        result.overall_score.base, result.overall_score.current, result.overall_score.diff
    );
    println!();

    if result.regressions.is_empty() {
        println!("No regressions detected.");
    } else {
        println!("Regressions ({}):", result.regressions.len());
        for comparison in &result.regressions {
            print_comparison_line(comparison);
        }
    }

    if !result.improvements.is_empty() {
        println!();
        println!("Improvements ({}):", result.improvements.len());
        for comparison in &result.improvements {
            print_comparison_line(comparison);
        }
    }

    if !result.unchanged.is_empty() {
        println!();
        println!("Unchanged: {} metrics within noise thresholds", result.unchanged.len());
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    // Parse the metric filter before any I/O
    let filter = match &args.metrics {
        Some(expr) => MetricFilter::from_expr(expr)?,
        None => MetricFilter::all(),
    };

    let mut reports = loader::load_reports(&args.dir)?;
    if args.use_manifest {
        apply_manifest_hint(&args.dir, &mut reports)?;
    }

    let pair = select::select_pair(reports, args.strategy)?;
    let current = metrics::extract(&pair.current.report);

    let baseline = resolve_baseline(&pair, args.strategy)?;
    let self_comparison = baseline.is_none();
    if self_comparison {
        info!("no baseline candidates; comparing current run against itself");
    }
    let baseline = baseline.unwrap_or_else(|| current.clone());

    let config = if args.legacy_thresholds {
        CompareConfig::legacy()
    } else {
        CompareConfig::default()
    };

    let mut result = analysis::compare(&current, &baseline, &config);
    result.retain_metrics(&filter);

    let url = select::normalize_url(pair.current.report.preferred_url());
    match args.format {
        OutputFormat::Json => {
            let output = JsonReport::new(
                url,
                pair.current.report.fetch_time.clone(),
                args.strategy.to_string(),
                pair.baseline_candidates.len(),
                self_comparison,
                current,
                result.clone(),
            );
            println!("{}", output.to_json_string()?);
        }
        OutputFormat::Text => {
            print_text_report(&url, args.strategy, self_comparison, &result);
        }
    }

    if args.fail_on_regression && result.has_regressions() {
        bail!("{} regression(s) detected", result.regressions.len());
    }

    Ok(())
}

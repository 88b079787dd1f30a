//! Baseline strategy parsing and current/baseline pair selection
//!
//! The strategy is a closed tag set with an explicit parse step, not ad hoc
//! string matching at call sites. Selection always treats the most recent
//! report as "current" and picks baseline candidates from the remainder:
//!
//! - `latest`: the single most recent historical report.
//! - `same-url`: all historical reports for the same normalized URL, falling
//!   back to the most recent historical report when none match.
//! - `median` / `p<N>`: the same-URL set, falling back to *all* historical
//!   reports; these strategies feed a series into baseline synthesis, so a
//!   single-point fallback would starve them.

use crate::error::{AnalysisError, Result};
use crate::loader::LoadedReport;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// How the baseline for a comparison is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineStrategy {
    /// Most recent historical report, regardless of URL
    Latest,
    /// Most recent run of the same normalized URL
    SameUrl,
    /// Synthetic median over the historical series
    Median,
    /// Synthetic percentile over the historical series, N in [1, 100]
    Percentile(u8),
}

impl BaselineStrategy {
    /// Percentile explicitly requested via `p<N>`; `median` deliberately
    /// reports None here, it only implies 50 during synthesis
    pub fn explicit_percentile(self) -> Option<u8> {
        match self {
            Self::Percentile(p) => Some(p),
            _ => None,
        }
    }

    /// Percentile to aggregate with, when the strategy synthesizes at all
    pub fn synthesis_percentile(self) -> Option<f64> {
        match self {
            Self::Median => Some(50.0),
            Self::Percentile(p) => Some(f64::from(p)),
            Self::Latest | Self::SameUrl => None,
        }
    }
}

impl fmt::Display for BaselineStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::SameUrl => f.write_str("same-url"),
            Self::Median => f.write_str("median"),
            Self::Percentile(p) => write!(f, "p{p}"),
        }
    }
}

impl FromStr for BaselineStrategy {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "latest" => Ok(Self::Latest),
            "same-url" => Ok(Self::SameUrl),
            "median" => Ok(Self::Median),
            other => other
                .strip_prefix('p')
                .and_then(|raw| raw.parse::<u8>().ok())
                .filter(|n| (1..=100).contains(n))
                .map(Self::Percentile)
                .ok_or_else(|| AnalysisError::InvalidStrategy(other.to_string())),
        }
    }
}

/// Current report plus its baseline candidates; built once per analysis run
#[derive(Debug, Clone)]
pub struct ReportPair {
    pub current: LoadedReport,
    /// Most recent candidate, when any exists
    pub baseline: Option<LoadedReport>,
    /// Every candidate, newest first; the full list feeds synthesis
    pub baseline_candidates: Vec<LoadedReport>,
}

/// Split an ordered report sequence into current + baseline candidates.
///
/// `reports` must already be newest-first (the loader's order). A lone
/// report yields empty candidates and no baseline, which is not an error;
/// callers decide how to degrade.
pub fn select_pair(reports: Vec<LoadedReport>, strategy: BaselineStrategy) -> Result<ReportPair> {
    let mut iter = reports.into_iter();
    let Some(current) = iter.next() else {
        return Err(AnalysisError::InsufficientReports(0));
    };
    let historical: Vec<LoadedReport> = iter.collect();

    let current_url = normalize_url(current.report.preferred_url());
    let same_url = |report: &LoadedReport| normalize_url(report.report.preferred_url()) == current_url;

    let baseline_candidates: Vec<LoadedReport> = match strategy {
        BaselineStrategy::Latest => historical.into_iter().take(1).collect(),
        BaselineStrategy::SameUrl => {
            let matching: Vec<LoadedReport> =
                historical.iter().filter(|r| same_url(r)).cloned().collect();
            if matching.is_empty() {
                historical.into_iter().take(1).collect()
            } else {
                matching
            }
        }
        BaselineStrategy::Median | BaselineStrategy::Percentile(_) => {
            let matching: Vec<LoadedReport> =
                historical.iter().filter(|r| same_url(r)).cloned().collect();
            if matching.is_empty() {
                historical
            } else {
                matching
            }
        }
    };

    let baseline = baseline_candidates.first().cloned();
    Ok(ReportPair {
        current,
        baseline,
        baseline_candidates,
    })
}

/// Reduce a URL to its comparison identity: scheme + host[:port] + path,
/// query and fragment discarded, trailing slashes stripped (an empty path
/// becomes "/"). Unparsable input falls back to trimming the raw text.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(parsed) => {
            let mut path = parsed.path().trim_end_matches('/').to_string();
            if path.is_empty() {
                path.push('/');
            }
            let host = parsed.host_str().unwrap_or_default();
            match parsed.port() {
                Some(port) => format!("{}://{}:{}{}", parsed.scheme(), host, port, path),
                None => format!("{}://{}{}", parsed.scheme(), host, path),
            }
        }
        Err(_) => raw.trim_end_matches('/').to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RawReport;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn loaded(name: &str, url: &str, day: u32) -> LoadedReport {
        let report = RawReport::from_json(&format!(r#"{{"finalUrl": "{url}"}}"#)).unwrap();
        LoadedReport {
            file_name: name.to_string(),
            path: PathBuf::from(name),
            fetched_at: Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap(),
            report,
        }
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("latest".parse::<BaselineStrategy>().unwrap(), BaselineStrategy::Latest);
        assert_eq!("same-url".parse::<BaselineStrategy>().unwrap(), BaselineStrategy::SameUrl);
        assert_eq!("median".parse::<BaselineStrategy>().unwrap(), BaselineStrategy::Median);
        assert_eq!("p75".parse::<BaselineStrategy>().unwrap(), BaselineStrategy::Percentile(75));
        assert_eq!("p100".parse::<BaselineStrategy>().unwrap(), BaselineStrategy::Percentile(100));
    }

    #[test]
    fn test_strategy_parsing_rejects_out_of_range_and_unknown() {
        assert!("p0".parse::<BaselineStrategy>().is_err());
        assert!("p101".parse::<BaselineStrategy>().is_err());
        assert!("p".parse::<BaselineStrategy>().is_err());
        assert!("newest".parse::<BaselineStrategy>().is_err());
        assert!("P75".parse::<BaselineStrategy>().is_err());
    }

    #[test]
    fn test_explicit_percentile() {
        assert_eq!(BaselineStrategy::Percentile(75).explicit_percentile(), Some(75));
        assert_eq!(BaselineStrategy::Percentile(100).explicit_percentile(), Some(100));
        assert_eq!(BaselineStrategy::Median.explicit_percentile(), None);
        assert_eq!(BaselineStrategy::Latest.explicit_percentile(), None);
    }

    #[test]
    fn test_strategy_display_round_trips() {
        for strategy in [
            BaselineStrategy::Latest,
            BaselineStrategy::SameUrl,
            BaselineStrategy::Median,
            BaselineStrategy::Percentile(75),
        ] {
            let round_tripped: BaselineStrategy = strategy.to_string().parse().unwrap();
            assert_eq!(round_tripped, strategy);
        }
    }

    #[test]
    fn test_normalize_url_strips_query_fragment_and_trailing_slash() {
        assert_eq!(
            normalize_url("https://example.com/pricing/?utm=x#top"),
            "https://example.com/pricing"
        );
        assert_eq!(normalize_url("https://example.com"), "https://example.com/");
        assert_eq!(normalize_url("https://example.com///"), "https://example.com/");
    }

    #[test]
    fn test_normalize_url_keeps_explicit_port() {
        assert_eq!(
            normalize_url("http://localhost:8080/app/"),
            "http://localhost:8080/app"
        );
    }

    #[test]
    fn test_normalize_url_fallback_on_parse_failure() {
        assert_eq!(normalize_url("not a url//"), "not a url");
    }

    #[test]
    fn test_same_url_prefers_older_matching_report() {
        // A(t=3) current, B(t=2, other URL), A(t=1): baseline must be A(t=1)
        let reports = vec![
            loaded("lhr-3.json", "https://example.com/a", 3),
            loaded("lhr-2.json", "https://example.com/b", 2),
            loaded("lhr-1.json", "https://example.com/a", 1),
        ];
        let pair = select_pair(reports, BaselineStrategy::SameUrl).unwrap();
        assert_eq!(pair.baseline.as_ref().unwrap().file_name, "lhr-1.json");
        assert_eq!(pair.baseline_candidates.len(), 1);
    }

    #[test]
    fn test_same_url_falls_back_to_most_recent_historical() {
        let reports = vec![
            loaded("lhr-3.json", "https://example.com/a", 3),
            loaded("lhr-2.json", "https://example.com/b", 2),
            loaded("lhr-1.json", "https://example.com/c", 1),
        ];
        let pair = select_pair(reports, BaselineStrategy::SameUrl).unwrap();
        assert_eq!(pair.baseline.as_ref().unwrap().file_name, "lhr-2.json");
        assert_eq!(pair.baseline_candidates.len(), 1);
    }

    #[test]
    fn test_latest_takes_second_most_recent_regardless_of_url() {
        let reports = vec![
            loaded("lhr-3.json", "https://example.com/a", 3),
            loaded("lhr-2.json", "https://example.com/b", 2),
            loaded("lhr-1.json", "https://example.com/a", 1),
        ];
        let pair = select_pair(reports, BaselineStrategy::Latest).unwrap();
        assert_eq!(pair.baseline.as_ref().unwrap().file_name, "lhr-2.json");
        assert_eq!(pair.baseline_candidates.len(), 1);
    }

    #[test]
    fn test_median_collects_all_same_url_candidates() {
        let reports = vec![
            loaded("lhr-4.json", "https://example.com/a", 4),
            loaded("lhr-3.json", "https://example.com/a", 3),
            loaded("lhr-2.json", "https://example.com/b", 2),
            loaded("lhr-1.json", "https://example.com/a", 1),
        ];
        let pair = select_pair(reports, BaselineStrategy::Median).unwrap();
        let names: Vec<&str> = pair
            .baseline_candidates
            .iter()
            .map(|r| r.file_name.as_str())
            .collect();
        assert_eq!(names, ["lhr-3.json", "lhr-1.json"]);
        assert_eq!(pair.baseline.as_ref().unwrap().file_name, "lhr-3.json");
    }

    #[test]
    fn test_percentile_fallback_is_all_historical_reports() {
        let reports = vec![
            loaded("lhr-3.json", "https://example.com/a", 3),
            loaded("lhr-2.json", "https://example.com/b", 2),
            loaded("lhr-1.json", "https://example.com/c", 1),
        ];
        let pair = select_pair(reports, BaselineStrategy::Percentile(75)).unwrap();
        assert_eq!(pair.baseline_candidates.len(), 2);
    }

    #[test]
    fn test_single_report_has_no_baseline_and_is_not_an_error() {
        let reports = vec![loaded("lhr-1.json", "https://example.com/a", 1)];
        let pair = select_pair(reports, BaselineStrategy::SameUrl).unwrap();
        assert!(pair.baseline.is_none());
        assert!(pair.baseline_candidates.is_empty());
    }

    #[test]
    fn test_empty_input_is_insufficient() {
        let err = select_pair(Vec::new(), BaselineStrategy::Latest).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientReports(0)));
    }

    #[test]
    fn test_query_and_trailing_slash_do_not_break_url_identity() {
        let reports = vec![
            loaded("lhr-2.json", "https://example.com/a?cache=1", 2),
            loaded("lhr-1.json", "https://example.com/a/", 1),
        ];
        let pair = select_pair(reports, BaselineStrategy::SameUrl).unwrap();
        assert_eq!(pair.baseline.as_ref().unwrap().file_name, "lhr-1.json");
    }
}

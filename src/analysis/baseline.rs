// Synthetic baseline construction from a historical metrics series
//
// Each metric key aggregates independently: collect the present values for
// the key across the series, drop absent entries, take an order statistic.
// Score keys (higher is better) use the requested percentile directly;
// Core Web Vital keys (lower is better) use the complementary percentile,
// so a p75 request demands the 75th-percentile score AND the 25th-percentile
// (fast) timing. A key with no present values stays absent in the synthetic
// snapshot rather than defaulting to zero.
//
// The percentile estimator is linear interpolation between order statistics
// (the R-7 method): recorded expectations depend on these exact values.

use crate::error::{AnalysisError, Result};
use crate::metrics::{CategoryScores, CoreWebVitals, Metrics, ScoreKind, VitalKind};

/// R-7 percentile of a value set: rank = (p/100)·(n−1), linearly
/// interpolated between the surrounding order statistics. Returns None for
/// an empty set; a single value is returned regardless of percentile.
pub fn percentile_of(values: &[f64], percentile: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let p = percentile.clamp(0.0, 100.0);
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let weight = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Build a synthetic baseline snapshot from a metrics series.
///
/// `percentile` must be in (0, 100]. Score keys aggregate at `percentile`,
/// vital keys at `100 − percentile`. Opportunities are not aggregable
/// across runs, so the synthetic snapshot always carries an empty list.
pub fn build_percentile_baseline(series: &[Metrics], percentile: f64) -> Result<Metrics> {
    if !(percentile > 0.0 && percentile <= 100.0) {
        return Err(AnalysisError::InvalidPercentile(percentile));
    }
    if series.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }

    let mut scores = CategoryScores::default();
    for kind in ScoreKind::ALL {
        let values: Vec<f64> = series.iter().filter_map(|m| m.scores.get(kind)).collect();
        scores.set(kind, percentile_of(&values, percentile));
    }

    let complement = 100.0 - percentile;
    let mut core_web_vitals = CoreWebVitals::default();
    for kind in VitalKind::ALL {
        let values: Vec<f64> = series
            .iter()
            .filter_map(|m| m.core_web_vitals.get(kind))
            .collect();
        core_web_vitals.set(kind, percentile_of(&values, complement));
    }

    Ok(Metrics {
        scores,
        core_web_vitals,
        opportunities: Vec::new(),
    })
}

/// Median baseline: `build_percentile_baseline` at 50
pub fn build_median_baseline(series: &[Metrics]) -> Result<Metrics> {
    build_percentile_baseline(series, 50.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(performance: Option<f64>, lcp: Option<f64>) -> Metrics {
        let mut metrics = Metrics::default();
        metrics.scores.performance = performance;
        metrics.core_web_vitals.lcp = lcp;
        metrics
    }

    #[test]
    fn test_percentile_empty_is_none() {
        assert_eq!(percentile_of(&[], 50.0), None);
    }

    #[test]
    fn test_percentile_single_value_regardless_of_p() {
        assert_eq!(percentile_of(&[42.0], 1.0), Some(42.0));
        assert_eq!(percentile_of(&[42.0], 50.0), Some(42.0));
        assert_eq!(percentile_of(&[42.0], 100.0), Some(42.0));
    }

    #[test]
    fn test_percentile_median_odd_length_is_middle_element() {
        assert_eq!(percentile_of(&[0.8, 0.9, 0.85], 50.0), Some(0.85));
    }

    #[test]
    fn test_percentile_median_even_length_interpolates() {
        assert_eq!(percentile_of(&[0.8, 0.9, 0.7, 1.0], 50.0), Some(0.85));
    }

    #[test]
    fn test_percentile_interpolates_between_order_statistics() {
        // n=4, p75: rank = 0.75 * 3 = 2.25
        let values = [1000.0, 1400.0, 1200.0, 1600.0];
        let p75 = percentile_of(&values, 75.0).unwrap();
        assert!((p75 - 1450.0).abs() < 1e-9, "got {p75}");
        let p25 = percentile_of(&values, 25.0).unwrap();
        assert!((p25 - 1150.0).abs() < 1e-9, "got {p25}");
    }

    #[test]
    fn test_percentile_extremes_are_min_and_max() {
        let values = [3.0, 1.0, 2.0];
        assert_eq!(percentile_of(&values, 100.0), Some(3.0));
        // p is clamped internally; callers validate the (0, 100] contract
        assert_eq!(percentile_of(&values, 0.0), Some(1.0));
    }

    #[test]
    fn test_invalid_percentile_rejected() {
        let series = vec![snapshot(Some(0.9), Some(1000.0))];
        assert!(matches!(
            build_percentile_baseline(&series, 0.0),
            Err(AnalysisError::InvalidPercentile(_))
        ));
        assert!(matches!(
            build_percentile_baseline(&series, -5.0),
            Err(AnalysisError::InvalidPercentile(_))
        ));
        assert!(matches!(
            build_percentile_baseline(&series, 100.1),
            Err(AnalysisError::InvalidPercentile(_))
        ));
    }

    #[test]
    fn test_empty_series_rejected() {
        assert!(matches!(
            build_percentile_baseline(&[], 50.0),
            Err(AnalysisError::EmptySeries)
        ));
    }

    #[test]
    fn test_direction_aware_p75() {
        // Scores take p75; timings take the complementary p25.
        let series: Vec<Metrics> = [
            (0.88, 1000.0),
            (0.90, 1400.0),
            (0.92, 1200.0),
            (0.94, 1600.0),
        ]
        .into_iter()
        .map(|(score, lcp)| snapshot(Some(score), Some(lcp)))
        .collect();

        let baseline = build_percentile_baseline(&series, 75.0).unwrap();
        let performance = baseline.scores.performance.unwrap();
        assert!((performance - 0.925).abs() < 1e-9, "got {performance}");
        assert_eq!(baseline.core_web_vitals.lcp, Some(1150.0));
    }

    #[test]
    fn test_median_baseline_is_p50() {
        let series: Vec<Metrics> = [0.8, 0.9, 0.85]
            .into_iter()
            .map(|score| snapshot(Some(score), None))
            .collect();
        let median = build_median_baseline(&series).unwrap();
        assert_eq!(median.scores.performance, Some(0.85));
    }

    #[test]
    fn test_absent_entries_dropped_not_zeroed() {
        let series = vec![
            snapshot(Some(0.8), None),
            snapshot(None, Some(1200.0)),
            snapshot(Some(0.9), None),
        ];
        let baseline = build_median_baseline(&series).unwrap();
        // Two present scores → interpolated midpoint, absentees ignored
        let performance = baseline.scores.performance.unwrap();
        assert!((performance - 0.85).abs() < 1e-9);
        // Single present timing → that value
        assert_eq!(baseline.core_web_vitals.lcp, Some(1200.0));
        // No values at all → key stays absent
        assert_eq!(baseline.core_web_vitals.cls, None);
    }

    #[test]
    fn test_synthetic_baseline_has_no_opportunities() {
        let mut with_opportunities = snapshot(Some(0.9), Some(1000.0));
        with_opportunities.opportunities.push(crate::metrics::Opportunity {
            id: "render-blocking-resources".to_string(),
            title: "Eliminate render-blocking resources".to_string(),
            description: None,
            savings_ms: Some(500.0),
            savings_bytes: None,
            score: Some(0.5),
        });
        let baseline = build_median_baseline(&[with_opportunities]).unwrap();
        assert!(baseline.opportunities.is_empty());
    }
}

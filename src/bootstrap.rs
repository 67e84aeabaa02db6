//! Bootstrap confidence estimation
//!
//! Resamples the example batch with replacement and reruns the metrics
//! pipeline per replicate, in parallel. Resamples are drawn as per-example
//! multiplicity vectors so the sweep plan's sorted order is reused and no
//! replicate rescans the batch per threshold. A replicate that fails (a
//! degenerate single-class resample, say) is excluded from aggregation and
//! counted, never fatal.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::MetricKey;
use crate::error::{ClscurvesError, Result};
use crate::generator::MetricsReport;

/// Per-threshold empirical mean and percentile band for one series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandedCurve {
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Empirical mean and percentile interval for one scalar metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScalarBand {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Aggregated bootstrap distribution of a metrics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapSummary {
    /// Replicates requested.
    pub num_samples: usize,
    /// Replicates excluded after a per-replicate failure.
    pub num_excluded: usize,
    pub confidence: f64,
    pub curves: BTreeMap<MetricKey, BandedCurve>,
    pub scalars: BTreeMap<MetricKey, ScalarBand>,
    /// Raw replicate reports, retained only on request.
    pub replicates: Option<Vec<MetricsReport>>,
}

/// Run the bootstrap and aggregate bands.
///
/// Replicate `idx` seeds its own `ChaCha8Rng` from
/// `base_seed.wrapping_add(idx)`, so a fixed seed reproduces the full
/// resample sequence regardless of the rayon schedule.
pub(crate) fn run_bootstrap<F>(
    n_examples: usize,
    num_samples: usize,
    confidence: f64,
    seed: Option<u64>,
    keep_replicates: bool,
    n_thresh: usize,
    compute_fn: F,
) -> Result<BootstrapSummary>
where
    F: Fn(&[f64]) -> Result<MetricsReport> + Sync,
{
    if confidence <= 0.0 || confidence >= 1.0 {
        return Err(ClscurvesError::InvalidParameter {
            name: "confidence".to_string(),
            value: format!("{confidence}"),
            reason: "must lie in (0, 1)".to_string(),
        });
    }
    if n_examples == 0 {
        return Err(ClscurvesError::InsufficientData(
            "cannot bootstrap an empty batch".to_string(),
        ));
    }

    let base_seed = seed.unwrap_or(42);
    let results: Vec<Result<MetricsReport>> = (0..num_samples)
        .into_par_iter()
        .map(|idx| {
            let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(idx as u64));
            let mut multiplicity = vec![0.0; n_examples];
            for _ in 0..n_examples {
                multiplicity[rng.gen_range(0..n_examples)] += 1.0;
            }
            compute_fn(&multiplicity)
        })
        .collect();

    let mut reports = Vec::with_capacity(num_samples);
    let mut num_excluded = 0;
    for result in results {
        match result {
            Ok(report) => reports.push(report),
            Err(_) => num_excluded += 1,
        }
    }
    if reports.is_empty() {
        return Err(ClscurvesError::InsufficientData(format!(
            "all {num_samples} bootstrap replicates failed"
        )));
    }
    if num_excluded > 0 {
        warn!(
            num_excluded,
            num_samples, "excluded degenerate bootstrap replicates from aggregation"
        );
    }
    debug!(
        num_replicates = reports.len(),
        confidence, "aggregating bootstrap bands"
    );

    let alpha = (1.0 - confidence) / 2.0;
    let mut curves = BTreeMap::new();
    for &key in MetricKey::banded_series_keys() {
        let mut band = BandedCurve {
            mean: Vec::with_capacity(n_thresh),
            lower: Vec::with_capacity(n_thresh),
            upper: Vec::with_capacity(n_thresh),
        };
        for k in 0..n_thresh {
            let column: Vec<f64> = reports
                .iter()
                .filter_map(|r| r.series(key).map(|s| s[k]))
                .collect();
            let (mean, lower, upper) = summarize(&column, alpha);
            band.mean.push(mean);
            band.lower.push(lower);
            band.upper.push(upper);
        }
        curves.insert(key, band);
    }

    let mut scalars = BTreeMap::new();
    for &key in MetricKey::banded_scalar_keys() {
        let values: Vec<f64> = reports.iter().filter_map(|r| r.scalar(key)).collect();
        let (mean, lower, upper) = summarize(&values, alpha);
        scalars.insert(key, ScalarBand { mean, lower, upper });
    }

    Ok(BootstrapSummary {
        num_samples,
        num_excluded,
        confidence,
        curves,
        scalars,
        replicates: keep_replicates.then_some(reports),
    })
}

/// Mean and percentile interval over the finite replicate values.
fn summarize(values: &[f64], alpha: f64) -> (f64, f64, f64) {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return (f64::NAN, f64::NAN, f64::NAN);
    }
    finite.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mean = finite.iter().sum::<f64>() / finite.len() as f64;
    let lower = percentile(&finite, alpha);
    let upper = percentile(&finite, 1.0 - alpha);
    (mean, lower, upper)
}

/// Linear-interpolation percentile over sorted values, `q` in [0, 1].
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = pos - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::MetricsGenerator;
    use ndarray::array;

    #[test]
    fn test_percentile_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 1.0), 5.0);
        assert_eq!(percentile(&sorted, 0.5), 3.0);
        assert!((percentile(&sorted, 0.25) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_summarize_skips_non_finite() {
        let values = [1.0, f64::NAN, 3.0];
        let (mean, lower, upper) = summarize(&values, 0.025);
        assert!((mean - 2.0).abs() < 1e-12);
        assert!(lower >= 1.0 && upper <= 3.0);
    }

    #[test]
    fn test_seeded_bands_are_reproducible() {
        let scores = array![0.1, 0.25, 0.4, 0.55, 0.7, 0.85, 0.9, 0.95];
        let labels = array![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        let gen = MetricsGenerator::new()
            .with_n_thresh(25)
            .with_bootstrap(30)
            .with_seed(7);
        let a = gen.compute_metrics(&scores, &labels, None).unwrap();
        let b = gen.compute_metrics(&scores, &labels, None).unwrap();

        let band_a = &a.bootstrap.as_ref().unwrap().scalars[&MetricKey::RocAuc];
        let band_b = &b.bootstrap.as_ref().unwrap().scalars[&MetricKey::RocAuc];
        assert_eq!(band_a.mean, band_b.mean);
        assert_eq!(band_a.lower, band_b.lower);
        assert_eq!(band_a.upper, band_b.upper);
    }

    #[test]
    fn test_degenerate_replicates_are_excluded_not_fatal() {
        // a lone positive makes many resamples single-class
        let scores = array![0.2, 0.5, 0.9];
        let labels = array![0.0, 0.0, 1.0];
        let report = MetricsGenerator::new()
            .with_n_thresh(10)
            .with_bootstrap(50)
            .with_seed(3)
            .compute_metrics(&scores, &labels, None)
            .unwrap();

        let summary = report.bootstrap.unwrap();
        assert!(summary.num_excluded > 0);
        assert!(summary.num_excluded < summary.num_samples);
    }

    #[test]
    fn test_replicates_retained_on_request() {
        let scores = array![0.1, 0.3, 0.6, 0.8];
        let labels = array![0.0, 1.0, 0.0, 1.0];
        let report = MetricsGenerator::new()
            .with_n_thresh(5)
            .with_bootstrap(8)
            .with_seed(11)
            .with_keep_replicates(true)
            .compute_metrics(&scores, &labels, None)
            .unwrap();

        let summary = report.bootstrap.unwrap();
        let replicates = summary.replicates.unwrap();
        assert_eq!(replicates.len() + summary.num_excluded, 8);
        for replicate in &replicates {
            assert_eq!(replicate.thresh.len(), 5);
            assert!(replicate.bootstrap.is_none());
        }
    }

    #[test]
    fn test_band_curves_align_to_thresholds() {
        let scores = array![0.1, 0.3, 0.45, 0.6, 0.8, 0.95];
        let labels = array![0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        let report = MetricsGenerator::new()
            .with_n_thresh(12)
            .with_bootstrap(20)
            .with_seed(5)
            .compute_metrics(&scores, &labels, None)
            .unwrap();

        let summary = report.bootstrap.unwrap();
        let tpr_band = &summary.curves[&MetricKey::Tpr];
        assert_eq!(tpr_band.mean.len(), 12);
        for k in 0..12 {
            if tpr_band.lower[k].is_finite() && tpr_band.upper[k].is_finite() {
                assert!(tpr_band.lower[k] <= tpr_band.upper[k]);
            }
        }
    }

    #[test]
    fn test_invalid_confidence_rejected() {
        let scores = array![0.1, 0.9];
        let labels = array![0.0, 1.0];
        let err = MetricsGenerator::new()
            .with_bootstrap(5)
            .with_confidence(1.5)
            .compute_metrics(&scores, &labels, None)
            .unwrap_err();
        assert!(matches!(err, ClscurvesError::InvalidParameter { .. }));
    }
}

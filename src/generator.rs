//! Metrics generation
//!
//! [`MetricsGenerator`] orchestrates the full pipeline: null-score filling,
//! unknown-label imputation, the threshold sweep, derived rates and areas,
//! and optional bootstrap banding. Weighted and unweighted variants share
//! one code path; the unweighted series is the weighted one run with unit
//! weights, so all-ones weights reproduce the counts exactly.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bootstrap::{self, BootstrapSummary};
use crate::config::{MetricKey, DEFAULT_CONFIDENCE, DEFAULT_N_THRESH};
use crate::confusion::{ClassLabel, ConfusionCounts};
use crate::derived::{rate_series, trapezoid_auc, CostParams, ZeroDivision};
use crate::error::{ClscurvesError, Result};
use crate::imputation::{resolve_masses, UnkConfig, UnkWeightingPolicy};
use crate::sweep::{build_thresholds, SweepPlan};

/// A scalar or per-threshold view into a [`MetricsReport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue<'a> {
    Scalar(f64),
    Series(&'a [f64]),
}

/// Classification-curve metrics for one example batch.
///
/// Every series is aligned to `thresh`; scalars summarize the whole sweep.
/// Immutable after return. The `get` accessor exposes the same data keyed
/// by [`MetricKey`] for aliasing and plotting collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    pub thresh: Vec<f64>,

    pub tp: Vec<f64>,
    pub fp: Vec<f64>,
    pub tn: Vec<f64>,
    #[serde(rename = "fn")]
    pub fn_: Vec<f64>,
    pub up: Vec<f64>,
    pub un: Vec<f64>,

    pub tp_w: Vec<f64>,
    pub fp_w: Vec<f64>,
    pub tn_w: Vec<f64>,
    pub fn_w: Vec<f64>,
    pub up_w: Vec<f64>,
    pub un_w: Vec<f64>,

    pub tpr: Vec<f64>,
    pub fpr: Vec<f64>,
    pub precision: Vec<f64>,
    pub precision_gain: Vec<f64>,
    pub recall_gain: Vec<f64>,
    pub frac: Vec<f64>,
    pub cost: Vec<f64>,

    pub tpr_w: Vec<f64>,
    pub fpr_w: Vec<f64>,
    pub precision_w: Vec<f64>,
    pub precision_gain_w: Vec<f64>,
    pub recall_gain_w: Vec<f64>,
    pub frac_w: Vec<f64>,
    pub cost_w: Vec<f64>,

    pub roc_auc: f64,
    pub pr_auc: f64,
    pub rf_auc: f64,
    pub roc_auc_w: f64,
    pub pr_auc_w: f64,
    pub rf_auc_w: f64,

    pub pos: f64,
    pub neg: f64,
    pub unk: f64,
    pub pos_w: f64,
    pub neg_w: f64,
    pub unk_w: f64,
    pub total_weight: f64,

    /// Carried for plotting collaborators' axis scaling.
    pub score_is_probability: bool,

    pub bootstrap: Option<BootstrapSummary>,
}

impl MetricsReport {
    /// Dictionary-style access by key.
    pub fn get(&self, key: MetricKey) -> MetricValue<'_> {
        if let Some(series) = self.series(key) {
            MetricValue::Series(series)
        } else {
            // every non-series key is a scalar, so this cannot miss
            MetricValue::Scalar(self.scalar(key).unwrap_or(f64::NAN))
        }
    }

    pub(crate) fn series(&self, key: MetricKey) -> Option<&[f64]> {
        let series: &Vec<f64> = match key {
            MetricKey::Thresh => &self.thresh,
            MetricKey::Tp => &self.tp,
            MetricKey::Fp => &self.fp,
            MetricKey::Tn => &self.tn,
            MetricKey::Fn => &self.fn_,
            MetricKey::Up => &self.up,
            MetricKey::Un => &self.un,
            MetricKey::TpW => &self.tp_w,
            MetricKey::FpW => &self.fp_w,
            MetricKey::TnW => &self.tn_w,
            MetricKey::FnW => &self.fn_w,
            MetricKey::UpW => &self.up_w,
            MetricKey::UnW => &self.un_w,
            MetricKey::Tpr => &self.tpr,
            MetricKey::Fpr => &self.fpr,
            MetricKey::Precision => &self.precision,
            MetricKey::PrecisionGain => &self.precision_gain,
            MetricKey::RecallGain => &self.recall_gain,
            MetricKey::Frac => &self.frac,
            MetricKey::Cost => &self.cost,
            MetricKey::TprW => &self.tpr_w,
            MetricKey::FprW => &self.fpr_w,
            MetricKey::PrecisionW => &self.precision_w,
            MetricKey::PrecisionGainW => &self.precision_gain_w,
            MetricKey::RecallGainW => &self.recall_gain_w,
            MetricKey::FracW => &self.frac_w,
            MetricKey::CostW => &self.cost_w,
            _ => return None,
        };
        Some(series.as_slice())
    }

    pub(crate) fn scalar(&self, key: MetricKey) -> Option<f64> {
        match key {
            MetricKey::RocAuc => Some(self.roc_auc),
            MetricKey::PrAuc => Some(self.pr_auc),
            MetricKey::RfAuc => Some(self.rf_auc),
            MetricKey::RocAucW => Some(self.roc_auc_w),
            MetricKey::PrAucW => Some(self.pr_auc_w),
            MetricKey::RfAucW => Some(self.rf_auc_w),
            MetricKey::Pos => Some(self.pos),
            MetricKey::Neg => Some(self.neg),
            MetricKey::Unk => Some(self.unk),
            MetricKey::PosW => Some(self.pos_w),
            MetricKey::NegW => Some(self.neg_w),
            MetricKey::UnkW => Some(self.unk_w),
            MetricKey::TotalWeight => Some(self.total_weight),
            _ => None,
        }
    }
}

/// Classification-curve metrics generator.
///
/// Builder-style configuration; `compute_metrics` for strict {0, 1} labels,
/// `compute_metrics_with_unk` when unknown labels and imputation are in
/// play. The generator never mutates caller data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsGenerator {
    /// Number of generated thresholds (ignored with an explicit sequence).
    pub n_thresh: usize,
    /// Explicit threshold override; must be strictly monotone.
    pub thresholds: Option<Vec<f64>>,
    /// Sweep descending and classify by `score <= t`.
    pub reverse_thresh: bool,
    /// Cost-curve weighting.
    pub cost_params: CostParams,
    /// 0/0 rate resolution.
    pub zero_division: ZeroDivision,
    /// Bootstrap replicate count; 0 disables banding.
    pub num_bootstrap_samples: usize,
    /// Confidence level for bootstrap bands.
    pub confidence: f64,
    /// Seed for reproducible resampling.
    pub seed: Option<u64>,
    /// Retain per-replicate reports on the summary.
    pub keep_replicates: bool,
    /// Scores are probabilities in [0, 1]; plotting hint only.
    pub score_is_probability: bool,
}

impl Default for MetricsGenerator {
    fn default() -> Self {
        Self {
            n_thresh: DEFAULT_N_THRESH,
            thresholds: None,
            reverse_thresh: false,
            cost_params: CostParams::default(),
            zero_division: ZeroDivision::default(),
            num_bootstrap_samples: 0,
            confidence: DEFAULT_CONFIDENCE,
            seed: None,
            keep_replicates: false,
            score_is_probability: false,
        }
    }
}

impl MetricsGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the generated threshold count (default 500).
    pub fn with_n_thresh(mut self, n_thresh: usize) -> Self {
        self.n_thresh = n_thresh;
        self
    }

    /// Supply an explicit threshold sequence.
    pub fn with_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    /// Sweep descending; classification flips to `score <= t`.
    pub fn with_reverse_thresh(mut self, reverse: bool) -> Self {
        self.reverse_thresh = reverse;
        self
    }

    /// Set FP and FN cost multipliers (default 1.0 each).
    pub fn with_cost_multipliers(mut self, fp_multiplier: f64, fn_multiplier: f64) -> Self {
        self.cost_params.fp_multiplier = fp_multiplier;
        self.cost_params.fn_multiplier = fn_multiplier;
        self
    }

    /// Normalize the cost curve by total classified mass.
    pub fn with_normalized_cost(mut self, normalized: bool) -> Self {
        self.cost_params.normalized = normalized;
        self
    }

    /// Select the 0/0 rate policy (default NaN).
    pub fn with_zero_division(mut self, policy: ZeroDivision) -> Self {
        self.zero_division = policy;
        self
    }

    /// Enable bootstrap banding with the given replicate count.
    pub fn with_bootstrap(mut self, num_samples: usize) -> Self {
        self.num_bootstrap_samples = num_samples;
        self
    }

    /// Set the band confidence level (default 0.95).
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Seed the resampler for reproducible bands.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Retain per-replicate reports on the bootstrap summary.
    pub fn with_keep_replicates(mut self, keep: bool) -> Self {
        self.keep_replicates = keep;
        self
    }

    /// Mark scores as probabilities for plotting collaborators.
    pub fn with_score_is_probability(mut self, is_probability: bool) -> Self {
        self.score_is_probability = is_probability;
        self
    }

    /// Compute metrics for strictly binary labels.
    ///
    /// `labels` must be exactly 0 or 1; `weights` defaults to 1.0 per
    /// example. Scores must be finite.
    pub fn compute_metrics(
        &self,
        scores: &Array1<f64>,
        labels: &Array1<f64>,
        weights: Option<&Array1<f64>>,
    ) -> Result<MetricsReport> {
        let labels = strict_labels(labels)?;
        let scores = scores.to_vec();
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(ClscurvesError::InvalidInputShape(
                "scores must be finite; use compute_metrics_with_unk with a null fill method \
                 for missing scores"
                    .to_string(),
            ));
        }
        let weights = validate_weights(weights, labels.len())?;
        // no unknowns in this path, so the policy is inert
        let config = UnkConfig::new(UnkWeightingPolicy::Drop);
        self.run(scores, labels, weights, config)
    }

    /// Compute metrics for labels that may include unknowns.
    ///
    /// NaN scores are resolved by the config's null fill method; unknown
    /// label mass follows the configured weighting policy.
    pub fn compute_metrics_with_unk(
        &self,
        scores: &Array1<f64>,
        labels: &[ClassLabel],
        weights: Option<&Array1<f64>>,
        config: &UnkConfig,
    ) -> Result<MetricsReport> {
        if scores.len() != labels.len() {
            return Err(ClscurvesError::InvalidInputShape(format!(
                "scores length {} != labels length {}",
                scores.len(),
                labels.len()
            )));
        }
        config.validate(labels.len())?;
        let weights = validate_weights(weights, labels.len())?;

        let mut config = config.clone();
        let mut scores = scores.to_vec();
        let mut labels = labels.to_vec();
        let mut weights_v = weights;

        // Resolve NaN scores before any threshold exists.
        if scores.iter().any(|s| s.is_nan()) {
            match config.null_fill_method.fill_value() {
                Some(fill) => {
                    for s in scores.iter_mut() {
                        if s.is_nan() {
                            *s = fill;
                        }
                    }
                }
                None => {
                    let keep: Vec<bool> = scores.iter().map(|s| !s.is_nan()).collect();
                    retain_by(&mut scores, &keep);
                    retain_by(&mut labels, &keep);
                    if let Some(w) = weights_v.as_mut() {
                        retain_by(w, &keep);
                    }
                    if let Some(p) = config.prob_1.as_mut() {
                        retain_by(p, &keep);
                    }
                }
            }
        }

        self.run(scores, labels, weights_v, config)
    }

    fn run(
        &self,
        scores: Vec<f64>,
        labels: Vec<ClassLabel>,
        weights: Option<Vec<f64>>,
        config: UnkConfig,
    ) -> Result<MetricsReport> {
        if scores.is_empty() {
            return Err(ClscurvesError::InsufficientData(
                "no examples to evaluate".to_string(),
            ));
        }

        let thresholds = match &self.thresholds {
            Some(t) => t.clone(),
            None => build_thresholds(&scores, self.n_thresh, self.reverse_thresh)?,
        };
        let plan = SweepPlan::new(&scores, thresholds, self.reverse_thresh)?;

        debug!(
            n_examples = scores.len(),
            n_thresh = plan.n_thresh(),
            reverse = self.reverse_thresh,
            "computing classification metrics"
        );

        let weights_ref = weights.as_deref();
        let mut report = self.run_pipeline(&plan, &labels, weights_ref, &config, None)?;

        if self.num_bootstrap_samples > 0 {
            let summary = bootstrap::run_bootstrap(
                scores.len(),
                self.num_bootstrap_samples,
                self.confidence,
                self.seed,
                self.keep_replicates,
                plan.n_thresh(),
                |multiplicity| {
                    self.run_pipeline(&plan, &labels, weights_ref, &config, Some(multiplicity))
                },
            )?;
            report.bootstrap = Some(summary);
        }

        Ok(report)
    }

    /// One full imputation + sweep + derivation pass.
    ///
    /// `multiplicity` carries bootstrap resample counts; `None` is the
    /// point estimate. Imbalance ratios re-derive from the multiplied
    /// masses, so each replicate sees its own resampled imbalance.
    fn run_pipeline(
        &self,
        plan: &SweepPlan,
        labels: &[ClassLabel],
        weights: Option<&[f64]>,
        config: &UnkConfig,
        multiplicity: Option<&[f64]>,
    ) -> Result<MetricsReport> {
        let mass_counts = resolve_masses(labels, None, multiplicity, config)?;
        let mass_weighted = resolve_masses(labels, weights, multiplicity, config)?;

        if mass_counts.pos_total() == 0.0 || mass_counts.neg_total() == 0.0 {
            return Err(ClscurvesError::InsufficientData(
                "both classes must be present to compute curve metrics".to_string(),
            ));
        }

        let counts = plan.accumulate(&mass_counts)?;
        let counts_w = plan.accumulate(&mass_weighted)?;

        let rates = rate_series(&counts, self.cost_params, self.zero_division);
        let rates_w = rate_series(&counts_w, self.cost_params, self.zero_division);

        let roc_auc = trapezoid_auc(&rates.fpr, &rates.tpr);
        let pr_auc = trapezoid_auc(&rates.tpr, &rates.precision);
        let rf_auc = trapezoid_auc(&rates.frac, &rates.tpr);
        let roc_auc_w = trapezoid_auc(&rates_w.fpr, &rates_w.tpr);
        let pr_auc_w = trapezoid_auc(&rates_w.tpr, &rates_w.precision);
        let rf_auc_w = trapezoid_auc(&rates_w.frac, &rates_w.tpr);

        let total_weight = counts_w
            .first()
            .map(ConfusionCounts::total)
            .unwrap_or(0.0);

        Ok(MetricsReport {
            thresh: plan.thresholds().to_vec(),
            tp: counts.iter().map(|c| c.tp).collect(),
            fp: counts.iter().map(|c| c.fp).collect(),
            tn: counts.iter().map(|c| c.tn).collect(),
            fn_: counts.iter().map(|c| c.fn_).collect(),
            up: counts.iter().map(|c| c.up).collect(),
            un: counts.iter().map(|c| c.un).collect(),
            tp_w: counts_w.iter().map(|c| c.tp).collect(),
            fp_w: counts_w.iter().map(|c| c.fp).collect(),
            tn_w: counts_w.iter().map(|c| c.tn).collect(),
            fn_w: counts_w.iter().map(|c| c.fn_).collect(),
            up_w: counts_w.iter().map(|c| c.up).collect(),
            un_w: counts_w.iter().map(|c| c.un).collect(),
            tpr: rates.tpr,
            fpr: rates.fpr,
            precision: rates.precision,
            precision_gain: rates.precision_gain,
            recall_gain: rates.recall_gain,
            frac: rates.frac,
            cost: rates.cost,
            tpr_w: rates_w.tpr,
            fpr_w: rates_w.fpr,
            precision_w: rates_w.precision,
            precision_gain_w: rates_w.precision_gain,
            recall_gain_w: rates_w.recall_gain,
            frac_w: rates_w.frac,
            cost_w: rates_w.cost,
            roc_auc,
            pr_auc,
            rf_auc,
            roc_auc_w,
            pr_auc_w,
            rf_auc_w,
            pos: mass_counts.pos_total(),
            neg: mass_counts.neg_total(),
            unk: mass_counts.unk_total(),
            pos_w: mass_weighted.pos_total(),
            neg_w: mass_weighted.neg_total(),
            unk_w: mass_weighted.unk_total(),
            total_weight,
            score_is_probability: self.score_is_probability,
            bootstrap: None,
        })
    }
}

/// Parse strictly binary labels, rejecting NaN and anything else.
fn strict_labels(labels: &Array1<f64>) -> Result<Vec<ClassLabel>> {
    labels
        .iter()
        .map(|&v| {
            let label = ClassLabel::from_f64(v)?;
            if label == ClassLabel::Unknown {
                Err(ClscurvesError::InvalidInputShape(
                    "labels must be strictly 0 or 1; use compute_metrics_with_unk for \
                     unknown labels"
                        .to_string(),
                ))
            } else {
                Ok(label)
            }
        })
        .collect()
}

/// Parse float labels where NaN marks the unknown class.
pub fn labels_with_unknown(labels: &Array1<f64>) -> Result<Vec<ClassLabel>> {
    labels.iter().map(|&v| ClassLabel::from_f64(v)).collect()
}

fn validate_weights(weights: Option<&Array1<f64>>, n: usize) -> Result<Option<Vec<f64>>> {
    match weights {
        None => Ok(None),
        Some(w) => {
            if w.len() != n {
                return Err(ClscurvesError::InvalidInputShape(format!(
                    "weights length {} != example count {}",
                    w.len(),
                    n
                )));
            }
            if w.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(ClscurvesError::InvalidInputShape(
                    "weights must be finite and non-negative".to_string(),
                ));
            }
            Ok(Some(w.to_vec()))
        }
    }
}

fn retain_by<T: Copy>(values: &mut Vec<T>, keep: &[bool]) {
    let mut idx = 0;
    values.retain(|_| {
        let k = keep[idx];
        idx += 1;
        k
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_hand_computed_roc_auc() {
        let scores = array![0.1, 0.4, 0.6, 0.9];
        let labels = array![0.0, 1.0, 0.0, 1.0];
        let report = MetricsGenerator::new()
            .compute_metrics(&scores, &labels, None)
            .unwrap();
        assert!((report.roc_auc - 0.75).abs() < 1e-9);
        assert_eq!(report.thresh.len(), 500);
    }

    #[test]
    fn test_unit_weights_match_unweighted() {
        let scores = array![0.2, 0.3, 0.5, 0.7, 0.8, 0.9];
        let labels = array![0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        let weights = array![1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let report = MetricsGenerator::new()
            .compute_metrics(&scores, &labels, Some(&weights))
            .unwrap();

        for (a, b) in report.tpr.iter().zip(report.tpr_w.iter()) {
            assert!((a - b).abs() < 1e-12 || (a.is_nan() && b.is_nan()));
        }
        assert!((report.roc_auc - report.roc_auc_w).abs() < 1e-12);
        assert!((report.pr_auc - report.pr_auc_w).abs() < 1e-12);
    }

    #[test]
    fn test_accounting_invariant() {
        let scores = array![0.1, 0.2, 0.5, 0.6, 0.8];
        let labels = array![0.0, 1.0, 1.0, 0.0, 1.0];
        let weights = array![1.5, 2.0, 0.5, 3.0, 1.0];
        let report = MetricsGenerator::new()
            .with_n_thresh(20)
            .compute_metrics(&scores, &labels, Some(&weights))
            .unwrap();

        let total: f64 = weights.iter().sum();
        for k in 0..report.thresh.len() {
            let sum = report.tp_w[k] + report.fp_w[k] + report.tn_w[k] + report.fn_w[k];
            assert!((sum - total).abs() < 1e-12);
            let count_sum = report.tp[k] + report.fp[k] + report.tn[k] + report.fn_[k];
            assert!((count_sum - 5.0).abs() < 1e-12);
        }
        assert!((report.total_weight - total).abs() < 1e-12);
    }

    #[test]
    fn test_auc_bounds() {
        let scores = array![0.05, 0.2, 0.35, 0.5, 0.65, 0.8, 0.95];
        let labels = array![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0];
        let report = MetricsGenerator::new()
            .compute_metrics(&scores, &labels, None)
            .unwrap();
        for auc in [report.roc_auc, report.pr_auc, report.rf_auc] {
            assert!((0.0..=1.0).contains(&auc), "auc out of range: {auc}");
        }
    }

    #[test]
    fn test_monotone_rescaling_preserves_roc_auc() {
        let scores = array![0.1, 0.3, 0.5, 0.7, 0.9];
        let labels = array![0.0, 1.0, 0.0, 1.0, 1.0];
        let gen = MetricsGenerator::new();
        let base = gen.compute_metrics(&scores, &labels, None).unwrap();
        let squared = scores.mapv(|s| s * s);
        let rescaled = gen.compute_metrics(&squared, &labels, None).unwrap();
        assert!((base.roc_auc - rescaled.roc_auc).abs() < 1e-9);
    }

    #[test]
    fn test_reverse_thresh_preserves_auc() {
        let scores = array![0.1, 0.3, 0.5, 0.7, 0.9];
        let labels = array![0.0, 1.0, 0.0, 1.0, 1.0];
        let forward = MetricsGenerator::new()
            .compute_metrics(&scores, &labels, None)
            .unwrap();
        // negated scores with a reversed sweep rank examples identically
        let negated = scores.mapv(|s| -s);
        let reversed = MetricsGenerator::new()
            .with_reverse_thresh(true)
            .compute_metrics(&negated, &labels, None)
            .unwrap();
        assert!((forward.roc_auc - reversed.roc_auc).abs() < 1e-9);
        for (a, b) in forward.tpr.iter().zip(reversed.tpr.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_explicit_thresholds() {
        let scores = array![0.1, 0.4, 0.6, 0.9];
        let labels = array![0.0, 1.0, 0.0, 1.0];
        let report = MetricsGenerator::new()
            .with_thresholds(vec![0.0, 0.5, 1.0])
            .compute_metrics(&scores, &labels, None)
            .unwrap();
        assert_eq!(report.thresh, vec![0.0, 0.5, 1.0]);
        // at t = 0.5: flags 0.6 and 0.9
        assert_eq!(report.tp[1], 1.0);
        assert_eq!(report.fp[1], 1.0);
    }

    #[test]
    fn test_non_monotone_explicit_thresholds_rejected() {
        let scores = array![0.1, 0.9];
        let labels = array![0.0, 1.0];
        let err = MetricsGenerator::new()
            .with_thresholds(vec![0.5, 0.2, 0.8])
            .compute_metrics(&scores, &labels, None)
            .unwrap_err();
        assert!(matches!(err, ClscurvesError::InvalidThresholdSequence(_)));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let scores = array![0.1, 0.9];
        let labels = array![0.0, 1.0, 1.0];
        let err = MetricsGenerator::new()
            .compute_metrics(&scores, &labels, None)
            .unwrap_err();
        assert!(matches!(err, ClscurvesError::InvalidInputShape(_)));
    }

    #[test]
    fn test_negative_weights_rejected() {
        let scores = array![0.1, 0.9];
        let labels = array![0.0, 1.0];
        let weights = array![1.0, -2.0];
        let err = MetricsGenerator::new()
            .compute_metrics(&scores, &labels, Some(&weights))
            .unwrap_err();
        assert!(matches!(err, ClscurvesError::InvalidInputShape(_)));
    }

    #[test]
    fn test_single_class_insufficient() {
        let scores = array![0.1, 0.9];
        let labels = array![1.0, 1.0];
        let err = MetricsGenerator::new()
            .compute_metrics(&scores, &labels, None)
            .unwrap_err();
        assert!(matches!(err, ClscurvesError::InsufficientData(_)));
    }

    #[test]
    fn test_fractional_labels_rejected() {
        let scores = array![0.1, 0.9];
        let labels = array![0.0, 0.5];
        let err = MetricsGenerator::new()
            .compute_metrics(&scores, &labels, None)
            .unwrap_err();
        assert!(matches!(err, ClscurvesError::InvalidInputShape(_)));
    }

    #[test]
    fn test_get_by_key() {
        let scores = array![0.1, 0.4, 0.6, 0.9];
        let labels = array![0.0, 1.0, 0.0, 1.0];
        let report = MetricsGenerator::new()
            .with_n_thresh(10)
            .compute_metrics(&scores, &labels, None)
            .unwrap();
        match report.get(MetricKey::Tpr) {
            MetricValue::Series(s) => assert_eq!(s.len(), 10),
            other => panic!("expected series, got {other:?}"),
        }
        match report.get(MetricKey::RocAuc) {
            MetricValue::Scalar(v) => assert!((v - report.roc_auc).abs() < 1e-12),
            other => panic!("expected scalar, got {other:?}"),
        }
    }

    #[test]
    fn test_cost_multipliers() {
        let scores = array![0.1, 0.4, 0.6, 0.9];
        let labels = array![0.0, 1.0, 0.0, 1.0];
        let report = MetricsGenerator::new()
            .with_thresholds(vec![0.5])
            .with_cost_multipliers(2.0, 3.0)
            .compute_metrics(&scores, &labels, None)
            .unwrap();
        // at t = 0.5: fp = 1 (0.6), fn = 1 (0.4)
        assert!((report.cost[0] - 5.0).abs() < 1e-12);
    }
}

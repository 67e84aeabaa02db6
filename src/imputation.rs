//! Null and unknown-label imputation policies
//!
//! Unknown-labeled examples carry mass that is either kept aside (`Drop`),
//! split by the observed class imbalance (`ImbalanceAware`), or split by a
//! per-example probability estimate (`ProbabilityWeighted`). The policy is
//! resolved once per pipeline run, never per threshold, and a bootstrap
//! replicate re-derives any imbalance ratio from its own resampled masses.
//!
//! NaN scores are a separate concern: [`NullFillMethod`] pins them to one
//! end of the sweep or removes the example before thresholds are built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::confusion::{ClassLabel, MassVectors};
use crate::error::{ClscurvesError, Result};

/// How unknown-labeled mass is assigned to the positive/negative buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnkWeightingPolicy {
    /// Unknown mass stays in the `up`/`un` buckets and never enters a rate.
    Drop,
    /// Unknown mass splits proportionally to the labeled pos/neg imbalance,
    /// scaled by the configured multiplier.
    ImbalanceAware,
    /// Each unknown example splits by its own `prob_1` estimate.
    ProbabilityWeighted,
}

impl fmt::Display for UnkWeightingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnkWeightingPolicy::Drop => "drop",
            UnkWeightingPolicy::ImbalanceAware => "imbalance_aware",
            UnkWeightingPolicy::ProbabilityWeighted => "probability_weighted",
        };
        f.write_str(name)
    }
}

impl FromStr for UnkWeightingPolicy {
    type Err = ClscurvesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "drop" => Ok(UnkWeightingPolicy::Drop),
            "imbalance" | "imbalance_aware" => Ok(UnkWeightingPolicy::ImbalanceAware),
            "prob" | "probability_weighted" => Ok(UnkWeightingPolicy::ProbabilityWeighted),
            other => Err(ClscurvesError::UnsupportedImputationPolicy(
                other.to_string(),
            )),
        }
    }
}

/// How NaN scores are resolved before the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullFillMethod {
    /// Pin below every threshold (never flagged in a normal sweep).
    Min,
    /// Pin above every threshold (always flagged in a normal sweep).
    Max,
    /// Remove the example entirely.
    Omit,
}

impl NullFillMethod {
    /// Replacement score, or `None` when the example is removed.
    pub fn fill_value(&self) -> Option<f64> {
        match self {
            NullFillMethod::Min => Some(f64::NEG_INFINITY),
            NullFillMethod::Max => Some(f64::INFINITY),
            NullFillMethod::Omit => None,
        }
    }
}

impl FromStr for NullFillMethod {
    type Err = ClscurvesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "min" => Ok(NullFillMethod::Min),
            "max" => Ok(NullFillMethod::Max),
            "omit" => Ok(NullFillMethod::Omit),
            other => Err(ClscurvesError::UnsupportedImputationPolicy(format!(
                "null fill method {other}"
            ))),
        }
    }
}

/// Configuration for the unknown-augmented pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnkConfig {
    pub policy: UnkWeightingPolicy,
    /// Scales the positive side of the imbalance split.
    pub imbalance_multiplier: f64,
    /// Caller-supplied pos/neg ratio; observed totals are used when `None`.
    pub imbalance_ratio: Option<f64>,
    pub null_fill_method: NullFillMethod,
    /// Per-example probability of being positive, required by
    /// [`UnkWeightingPolicy::ProbabilityWeighted`].
    pub prob_1: Option<Vec<f64>>,
}

impl UnkConfig {
    pub fn new(policy: UnkWeightingPolicy) -> Self {
        Self {
            policy,
            imbalance_multiplier: 1.0,
            imbalance_ratio: None,
            null_fill_method: NullFillMethod::Omit,
            prob_1: None,
        }
    }

    pub fn with_imbalance_multiplier(mut self, multiplier: f64) -> Self {
        self.imbalance_multiplier = multiplier;
        self
    }

    pub fn with_imbalance_ratio(mut self, ratio: f64) -> Self {
        self.imbalance_ratio = Some(ratio);
        self
    }

    pub fn with_null_fill_method(mut self, method: NullFillMethod) -> Self {
        self.null_fill_method = method;
        self
    }

    pub fn with_prob_1(mut self, prob_1: Vec<f64>) -> Self {
        self.prob_1 = Some(prob_1);
        self
    }

    /// Validate fields that do not depend on the example batch.
    pub(crate) fn validate(&self, n_examples: usize) -> Result<()> {
        if !self.imbalance_multiplier.is_finite() || self.imbalance_multiplier < 0.0 {
            return Err(ClscurvesError::InvalidParameter {
                name: "imbalance_multiplier".to_string(),
                value: format!("{}", self.imbalance_multiplier),
                reason: "must be finite and non-negative".to_string(),
            });
        }
        if let Some(r) = self.imbalance_ratio {
            if !r.is_finite() || r < 0.0 {
                return Err(ClscurvesError::InvalidParameter {
                    name: "imbalance_ratio".to_string(),
                    value: format!("{r}"),
                    reason: "must be finite and non-negative".to_string(),
                });
            }
        }
        if let Some(probs) = &self.prob_1 {
            if probs.len() != n_examples {
                return Err(ClscurvesError::InvalidInputShape(format!(
                    "prob_1 length {} != example count {}",
                    probs.len(),
                    n_examples
                )));
            }
            if probs.iter().any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0) {
                return Err(ClscurvesError::InvalidInputShape(
                    "prob_1 values must lie in [0, 1]".to_string(),
                ));
            }
        }
        if self.policy == UnkWeightingPolicy::ProbabilityWeighted && self.prob_1.is_none() {
            return Err(ClscurvesError::InvalidInputShape(
                "probability_weighted policy requires prob_1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Build per-example masses with the policy applied.
///
/// The imbalance ratio, when observed rather than supplied, is derived from
/// the labeled totals of these exact masses, so the weighted and unit-weight
/// paths each see their own ratio and bootstrap multiplicities participate.
pub(crate) fn resolve_masses(
    labels: &[ClassLabel],
    weights: Option<&[f64]>,
    multiplicity: Option<&[f64]>,
    config: &UnkConfig,
) -> Result<MassVectors> {
    let mut masses = MassVectors::from_labels(labels, weights, multiplicity)?;

    match config.policy {
        UnkWeightingPolicy::Drop => {}
        UnkWeightingPolicy::ImbalanceAware => {
            let m = config.imbalance_multiplier;
            let frac_pos = match config.imbalance_ratio {
                Some(r) => {
                    let scaled = m * r;
                    if scaled + 1.0 == 0.0 {
                        return Err(ClscurvesError::InsufficientData(
                            "imbalance split has zero total".to_string(),
                        ));
                    }
                    scaled / (scaled + 1.0)
                }
                None => {
                    let pos_t = masses.pos_total();
                    let neg_t = masses.neg_total();
                    let denom = m * pos_t + neg_t;
                    if denom == 0.0 {
                        return Err(ClscurvesError::InsufficientData(
                            "no labeled mass to derive an imbalance ratio".to_string(),
                        ));
                    }
                    m * pos_t / denom
                }
            };
            for i in 0..masses.len() {
                let u = masses.unk[i];
                if u > 0.0 {
                    masses.pos[i] += u * frac_pos;
                    masses.neg[i] += u * (1.0 - frac_pos);
                    masses.unk[i] = 0.0;
                }
            }
        }
        UnkWeightingPolicy::ProbabilityWeighted => {
            let probs = config.prob_1.as_deref().ok_or_else(|| {
                ClscurvesError::InvalidInputShape(
                    "probability_weighted policy requires prob_1".to_string(),
                )
            })?;
            for i in 0..masses.len() {
                let u = masses.unk[i];
                if u > 0.0 {
                    masses.pos[i] += u * probs[i];
                    masses.neg[i] += u * (1.0 - probs[i]);
                    masses.unk[i] = 0.0;
                }
            }
        }
    }

    Ok(masses)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[f64]) -> Vec<ClassLabel> {
        raw.iter().map(|&v| ClassLabel::from_f64(v).unwrap()).collect()
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "drop".parse::<UnkWeightingPolicy>().unwrap(),
            UnkWeightingPolicy::Drop
        );
        assert_eq!(
            "imbalance_aware".parse::<UnkWeightingPolicy>().unwrap(),
            UnkWeightingPolicy::ImbalanceAware
        );
        let err = "mystery".parse::<UnkWeightingPolicy>().unwrap_err();
        assert!(matches!(
            err,
            ClscurvesError::UnsupportedImputationPolicy(_)
        ));
    }

    #[test]
    fn test_drop_keeps_unknown_mass_aside() {
        let lab = labels(&[1.0, 0.0, f64::NAN]);
        let cfg = UnkConfig::new(UnkWeightingPolicy::Drop);
        let masses = resolve_masses(&lab, Some(&[1.0, 1.0, 5.0]), None, &cfg).unwrap();
        assert_eq!(masses.unk_total(), 5.0);
        assert_eq!(masses.pos_total(), 1.0);
        assert_eq!(masses.neg_total(), 1.0);
    }

    #[test]
    fn test_imbalance_split_follows_observed_ratio() {
        // 1 positive vs 3 negatives of labeled mass: a quarter of the
        // unknown mass should land on the positive side.
        let lab = labels(&[1.0, 0.0, 0.0, 0.0, f64::NAN]);
        let cfg = UnkConfig::new(UnkWeightingPolicy::ImbalanceAware);
        let masses = resolve_masses(&lab, Some(&[1.0, 1.0, 1.0, 1.0, 4.0]), None, &cfg).unwrap();
        assert!((masses.pos_total() - 2.0).abs() < 1e-12);
        assert!((masses.neg_total() - 6.0).abs() < 1e-12);
        assert_eq!(masses.unk_total(), 0.0);
    }

    #[test]
    fn test_imbalance_multiplier_scales_positive_side() {
        let lab = labels(&[1.0, 0.0, f64::NAN]);
        let cfg = UnkConfig::new(UnkWeightingPolicy::ImbalanceAware)
            .with_imbalance_multiplier(3.0);
        // frac_pos = 3*1 / (3*1 + 1) = 0.75
        let masses = resolve_masses(&lab, Some(&[1.0, 1.0, 4.0]), None, &cfg).unwrap();
        assert!((masses.pos_total() - 4.0).abs() < 1e-12);
        assert!((masses.neg_total() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_caller_supplied_ratio_overrides_observed() {
        let lab = labels(&[1.0, 0.0, 0.0, f64::NAN]);
        let cfg = UnkConfig::new(UnkWeightingPolicy::ImbalanceAware).with_imbalance_ratio(1.0);
        // ratio 1.0 splits evenly no matter what the batch looks like
        let masses = resolve_masses(&lab, Some(&[1.0, 1.0, 1.0, 2.0]), None, &cfg).unwrap();
        assert!((masses.pos_total() - 2.0).abs() < 1e-12);
        assert!((masses.neg_total() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_probability_weighted_split() {
        let lab = labels(&[1.0, f64::NAN, f64::NAN]);
        let cfg = UnkConfig::new(UnkWeightingPolicy::ProbabilityWeighted)
            .with_prob_1(vec![1.0, 0.25, 0.5]);
        let masses = resolve_masses(&lab, Some(&[1.0, 4.0, 2.0]), None, &cfg).unwrap();
        assert!((masses.pos_total() - 3.0).abs() < 1e-12);
        assert!((masses.neg_total() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_probability_weighted_requires_probs() {
        let cfg = UnkConfig::new(UnkWeightingPolicy::ProbabilityWeighted);
        let err = cfg.validate(3).unwrap_err();
        assert!(matches!(err, ClscurvesError::InvalidInputShape(_)));
    }

    #[test]
    fn test_prob_values_validated() {
        let cfg = UnkConfig::new(UnkWeightingPolicy::ProbabilityWeighted)
            .with_prob_1(vec![0.5, 1.5]);
        let err = cfg.validate(2).unwrap_err();
        assert!(matches!(err, ClscurvesError::InvalidInputShape(_)));
    }

    #[test]
    fn test_imbalance_with_no_labeled_mass_fails() {
        let lab = labels(&[f64::NAN, f64::NAN]);
        let cfg = UnkConfig::new(UnkWeightingPolicy::ImbalanceAware);
        let err = resolve_masses(&lab, None, None, &cfg).unwrap_err();
        assert!(matches!(err, ClscurvesError::InsufficientData(_)));
    }

    #[test]
    fn test_null_fill_values() {
        assert_eq!(NullFillMethod::Min.fill_value(), Some(f64::NEG_INFINITY));
        assert_eq!(NullFillMethod::Max.fill_value(), Some(f64::INFINITY));
        assert_eq!(NullFillMethod::Omit.fill_value(), None);
    }
}

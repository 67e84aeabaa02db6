//! Weighted confusion accumulation
//!
//! The accumulator assigns each example's mass to exactly one confusion
//! bucket per threshold. A score classifies positive when `score >= t`
//! (`score <= t` under a reversed sweep), so boundary ties are always
//! classified rather than dropped. Unknown-labeled mass lands in the
//! `up`/`un` buckets unless an imputation policy has already reassigned it.

use serde::{Deserialize, Serialize};

use crate::error::{ClscurvesError, Result};

/// True label of a single example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassLabel {
    Negative,
    Positive,
    Unknown,
}

impl ClassLabel {
    /// Interpret a float label: `0.0` negative, `1.0` positive, NaN unknown.
    pub fn from_f64(value: f64) -> Result<Self> {
        if value.is_nan() {
            Ok(ClassLabel::Unknown)
        } else if value == 0.0 {
            Ok(ClassLabel::Negative)
        } else if value == 1.0 {
            Ok(ClassLabel::Positive)
        } else {
            Err(ClscurvesError::InvalidInputShape(format!(
                "labels must be 0, 1 or NaN, got {value}"
            )))
        }
    }
}

/// Weighted confusion totals at a single threshold.
///
/// `fn_` carries a trailing underscore because `fn` is reserved; its wire
/// name is still `fn`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub tp: f64,
    pub fp: f64,
    pub tn: f64,
    #[serde(rename = "fn")]
    pub fn_: f64,
    pub up: f64,
    pub un: f64,
}

impl ConfusionCounts {
    /// Total accumulated mass across every bucket.
    pub fn total(&self) -> f64 {
        self.tp + self.fp + self.tn + self.fn_ + self.up + self.un
    }

    /// Mass carried by labeled (non-unknown) buckets.
    pub fn classified_total(&self) -> f64 {
        self.tp + self.fp + self.tn + self.fn_
    }
}

/// Per-example positive/negative/unknown mass, post-imputation.
///
/// Imputation policies split each unknown example's mass between the `pos`
/// and `neg` components; whatever stays in `unk` accumulates as `up`/`un`.
/// Bootstrap multiplicities are already folded in, so the sweep only ever
/// sums these vectors.
#[derive(Debug, Clone)]
pub struct MassVectors {
    pub pos: Vec<f64>,
    pub neg: Vec<f64>,
    pub unk: Vec<f64>,
}

impl MassVectors {
    /// Build identity masses (no imputation) from labels and weights.
    ///
    /// `weights` of `None` means unit weights; `multiplicity` of `None`
    /// means every example appears exactly once.
    pub fn from_labels(
        labels: &[ClassLabel],
        weights: Option<&[f64]>,
        multiplicity: Option<&[f64]>,
    ) -> Result<Self> {
        let n = labels.len();
        if let Some(w) = weights {
            if w.len() != n {
                return Err(ClscurvesError::InvalidInputShape(format!(
                    "labels length {} != weights length {}",
                    n,
                    w.len()
                )));
            }
        }
        if let Some(m) = multiplicity {
            if m.len() != n {
                return Err(ClscurvesError::InvalidInputShape(format!(
                    "labels length {} != multiplicity length {}",
                    n,
                    m.len()
                )));
            }
        }

        let mut pos = vec![0.0; n];
        let mut neg = vec![0.0; n];
        let mut unk = vec![0.0; n];
        for i in 0..n {
            let w = weights.map_or(1.0, |w| w[i]);
            let m = multiplicity.map_or(1.0, |m| m[i]);
            let mass = w * m;
            match labels[i] {
                ClassLabel::Positive => pos[i] = mass,
                ClassLabel::Negative => neg[i] = mass,
                ClassLabel::Unknown => unk[i] = mass,
            }
        }
        Ok(Self { pos, neg, unk })
    }

    pub fn len(&self) -> usize {
        self.pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    pub fn pos_total(&self) -> f64 {
        self.pos.iter().sum()
    }

    pub fn neg_total(&self) -> f64 {
        self.neg.iter().sum()
    }

    pub fn unk_total(&self) -> f64 {
        self.unk.iter().sum()
    }
}

/// Accumulate confusion totals at a single threshold.
///
/// Reference semantics for the sweep engine's prefix-sum fast path: one
/// linear scan, each example classified by the `>=` (or `<=` when
/// `reverse`) convention. Zero-mass examples contribute nothing.
pub fn accumulate_at(
    scores: &[f64],
    masses: &MassVectors,
    threshold: f64,
    reverse: bool,
) -> Result<ConfusionCounts> {
    if scores.len() != masses.len() {
        return Err(ClscurvesError::InvalidInputShape(format!(
            "scores length {} != masses length {}",
            scores.len(),
            masses.len()
        )));
    }

    let mut counts = ConfusionCounts::default();
    for (i, &score) in scores.iter().enumerate() {
        let predicted_positive = if reverse {
            score <= threshold
        } else {
            score >= threshold
        };
        if predicted_positive {
            counts.tp += masses.pos[i];
            counts.fp += masses.neg[i];
            counts.up += masses.unk[i];
        } else {
            counts.fn_ += masses.pos[i];
            counts.tn += masses.neg[i];
            counts.un += masses.unk[i];
        }
    }
    Ok(counts)
}

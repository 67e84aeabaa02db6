//! Threshold sweep engine
//!
//! Builds the monotone threshold sequence and turns per-example masses into
//! per-threshold confusion totals. The sweep sorts the score vector once and
//! precomputes each threshold's boundary index, so accumulating a new set of
//! masses (a bootstrap replicate, say) costs O(N + n_thresh) instead of a
//! full rescan per threshold.

use crate::confusion::{ConfusionCounts, MassVectors};
use crate::error::{ClscurvesError, Result};

/// Build the default threshold sequence for a score vector.
///
/// Evenly spaced over `[min(score), max(score)]` across the finite scores,
/// ascending, or descending when `reverse` is set. Infinite scores (produced
/// by null filling) are excluded from the range so they pin to one side of
/// every threshold.
pub fn build_thresholds(scores: &[f64], n_thresh: usize, reverse: bool) -> Result<Vec<f64>> {
    if n_thresh == 0 {
        return Err(ClscurvesError::InvalidParameter {
            name: "n_thresh".to_string(),
            value: "0".to_string(),
            reason: "sweep needs at least one threshold".to_string(),
        });
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &s in scores {
        if s.is_finite() {
            min = min.min(s);
            max = max.max(s);
        }
    }
    if min > max {
        return Err(ClscurvesError::InsufficientData(
            "no finite scores to span a threshold range".to_string(),
        ));
    }

    let mut thresholds = if min == max || n_thresh == 1 {
        vec![min]
    } else {
        let step = (max - min) / (n_thresh - 1) as f64;
        let mut t: Vec<f64> = (0..n_thresh).map(|i| min + step * i as f64).collect();
        // pin the endpoint so boundary scores classify exactly
        t[n_thresh - 1] = max;
        t
    };
    if reverse {
        thresholds.reverse();
    }
    Ok(thresholds)
}

/// Validate a threshold sequence: non-empty, finite, strictly monotone.
pub fn validate_thresholds(thresholds: &[f64]) -> Result<()> {
    if thresholds.is_empty() {
        return Err(ClscurvesError::InvalidThresholdSequence(
            "threshold sequence is empty".to_string(),
        ));
    }
    if thresholds.iter().any(|t| !t.is_finite()) {
        return Err(ClscurvesError::InvalidThresholdSequence(
            "thresholds must be finite".to_string(),
        ));
    }
    if thresholds.len() > 1 {
        let ascending = thresholds[1] > thresholds[0];
        for pair in thresholds.windows(2) {
            let ok = if ascending {
                pair[1] > pair[0]
            } else {
                pair[1] < pair[0]
            };
            if !ok {
                return Err(ClscurvesError::InvalidThresholdSequence(format!(
                    "thresholds must be strictly monotone, found {} then {}",
                    pair[0], pair[1]
                )));
            }
        }
    }
    Ok(())
}

/// Precomputed sweep state shared across replicates.
///
/// Holds the ascending score order and, per threshold, the index where the
/// predicted-positive side begins. Boundaries depend only on scores and
/// thresholds, so one plan serves the point estimate and every bootstrap
/// replicate.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    thresholds: Vec<f64>,
    order: Vec<usize>,
    boundaries: Vec<usize>,
    reverse: bool,
}

impl SweepPlan {
    pub fn new(scores: &[f64], thresholds: Vec<f64>, reverse: bool) -> Result<Self> {
        validate_thresholds(&thresholds)?;
        if scores.is_empty() {
            return Err(ClscurvesError::InsufficientData(
                "no examples to sweep".to_string(),
            ));
        }
        if scores.iter().any(|s| s.is_nan()) {
            return Err(ClscurvesError::InvalidInputShape(
                "scores must not be NaN at sweep time".to_string(),
            ));
        }

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| scores[a].partial_cmp(&scores[b]).unwrap());
        let sorted_scores: Vec<f64> = order.iter().map(|&i| scores[i]).collect();

        // Positive side is the suffix `sorted[b..]` (score >= t), or the
        // prefix `sorted[..b]` (score <= t) when reversed.
        let boundaries = thresholds
            .iter()
            .map(|&t| {
                if reverse {
                    sorted_scores.partition_point(|&s| s <= t)
                } else {
                    sorted_scores.partition_point(|&s| s < t)
                }
            })
            .collect();

        Ok(Self {
            thresholds,
            order,
            boundaries,
            reverse,
        })
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn n_thresh(&self) -> usize {
        self.thresholds.len()
    }

    pub fn n_examples(&self) -> usize {
        self.order.len()
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    /// Accumulate confusion totals for every threshold in one pass.
    ///
    /// Suffix sums over the sorted order give the positive-side totals at
    /// each boundary; the negative side is the complement against the
    /// grand totals.
    pub fn accumulate(&self, masses: &MassVectors) -> Result<Vec<ConfusionCounts>> {
        let n = self.order.len();
        if masses.len() != n {
            return Err(ClscurvesError::InvalidInputShape(format!(
                "masses length {} != example count {}",
                masses.len(),
                n
            )));
        }

        let mut suf_pos = vec![0.0; n + 1];
        let mut suf_neg = vec![0.0; n + 1];
        let mut suf_unk = vec![0.0; n + 1];
        for i in (0..n).rev() {
            let idx = self.order[i];
            suf_pos[i] = suf_pos[i + 1] + masses.pos[idx];
            suf_neg[i] = suf_neg[i + 1] + masses.neg[idx];
            suf_unk[i] = suf_unk[i + 1] + masses.unk[idx];
        }
        let (pos_t, neg_t, unk_t) = (suf_pos[0], suf_neg[0], suf_unk[0]);

        let counts = self
            .boundaries
            .iter()
            .map(|&b| {
                if self.reverse {
                    ConfusionCounts {
                        tp: pos_t - suf_pos[b],
                        fp: neg_t - suf_neg[b],
                        up: unk_t - suf_unk[b],
                        fn_: suf_pos[b],
                        tn: suf_neg[b],
                        un: suf_unk[b],
                    }
                } else {
                    ConfusionCounts {
                        tp: suf_pos[b],
                        fp: suf_neg[b],
                        up: suf_unk[b],
                        fn_: pos_t - suf_pos[b],
                        tn: neg_t - suf_neg[b],
                        un: unk_t - suf_unk[b],
                    }
                }
            })
            .collect();
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confusion::{accumulate_at, ClassLabel};

    fn labels(raw: &[f64]) -> Vec<ClassLabel> {
        raw.iter().map(|&v| ClassLabel::from_f64(v).unwrap()).collect()
    }

    #[test]
    fn test_build_thresholds_spans_score_range() {
        let thresholds = build_thresholds(&[0.1, 0.4, 0.9], 5, false).unwrap();
        assert_eq!(thresholds.len(), 5);
        assert!((thresholds[0] - 0.1).abs() < 1e-12);
        assert!((thresholds[4] - 0.9).abs() < 1e-12);
        validate_thresholds(&thresholds).unwrap();
    }

    #[test]
    fn test_build_thresholds_reverse_descends() {
        let thresholds = build_thresholds(&[0.0, 1.0], 3, true).unwrap();
        assert_eq!(thresholds, vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_degenerate_score_range_collapses_to_one_threshold() {
        let thresholds = build_thresholds(&[0.7, 0.7, 0.7], 10, false).unwrap();
        assert_eq!(thresholds, vec![0.7]);
    }

    #[test]
    fn test_infinite_scores_excluded_from_range() {
        let thresholds =
            build_thresholds(&[f64::NEG_INFINITY, 0.2, 0.8, f64::INFINITY], 2, false).unwrap();
        assert_eq!(thresholds, vec![0.2, 0.8]);
    }

    #[test]
    fn test_non_monotone_sequence_rejected() {
        let err = validate_thresholds(&[0.1, 0.5, 0.3]).unwrap_err();
        assert!(matches!(err, ClscurvesError::InvalidThresholdSequence(_)));
        let err = validate_thresholds(&[0.1, 0.1, 0.2]).unwrap_err();
        assert!(matches!(err, ClscurvesError::InvalidThresholdSequence(_)));
        let err = validate_thresholds(&[]).unwrap_err();
        assert!(matches!(err, ClscurvesError::InvalidThresholdSequence(_)));
    }

    #[test]
    fn test_plan_matches_direct_accumulation() {
        let scores = [3.0, 0.5, 2.0, 1.5, 0.5, 2.5];
        let lab = labels(&[1.0, 0.0, 1.0, 0.0, 1.0, f64::NAN]);
        let weights = [1.0, 2.0, 0.5, 1.0, 3.0, 1.5];
        let masses = MassVectors::from_labels(&lab, Some(&weights), None).unwrap();

        for reverse in [false, true] {
            let thresholds = build_thresholds(&scores, 11, reverse).unwrap();
            let plan = SweepPlan::new(&scores, thresholds.clone(), reverse).unwrap();
            let fast = plan.accumulate(&masses).unwrap();
            for (k, &t) in thresholds.iter().enumerate() {
                let slow = accumulate_at(&scores, &masses, t, reverse).unwrap();
                assert!((fast[k].tp - slow.tp).abs() < 1e-12, "tp at t={t}");
                assert!((fast[k].fp - slow.fp).abs() < 1e-12, "fp at t={t}");
                assert!((fast[k].tn - slow.tn).abs() < 1e-12, "tn at t={t}");
                assert!((fast[k].fn_ - slow.fn_).abs() < 1e-12, "fn at t={t}");
                assert!((fast[k].up - slow.up).abs() < 1e-12, "up at t={t}");
                assert!((fast[k].un - slow.un).abs() < 1e-12, "un at t={t}");
            }
        }
    }

    #[test]
    fn test_accounting_invariant_every_threshold() {
        let scores = [0.2, 0.4, 0.6, 0.8, 0.9];
        let lab = labels(&[0.0, 1.0, f64::NAN, 1.0, 0.0]);
        let weights = [1.0, 2.0, 3.0, 4.0, 5.0];
        let masses = MassVectors::from_labels(&lab, Some(&weights), None).unwrap();
        let total: f64 = weights.iter().sum();

        let thresholds = build_thresholds(&scores, 50, false).unwrap();
        let plan = SweepPlan::new(&scores, thresholds, false).unwrap();
        for counts in plan.accumulate(&masses).unwrap() {
            assert!((counts.total() - total).abs() < 1e-12);
        }
    }
}

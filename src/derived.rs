//! Derived-metric calculation
//!
//! Rates, gain variants, cost and trapezoidal areas from per-threshold
//! confusion totals. 0/0 rates resolve per the caller-selected
//! [`ZeroDivision`] policy, identically on every path.

use serde::{Deserialize, Serialize};

use crate::confusion::ConfusionCounts;

/// Resolution for rates whose denominator is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroDivision {
    /// Emit NaN (numpy-style).
    #[default]
    Nan,
    /// Emit 0.
    Zero,
}

impl ZeroDivision {
    fn undefined(&self) -> f64 {
        match self {
            ZeroDivision::Nan => f64::NAN,
            ZeroDivision::Zero => 0.0,
        }
    }
}

/// `num / den`, resolving a zero denominator per policy.
pub fn safe_div(num: f64, den: f64, policy: ZeroDivision) -> f64 {
    if den == 0.0 {
        policy.undefined()
    } else {
        num / den
    }
}

/// Gain over the base positive rate `pi` (Flach-Kull form):
/// `(value - pi) / ((1 - pi) * value)`.
pub fn gain(value: f64, pi: f64, policy: ZeroDivision) -> f64 {
    if !value.is_finite() {
        return value;
    }
    safe_div(value - pi, (1.0 - pi) * value, policy)
}

/// Trapezoidal area under threshold-ordered `(x, y)` points.
///
/// The absolute value is taken so the area is non-negative whichever way
/// the sweep runs; non-finite points are skipped so an undefined endpoint
/// cannot poison the scalar.
pub fn trapezoid_auc(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    let mut area = 0.0;
    let mut prev: Option<(f64, f64)> = None;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        if let Some((px, py)) = prev {
            area += 0.5 * (x - px) * (y + py);
        }
        prev = Some((x, y));
    }
    area.abs()
}

/// Per-threshold derived series for one confusion-count sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSeries {
    pub tpr: Vec<f64>,
    pub fpr: Vec<f64>,
    pub precision: Vec<f64>,
    pub precision_gain: Vec<f64>,
    pub recall_gain: Vec<f64>,
    pub frac: Vec<f64>,
    pub cost: Vec<f64>,
}

/// Cost weighting for the cost curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CostParams {
    pub fp_multiplier: f64,
    pub fn_multiplier: f64,
    pub normalized: bool,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            fp_multiplier: 1.0,
            fn_multiplier: 1.0,
            normalized: false,
        }
    }
}

/// Compute every derived series from a confusion-count sequence.
///
/// The base positive rate comes from the first threshold's totals; the
/// accounting invariant keeps those totals constant across the sweep.
pub fn rate_series(
    counts: &[ConfusionCounts],
    cost_params: CostParams,
    policy: ZeroDivision,
) -> RateSeries {
    let n = counts.len();
    let mut series = RateSeries {
        tpr: Vec::with_capacity(n),
        fpr: Vec::with_capacity(n),
        precision: Vec::with_capacity(n),
        precision_gain: Vec::with_capacity(n),
        recall_gain: Vec::with_capacity(n),
        frac: Vec::with_capacity(n),
        cost: Vec::with_capacity(n),
    };
    let (pos_t, neg_t) = counts
        .first()
        .map(|c| (c.tp + c.fn_, c.fp + c.tn))
        .unwrap_or((0.0, 0.0));
    let pi = safe_div(pos_t, pos_t + neg_t, policy);

    for c in counts {
        let tpr = safe_div(c.tp, c.tp + c.fn_, policy);
        let fpr = safe_div(c.fp, c.fp + c.tn, policy);
        let precision = safe_div(c.tp, c.tp + c.fp, policy);
        let frac = safe_div(c.tp + c.fp, c.classified_total(), policy);
        let mut cost = cost_params.fp_multiplier * c.fp + cost_params.fn_multiplier * c.fn_;
        if cost_params.normalized {
            cost = safe_div(cost, c.classified_total(), policy);
        }

        series.tpr.push(tpr);
        series.fpr.push(fpr);
        series.precision.push(precision);
        series.precision_gain.push(gain(precision, pi, policy));
        series.recall_gain.push(gain(tpr, pi, policy));
        series.frac.push(frac);
        series.cost.push(cost);
    }
    series
}

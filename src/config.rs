//! Metric key registry and crate-wide defaults
//!
//! Human-readable aliasing of metric keys is pure configuration lookup, so it
//! lives here as an explicit enumerated mapping rather than anything dynamic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ClscurvesError, Result};

/// Default number of thresholds in a generated sweep.
pub const DEFAULT_N_THRESH: usize = 500;

/// Default confidence level for bootstrap bands and covariance ellipses.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Every key a [`MetricsReport`](crate::generator::MetricsReport) exposes.
///
/// Per-threshold series and scalar summaries share the same key space so
/// plotting collaborators can color or band by any of them. The `_w` keys are
/// the weighted variants of their unsuffixed counterparts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    Thresh,
    Tp,
    Fp,
    Tn,
    Fn,
    Up,
    Un,
    TpW,
    FpW,
    TnW,
    FnW,
    UpW,
    UnW,
    Tpr,
    Fpr,
    Precision,
    PrecisionGain,
    RecallGain,
    Frac,
    Cost,
    TprW,
    FprW,
    PrecisionW,
    PrecisionGainW,
    RecallGainW,
    FracW,
    CostW,
    RocAuc,
    PrAuc,
    RfAuc,
    RocAucW,
    PrAucW,
    RfAucW,
    Pos,
    Neg,
    Unk,
    PosW,
    NegW,
    UnkW,
    TotalWeight,
}

impl MetricKey {
    /// Snake-case wire name of this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::Thresh => "thresh",
            MetricKey::Tp => "tp",
            MetricKey::Fp => "fp",
            MetricKey::Tn => "tn",
            MetricKey::Fn => "fn",
            MetricKey::Up => "up",
            MetricKey::Un => "un",
            MetricKey::TpW => "tp_w",
            MetricKey::FpW => "fp_w",
            MetricKey::TnW => "tn_w",
            MetricKey::FnW => "fn_w",
            MetricKey::UpW => "up_w",
            MetricKey::UnW => "un_w",
            MetricKey::Tpr => "tpr",
            MetricKey::Fpr => "fpr",
            MetricKey::Precision => "precision",
            MetricKey::PrecisionGain => "precision_gain",
            MetricKey::RecallGain => "recall_gain",
            MetricKey::Frac => "frac",
            MetricKey::Cost => "cost",
            MetricKey::TprW => "tpr_w",
            MetricKey::FprW => "fpr_w",
            MetricKey::PrecisionW => "precision_w",
            MetricKey::PrecisionGainW => "precision_gain_w",
            MetricKey::RecallGainW => "recall_gain_w",
            MetricKey::FracW => "frac_w",
            MetricKey::CostW => "cost_w",
            MetricKey::RocAuc => "roc_auc",
            MetricKey::PrAuc => "pr_auc",
            MetricKey::RfAuc => "rf_auc",
            MetricKey::RocAucW => "roc_auc_w",
            MetricKey::PrAucW => "pr_auc_w",
            MetricKey::RfAucW => "rf_auc_w",
            MetricKey::Pos => "pos",
            MetricKey::Neg => "neg",
            MetricKey::Unk => "unk",
            MetricKey::PosW => "pos_w",
            MetricKey::NegW => "neg_w",
            MetricKey::UnkW => "unk_w",
            MetricKey::TotalWeight => "total_weight",
        }
    }

    /// Human-readable label, suitable for a colorbar or axis title.
    pub fn label(&self) -> &'static str {
        match self {
            MetricKey::Thresh => "Score Threshold Value",
            MetricKey::Tp => "True Positive (TP) Count",
            MetricKey::Fp => "False Positive (FP) Count",
            MetricKey::Tn => "True Negative (TN) Count",
            MetricKey::Fn => "False Negative (FN) Count",
            MetricKey::Up => "Unknown Above Threshold (UP) Count",
            MetricKey::Un => "Unknown Below Threshold (UN) Count",
            MetricKey::TpW => "Weighted True Positive (TP) Sum",
            MetricKey::FpW => "Weighted False Positive (FP) Sum",
            MetricKey::TnW => "Weighted True Negative (TN) Sum",
            MetricKey::FnW => "Weighted False Negative (FN) Sum",
            MetricKey::UpW => "Weighted Unknown Above Threshold (UP) Sum",
            MetricKey::UnW => "Weighted Unknown Below Threshold (UN) Sum",
            MetricKey::Tpr => "Recall = TP/(TP + FN)",
            MetricKey::Fpr => "FPR = FP/(FP + TN)",
            MetricKey::Precision => "Precision = TP/(TP + FP)",
            MetricKey::PrecisionGain => "Precision Gain",
            MetricKey::RecallGain => "Recall Gain",
            MetricKey::Frac => "Fraction Flagged",
            MetricKey::Cost => "Misclassification Cost",
            MetricKey::TprW => "Weighted Recall = TP/(TP + FN)",
            MetricKey::FprW => "Weighted FPR = FP/(FP + TN)",
            MetricKey::PrecisionW => "Weighted Precision = TP/(TP + FP)",
            MetricKey::PrecisionGainW => "Weighted Precision Gain",
            MetricKey::RecallGainW => "Weighted Recall Gain",
            MetricKey::FracW => "Weighted Fraction Flagged",
            MetricKey::CostW => "Weighted Misclassification Cost",
            MetricKey::RocAuc => "ROC AUC",
            MetricKey::PrAuc => "Precision-Recall AUC",
            MetricKey::RfAuc => "Recall-Fraction AUC",
            MetricKey::RocAucW => "Weighted ROC AUC",
            MetricKey::PrAucW => "Weighted Precision-Recall AUC",
            MetricKey::RfAucW => "Weighted Recall-Fraction AUC",
            MetricKey::Pos => "Positive Example Count",
            MetricKey::Neg => "Negative Example Count",
            MetricKey::Unk => "Unknown Example Count",
            MetricKey::PosW => "Weighted Positive Sum",
            MetricKey::NegW => "Weighted Negative Sum",
            MetricKey::UnkW => "Weighted Unknown Sum",
            MetricKey::TotalWeight => "Total Weight",
        }
    }

    /// All per-threshold series keys, in report order.
    pub fn series_keys() -> &'static [MetricKey] {
        &[
            MetricKey::Thresh,
            MetricKey::Tp,
            MetricKey::Fp,
            MetricKey::Tn,
            MetricKey::Fn,
            MetricKey::Up,
            MetricKey::Un,
            MetricKey::TpW,
            MetricKey::FpW,
            MetricKey::TnW,
            MetricKey::FnW,
            MetricKey::UpW,
            MetricKey::UnW,
            MetricKey::Tpr,
            MetricKey::Fpr,
            MetricKey::Precision,
            MetricKey::PrecisionGain,
            MetricKey::RecallGain,
            MetricKey::Frac,
            MetricKey::Cost,
            MetricKey::TprW,
            MetricKey::FprW,
            MetricKey::PrecisionW,
            MetricKey::PrecisionGainW,
            MetricKey::RecallGainW,
            MetricKey::FracW,
            MetricKey::CostW,
        ]
    }

    /// Series keys the bootstrap estimator bands per threshold.
    pub fn banded_series_keys() -> &'static [MetricKey] {
        &[
            MetricKey::Tpr,
            MetricKey::Fpr,
            MetricKey::Precision,
            MetricKey::PrecisionGain,
            MetricKey::RecallGain,
            MetricKey::Frac,
            MetricKey::Cost,
            MetricKey::TprW,
            MetricKey::FprW,
            MetricKey::PrecisionW,
            MetricKey::PrecisionGainW,
            MetricKey::RecallGainW,
            MetricKey::FracW,
            MetricKey::CostW,
        ]
    }

    /// Scalar keys the bootstrap estimator bands as intervals.
    pub fn banded_scalar_keys() -> &'static [MetricKey] {
        &[
            MetricKey::RocAuc,
            MetricKey::PrAuc,
            MetricKey::RfAuc,
            MetricKey::RocAucW,
            MetricKey::PrAucW,
            MetricKey::RfAucW,
        ]
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = ClscurvesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "thresh" => Ok(MetricKey::Thresh),
            "tp" => Ok(MetricKey::Tp),
            "fp" => Ok(MetricKey::Fp),
            "tn" => Ok(MetricKey::Tn),
            "fn" => Ok(MetricKey::Fn),
            "up" => Ok(MetricKey::Up),
            "un" => Ok(MetricKey::Un),
            "tp_w" => Ok(MetricKey::TpW),
            "fp_w" => Ok(MetricKey::FpW),
            "tn_w" => Ok(MetricKey::TnW),
            "fn_w" => Ok(MetricKey::FnW),
            "up_w" => Ok(MetricKey::UpW),
            "un_w" => Ok(MetricKey::UnW),
            "tpr" | "recall" => Ok(MetricKey::Tpr),
            "fpr" => Ok(MetricKey::Fpr),
            "precision" => Ok(MetricKey::Precision),
            "precision_gain" => Ok(MetricKey::PrecisionGain),
            "recall_gain" => Ok(MetricKey::RecallGain),
            "frac" => Ok(MetricKey::Frac),
            "cost" => Ok(MetricKey::Cost),
            "tpr_w" | "recall_w" => Ok(MetricKey::TprW),
            "fpr_w" => Ok(MetricKey::FprW),
            "precision_w" => Ok(MetricKey::PrecisionW),
            "precision_gain_w" => Ok(MetricKey::PrecisionGainW),
            "recall_gain_w" => Ok(MetricKey::RecallGainW),
            "frac_w" => Ok(MetricKey::FracW),
            "cost_w" => Ok(MetricKey::CostW),
            "roc_auc" => Ok(MetricKey::RocAuc),
            "pr_auc" => Ok(MetricKey::PrAuc),
            "rf_auc" => Ok(MetricKey::RfAuc),
            "roc_auc_w" => Ok(MetricKey::RocAucW),
            "pr_auc_w" => Ok(MetricKey::PrAucW),
            "rf_auc_w" => Ok(MetricKey::RfAucW),
            "pos" => Ok(MetricKey::Pos),
            "neg" => Ok(MetricKey::Neg),
            "unk" => Ok(MetricKey::Unk),
            "pos_w" => Ok(MetricKey::PosW),
            "neg_w" => Ok(MetricKey::NegW),
            "unk_w" => Ok(MetricKey::UnkW),
            "total_weight" => Ok(MetricKey::TotalWeight),
            other => Err(ClscurvesError::UndefinedMetric(format!(
                "unknown metric key: {other}"
            ))),
        }
    }
}

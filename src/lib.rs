//! clscurves - classification-curve metrics engine
//!
//! Computes threshold-sweep classification metrics (ROC, precision-recall,
//! precision/recall-gain, cost and reject-fraction curves) with optional
//! per-example weights, unknown-label imputation and bootstrap confidence
//! bands, plus a covariance-ellipse utility for operating-point clouds.
//!
//! # Modules
//!
//! - [`generator`] - the [`MetricsGenerator`](generator::MetricsGenerator)
//!   pipeline and its [`MetricsReport`](generator::MetricsReport)
//! - [`confusion`] - weighted confusion accumulation
//! - [`sweep`] - threshold-sequence construction and the sweep plan
//! - [`imputation`] - unknown-label weighting and null-score filling
//! - [`derived`] - rates, gains, cost and trapezoidal areas
//! - [`bootstrap`] - resampled confidence bands
//! - [`covariance`] - covariance confidence ellipses
//! - [`config`] - metric-key aliases and defaults
//! - [`error`] - error taxonomy
//!
//! # Example
//!
//! ```
//! use clscurves::prelude::*;
//! use ndarray::array;
//!
//! let scores = array![0.1, 0.4, 0.6, 0.9];
//! let labels = array![0.0, 1.0, 0.0, 1.0];
//! let report = MetricsGenerator::new()
//!     .with_n_thresh(100)
//!     .compute_metrics(&scores, &labels, None)
//!     .unwrap();
//! assert!((report.roc_auc - 0.75).abs() < 1e-9);
//! ```

pub mod error;

pub mod bootstrap;
pub mod config;
pub mod confusion;
pub mod covariance;
pub mod derived;
pub mod generator;
pub mod imputation;
pub mod sweep;

/// Common imports for typical use.
pub mod prelude {
    pub use crate::bootstrap::{BandedCurve, BootstrapSummary, ScalarBand};
    pub use crate::config::MetricKey;
    pub use crate::confusion::{ClassLabel, ConfusionCounts};
    pub use crate::covariance::{CovarianceEllipseGenerator, EllipseParams, EllipsePatch};
    pub use crate::derived::ZeroDivision;
    pub use crate::error::{ClscurvesError, Result};
    pub use crate::generator::{labels_with_unknown, MetricValue, MetricsGenerator, MetricsReport};
    pub use crate::imputation::{NullFillMethod, UnkConfig, UnkWeightingPolicy};
}

pub use bootstrap::BootstrapSummary;
pub use config::MetricKey;
pub use confusion::{ClassLabel, ConfusionCounts};
pub use covariance::{CovarianceEllipseGenerator, EllipseParams};
pub use error::{ClscurvesError, Result};
pub use generator::{MetricsGenerator, MetricsReport};
pub use imputation::{NullFillMethod, UnkConfig, UnkWeightingPolicy};

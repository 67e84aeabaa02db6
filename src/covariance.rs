//! Covariance confidence ellipses
//!
//! Accumulates 2D operating points and fits an elliptical confidence region
//! under a bivariate-normal assumption: eigendecompose the sample
//! covariance, scale each principal axis by the chi-square quantile factor
//! for 2 degrees of freedom, and report the rotation of the dominant
//! eigenvector counter-clockwise in degrees.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_CONFIDENCE;
use crate::error::{ClscurvesError, Result};

/// Ellipse geometry at a chosen confidence level.
///
/// `width` spans the dominant principal direction, `height` the other;
/// `angle` is counter-clockwise from the x axis, in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EllipseParams {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    pub confidence: f64,
}

/// Ellipse geometry plus a sampled outline for plotting collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EllipsePatch {
    pub params: EllipseParams,
    /// Counter-clockwise outline vertices, closed (last == first).
    pub vertices: Vec<(f64, f64)>,
}

/// Lifecycle of a [`CovarianceEllipseGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EllipseState {
    Empty,
    Accumulating,
    Finalized,
}

/// Incremental covariance-ellipse fitter.
///
/// Centers accumulate one at a time; `compute_cov_ellipse` finalizes and
/// caches the geometry. Adding another center reopens accumulation and
/// drops the cache, so a later compute sees every point.
#[derive(Debug, Clone, Default)]
pub struct CovarianceEllipseGenerator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    cached: Option<EllipseParams>,
}

impl CovarianceEllipseGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let mut gen = Self::new();
        for &(x, y) in points {
            gen.add_ellipse_center(x, y);
        }
        gen
    }

    pub fn state(&self) -> EllipseState {
        if self.xs.is_empty() {
            EllipseState::Empty
        } else if self.cached.is_some() {
            EllipseState::Finalized
        } else {
            EllipseState::Accumulating
        }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Accumulate one operating point.
    pub fn add_ellipse_center(&mut self, x: f64, y: f64) {
        self.xs.push(x);
        self.ys.push(y);
        self.cached = None;
    }

    /// Compute (or return the cached) confidence ellipse.
    ///
    /// Needs at least two accumulated points. Repeat calls with the same
    /// confidence return the cached geometry; a different confidence
    /// recomputes from the same points.
    pub fn compute_cov_ellipse(&mut self, confidence: f64) -> Result<EllipseParams> {
        if confidence <= 0.0 || confidence >= 1.0 {
            return Err(ClscurvesError::InvalidParameter {
                name: "confidence".to_string(),
                value: format!("{confidence}"),
                reason: "must lie in (0, 1)".to_string(),
            });
        }
        if let Some(cached) = self.cached {
            if cached.confidence == confidence {
                return Ok(cached);
            }
        }
        let n = self.xs.len();
        if n < 2 {
            return Err(ClscurvesError::InsufficientData(format!(
                "covariance ellipse needs at least 2 points, have {n}"
            )));
        }

        let x_center = self.xs.iter().sum::<f64>() / n as f64;
        let y_center = self.ys.iter().sum::<f64>() / n as f64;

        // Sample covariance with the n-1 denominator.
        let mut sxx = 0.0;
        let mut syy = 0.0;
        let mut sxy = 0.0;
        for i in 0..n {
            let dx = self.xs[i] - x_center;
            let dy = self.ys[i] - y_center;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }
        let denom = (n - 1) as f64;
        sxx /= denom;
        syy /= denom;
        sxy /= denom;

        // Closed-form eigendecomposition of the symmetric 2x2 matrix.
        let half_trace = 0.5 * (sxx + syy);
        let disc = (0.25 * (sxx - syy) * (sxx - syy) + sxy * sxy).sqrt();
        let eig_major = (half_trace + disc).max(0.0);
        let eig_minor = (half_trace - disc).max(0.0);

        // Eigenvector of the dominant eigenvalue: (sxy, lambda - sxx), or an
        // axis vector when the covariance is already diagonal.
        let angle = if sxy.abs() > 0.0 {
            (eig_major - sxx).atan2(sxy).to_degrees()
        } else if sxx >= syy {
            0.0
        } else {
            90.0
        };

        // chi-square quantile factor for 2 dof; 2.45 std devs at 95%
        let num_std = (-2.0 * (1.0 - confidence).ln()).sqrt();
        let params = EllipseParams {
            x_center,
            y_center,
            width: 2.0 * num_std * eig_major.sqrt(),
            height: 2.0 * num_std * eig_minor.sqrt(),
            angle,
            confidence,
        };
        self.cached = Some(params);
        Ok(params)
    }

    /// Compute the ellipse and sample its outline.
    ///
    /// `n_vertices` outline points plus the closing repeat, ready for a
    /// downstream polygon or patch primitive.
    pub fn create_ellipse_patch(
        &mut self,
        confidence: f64,
        n_vertices: usize,
    ) -> Result<EllipsePatch> {
        if n_vertices < 3 {
            return Err(ClscurvesError::InvalidParameter {
                name: "n_vertices".to_string(),
                value: format!("{n_vertices}"),
                reason: "outline needs at least 3 vertices".to_string(),
            });
        }
        let params = self.compute_cov_ellipse(confidence)?;

        let theta = params.angle.to_radians();
        let (sin_t, cos_t) = theta.sin_cos();
        let a = params.width / 2.0;
        let b = params.height / 2.0;
        let mut vertices = Vec::with_capacity(n_vertices + 1);
        for i in 0..=n_vertices {
            let phi = 2.0 * std::f64::consts::PI * (i % n_vertices) as f64 / n_vertices as f64;
            let (px, py) = (a * phi.cos(), b * phi.sin());
            vertices.push((
                params.x_center + px * cos_t - py * sin_t,
                params.y_center + px * sin_t + py * cos_t,
            ));
        }
        Ok(EllipsePatch { params, vertices })
    }

    /// Convenience: default 95% confidence.
    pub fn compute_default(&mut self) -> Result<EllipseParams> {
        self.compute_cov_ellipse(DEFAULT_CONFIDENCE)
    }
}

//! Closed-form conjugate Bayesian linear regression in logit space.
//!
//! The model is a quadratic in the year offset with known heteroscedastic
//! observation noise and a zero-mean Gaussian prior:
//!
//! ```text
//! y_i ~ N(b0 + b1*t_i + b2*t_i^2, s_i^2)
//! b  ~ N(0, L^-1)               L = diag(prior precision)
//! ```
//!
//! The posterior is N(a, V) with V^-1 = X' S^-1 X + L and a = V X' S^-1 y,
//! computed by accumulating 3x3 outer products and one Cholesky inversion.

use nalgebra::{Cholesky, Matrix3, Vector3};

use drt_common::{Error, Result};

use super::design::DesignPoint;

/// Minimum number of distinct time offsets for a full-rank quadratic design.
const MIN_DISTINCT_TIMES: usize = 3;

/// Posterior over (intercept, linear, quadratic) regression coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct Posterior {
    /// Posterior mean coefficient vector.
    pub mean: Vector3<f64>,
    /// Posterior covariance, symmetric positive definite.
    pub covariance: Matrix3<f64>,
}

/// Fit the posterior for one cohort from its prepared design points.
///
/// Fails with [`Error::InsufficientData`] when fewer than 3 distinct time
/// offsets are present: the quadratic design matrix is then rank-deficient
/// and no fit exists. The caller decides whether to skip the cohort or fall
/// back to a simpler estimator.
pub fn fit_group(points: &[DesignPoint], prior_precision: &[f64; 3]) -> Result<Posterior> {
    let distinct = distinct_time_offsets(points);
    if distinct < MIN_DISTINCT_TIMES {
        return Err(Error::InsufficientData {
            distinct_years: distinct,
        });
    }

    let mut precision = Matrix3::from_diagonal(&Vector3::new(
        prior_precision[0],
        prior_precision[1],
        prior_precision[2],
    ));
    let mut rhs = Vector3::zeros();

    for point in points {
        let t = point.time_offset;
        let x = Vector3::new(1.0, t, t * t);
        let weight = point.logit_spread.powi(-2);
        if weight == 0.0 {
            // Infinitely wide interval: the observation carries no information.
            continue;
        }
        precision += weight * x * x.transpose();
        rhs += (weight * point.logit_mean) * x;
    }

    let chol = Cholesky::new(precision).ok_or_else(|| {
        Error::NumericalInstability("posterior precision matrix is not positive definite".into())
    })?;
    let covariance = chol.inverse();
    let mean = covariance * rhs;

    Ok(Posterior { mean, covariance })
}

fn distinct_time_offsets(points: &[DesignPoint]) -> usize {
    let mut times: Vec<f64> = points.iter().map(|p| p.time_offset).collect();
    times.sort_by(f64::total_cmp);
    times.dedup();
    times.len()
}

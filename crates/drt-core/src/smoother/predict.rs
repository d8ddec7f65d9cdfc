//! Monte Carlo propagation of posterior uncertainty to the percentage scale.
//!
//! Coefficient vectors are drawn from N(a, V) via the Cholesky factor of V,
//! pushed through the prediction design row for each target year, optionally
//! back-transformed through the logistic, and reduced to an empirical mean
//! and 2.5/97.5 percentiles.

use nalgebra::{Cholesky, Const, Matrix3, Vector3};
use rand::Rng;
use rand_distr::StandardNormal;

use drt_common::{Error, Result, SmoothedPoint, SmoothedSeries};
use drt_math::{inv_logit, mean, quantile};

use crate::config::SmootherConfig;

use super::fit::Posterior;

/// Diagonal jitter added when the covariance fails to factor on the first
/// attempt (rounding can leave a tiny negative eigenvalue).
const CHOLESKY_JITTER: f64 = 1e-12;

/// Sample the posterior-predictive distribution at each target year.
///
/// Output is indexed in `target_years` order. Values are percentages in
/// [0, 100] when `apply_logistic` is set. Reproducible only when the caller
/// seeds the generator.
pub fn predict<R: Rng>(
    posterior: &Posterior,
    target_years: &[i32],
    config: &SmootherConfig,
    rng: &mut R,
) -> Result<SmoothedSeries> {
    if target_years.is_empty() {
        return Ok(SmoothedSeries::default());
    }

    let factor = covariance_factor(&posterior.covariance)?;
    let offsets: Vec<f64> = target_years
        .iter()
        .map(|&year| f64::from(year) - f64::from(config.reference_year))
        .collect();

    let mut samples: Vec<Vec<f64>> = offsets
        .iter()
        .map(|_| Vec::with_capacity(config.n_samples))
        .collect();

    for _ in 0..config.n_samples {
        let z = Vector3::new(
            rng.sample::<f64, _>(StandardNormal),
            rng.sample::<f64, _>(StandardNormal),
            rng.sample::<f64, _>(StandardNormal),
        );
        let coeffs = posterior.mean + factor * z;

        for (buffer, &t) in samples.iter_mut().zip(&offsets) {
            let raw = coeffs[0] + coeffs[1] * t + coeffs[2] * t * t;
            let value = if config.apply_logistic {
                inv_logit(raw)
            } else {
                raw
            };
            buffer.push(value * 100.0);
        }
    }

    let points = target_years
        .iter()
        .zip(&samples)
        .map(|(&year, draws)| SmoothedPoint {
            year,
            mean: mean(draws),
            lower: quantile(draws, 0.025),
            upper: quantile(draws, 0.975),
        })
        .collect();

    Ok(SmoothedSeries { points })
}

fn covariance_factor(covariance: &Matrix3<f64>) -> Result<Matrix3<f64>> {
    let chol: Option<Cholesky<f64, Const<3>>> = Cholesky::new(*covariance);
    if let Some(c) = chol {
        return Ok(c.l());
    }
    let jittered = covariance + Matrix3::identity() * CHOLESKY_JITTER;
    Cholesky::new(jittered)
        .map(|c| c.l())
        .ok_or_else(|| {
            Error::NumericalInstability("posterior covariance matrix is not positive definite".into())
        })
}

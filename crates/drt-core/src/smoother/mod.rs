//! TrendSmoother: quadratic Bayesian regression in logit space with Monte
//! Carlo credible intervals.
//!
//! The pipeline per cohort is: validate and derive design points, fit the
//! conjugate posterior, then sample the posterior-predictive distribution at
//! the target years. Cohorts are independent; a batch run skips failing
//! cohorts and reports them rather than aborting.

pub mod design;
mod fit;
mod predict;

pub use design::{design_point, DesignPoint, DEGENERATE_LOGIT_MEAN, DEGENERATE_LOGIT_SPREAD};
pub use fit::{fit_group, Posterior};
pub use predict::predict;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, warn};

use drt_common::{BatchResult, CohortKey, Observation, Result, SmoothedSeries};

use crate::config::SmootherConfig;

/// Smooth one cohort end to end: derive, fit, predict.
///
/// Pure aside from the Monte Carlo draw; supply `config.seed` for
/// reproducible output.
pub fn smooth_cohort(
    observations: &[Observation],
    target_years: &[i32],
    config: &SmootherConfig,
) -> Result<SmoothedSeries> {
    config.validate()?;

    let points: Vec<DesignPoint> = observations
        .iter()
        .map(|obs| design_point(obs, config.reference_year))
        .collect::<Result<_>>()?;
    let posterior = fit_group(&points, &config.prior_precision)?;

    // Unseeded runs draw a fresh seed per invocation, so they are not
    // reproducible across runs.
    let seed = config.seed.unwrap_or_else(rand::random::<u64>);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    predict(&posterior, target_years, config, &mut rng)
}

/// Smooth every cohort in a batch, collecting per-cohort failures instead of
/// aborting. Cohorts are processed in input order.
pub fn smooth_all(
    cohorts: &[(CohortKey, Vec<Observation>)],
    target_years: &[i32],
    config: &SmootherConfig,
) -> BatchResult<(CohortKey, SmoothedSeries)> {
    let mut batch = BatchResult::default();

    for (key, observations) in cohorts {
        match smooth_cohort(observations, target_years, config) {
            Ok(series) => {
                debug!(
                    cohort = %key,
                    observations = observations.len(),
                    years = series.len(),
                    "cohort smoothed"
                );
                batch.add_success((key.clone(), series));
            }
            Err(err) => {
                warn!(cohort = %key, error = %err, code = err.code(), "skipping cohort");
                batch.add_failure(key.to_string(), &err);
            }
        }
    }

    batch
}

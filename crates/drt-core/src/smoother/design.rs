//! Per-observation design derivation.
//!
//! Validates raw observations and maps them onto the regression scale:
//! logit-transformed mean, interval-implied standard deviation, and year
//! offset from the reference year. Derived once per fit, immutable after.

use drt_common::{Error, Observation, Result};
use drt_math::{interval_to_sd, logit};

/// Fallback logit-scale mean substituted for a point estimate of exactly
/// 0% or 100%, where the logit is non-finite.
pub const DEGENERATE_LOGIT_MEAN: f64 = -6.0;

/// Fallback logit-scale spread paired with [`DEGENERATE_LOGIT_MEAN`].
pub const DEGENERATE_LOGIT_SPREAD: f64 = 1.0;

/// One observation prepared for regression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignPoint {
    /// Year minus the reference year.
    pub time_offset: f64,
    /// Logit of the point-estimate proportion.
    pub logit_mean: f64,
    /// Approximate standard deviation on the logit scale. An infinite spread
    /// means the interval carried no information; the fit gives such points
    /// zero weight.
    pub logit_spread: f64,
}

/// Validate an observation and derive its regression-scale fields.
///
/// A point estimate of exactly 0 or 100 triggers the documented fallback
/// substitution regardless of the supplied bounds; this is a business rule,
/// not an error. A zero-width interval around an interior point estimate is
/// rejected because it would assign the observation infinite weight.
pub fn design_point(obs: &Observation, reference_year: i32) -> Result<DesignPoint> {
    obs.validate()?;
    // Subtract in f64 so extreme deserialized years cannot overflow i32.
    let time_offset = f64::from(obs.year) - f64::from(reference_year);

    if obs.point_estimate == 0.0 || obs.point_estimate == 100.0 {
        return Ok(DesignPoint {
            time_offset,
            logit_mean: DEGENERATE_LOGIT_MEAN,
            logit_spread: DEGENERATE_LOGIT_SPREAD,
        });
    }

    let logit_mean = logit(obs.point_estimate / 100.0);
    let logit_spread = interval_to_sd(obs.lower_bound / 100.0, obs.upper_bound / 100.0);
    if logit_spread == 0.0 {
        return Err(Error::ZeroWidthInterval { year: obs.year });
    }

    Ok(DesignPoint {
        time_offset,
        logit_mean,
        logit_spread,
    })
}

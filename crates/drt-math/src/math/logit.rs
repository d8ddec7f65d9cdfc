//! Stable logit and inverse-logit transforms.
//!
//! The smoother models proportions on the log-odds scale so that a normal
//! linear model cannot produce values outside [0, 1] once back-transformed.

/// Width of a 95% normal interval in standard deviations (2 * 1.96).
pub const Z95_WIDTH: f64 = 3.92;

/// Log odds ln(p / (1 - p)) for a proportion p in [0, 1].
///
/// Returns NEG_INFINITY at 0, INFINITY at 1, and NaN outside [0, 1] or for
/// NaN input.
pub fn logit(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }
    p.ln() - (-p).ln_1p()
}

/// Inverse logit (logistic function) exp(x) / (1 + exp(x)).
///
/// Evaluated in the numerically safe branch for either sign, so large |x|
/// saturates to 0 or 1 without overflow.
pub fn inv_logit(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Approximate standard deviation on the logit scale implied by a 95%
/// interval [lower, upper] on the proportion scale.
///
/// Returns (logit(upper) - logit(lower)) / 3.92 under a normal approximation.
/// A bound of exactly 0 or 1 gives an infinite result (the interval carries
/// no information); lower > upper gives NaN.
pub fn interval_to_sd(lower: f64, upper: f64) -> f64 {
    let lo = logit(lower);
    let hi = logit(upper);
    if lo.is_nan() || hi.is_nan() {
        return f64::NAN;
    }
    if lo > hi {
        return f64::NAN;
    }
    if lo == hi {
        // Both infinite with the same sign, or a zero-width interval.
        if lo.is_infinite() {
            return f64::NAN;
        }
        return 0.0;
    }
    (hi - lo) / Z95_WIDTH
}

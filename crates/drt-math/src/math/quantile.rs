//! Empirical quantiles and means over Monte Carlo sample buffers.

/// Arithmetic mean. Returns NaN for empty input; NaN inputs propagate.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Empirical quantile with linear interpolation between order statistics
/// (R's default, type 7).
///
/// Returns NaN for empty input, p outside [0, 1], or any NaN value.
pub fn quantile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() || p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let w = h - lo as f64;
    sorted[lo] * (1.0 - w) + sorted[hi] * w
}

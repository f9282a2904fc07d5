//! Summary statistics over distortion samples.
//!
//! Every function skips non-finite entries, so a handful of singular
//! sample points cannot poison an aggregate. When no finite entry is
//! left the functions return NaN rather than a default.

/// Arithmetic mean of the finite entries of `values`.
pub fn mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0u64;
    for &v in values {
        if v.is_finite() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        return f64::NAN;
    }
    sum / count as f64
}

/// Population standard deviation of the finite entries of `values`.
pub fn std_dev(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut count = 0u64;
    for &v in values {
        if v.is_finite() {
            sum += v;
            sum_sq += v * v;
            count += 1;
        }
    }
    if count == 0 {
        return f64::NAN;
    }
    let n = count as f64;
    let variance = sum_sq / n - (sum / n) * (sum / n);
    libm::sqrt(variance.max(0.0))
}

/// Root mean square of the finite entries of `values`.
pub fn rms(values: &[f64]) -> f64 {
    let mut sum_sq = 0.0;
    let mut count = 0u64;
    for &v in values {
        if v.is_finite() {
            sum_sq += v * v;
            count += 1;
        }
    }
    if count == 0 {
        return f64::NAN;
    }
    libm::sqrt(sum_sq / count as f64)
}

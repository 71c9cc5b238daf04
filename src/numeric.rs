//! Rounding and empty-safe aggregate helpers.
//!
//! Every aggregate that can be taken over an empty set returns `Option` so
//! that the wire format carries `null` instead of NaN.

use statrs::statistics::Statistics;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.mean())
}

/// Sample standard deviation (n - 1 denominator).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(values.std_dev())
}

pub fn min(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.min())
}

pub fn max(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.max())
}

/// `part / whole * 100`, or 0.0 when `whole` is zero.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Quantile with linear interpolation between closest ranks.
/// `sorted` must be ascending; `q` is clamped to [0, 1].
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

pub fn round_opt(value: Option<f64>, decimals: i32) -> Option<f64> {
    value.map(|v| round_to(v, decimals))
}

// Summary statistics over small numeric slices.
//
// Every function here is total: empty or degenerate input yields `0.0`,
// never NaN and never a panic.
use std::cmp::Ordering;

/// Arithmetic mean; `0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().copied().sum();
    sum / values.len() as f64
}

/// Round half towards positive infinity at `decimals` places, the way
/// `Math.round(x * 10^d) / 10^d` does in the dashboards that consume
/// these numbers (`-0.125` rounds to `-0.12`, not `-0.13`).
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor + 0.5).floor() / factor
}

fn sorted_ascending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Mean of the values at or above the 75th-percentile rank.
///
/// The cut is `floor(n * 0.75)` on the ascending sort. Below four values
/// the cut leaves only the maximum, so the maximum is used directly.
pub fn top_quartile_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted_ascending(values);
    if sorted.len() < 4 {
        return sorted[sorted.len() - 1];
    }
    let start = (sorted.len() as f64 * 0.75).floor() as usize;
    mean(&sorted[start..])
}

/// Relative standing of the overall mean against the top quartile:
/// `min(100, round(mean / top_quartile_mean * 100))`.
///
/// This is a heuristic used for radar charts, not a percentile rank.
/// Returns `0` for empty input or a zero top-quartile mean.
pub fn percentile_score(values: &[f64]) -> f64 {
    let top = top_quartile_mean(values);
    if values.is_empty() || top == 0.0 || !top.is_finite() {
        return 0.0;
    }
    let score = round_half_up(mean(values) / top * 100.0, 0);
    if score.is_finite() {
        score.min(100.0)
    } else {
        0.0
    }
}

/// Pearson correlation coefficient rounded to two decimals.
///
/// Pairs beyond the shorter slice are ignored. Fewer than two pairs, or a
/// series with zero variance, yields `0` ("no correlation").
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mean_x = mean(xs);
    let mean_y = mean(ys);

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let denominator = sum_sq_x.sqrt() * sum_sq_y.sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    let r = numerator / denominator;
    if r.is_finite() {
        round_half_up(r, 2)
    } else {
        0.0
    }
}

//! Normalized sinc and Whittaker–Shannon interpolation.

use std::f64::consts::PI;

/// Normalized sinc: `sin(πx) / (πx)`, with `sinc(0) = 1` and `sinc(±∞) = 0`.
pub fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    let pi_x = PI * x;
    if pi_x.is_infinite() {
        return 0.0;
    }
    pi_x.sin() / pi_x
}

/// Whittaker–Shannon reconstruction of `(times[n], values[n])` sampled at
/// `fs`, evaluated at every point of `grid`.
///
/// Every sample contributes to every grid point (no windowing), so the cost
/// is `O(samples × grid)`. With no samples the output is all zero.
pub fn reconstruct(times: &[f64], values: &[f64], fs: f64, grid: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; grid.len()];
    for (&tn, &xn) in times.iter().zip(values) {
        for (acc, &tk) in out.iter_mut().zip(grid) {
            *acc += xn * sinc(fs * (tk - tn));
        }
    }
    out
}

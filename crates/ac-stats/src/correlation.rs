//! Pearson product-moment correlation.

use ac_core::is_constant;

use crate::series::valid_pairs;

/// Pearson correlation over positional pairs with both samples present.
///
/// Returns `None` when there are no valid pairs or either side has zero
/// variance among them.
pub fn pearson_checked(x: &[f64], y: &[f64]) -> Option<f64> {
    let (xs, ys) = valid_pairs(x, y);
    let n = xs.len();
    if n == 0 || is_constant(&xs) || is_constant(&ys) {
        return None;
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in xs.iter().zip(&ys) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Pearson correlation with degenerate cases reported as `0`.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    pearson_checked(x, y).unwrap_or(0.0)
}

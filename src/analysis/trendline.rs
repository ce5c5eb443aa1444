//! Degree-1 least-squares fitting, optionally recency-weighted.
//!
//! The upper (resistance) line weights its extrema linearly from
//! `weight_start` at the oldest point to `weight_end` at the newest, so the
//! fit hugs recent price action. The lower (support) line is unweighted.

use crate::models::{ExtremaPoint, TrendlineFit};

/// Linearly spaced weights from `start` to `end`, one per point.
/// A single point receives `start` (matching the usual linspace convention).
pub(crate) fn linear_weights(n: usize, start: f64, end: f64) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Weighted least squares on (x, y) pairs. `weights: None` is the ordinary
/// unweighted fit. R² uses the same weights as the fit.
///
/// Edge case, by explicit policy: when every y is identical (SS_tot = 0) the
/// line explains all of nothing, so R² is defined as 1.0, not an error.
pub(crate) fn fit_xy(xs: &[f64], ys: &[f64], weights: Option<&[f64]>) -> TrendlineFit {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    let weighted = weights.is_some();

    if n == 0 {
        return TrendlineFit {
            slope: 0.0,
            intercept: 0.0,
            r_squared: 1.0,
            weighted,
        };
    }

    let weight_at = |i: usize| weights.map_or(1.0, |w| w[i]);

    let w_sum: f64 = (0..n).map(weight_at).sum();
    let x_mean: f64 = (0..n).map(|i| weight_at(i) * xs[i]).sum::<f64>() / w_sum;
    let y_mean: f64 = (0..n).map(|i| weight_at(i) * ys[i]).sum::<f64>() / w_sum;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for i in 0..n {
        let w = weight_at(i);
        let dx = xs[i] - x_mean;
        sxx += w * dx * dx;
        sxy += w * dx * (ys[i] - y_mean);
    }

    // Degenerate x spread (single point): a flat line through the mean.
    let slope = if sxx > f64::EPSILON { sxy / sxx } else { 0.0 };
    let intercept = y_mean - slope * x_mean;

    let mut ss_tot = 0.0;
    let mut ss_res = 0.0;
    for i in 0..n {
        let w = weight_at(i);
        let dy = ys[i] - y_mean;
        let residual = ys[i] - (slope * xs[i] + intercept);
        ss_tot += w * dy * dy;
        ss_res += w * residual * residual;
    }

    let r_squared = if ss_tot <= f64::EPSILON {
        1.0
    } else {
        1.0 - ss_res / ss_tot
    };

    TrendlineFit {
        slope,
        intercept,
        r_squared,
        weighted,
    }
}

/// Fit a line through extrema points, x = bar index within the window.
pub(crate) fn fit_points(points: &[ExtremaPoint], weights: Option<&[f64]>) -> TrendlineFit {
    let xs: Vec<f64> = points.iter().map(|p| p.index as f64).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.value).collect();
    fit_xy(&xs, &ys, weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtremaKind;

    fn points(pairs: &[(usize, f64)]) -> Vec<ExtremaPoint> {
        pairs
            .iter()
            .map(|&(index, value)| ExtremaPoint {
                index,
                value,
                kind: ExtremaKind::Peak,
            })
            .collect()
    }

    #[test]
    fn linear_weights_span_start_to_end() {
        assert_eq!(linear_weights(5, 1.0, 5.0), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(linear_weights(1, 1.0, 5.0), vec![1.0]);
        assert!(linear_weights(0, 1.0, 5.0).is_empty());
    }

    #[test]
    fn unweighted_fit_recovers_exact_line() {
        let pts = points(&[(0, 10.0), (10, 20.0), (20, 30.0), (30, 40.0)]);
        let fit = fit_points(&pts, None);
        assert!((fit.slope - 1.0).abs() < 1e-12);
        assert!((fit.intercept - 10.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert!(!fit.weighted);
    }

    #[test]
    fn weighted_fit_recovers_exact_line_too() {
        // Collinear points fit the same line under any weighting.
        let pts = points(&[(0, 100.0), (10, 98.0), (20, 96.0), (30, 94.0)]);
        let weights = linear_weights(4, 1.0, 5.0);
        let fit = fit_points(&pts, Some(&weights));
        assert!((fit.slope + 0.2).abs() < 1e-12);
        assert!((fit.intercept - 100.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
        assert!(fit.weighted);
    }

    #[test]
    fn recency_weighting_pulls_toward_newest_points() {
        // Old points say flat at 100, new points say flat at 90.
        let pts = points(&[(0, 100.0), (10, 100.0), (20, 90.0), (30, 90.0)]);
        let flat = fit_points(&pts, None);
        let weights = linear_weights(4, 1.0, 5.0);
        let recent = fit_points(&pts, Some(&weights));

        // The weighted line must sit closer to the newest value at x = 30.
        let flat_at_30 = flat.value_at(30.0);
        let recent_at_30 = recent.value_at(30.0);
        assert!((recent_at_30 - 90.0).abs() < (flat_at_30 - 90.0).abs());
    }

    #[test]
    fn r_squared_bounds() {
        // Noisy but trending data: R² strictly between 0 and 1.
        let pts = points(&[(0, 10.0), (5, 14.0), (10, 11.0), (15, 18.0), (20, 16.0)]);
        let fit = fit_points(&pts, None);
        assert!(fit.r_squared > 0.0 && fit.r_squared < 1.0);
    }

    #[test]
    fn zero_variance_r_squared_is_one_by_policy() {
        let pts = points(&[(0, 50.0), (10, 50.0), (20, 50.0)]);
        let fit = fit_points(&pts, None);
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.r_squared, 1.0);

        let weights = linear_weights(3, 1.0, 5.0);
        let fit = fit_points(&pts, Some(&weights));
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn trendline_series_evaluates_line() {
        let fit = TrendlineFit {
            slope: 2.0,
            intercept: 1.0,
            r_squared: 1.0,
            weighted: false,
        };
        assert_eq!(fit.series(3), vec![1.0, 3.0, 5.0]);
    }
}

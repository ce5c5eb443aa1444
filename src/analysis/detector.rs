//! Per-window triangle detection: extrema → trendline fits → compression,
//! breakout and breakdown flags.
//!
//! Returns the full [`WindowPattern`] whenever both trendlines are fittable;
//! callers decide qualification through [`WindowPattern::qualifies`]. Only a
//! window without enough extrema yields nothing at all.

use crate::analysis::{extrema, trendline};
use crate::config::ScanConfig;
use crate::models::WindowPattern;

/// Run the detection pipeline on one window. `highs`, `lows` and `closes`
/// are the trailing `window` bars, oldest first, all the same length.
pub(crate) fn detect_window(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    cfg: &ScanConfig,
) -> Option<WindowPattern> {
    let window_size = closes.len();
    debug_assert!(highs.len() == window_size && lows.len() == window_size);
    if window_size == 0 {
        return None;
    }

    // 1. Local extrema (adaptive sensitivity) + spacing/percentile filtering.
    let order = cfg.extrema_order(window_size);
    let extrema = extrema::extract(highs, lows, order, &cfg.extrema)?;

    // 2. Trendlines. Resistance is recency-weighted, support is not.
    let weights = trendline::linear_weights(
        extrema.peaks.len(),
        cfg.trend.weight_start,
        cfg.trend.weight_end,
    );
    let upper = trendline::fit_points(&extrema.peaks, Some(&weights));
    let lower = trendline::fit_points(&extrema.troughs, None);

    let upper_line = upper.series(window_size);
    let lower_line = lower.series(window_size);

    // 3. Compression: how much the channel narrowed across the window.
    let last = window_size - 1;
    let gap_start = upper_line[0] - lower_line[0];
    let gap_end = upper_line[last] - lower_line[last];
    let compression = if gap_start > 0.0 {
        gap_end / gap_start
    } else {
        1.0
    };

    let is_converging =
        upper.slope < lower.slope && compression < cfg.convergence.compression_max;

    // 4. Breakout age: consecutive most-recent closes above the resistance
    // line, scanned backward. Stale (>max) or absent (0) breakouts disqualify.
    let breakout_age = closes
        .iter()
        .zip(upper_line.iter())
        .rev()
        .take_while(|(close, line)| close > line)
        .count();
    let is_breaking_out = breakout_age >= cfg.convergence.breakout_min_age
        && breakout_age <= cfg.convergence.breakout_max_age;

    // 5. Breakdown: the support line held the closes below it long enough to
    // invalidate the bullish read entirely.
    let confirm = cfg.convergence.breakdown_confirm_bars.clamp(1, window_size);
    let is_breaking_down = closes
        .iter()
        .zip(lower_line.iter())
        .rev()
        .take(confirm)
        .all(|(close, line)| close < line);

    // 6. Breakout strength, meaningful only alongside is_breaking_out.
    let breakout_strength = if upper_line[last] > f64::EPSILON {
        closes[last] / upper_line[last] - 1.0
    } else {
        0.0
    };

    Some(WindowPattern {
        window_size,
        is_converging,
        is_breaking_out,
        is_breaking_down,
        breakout_age,
        breakout_strength,
        compression,
        upper,
        lower,
        upper_line,
        lower_line,
        selection_score: 0.0,
    })
}

//! Adaptive multi-window search.
//!
//! The detector runs across the whole window grid; each qualifying window is
//! scored by fit confidence with boosts for very clean fits and for tight,
//! short formations. The best window wins; exact ties go to the smaller
//! window (shorter formations are preferred; explicit policy, see DESIGN.md).

use crate::analysis::detector;
use crate::config::{ScanConfig, WindowConfig};
use crate::models::{PriceSeries, WindowPattern};

/// Ranking score for one qualifying window.
pub(crate) fn selection_score(r2_high: f64, window_size: usize, cfg: &WindowConfig) -> f64 {
    let mut score = r2_high;
    if r2_high > cfg.r2_select_threshold {
        score *= cfg.r2_select_boost;
    }
    if window_size <= cfg.short_window_max {
        score *= cfg.short_window_boost;
    }
    score
}

/// Keep the highest-scoring pattern from an ascending-window sequence.
/// Strict `>` replacement makes the smallest window win exact ties.
pub(crate) fn pick_best(patterns: Vec<WindowPattern>, cfg: &WindowConfig) -> Option<WindowPattern> {
    let mut best: Option<WindowPattern> = None;

    for mut pattern in patterns {
        pattern.selection_score =
            selection_score(pattern.r2_high(), pattern.window_size, cfg);

        let replace = match &best {
            Some(current) => pattern.selection_score > current.selection_score,
            None => true,
        };
        if replace {
            best = Some(pattern);
        }
    }

    best
}

/// Run detection across the configured window grid and pick the best
/// qualifying pattern. Windows longer than the series are skipped.
pub(crate) fn select_best(series: &PriceSeries, cfg: &ScanConfig) -> Option<WindowPattern> {
    let grid = &cfg.windows;

    let mut qualifying: Vec<WindowPattern> = Vec::new();
    for window in (grid.min_window..=grid.max_window).step_by(grid.window_step) {
        let Some((highs, lows, closes)) = series.tail_columns(window) else {
            continue;
        };

        let Some(pattern) = detector::detect_window(highs, lows, closes, cfg) else {
            continue;
        };

        if pattern.qualifies() {
            log::debug!(
                "{}: window {} qualifies | r2_high={:.3} | compression={:.3} | age={}",
                series.symbol,
                window,
                pattern.r2_high(),
                pattern.compression,
                pattern.breakout_age,
            );
            qualifying.push(pattern);
        }
    }

    pick_best(qualifying, grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SCAN;
    use crate::models::TrendlineFit;

    fn pattern_with(window_size: usize, r2_high: f64) -> WindowPattern {
        let line = TrendlineFit {
            slope: 0.0,
            intercept: 0.0,
            r_squared: r2_high,
            weighted: true,
        };
        WindowPattern {
            window_size,
            is_converging: true,
            is_breaking_out: true,
            is_breaking_down: false,
            breakout_age: 1,
            breakout_strength: 0.01,
            compression: 0.5,
            upper: line,
            lower: TrendlineFit {
                weighted: false,
                ..line
            },
            upper_line: Vec::new(),
            lower_line: Vec::new(),
            selection_score: 0.0,
        }
    }

    #[test]
    fn selection_score_applies_boosts() {
        let cfg = &SCAN.windows;
        // Plain score below both boost thresholds
        assert!((selection_score(0.6, 200, cfg) - 0.6).abs() < 1e-12);
        // Clean-fit boost only
        assert!((selection_score(0.9, 200, cfg) - 0.9 * 1.5).abs() < 1e-12);
        // Short-window boost only
        assert!((selection_score(0.6, 90, cfg) - 0.6 * 1.2).abs() < 1e-12);
        // Both
        assert!((selection_score(0.9, 40, cfg) - 0.9 * 1.5 * 1.2).abs() < 1e-12);
        // Threshold is strict: exactly 0.8 earns no boost
        assert!((selection_score(0.8, 200, cfg) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn pick_best_prefers_higher_score() {
        let best = pick_best(
            vec![pattern_with(120, 0.7), pattern_with(200, 0.95)],
            &SCAN.windows,
        )
        .unwrap();
        assert_eq!(best.window_size, 200);
        assert!((best.selection_score - 0.95 * 1.5).abs() < 1e-12);
    }

    #[test]
    fn exact_tie_goes_to_smaller_window() {
        // Same r2, both outside boost ranges: identical selection scores.
        let best = pick_best(
            vec![pattern_with(120, 0.75), pattern_with(240, 0.75)],
            &SCAN.windows,
        )
        .unwrap();
        assert_eq!(best.window_size, 120);
    }

    #[test]
    fn short_window_boost_can_beat_raw_r2() {
        // 0.78 * 1.2 = 0.936 beats an unboosted 0.79.
        let best = pick_best(
            vec![pattern_with(80, 0.78), pattern_with(150, 0.79)],
            &SCAN.windows,
        )
        .unwrap();
        assert_eq!(best.window_size, 80);
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert!(pick_best(Vec::new(), &SCAN.windows).is_none());
    }

    #[test]
    fn select_best_finds_the_engineered_triangle() {
        use crate::analysis::detector::tests::{triangle_window, with_breakout};
        use crate::domain::DailyBar;
        use chrono::NaiveDate;

        let (highs, lows, closes) = with_breakout(triangle_window());
        let bars: Vec<DailyBar> = (0..closes.len())
            .map(|i| {
                DailyBar::new(
                    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(i as u64),
                    closes[i],
                    highs[i],
                    lows[i],
                    closes[i],
                    1_000_000.0,
                )
            })
            .collect();
        let series = PriceSeries::from_bars("TRI", &bars).unwrap();

        // The series is exactly 80 bars, so windows 40..=80 are in play.
        let best = select_best(&series, &SCAN).expect("triangle should qualify");
        assert!(best.qualifies());
        assert!(best.selection_score > 0.0);
        assert!(best.window_size <= 80);
    }
}

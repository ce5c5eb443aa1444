//! Quality gate and the composite scoring engine.
//!
//! Five normalized components plus one additive volatility bonus. The same
//! inputs must produce bit-identical breakdowns on every run; downstream
//! backtests compare persisted scores across scans.

use crate::config::ScoringConfig;
use crate::models::{PriceSeries, ScoreBreakdown, WindowPattern};
use crate::utils::{clamp01, round2};

/// Post-detection admission check. Rejection here is expected filtering, not
/// an error: the pattern must converge, break out, and carry a trustworthy
/// resistance fit.
pub(crate) fn passes_quality_gate(pattern: &WindowPattern, cfg: &ScoringConfig) -> bool {
    pattern.is_converging && pattern.is_breaking_out && pattern.r2_high() >= cfg.r2_quality_min
}

/// Score a gate survivor. Volume and volatility read the full series, the
/// rest comes from the selected window's pattern.
pub(crate) fn score(
    series: &PriceSeries,
    pattern: &WindowPattern,
    cfg: &ScoringConfig,
) -> ScoreBreakdown {
    let rel_volume = series.latest_relative_volume(cfg.volume_window);
    let annual_vol = series.annualized_volatility(cfg.annual_trading_days);
    score_components(pattern, rel_volume, annual_vol, cfg)
}

/// The pure scoring math, split out so the numbers are testable in isolation.
pub(crate) fn score_components(
    pattern: &WindowPattern,
    rel_volume: f64,
    annual_vol: f64,
    cfg: &ScoringConfig,
) -> ScoreBreakdown {
    // 1. Quality: how clean both trendline fits are. A weak resistance fit
    // zeroes the component outright.
    let quality_score = if pattern.r2_high() < cfg.r2_quality_min {
        0.0
    } else {
        clamp01((pattern.r2_high() + pattern.r2_low()) / 2.0)
    };

    // 2. Compression: tighter triangles promise more violent breakouts.
    let compression_score = clamp01(1.0 - pattern.compression);

    // 3. Relative volume: a reliable breakout needs above-average turnout.
    let volume_score = clamp01(rel_volume / cfg.volume_ratio_full_score);

    // 4. Breakout strength, normalized so `breakout_strength_max` earns 1.0.
    // Negative strength (close back under the line) earns nothing.
    let strength_score = if pattern.is_breaking_out {
        clamp01(pattern.breakout_strength / cfg.breakout_strength_max)
    } else {
        0.0
    };

    // 5. Freshness: day-one breakouts are worth the most.
    let freshness_score = match pattern.breakout_age {
        1 => cfg.freshness_age_1,
        2 => cfg.freshness_age_2,
        _ => cfg.freshness_default,
    };

    // Momentum bonus from annualized volatility.
    let vol_score = clamp01(annual_vol / cfg.max_annual_volatility);
    let volatility_bonus = vol_score * cfg.volatility_bonus_scale;

    let base = quality_score * cfg.weight_quality
        + compression_score * cfg.weight_compression
        + volume_score * cfg.weight_volume
        + strength_score * cfg.weight_strength
        + freshness_score * cfg.weight_freshness;

    let final_score = if pattern.is_breaking_down {
        // An active breakdown invalidates the bullish read completely.
        0.0
    } else {
        let raw = base * cfg.final_score_scale + volatility_bonus * cfg.volatility_bonus_weight;
        round2(raw.clamp(0.0, cfg.final_score_scale))
    };

    ScoreBreakdown {
        quality_score,
        compression_score,
        volume_score,
        strength_score,
        freshness_score,
        volatility_bonus,
        final_score,
    }
}

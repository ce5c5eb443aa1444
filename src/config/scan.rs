//! Scan configuration: every tunable the pipeline reads lives here.
//!
//! Defaults are compile-time constants (`SCAN`); a JSON file can override any
//! section. Validation runs before the first ticker is touched; a missing or
//! nonsensical constant aborts the scan instead of silently corrupting every
//! score downstream.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Unparsable {
        path: String,
        source: serde_json::Error,
    },

    #[error("invalid configuration:\n{0}")]
    Invalid(String),
}

/// Coarse pre-screen thresholds (cheap O(n) checks, run before any window work).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Minimum market capitalization in dollars
    pub min_market_cap: f64,
    /// Long-trend SMA period
    pub sma_period: usize,
    /// How many trailing SMA values the slope fit uses
    pub sma_slope_window: usize,
    /// Minimum acceptable normalized SMA slope (values below reject the ticker)
    pub min_sma_slope: f64,
    /// Minimum bars of history before the filter can ever pass
    pub min_history_bars: usize,
}

/// Local-extrema extraction parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtremaConfig {
    /// Neighborhood radius for short windows (few raw points need finer sensitivity)
    pub order_short: usize,
    /// Neighborhood radius for long windows
    pub order_long: usize,
    /// Window length at or below which the short order applies
    pub adaptive_window_max: usize,
    /// Minimum surviving points per side for a fittable trendline
    pub min_points: usize,
    /// Same-kind minimum spacing, as a multiple of the order
    pub spacing_factor: usize,
    /// Fraction of the weakest peaks dropped when more than `min_points` remain
    pub peak_drop_pct: f64,
}

/// Trendline regression weighting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendFitConfig {
    /// Weight of the oldest kept extremum on the upper line
    pub weight_start: f64,
    /// Weight of the newest kept extremum on the upper line
    pub weight_end: f64,
}

/// Convergence / breakout / breakdown thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergenceConfig {
    /// Compression must fall below this for a window to converge
    pub compression_max: f64,
    /// Youngest acceptable breakout age in bars
    pub breakout_min_age: usize,
    /// Oldest acceptable breakout age in bars
    pub breakout_max_age: usize,
    /// Consecutive closes below the lower line that confirm a breakdown
    pub breakdown_confirm_bars: usize,
}

/// Multi-window search grid and selection boosts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub min_window: usize,
    pub max_window: usize,
    pub window_step: usize,
    /// r2_high above this earns the selection boost
    pub r2_select_threshold: f64,
    pub r2_select_boost: f64,
    /// Windows at or below this length earn the tight-formation boost
    pub short_window_max: usize,
    pub short_window_boost: f64,
}

/// Scoring weights and normalization denominators.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// r2_high below this zeroes the quality component (and fails the gate)
    pub r2_quality_min: f64,

    pub weight_quality: f64,
    pub weight_compression: f64,
    pub weight_volume: f64,
    pub weight_strength: f64,
    pub weight_freshness: f64,

    /// Breakout strength earning a full strength score
    pub breakout_strength_max: f64,
    /// Trailing window for the average-volume baseline
    pub volume_window: usize,
    /// Relative volume earning a full volume score
    pub volume_ratio_full_score: f64,

    /// Freshness for a 1-bar-old breakout
    pub freshness_age_1: f64,
    /// Freshness for a 2-bar-old breakout
    pub freshness_age_2: f64,
    /// Freshness for any other age
    pub freshness_default: f64,

    /// Scale applied to the weighted base (also the final clamp ceiling)
    pub final_score_scale: f64,
    /// Scale turning the volatility score into the stored bonus
    pub volatility_bonus_scale: f64,
    /// Weight of the stored bonus inside the final score
    pub volatility_bonus_weight: f64,

    /// Trading days per year for volatility annualization
    pub annual_trading_days: f64,
    /// Annualized volatility earning a full volatility score
    pub max_annual_volatility: f64,
}

/// Ranking and worker-pool settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Ranked candidates kept after the scan
    pub top_n: usize,
    /// Fixed worker-pool size for the per-ticker fan-out
    pub workers: usize,
}

/// The Master Scan Configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    pub filter: FilterConfig,
    pub extrema: ExtremaConfig,
    pub trend: TrendFitConfig,
    pub convergence: ConvergenceConfig,
    pub windows: WindowConfig,
    pub scoring: ScoringConfig,
    pub ranking: RankingConfig,
}

pub const SCAN: ScanConfig = ScanConfig {
    filter: FilterConfig {
        min_market_cap: 2e9,
        sma_period: 150,
        sma_slope_window: 20,
        min_sma_slope: 0.0,
        // sma_period + sma_slope_window: the slope fit needs 20 full SMA values
        min_history_bars: 170,
    },

    extrema: ExtremaConfig {
        order_short: 3,
        order_long: 5,
        adaptive_window_max: 100,
        min_points: 3,
        spacing_factor: 2,
        peak_drop_pct: 0.30,
    },

    trend: TrendFitConfig {
        weight_start: 1.0,
        weight_end: 5.0,
    },

    convergence: ConvergenceConfig {
        compression_max: 0.7,
        breakout_min_age: 1,
        breakout_max_age: 2,
        breakdown_confirm_bars: 2,
    },

    windows: WindowConfig {
        min_window: 40,
        max_window: 360,
        window_step: 10,
        r2_select_threshold: 0.8,
        r2_select_boost: 1.5,
        short_window_max: 90,
        short_window_boost: 1.2,
    },

    scoring: ScoringConfig {
        r2_quality_min: 0.5,

        weight_quality: 0.20,
        weight_compression: 0.30,
        weight_volume: 0.30,
        weight_strength: 0.10,
        weight_freshness: 0.10,

        breakout_strength_max: 0.03,
        volume_window: 20,
        volume_ratio_full_score: 2.0,

        freshness_age_1: 1.0,
        freshness_age_2: 0.7,
        freshness_default: 0.0,

        final_score_scale: 100.0,
        volatility_bonus_scale: 10.0,
        volatility_bonus_weight: 10.0,

        annual_trading_days: 252.0,
        max_annual_volatility: 0.50,
    },

    ranking: RankingConfig {
        top_n: 10,
        workers: 10,
    },
};

impl Default for FilterConfig {
    fn default() -> Self {
        SCAN.filter
    }
}
impl Default for ExtremaConfig {
    fn default() -> Self {
        SCAN.extrema
    }
}
impl Default for TrendFitConfig {
    fn default() -> Self {
        SCAN.trend
    }
}
impl Default for ConvergenceConfig {
    fn default() -> Self {
        SCAN.convergence
    }
}
impl Default for WindowConfig {
    fn default() -> Self {
        SCAN.windows
    }
}
impl Default for ScoringConfig {
    fn default() -> Self {
        SCAN.scoring
    }
}
impl Default for RankingConfig {
    fn default() -> Self {
        SCAN.ranking
    }
}

impl ScanConfig {
    /// Baked-in defaults, or the JSON override file when one is given.
    /// Sections missing from the file keep their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(SCAN);
        };

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Unparsable {
            path: path.display().to_string(),
            source,
        })
    }

    /// Checks every constant before the scan starts. All violations are
    /// reported at once so a bad config file can be fixed in one pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems: Vec<String> = Vec::new();

        let f = &self.filter;
        if f.min_market_cap <= 0.0 {
            problems.push("filter.min_market_cap must be positive".into());
        }
        if f.sma_period < 2 {
            problems.push("filter.sma_period must be at least 2".into());
        }
        if f.sma_slope_window < 2 {
            problems.push("filter.sma_slope_window must be at least 2".into());
        }
        if f.min_history_bars < f.sma_period + f.sma_slope_window {
            problems.push(format!(
                "filter.min_history_bars ({}) must cover sma_period + sma_slope_window ({})",
                f.min_history_bars,
                f.sma_period + f.sma_slope_window
            ));
        }

        let e = &self.extrema;
        if e.order_short == 0 {
            problems.push("extrema.order_short must be at least 1".into());
        }
        if e.order_long < e.order_short {
            problems.push("extrema.order_long must be >= extrema.order_short".into());
        }
        if e.min_points < 2 {
            problems.push("extrema.min_points must be at least 2".into());
        }
        if e.spacing_factor == 0 {
            problems.push("extrema.spacing_factor must be at least 1".into());
        }
        if !(0.0..1.0).contains(&e.peak_drop_pct) {
            problems.push("extrema.peak_drop_pct must be in [0, 1)".into());
        }

        let t = &self.trend;
        if t.weight_start <= 0.0 || t.weight_end < t.weight_start {
            problems.push("trend weights must satisfy 0 < weight_start <= weight_end".into());
        }

        let c = &self.convergence;
        if !(0.0..=1.0).contains(&c.compression_max) || c.compression_max == 0.0 {
            problems.push("convergence.compression_max must be in (0, 1]".into());
        }
        if c.breakout_min_age == 0 {
            problems.push("convergence.breakout_min_age must be at least 1".into());
        }
        if c.breakout_max_age < c.breakout_min_age {
            problems.push("convergence.breakout_max_age must be >= breakout_min_age".into());
        }
        if c.breakdown_confirm_bars == 0 {
            problems.push("convergence.breakdown_confirm_bars must be at least 1".into());
        }

        let w = &self.windows;
        if w.window_step == 0 {
            problems.push("windows.window_step must be at least 1".into());
        }
        if w.min_window > w.max_window {
            problems.push("windows.min_window must be <= windows.max_window".into());
        }
        if w.min_window < 2 * e.order_long + 1 {
            problems.push(format!(
                "windows.min_window ({}) is too small for extrema.order_long ({})",
                w.min_window, e.order_long
            ));
        }
        if w.r2_select_boost <= 0.0 || w.short_window_boost <= 0.0 {
            problems.push("windows selection boosts must be positive".into());
        }

        let s = &self.scoring;
        for (name, weight) in [
            ("weight_quality", s.weight_quality),
            ("weight_compression", s.weight_compression),
            ("weight_volume", s.weight_volume),
            ("weight_strength", s.weight_strength),
            ("weight_freshness", s.weight_freshness),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                problems.push(format!("scoring.{name} must be in [0, 1]"));
            }
        }
        let weight_sum = s.weight_quality
            + s.weight_compression
            + s.weight_volume
            + s.weight_strength
            + s.weight_freshness;
        if weight_sum <= 0.0 {
            problems.push("scoring weights must not all be zero".into());
        }
        if s.breakout_strength_max <= 0.0 {
            problems.push("scoring.breakout_strength_max must be positive".into());
        }
        if s.volume_window == 0 {
            problems.push("scoring.volume_window must be at least 1".into());
        }
        if s.volume_ratio_full_score <= 0.0 {
            problems.push("scoring.volume_ratio_full_score must be positive".into());
        }
        if s.final_score_scale <= 0.0 {
            problems.push("scoring.final_score_scale must be positive".into());
        }
        if s.annual_trading_days <= 0.0 {
            problems.push("scoring.annual_trading_days must be positive".into());
        }
        if s.max_annual_volatility <= 0.0 {
            problems.push("scoring.max_annual_volatility must be positive".into());
        }

        let r = &self.ranking;
        if r.top_n == 0 {
            problems.push("ranking.top_n must be at least 1".into());
        }
        if r.workers == 0 {
            problems.push("ranking.workers must be at least 1".into());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems.join("\n")))
        }
    }

    /// The extrema neighborhood radius for a given window length.
    pub fn extrema_order(&self, window_len: usize) -> usize {
        if window_len <= self.extrema.adaptive_window_max {
            self.extrema.order_short
        } else {
            self.extrema.order_long
        }
    }
}

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::models::WindowPattern;

/// The five normalized scoring components plus the volatility bonus.
/// All component scores are in [0, 1]; the bonus is in [0, volatility_bonus_scale];
/// final_score is in [0, 100] with 2-decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub quality_score: f64,
    pub compression_score: f64,
    pub volume_score: f64,
    pub strength_score: f64,
    pub freshness_score: f64,
    pub volatility_bonus: f64,
    pub final_score: f64,
}

/// One ranked scan survivor: the ticker, its best-window pattern and the
/// score breakdown. Created once per scan, then immutable; persisting or
/// discarding it is the reporting collaborator's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub ticker: String,
    pub pattern: WindowPattern,
    pub scores: ScoreBreakdown,
    /// Price floor/ceiling of the selected window, for chart framing
    pub window_low: f64,
    pub window_high: f64,
}

/// Why a ticker dropped out of the scan. Skips are expected filtering,
/// not errors; one ticker's reason never aborts the batch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum SkipReason {
    /// Market cap provider returned unknown
    UnknownMarketCap,
    /// Market cap below the configured floor
    BelowMarketCapFloor,
    /// Fewer bars than the coarse filter needs
    InsufficientHistory,
    /// Last close at or below the long SMA
    BelowLongTrend,
    /// Normalized SMA slope below the configured minimum
    WeakTrendSlope,
    /// No window produced a converging, breaking-out pattern
    NoPattern,
    /// Best window failed the quality gate
    FailedQualityGate,
    /// Closes held below the lower trendline, pattern invalidated
    BrokenDown,
    /// Price or market-cap retrieval failed
    FetchFailed,
}

mod candidate;
mod ohlcv;
mod pattern;

pub use ohlcv::PriceSeries;

pub use {
    candidate::{Candidate, ScoreBreakdown, SkipReason},
    pattern::{ExtremaKind, ExtremaPoint, TrendlineFit, WindowPattern},
};

use serde::{Deserialize, Serialize};

/// Which side of the price action an extremum sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtremaKind {
    Peak,
    Trough,
}

/// One local extremum inside a detection window.
/// Ephemeral: lives only for the duration of one window pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremaPoint {
    /// Bar index within the window (0 = oldest bar of the window)
    pub index: usize,
    pub value: f64,
    pub kind: ExtremaKind,
}

/// A fitted degree-1 trendline with its goodness of fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendlineFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// True when the fit used recency weighting
    pub weighted: bool,
}

impl TrendlineFit {
    #[inline]
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// The line evaluated at every bar of a `len`-bar window.
    pub fn series(&self, len: usize) -> Vec<f64> {
        (0..len).map(|i| self.value_at(i as f64)).collect()
    }
}

/// Full detection result for one (ticker, window) pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowPattern {
    pub window_size: usize,

    pub is_converging: bool,
    pub is_breaking_out: bool,
    pub is_breaking_down: bool,

    /// Consecutive most-recent closes above the upper line
    pub breakout_age: usize,
    /// close / upper-line value at the latest bar, minus 1
    pub breakout_strength: f64,
    /// Line gap at window end over line gap at window start
    pub compression: f64,

    pub upper: TrendlineFit,
    pub lower: TrendlineFit,

    /// Upper/lower line values across the window, for chart overlay
    pub upper_line: Vec<f64>,
    pub lower_line: Vec<f64>,

    /// Set by the window selector; 0 until a window qualifies
    pub selection_score: f64,
}

impl WindowPattern {
    /// A window only yields a pattern when it both converges and breaks out.
    pub fn qualifies(&self) -> bool {
        self.is_converging && self.is_breaking_out
    }

    pub fn r2_high(&self) -> f64 {
        self.upper.r_squared
    }

    pub fn r2_low(&self) -> f64 {
        self.lower.r_squared
    }
}

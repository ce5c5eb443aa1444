use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Define the DailyBar struct with all its properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,

    pub volume: f64,
}

impl DailyBar {
    // A constructor for convenience
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        DailyBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// True when the bar closed at or above its open.
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

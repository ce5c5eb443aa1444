//! Configuration module for the scanner.

mod scan;

// Re-export commonly used items
pub use scan::{
    ConfigError, ConvergenceConfig, ExtremaConfig, FilterConfig, RankingConfig, SCAN, ScanConfig,
    ScoringConfig, TrendFitConfig, WindowConfig,
};

#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod models;
pub mod utils;

// Re-export commonly used types outside of crate
pub use crate::models::{Candidate, PriceSeries};
pub use engine::{ScanReport, TickerInput, run_scan};

// CLI argument parsing
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON config override; baked-in defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Newline-delimited ticker universe file
    #[arg(long, default_value = "universe.txt")]
    pub universe: PathBuf,

    /// SQLite market-data store
    #[arg(long, default_value = "market_data.sqlite")]
    pub db: PathBuf,

    /// Scan a single ticker with verbose per-window logging
    #[arg(long)]
    pub ticker: Option<String>,

    /// Override the ranked output length
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Directory for persisted scan results
    #[arg(long, default_value = "scan_results")]
    pub results_dir: PathBuf,
}

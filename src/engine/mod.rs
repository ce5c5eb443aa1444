mod report;
mod scanner;

pub use {
    report::{render_table, save_json, skip_summary},
    scanner::{ScanReport, TickerInput, TickerSkip, run_scan},
};

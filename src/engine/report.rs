//! Rendering and persistence of scan results.
//!
//! The console gets a ranked table plus a per-reason skip summary; the full
//! report is persisted as JSON so the dashboard and backtest passes can
//! re-read candidates (with their trendline series) later.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use strum::IntoEnumIterator;
use tabled::{Table, Tabled, settings::Style};

use crate::engine::scanner::ScanReport;
use crate::models::SkipReason;

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Window")]
    window: usize,
    #[tabled(rename = "R2 High")]
    r2_high: String,
    #[tabled(rename = "Compression")]
    compression: String,
    #[tabled(rename = "Age")]
    age: usize,
    #[tabled(rename = "Breakout %")]
    strength: String,
}

/// Ranked top-N as a console table.
pub fn render_table(report: &ScanReport) -> String {
    let rows: Vec<CandidateRow> = report
        .candidates
        .iter()
        .enumerate()
        .map(|(i, c)| CandidateRow {
            rank: i + 1,
            ticker: c.ticker.clone(),
            score: format!("{:.2}", c.scores.final_score),
            window: c.pattern.window_size,
            r2_high: format!("{:.3}", c.pattern.r2_high()),
            compression: format!("{:.3}", c.pattern.compression),
            age: c.pattern.breakout_age,
            strength: format!("{:+.2}%", c.pattern.breakout_strength * 100.0),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Non-zero skip counts, in enum declaration order.
pub fn skip_summary(report: &ScanReport) -> Vec<(SkipReason, usize)> {
    SkipReason::iter()
        .map(|reason| {
            let count = report
                .skipped
                .iter()
                .filter(|skip| skip.reason == reason)
                .count();
            (reason, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// Persist the full report as `scan_<date>.json` under `dir`.
pub fn save_json(report: &ScanReport, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating results directory {}", dir.display()))?;

    let path = dir.join(format!("scan_{}.json", report.scan_date));
    let payload = serde_json::to_string_pretty(report)?;
    fs::write(&path, payload)
        .with_context(|| format!("writing scan results to {}", path.display()))?;

    Ok(path)
}

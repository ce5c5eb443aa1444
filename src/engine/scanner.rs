//! Batch scan orchestrator.
//!
//! # Approach
//! Every ticker arrives with its inputs already resolved (series + market
//! cap), so the pipeline itself performs no I/O and holds no cross-ticker
//! state, so the fan-out is embarrassingly parallel:
//!
//! 1. Coarse filter (cheap, O(n)) rejects most of the universe.
//! 2. The window selector runs the detector across the whole grid and keeps
//!    the best qualifying pattern.
//! 3. The quality gate admits trustworthy patterns; the breakdown flag on the
//!    selected window disqualifies the ticker outright.
//! 4. The scoring engine produces the final breakdown.
//!
//! Aggregation into the ranked top-N is a single-writer reduction performed
//! only after every worker has finished; no streaming, no partial ranking.

use std::cmp::Ordering;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::{filters, scoring, window_select};
use crate::config::ScanConfig;
use crate::models::{Candidate, PriceSeries, SkipReason};

// ─── Inputs and outputs ──────────────────────────────────────────────────────

/// Everything one ticker needs, resolved ahead of the scan by the data layer.
#[derive(Debug, Clone)]
pub struct TickerInput {
    pub symbol: String,
    pub series: PriceSeries,
    pub market_cap: Option<f64>,
}

/// A ticker that dropped out, and why. Skips are bookkeeping, not failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerSkip {
    pub symbol: String,
    pub reason: SkipReason,
}

/// The full result of one scan run, ready for rendering and persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_date: NaiveDate,
    pub universe_size: usize,
    /// Ranked descending by final score, ties broken by ticker, length <= top_n
    pub candidates: Vec<Candidate>,
    pub skipped: Vec<TickerSkip>,
}

enum TickerOutcome {
    Found(Box<Candidate>),
    Skipped(SkipReason),
}

// ─── Per-ticker pipeline (pure) ──────────────────────────────────────────────

/// Run one ticker through filter → selection → gate → scoring.
/// Pure function of its inputs; no side effects beyond logging.
fn analyze_ticker(input: &TickerInput, cfg: &ScanConfig) -> TickerOutcome {
    if let Err(reason) = filters::coarse_check(&input.series, input.market_cap, &cfg.filter) {
        return TickerOutcome::Skipped(reason);
    }

    let Some(best) = window_select::select_best(&input.series, cfg) else {
        return TickerOutcome::Skipped(SkipReason::NoPattern);
    };

    if !scoring::passes_quality_gate(&best, &cfg.scoring) {
        return TickerOutcome::Skipped(SkipReason::FailedQualityGate);
    }

    // Breakdown is applied globally from the selected window: the score is
    // forced to zero and the ticker never reaches the ranking.
    if best.is_breaking_down {
        return TickerOutcome::Skipped(SkipReason::BrokenDown);
    }

    let scores = scoring::score(&input.series, &best, &cfg.scoring);
    let (window_low, window_high) = input
        .series
        .window_bounds(best.window_size)
        .unwrap_or((0.0, 0.0));

    log::info!(
        "{} | window={} | r2_high={:.3} | compression={:.3} | age={} | score={:.2}",
        input.symbol,
        best.window_size,
        best.r2_high(),
        best.compression,
        best.breakout_age,
        scores.final_score,
    );

    TickerOutcome::Found(Box::new(Candidate {
        ticker: input.symbol.clone(),
        pattern: best,
        scores,
        window_low,
        window_high,
    }))
}

// ─── Scan entry point ────────────────────────────────────────────────────────

/// Fan the per-ticker pipeline across a fixed-size worker pool, then rank.
/// `fetch_failures` are tickers the data layer could not resolve; they join
/// the skip list so the report accounts for the whole universe.
pub fn run_scan(
    inputs: &[TickerInput],
    fetch_failures: Vec<TickerSkip>,
    cfg: &ScanConfig,
    scan_date: NaiveDate,
) -> anyhow::Result<ScanReport> {
    let universe_size = inputs.len() + fetch_failures.len();
    log::info!(
        "scan start | universe={} | resolved={} | workers={}",
        universe_size,
        inputs.len(),
        cfg.ranking.workers,
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.ranking.workers)
        .build()?;

    let outcomes: Vec<(String, TickerOutcome)> = pool.install(|| {
        inputs
            .par_iter()
            .map(|input| (input.symbol.clone(), analyze_ticker(input, cfg)))
            .collect()
    });

    // Single-writer aggregation after all workers complete.
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut skipped = fetch_failures;
    for (symbol, outcome) in outcomes {
        match outcome {
            TickerOutcome::Found(candidate) => candidates.push(*candidate),
            TickerOutcome::Skipped(reason) => skipped.push(TickerSkip { symbol, reason }),
        }
    }

    rank_candidates(&mut candidates, cfg.ranking.top_n);
    skipped.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    log::info!(
        "scan complete | candidates={} | skipped={}",
        candidates.len(),
        skipped.len(),
    );

    Ok(ScanReport {
        scan_date,
        universe_size,
        candidates,
        skipped,
    })
}

/// Sort descending by final score (ties broken alphabetically by ticker so
/// repeated runs rank identically) and truncate to the configured top-N.
pub(crate) fn rank_candidates(candidates: &mut Vec<Candidate>, top_n: usize) {
    candidates.sort_by(|a, b| {
        b.scores
            .final_score
            .partial_cmp(&a.scores.final_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
    candidates.truncate(top_n);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SCAN;
    use crate::models::{ScoreBreakdown, TrendlineFit, WindowPattern};

    fn candidate(ticker: &str, final_score: f64) -> Candidate {
        let line = TrendlineFit {
            slope: 0.0,
            intercept: 100.0,
            r_squared: 0.9,
            weighted: false,
        };
        Candidate {
            ticker: ticker.to_string(),
            pattern: WindowPattern {
                window_size: 80,
                is_converging: true,
                is_breaking_out: true,
                is_breaking_down: false,
                breakout_age: 1,
                breakout_strength: 0.01,
                compression: 0.4,
                upper: line,
                lower: line,
                upper_line: Vec::new(),
                lower_line: Vec::new(),
                selection_score: 1.0,
            },
            scores: ScoreBreakdown {
                quality_score: 0.9,
                compression_score: 0.6,
                volume_score: 0.5,
                strength_score: 0.3,
                freshness_score: 1.0,
                volatility_bonus: 5.0,
                final_score,
            },
            window_low: 90.0,
            window_high: 110.0,
        }
    }

    #[test]
    fn ranking_sorts_descending_and_truncates() {
        let mut candidates = vec![
            candidate("AAA", 55.0),
            candidate("BBB", 91.5),
            candidate("CCC", 77.0),
            candidate("DDD", 12.0),
        ];
        rank_candidates(&mut candidates, 3);

        let tickers: Vec<&str> = candidates.iter().map(|c| c.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["BBB", "CCC", "AAA"]);
    }

    #[test]
    fn equal_scores_rank_alphabetically() {
        let mut candidates = vec![
            candidate("ZZZ", 80.0),
            candidate("MMM", 80.0),
            candidate("AAA", 80.0),
        ];
        rank_candidates(&mut candidates, 10);

        let tickers: Vec<&str> = candidates.iter().map(|c| c.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAA", "MMM", "ZZZ"]);
    }

    #[test]
    fn skipped_ticker_reasons_flow_into_report() {
        // A series too short for the coarse filter.
        let short = TickerInput {
            symbol: "TINY".to_string(),
            series: crate::data::demo::uptrend_series("TINY", 50),
            market_cap: Some(5e9),
        };
        let fetch_fail = TickerSkip {
            symbol: "GONE".to_string(),
            reason: SkipReason::FetchFailed,
        };

        let report = run_scan(
            &[short],
            vec![fetch_fail],
            &SCAN,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        )
        .unwrap();

        assert_eq!(report.universe_size, 2);
        assert!(report.candidates.is_empty());
        assert_eq!(report.skipped.len(), 2);
        // Deterministic order: sorted by symbol.
        assert_eq!(report.skipped[0].symbol, "GONE");
        assert_eq!(report.skipped[1].symbol, "TINY");
        assert_eq!(report.skipped[1].reason, SkipReason::InsufficientHistory);
    }
}

//! End-to-end scan over synthetic series: one clean breakout candidate among
//! a universe of rejects, with every dropout accounted for.

use chrono::NaiveDate;

use breakout_sniper::TickerInput;
use breakout_sniper::config::SCAN;
use breakout_sniper::data::demo::{DemoShape, demo_series, uptrend_series};
use breakout_sniper::engine::{TickerSkip, run_scan};
use breakout_sniper::models::SkipReason;

fn input(symbol: &str, shape: DemoShape, market_cap: f64) -> TickerInput {
    TickerInput {
        symbol: symbol.to_string(),
        series: demo_series(symbol, shape, 300),
        market_cap: Some(market_cap),
    }
}

fn scan_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
}

fn demo_inputs() -> (Vec<TickerInput>, Vec<TickerSkip>) {
    let inputs = vec![
        input("TRIA", DemoShape::TriangleBreakout, 8.0e9),
        input("GRND", DemoShape::SteadyUptrend, 12.0e9),
        input("SLID", DemoShape::Downtrend, 6.0e9),
        input("COIL", DemoShape::TriangleForming, 4.5e9),
        input("PENN", DemoShape::SteadyUptrend, 0.8e9),
        TickerInput {
            symbol: "NOCAP".to_string(),
            series: uptrend_series("NOCAP", 300),
            market_cap: None,
        },
    ];
    let fetch_failures = vec![TickerSkip {
        symbol: "GONE".to_string(),
        reason: SkipReason::FetchFailed,
    }];
    (inputs, fetch_failures)
}

fn skip_reason(report: &breakout_sniper::ScanReport, symbol: &str) -> SkipReason {
    report
        .skipped
        .iter()
        .find(|s| s.symbol == symbol)
        .unwrap_or_else(|| panic!("{symbol} missing from skip list"))
        .reason
}

#[test]
fn scan_finds_the_breakout_and_accounts_for_every_ticker() {
    let (inputs, fetch_failures) = demo_inputs();
    let report = run_scan(&inputs, fetch_failures, &SCAN, scan_date()).unwrap();

    assert_eq!(report.universe_size, 7);

    // Only the fresh breakout survives the whole pipeline.
    let tickers: Vec<&str> = report.candidates.iter().map(|c| c.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["TRIA"]);

    let winner = &report.candidates[0];
    assert!(winner.scores.final_score > 0.0);
    assert!(winner.scores.final_score <= 100.0);
    assert!(winner.pattern.is_converging && winner.pattern.is_breaking_out);
    assert!((1..=2).contains(&winner.pattern.breakout_age));
    assert!(winner.pattern.r2_high() >= 0.5);
    assert!(winner.pattern.compression < SCAN.convergence.compression_max);
    assert_eq!(
        winner.pattern.upper_line.len(),
        winner.pattern.window_size,
        "trendline series must span the selected window for chart overlay"
    );
    assert!(winner.window_high >= winner.window_low);

    // Everyone else is in the skip list with the reason the pipeline hit first.
    assert_eq!(report.skipped.len(), 6);
    assert_eq!(skip_reason(&report, "GRND"), SkipReason::NoPattern);
    assert_eq!(skip_reason(&report, "SLID"), SkipReason::BelowLongTrend);
    assert_eq!(skip_reason(&report, "PENN"), SkipReason::BelowMarketCapFloor);
    assert_eq!(skip_reason(&report, "NOCAP"), SkipReason::UnknownMarketCap);
    assert_eq!(skip_reason(&report, "GONE"), SkipReason::FetchFailed);
    // COIL has no breakout yet; it must not rank, whichever filter caught it.
    assert!(report.skipped.iter().any(|s| s.symbol == "COIL"));
}

#[test]
fn repeated_scans_are_bit_identical() {
    let (inputs, fetch_failures) = demo_inputs();
    let first = run_scan(&inputs, fetch_failures.clone(), &SCAN, scan_date()).unwrap();
    let second = run_scan(&inputs, fetch_failures, &SCAN, scan_date()).unwrap();

    let a = serde_json::to_string(&first).unwrap();
    let b = serde_json::to_string(&second).unwrap();
    assert_eq!(a, b);
}

#[test]
fn top_n_truncates_the_ranking() {
    let (inputs, _) = demo_inputs();
    let mut cfg = SCAN;
    cfg.ranking.top_n = 1;
    // Universe with a single possible candidate: truncation must not drop it.
    let report = run_scan(&inputs, Vec::new(), &cfg, scan_date()).unwrap();
    assert!(report.candidates.len() <= 1);
    assert_eq!(report.candidates[0].ticker, "TRIA");
}

//! Deterministic synthetic market data.
//!
//! Lets the scanner run end-to-end offline: `make_demo_cache` writes these
//! shapes into the local store, and the tests build series from them
//! directly. Everything here is a pure function of its arguments, so repeated
//! runs produce byte-identical bars.

use chrono::NaiveDate;

use crate::domain::DailyBar;
use crate::models::PriceSeries;

/// First bar date for every generated series.
const START_DATE: (i32, u32, u32) = (2025, 1, 2);

const TRIANGLE_LEN: usize = 80;

#[derive(Debug, Clone, Copy)]
pub enum DemoShape {
    /// Long uptrend into an 80-bar triangle with a fresh 1-bar breakout
    TriangleBreakout,
    /// Same triangle, still coiling, no breakout yet
    TriangleForming,
    /// Clean rise, no consolidation
    SteadyUptrend,
    /// Persistent decline
    Downtrend,
    /// Triangle resolving downward through support
    BrokenDown,
}

#[derive(Debug, Clone, Copy)]
pub struct DemoSpec {
    pub symbol: &'static str,
    pub market_cap: f64,
    pub shape: DemoShape,
}

/// The demo universe: one of each shape plus a small-cap reject.
pub const DEMO_UNIVERSE: &[DemoSpec] = &[
    DemoSpec {
        symbol: "TRIA",
        market_cap: 8.0e9,
        shape: DemoShape::TriangleBreakout,
    },
    DemoSpec {
        symbol: "COIL",
        market_cap: 4.5e9,
        shape: DemoShape::TriangleForming,
    },
    DemoSpec {
        symbol: "GRND",
        market_cap: 12.0e9,
        shape: DemoShape::SteadyUptrend,
    },
    DemoSpec {
        symbol: "SLID",
        market_cap: 6.0e9,
        shape: DemoShape::Downtrend,
    },
    DemoSpec {
        symbol: "FADE",
        market_cap: 3.0e9,
        shape: DemoShape::BrokenDown,
    },
    DemoSpec {
        symbol: "PENN",
        market_cap: 0.8e9,
        shape: DemoShape::SteadyUptrend,
    },
];

fn start_date() -> NaiveDate {
    let (y, m, d) = START_DATE;
    NaiveDate::from_ymd_opt(y, m, d).expect("valid demo start date")
}

fn bars_from_paths(highs: &[f64], lows: &[f64], closes: &[f64], volumes: &[f64]) -> Vec<DailyBar> {
    let date0 = start_date();
    (0..closes.len())
        .map(|i| {
            let open = if i == 0 { closes[0] } else { closes[i - 1] };
            DailyBar::new(
                date0 + chrono::Days::new(i as u64),
                open,
                highs[i].max(open).max(closes[i]),
                lows[i].min(open).min(closes[i]),
                closes[i],
                volumes[i],
            )
        })
        .collect()
}

/// Linear climb from 55 toward 99 with a mild deterministic wave.
fn uptrend_paths(len: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut highs = Vec::with_capacity(len);
    let mut lows = Vec::with_capacity(len);
    let mut closes = Vec::with_capacity(len);
    let mut volumes = Vec::with_capacity(len);

    let span = (len.max(2) - 1) as f64;
    for i in 0..len {
        let x = i as f64;
        let close = 55.0 + 44.0 * x / span + 1.2 * (x * 0.35).sin();
        closes.push(close);
        highs.push(close + 0.8);
        lows.push(close - 0.8);
        volumes.push(1_000_000.0 + 50_000.0 * (x * 0.5).sin());
    }

    (highs, lows, closes, volumes)
}

/// The 80-bar triangle used across the demo shapes:
/// resistance y = 112 − 0.10x, support y = 88 + 0.05x (window-local x),
/// scaled by `scale` so it stitches onto any prefix level.
fn triangle_paths(scale: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
    let n = TRIANGLE_LEN;
    let mut highs = Vec::with_capacity(n);
    let mut lows = Vec::with_capacity(n);
    let mut closes = Vec::with_capacity(n);
    let mut volumes = Vec::with_capacity(n);

    for i in 0..n {
        let x = i as f64;
        let mut high = 110.0 - 0.10 * x;
        let mut low = 90.0 + 0.05 * x;
        if i % 10 == 5 {
            high += 2.0; // touch the resistance line
        }
        if i % 10 == 0 && i > 0 {
            low -= 2.0; // touch the support line
        }

        let upper = 112.0 - 0.10 * x;
        let lower = 88.0 + 0.05 * x;
        highs.push(high * scale);
        lows.push(low * scale);
        closes.push((upper + lower) / 2.0 * scale);
        volumes.push(1_000_000.0 + 40_000.0 * (x * 0.45).sin());
    }

    (highs, lows, closes, volumes)
}

fn upper_line_at(x: usize, scale: f64) -> f64 {
    (112.0 - 0.10 * x as f64) * scale
}

fn lower_line_at(x: usize, scale: f64) -> f64 {
    (88.0 + 0.05 * x as f64) * scale
}

/// Build the full bar history for a shape. `len` is the total series length;
/// triangle shapes spend their last 80 bars inside the formation.
pub fn generate_bars(shape: DemoShape, len: usize) -> Vec<DailyBar> {
    match shape {
        DemoShape::SteadyUptrend => {
            let (h, l, c, v) = uptrend_paths(len);
            bars_from_paths(&h, &l, &c, &v)
        }

        DemoShape::Downtrend => {
            let mut highs = Vec::with_capacity(len);
            let mut lows = Vec::with_capacity(len);
            let mut closes = Vec::with_capacity(len);
            let mut volumes = Vec::with_capacity(len);
            let span = (len.max(2) - 1) as f64;
            for i in 0..len {
                let x = i as f64;
                let close = 150.0 - 70.0 * x / span + 1.0 * (x * 0.3).sin();
                closes.push(close);
                highs.push(close + 0.9);
                lows.push(close - 0.9);
                volumes.push(900_000.0 + 30_000.0 * (x * 0.4).sin());
            }
            bars_from_paths(&highs, &lows, &closes, &volumes)
        }

        DemoShape::TriangleBreakout | DemoShape::TriangleForming | DemoShape::BrokenDown => {
            let prefix_len = len.saturating_sub(TRIANGLE_LEN);
            let (mut h, mut l, mut c, mut v) = uptrend_paths(prefix_len);

            let (th, tl, tc, tv) = triangle_paths(1.0);
            h.extend(th);
            l.extend(tl);
            c.extend(tc);
            v.extend(tv);

            let last = c.len() - 1;
            match shape {
                DemoShape::TriangleBreakout => {
                    // Close pushed just above resistance, on heavy volume.
                    c[last] = upper_line_at(TRIANGLE_LEN - 1, 1.0) + 0.5;
                    h[last] = c[last] + 0.4;
                    v[last] = 2_200_000.0;
                }
                DemoShape::BrokenDown => {
                    // Two confirmed closes under support.
                    for back in 0..2 {
                        let idx = last - back;
                        let x = TRIANGLE_LEN - 1 - back;
                        c[idx] = lower_line_at(x, 1.0) - 1.0;
                        l[idx] = c[idx] - 0.4;
                    }
                }
                _ => {}
            }

            bars_from_paths(&h, &l, &c, &v)
        }
    }
}

/// Convenience: a full [`PriceSeries`] for one demo shape.
pub fn demo_series(symbol: &str, shape: DemoShape, len: usize) -> PriceSeries {
    let bars = generate_bars(shape, len);
    PriceSeries::from_bars(symbol, &bars).expect("demo bars are ascending by construction")
}

/// A plain rising series, handy for filter tests.
pub fn uptrend_series(symbol: &str, len: usize) -> PriceSeries {
    demo_series(symbol, DemoShape::SteadyUptrend, len)
}

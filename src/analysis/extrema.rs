//! Local peak/trough extraction for one detection window.
//!
//! A bar is a peak iff its high is strictly the maximum within the symmetric
//! neighborhood of radius `order`; troughs are the mirror image on lows.
//! Raw extrema then pass two filters: same-kind minimum spacing (keeping the
//! most extreme values first) and, for peaks only, a weakest-percentile drop.

use crate::config::ExtremaConfig;
use crate::models::{ExtremaKind, ExtremaPoint};

/// Surviving extrema for one window. Both sides hold at least
/// `min_points` entries, ascending by index.
#[derive(Debug, Clone)]
pub(crate) struct WindowExtrema {
    pub peaks: Vec<ExtremaPoint>,
    pub troughs: Vec<ExtremaPoint>,
}

/// Extract and filter extrema for a window. Returns None when either side
/// ends up with fewer than `min_points` survivors, in which case the window is skipped.
pub(crate) fn extract(
    highs: &[f64],
    lows: &[f64],
    order: usize,
    cfg: &ExtremaConfig,
) -> Option<WindowExtrema> {
    let min_gap = cfg.spacing_factor * order;

    let peaks = local_extrema(highs, order, ExtremaKind::Peak);
    let peaks = enforce_spacing(peaks, min_gap);
    let peaks = drop_weak_peaks(peaks, cfg.peak_drop_pct, cfg.min_points);

    let troughs = local_extrema(lows, order, ExtremaKind::Trough);
    let troughs = enforce_spacing(troughs, min_gap);

    if peaks.len() < cfg.min_points || troughs.len() < cfg.min_points {
        return None;
    }

    Some(WindowExtrema { peaks, troughs })
}

/// Interior scan: index i qualifies when values[i] strictly beats every
/// neighbor within `order` bars on both sides. Boundary bars (without a full
/// neighborhood) never qualify.
fn local_extrema(values: &[f64], order: usize, kind: ExtremaKind) -> Vec<ExtremaPoint> {
    let n = values.len();
    if n < 2 * order + 1 {
        return Vec::new();
    }

    let mut out = Vec::new();
    for i in order..(n - order) {
        let mut is_extreme = true;
        for j in 1..=order {
            let beats = match kind {
                ExtremaKind::Peak => values[i] > values[i - j] && values[i] > values[i + j],
                ExtremaKind::Trough => values[i] < values[i - j] && values[i] < values[i + j],
            };
            if !beats {
                is_extreme = false;
                break;
            }
        }
        if is_extreme {
            out.push(ExtremaPoint {
                index: i,
                value: values[i],
                kind,
            });
        }
    }

    out
}

/// Greedy spacing filter: visit candidates from most to least extreme, keep a
/// point only when every already-kept point is at least `min_gap` bars away.
/// Result is re-sorted ascending by index.
fn enforce_spacing(mut points: Vec<ExtremaPoint>, min_gap: usize) -> Vec<ExtremaPoint> {
    if points.len() < 2 || min_gap == 0 {
        return points;
    }

    // Most extreme first: highest peaks, lowest troughs.
    points.sort_by(|a, b| match a.kind {
        ExtremaKind::Peak => b.value.total_cmp(&a.value),
        ExtremaKind::Trough => a.value.total_cmp(&b.value),
    });

    let mut kept: Vec<ExtremaPoint> = Vec::with_capacity(points.len());
    for point in points {
        let clear = kept
            .iter()
            .all(|k| point.index.abs_diff(k.index) >= min_gap);
        if clear {
            kept.push(point);
        }
    }

    kept.sort_by_key(|p| p.index);
    kept
}

/// Drop the weakest `drop_pct` of peaks by value, but never below
/// `min_points` survivors. Input and output are ascending by index.
fn drop_weak_peaks(
    peaks: Vec<ExtremaPoint>,
    drop_pct: f64,
    min_points: usize,
) -> Vec<ExtremaPoint> {
    let n = peaks.len();
    if n <= min_points {
        return peaks;
    }

    let drop_count = ((n as f64) * drop_pct).floor() as usize;
    let drop_count = drop_count.min(n - min_points);
    if drop_count == 0 {
        return peaks;
    }

    // Rank by value ascending to find the weakest entries (by position in the
    // ascending-index vector, so equal values resolve deterministically).
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| peaks[a].value.total_cmp(&peaks[b].value).then(a.cmp(&b)));
    let dropped: Vec<usize> = order[..drop_count].to_vec();

    peaks
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !dropped.contains(i))
        .map(|(_, p)| p)
        .collect()
}

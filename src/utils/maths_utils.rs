use argminmax::ArgMinMax;

#[inline]
pub(crate) fn get_max(vec: &[f64]) -> f64 {
    let max_index: usize = vec.argmax();
    vec[max_index]
}

#[inline]
pub(crate) fn get_min(vec: &[f64]) -> f64 {
    let min_index: usize = vec.argmin();
    vec[min_index]
}

/// Simple moving average of the trailing `period` values.
/// Returns None when there is not enough data.
#[inline]
pub(crate) fn rolling_mean_tail(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let sum: f64 = values[values.len() - period..].iter().sum();
    Some(sum / period as f64)
}

/// The last `count` values of an SMA(`period`) series.
/// Output index 0 is the oldest of the `count` values.
pub(crate) fn sma_tail(values: &[f64], period: usize, count: usize) -> Option<Vec<f64>> {
    if period == 0 || count == 0 || values.len() < period + count - 1 {
        return None;
    }

    // Rolling sum over the tail only; no need to scan the full history.
    let needed = period + count - 1;
    let tail = &values[values.len() - needed..];

    let mut out = Vec::with_capacity(count);
    let mut rolling_sum: f64 = tail[..period].iter().sum();
    out.push(rolling_sum / period as f64);

    for i in period..tail.len() {
        rolling_sum += tail[i] - tail[i - period];
        out.push(rolling_sum / period as f64);
    }

    Some(out)
}

/// Rounds to 2 decimal places. Scores persisted downstream must be stable
/// fixed-precision numbers, not raw f64 noise.
#[inline]
pub(crate) fn round2(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}

#[inline]
pub(crate) fn clamp01(val: f64) -> f64 {
    val.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_mean_tail_uses_trailing_window() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(rolling_mean_tail(&values, 2), Some(4.5));
        assert_eq!(rolling_mean_tail(&values, 5), Some(3.0));
        assert_eq!(rolling_mean_tail(&values, 6), None);
    }

    #[test]
    fn sma_tail_matches_naive_computation() {
        let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        let tail = sma_tail(&values, 3, 4).unwrap();
        // SMA(3) over [5,6,7], [6,7,8], [7,8,9], [8,9,10]
        assert_eq!(tail, vec![6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn sma_tail_rejects_short_input() {
        let values = vec![1.0, 2.0, 3.0];
        assert!(sma_tail(&values, 3, 2).is_none());
    }

    #[test]
    fn round2_is_stable() {
        assert_eq!(round2(88.50499), 88.5);
        assert_eq!(round2(100.0), 100.0);
        assert_eq!(round2(0.005), 0.01);
    }

    #[test]
    fn min_max_helpers() {
        let values = vec![3.0, 9.0, 1.0, 4.0];
        assert_eq!(get_max(&values), 9.0);
        assert_eq!(get_min(&values), 1.0);
    }
}

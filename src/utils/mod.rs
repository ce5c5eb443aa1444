mod maths_utils;

pub(crate) use maths_utils::{clamp01, get_max, get_min, rolling_mean_tail, round2, sma_tail};

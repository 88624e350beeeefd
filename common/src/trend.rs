//! Synthetic sparkline trends.
//!
//! Trends are decorative: a multiplicative random walk whose every step is a
//! pure function of `(seed, index)`, so the same row renders the same shape
//! on every refresh.

use crate::models::RangeKey;

/// Generate the trend series for `range`, starting from 1.0.
pub fn generate(range: RangeKey, seed: u64) -> Vec<f64> {
    let spread = range.spread();
    let mut value = 1.0;

    (0..range.trend_len())
        .map(|i| {
            value *= 1.0 + noise(seed, i as u64) * spread;
            value
        })
        .collect()
}

/// Deterministic value in [-1, 1] for `(seed, index)`
pub fn noise(seed: u64, index: u64) -> f64 {
    let mut x = seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(index.wrapping_mul(0xD1B5_4A32_D192_ED03));
    // splitmix64 finalizer
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^= x >> 31;

    let unit = (x >> 11) as f64 / (1u64 << 53) as f64;
    unit * 2.0 - 1.0
}

/// Percentage move from the first to the last point, rounded to 2 decimals
pub fn change_pct(trend: &[f64]) -> f64 {
    match (trend.first(), trend.last()) {
        (Some(first), Some(last)) if *first > 0.0 => round2((last / first - 1.0) * 100.0),
        _ => 0.0,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

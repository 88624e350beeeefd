//! Fixed data shown when the live sources are unreachable.

use crate::models::{CurrencyNames, RateSnapshot, RateSource};
use std::collections::BTreeMap;

/// Notice attached to views built from sample rates
pub const SAMPLE_NOTICE: &str = "Live rates are unavailable; showing sample rates.";

/// Approximate USD-based rates (1 USD = n units)
const USD_SAMPLE_RATES: &[(&str, f64)] = &[
    ("AED", 3.6725),
    ("AUD", 1.52),
    ("BRL", 5.05),
    ("CAD", 1.36),
    ("CHF", 0.88),
    ("CNY", 7.24),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("HKD", 7.82),
    ("INR", 83.1),
    ("JPY", 151.4),
    ("KRW", 1345.0),
    ("MXN", 16.9),
    ("NZD", 1.66),
    ("SEK", 10.6),
    ("SGD", 1.35),
    ("USD", 1.0),
    ("ZAR", 18.7),
];

const FALLBACK_NAMES: &[(&str, &str)] = &[
    ("AED", "UAE Dirham"),
    ("AUD", "Australian Dollar"),
    ("BRL", "Brazilian Real"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("HKD", "Hong Kong Dollar"),
    ("INR", "Indian Rupee"),
    ("JPY", "Japanese Yen"),
    ("KRW", "South Korean Won"),
    ("MXN", "Mexican Peso"),
    ("NZD", "New Zealand Dollar"),
    ("SEK", "Swedish Krona"),
    ("SGD", "Singapore Dollar"),
    ("USD", "US Dollar"),
    ("ZAR", "South African Rand"),
];

/// Sample snapshot for `base`, derived from the USD table by cross rates.
///
/// An unknown base yields an empty snapshot.
pub fn sample_snapshot(base: &str) -> RateSnapshot {
    let usd: BTreeMap<&str, f64> = USD_SAMPLE_RATES.iter().copied().collect();

    let rates = match usd.get(base) {
        Some(base_per_usd) => usd
            .iter()
            .filter(|(code, _)| **code != base)
            .map(|(code, per_usd)| (code.to_string(), per_usd / base_per_usd))
            .collect(),
        None => BTreeMap::new(),
    };

    RateSnapshot::new(base, rates, RateSource::Sample)
}

/// Currency names used when the directory cannot be reached
pub fn fallback_currency_names() -> CurrencyNames {
    FALLBACK_NAMES
        .iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect()
}

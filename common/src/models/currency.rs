use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Currency code → human-readable name (e.g. "INR" → "Indian Rupee")
pub type CurrencyNames = BTreeMap<String, String>;

/// Normalize a user- or API-supplied currency code.
///
/// Returns `None` unless the trimmed input is exactly three ASCII letters.
pub fn normalize_code(raw: &str) -> Option<String> {
    let code = raw.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}

/// Which side of the selected pair is quoted against the other
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum DisplayMode {
    /// base = from, focus = to
    #[default]
    #[serde(rename = "direct")]
    Direct,
    /// base = to, focus = from
    #[serde(rename = "inverse")]
    Inverse,
}

impl DisplayMode {
    pub fn from_inverse(inverse: bool) -> Self {
        if inverse {
            DisplayMode::Inverse
        } else {
            DisplayMode::Direct
        }
    }

    pub fn is_inverse(self) -> bool {
        self == DisplayMode::Inverse
    }

    pub fn toggled(self) -> Self {
        Self::from_inverse(!self.is_inverse())
    }

    /// Split a (from, to) pair into (base, focus)
    pub fn resolve<'a>(self, from: &'a str, to: &'a str) -> (&'a str, &'a str) {
        match self {
            DisplayMode::Direct => (from, to),
            DisplayMode::Inverse => (to, from),
        }
    }

    /// Added to each row's ordinal before seeding its trend, so flipping
    /// direction reshapes the sparklines.
    pub fn seed_offset(self) -> u64 {
        match self {
            DisplayMode::Direct => 1,
            DisplayMode::Inverse => 101,
        }
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayMode::Direct => write!(f, "direct"),
            DisplayMode::Inverse => write!(f, "inverse"),
        }
    }
}

/// Trend window shown next to each rate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum RangeKey {
    #[default]
    #[serde(rename = "24H")]
    Day,
    #[serde(rename = "7D")]
    Week,
    #[serde(rename = "30D")]
    Month,
    #[serde(rename = "3M")]
    Quarter,
}

impl RangeKey {
    pub const ALL: [RangeKey; 4] = [
        RangeKey::Day,
        RangeKey::Week,
        RangeKey::Month,
        RangeKey::Quarter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RangeKey::Day => "24H",
            RangeKey::Week => "7D",
            RangeKey::Month => "30D",
            RangeKey::Quarter => "3M",
        }
    }

    /// Number of points in a synthetic trend for this range
    pub fn trend_len(self) -> usize {
        match self {
            RangeKey::Day => 18,
            RangeKey::Week => 22,
            RangeKey::Month => 26,
            RangeKey::Quarter => 30,
        }
    }

    /// Largest fractional move a single trend step may make
    pub fn spread(self) -> f64 {
        match self {
            RangeKey::Day => 0.004,
            RangeKey::Week => 0.008,
            RangeKey::Month => 0.012,
            RangeKey::Quarter => 0.018,
        }
    }
}

impl std::fmt::Display for RangeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "24H" => Ok(RangeKey::Day),
            "7D" => Ok(RangeKey::Week),
            "30D" => Ok(RangeKey::Month),
            "3M" => Ok(RangeKey::Quarter),
            unknown => Err(Error::ValidationError(format!(
                "Unknown range: {}. Supported ranges: 24H, 7D, 30D, 3M",
                unknown
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" usd "), Some("USD".to_string()));
        assert_eq!(normalize_code("EUR"), Some("EUR".to_string()));
        assert_eq!(normalize_code(""), None);
        assert_eq!(normalize_code("EURO"), None);
        assert_eq!(normalize_code("U$D"), None);
    }

    #[test]
    fn test_display_mode_resolves_pair() {
        assert_eq!(DisplayMode::Direct.resolve("USD", "INR"), ("USD", "INR"));
        assert_eq!(DisplayMode::Inverse.resolve("USD", "INR"), ("INR", "USD"));
        assert_ne!(
            DisplayMode::Direct.seed_offset(),
            DisplayMode::Inverse.seed_offset()
        );
        assert_eq!(DisplayMode::Direct.toggled(), DisplayMode::Inverse);
    }

    #[test]
    fn test_range_ordering() {
        for pair in RangeKey::ALL.windows(2) {
            assert!(pair[0].trend_len() < pair[1].trend_len());
            assert!(pair[0].spread() < pair[1].spread());
        }
    }

    #[test]
    fn test_range_parse() {
        assert_eq!("24h".parse::<RangeKey>().unwrap(), RangeKey::Day);
        assert_eq!("3M".parse::<RangeKey>().unwrap(), RangeKey::Quarter);
        assert!(matches!(
            "1Y".parse::<RangeKey>(),
            Err(Error::ValidationError(_))
        ));
    }
}

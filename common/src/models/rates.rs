use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a snapshot came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RateSource {
    #[serde(rename = "live")]
    Live,
    #[serde(rename = "sample")]
    Sample,
}

/// Spot rates for one base currency at one point in time.
///
/// `rates[quote]` is how many units of `quote` one unit of `base` buys.
/// Snapshots are replaced wholesale, never merged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateSnapshot {
    /// Base currency (e.g. "USD")
    pub base: String,
    /// Quote currency → rate, ordered by code
    pub rates: BTreeMap<String, f64>,
    /// When the rates were fetched or synthesized
    pub fetched_at: DateTime<Utc>,
    pub source: RateSource,
}

impl RateSnapshot {
    pub fn new(base: impl Into<String>, rates: BTreeMap<String, f64>, source: RateSource) -> Self {
        Self {
            base: base.into(),
            rates,
            fetched_at: Utc::now(),
            source,
        }
    }

    /// Rate for `code`, only if it is usable (finite and positive)
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates
            .get(code)
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// One display row of the rate table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowViewModel {
    pub code: String,
    pub name: String,
    pub rate: f64,
    /// Percentage move across the trend, rounded to 2 decimals
    pub change_pct: f64,
    pub trend: Vec<f64>,
    pub focus: bool,
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoints and limits for the outbound HTTP connectors
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectorConfig {
    /// Latest-rates endpoint; the base code is appended as a path segment
    pub rates_url: String,
    /// Currency code → name listing
    pub currencies_url: String,
    pub timeout_secs: u64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            rates_url: "https://open.er-api.com/v6/latest".to_string(),
            currencies_url: "https://openexchangerates.org/api/currencies.json".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ConnectorConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let rates_url = std::env::var("FX_RATES_URL").unwrap_or(defaults.rates_url);
        let currencies_url =
            std::env::var("FX_CURRENCIES_URL").unwrap_or(defaults.currencies_url);
        let timeout_secs = std::env::var("FX_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            rates_url,
            currencies_url,
            timeout_secs,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub(crate) fn http_client(&self) -> common::Result<reqwest::Client> {
        Ok(reqwest::Client::builder().timeout(self.timeout()).build()?)
    }
}

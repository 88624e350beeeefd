use crate::{ConnectorConfig, CurrencyDirectory};
use async_trait::async_trait;
use common::{
    models::{normalize_code, CurrencyNames},
    Error, Result,
};
use std::collections::BTreeMap;
use tracing::{debug, error};

/// Reads a flat `{"USD": "United States Dollar", ...}` currency listing
pub struct OpenExchangeRatesDirectory {
    client: reqwest::Client,
    currencies_url: String,
}

impl OpenExchangeRatesDirectory {
    pub fn new(config: &ConnectorConfig) -> Result<Self> {
        Ok(Self {
            client: config.http_client()?,
            currencies_url: config.currencies_url.clone(),
        })
    }
}

// Keys that are not three-letter codes (crypto tickers, test entries) are skipped
fn parse_listing(raw: BTreeMap<String, String>) -> CurrencyNames {
    raw.into_iter()
        .filter_map(|(code, name)| {
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            normalize_code(&code).map(|code| (code, name.to_string()))
        })
        .collect()
}

#[async_trait]
impl CurrencyDirectory for OpenExchangeRatesDirectory {
    async fn list_currencies(&self) -> Result<CurrencyNames> {
        debug!("Fetching currency listing: {}", self.currencies_url);

        let response = self
            .client
            .get(&self.currencies_url)
            .send()
            .await
            .map_err(Error::HttpError)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Currency listing error: {} - {}", status, error_text);
            return Err(Error::NetworkError(format!(
                "Currency listing error: {} - {}",
                status, error_text
            )));
        }

        let raw: BTreeMap<String, String> = response.json().await.map_err(|e| {
            Error::InvalidResponse(format!("Failed to parse currency listing: {}", e))
        })?;

        Ok(parse_listing(raw))
    }
}

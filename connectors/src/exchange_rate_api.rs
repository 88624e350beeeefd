use crate::{ConnectorConfig, RateFetcher};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use common::{
    models::{normalize_code, RateSnapshot, RateSource},
    Error, Result,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, error};

/// Fetches latest rates from an ExchangeRate-API compatible endpoint
pub struct ExchangeRateApiConnector {
    client: reqwest::Client,
    rates_url: String,
}

impl ExchangeRateApiConnector {
    pub fn new(config: &ConnectorConfig) -> Result<Self> {
        Ok(Self {
            client: config.http_client()?,
            rates_url: config.rates_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: Option<String>,
    base_code: Option<String>,
    time_last_update_unix: Option<i64>,
    rates: Option<BTreeMap<String, f64>>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

/// Turn a decoded response into a snapshot for `base`.
///
/// Drops the base itself and any rate that is not finite and positive.
fn parse_latest(base: &str, response: LatestRatesResponse) -> Result<RateSnapshot> {
    if response.result.as_deref() != Some("success") {
        return Err(Error::InvalidResponse(format!(
            "Rate API reported failure: {}",
            response.error_type.as_deref().unwrap_or("unknown error")
        )));
    }

    if let Some(code) = response.base_code.as_deref() {
        if !code.eq_ignore_ascii_case(base) {
            return Err(Error::InvalidResponse(format!(
                "Rate API answered for {} instead of {}",
                code, base
            )));
        }
    }

    let raw = response
        .rates
        .ok_or_else(|| Error::InvalidResponse("Rate API response has no rates".to_string()))?;

    let rates = raw
        .into_iter()
        .filter_map(|(code, rate)| normalize_code(&code).map(|code| (code, rate)))
        .filter(|(code, rate)| code != base && rate.is_finite() && *rate > 0.0)
        .collect();

    let mut snapshot = RateSnapshot::new(base, rates, RateSource::Live);
    if let Some(fetched_at) = response
        .time_last_update_unix
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    {
        snapshot.fetched_at = fetched_at;
    }
    Ok(snapshot)
}

#[async_trait]
impl RateFetcher for ExchangeRateApiConnector {
    async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot> {
        let url = format!("{}/{}", self.rates_url, base);

        debug!("Fetching latest rates for {}: {}", base, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Error::HttpError)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Rate API error: {} - {}", status, error_text);
            return Err(Error::NetworkError(format!(
                "Rate API error: {} - {}",
                status, error_text
            )));
        }

        let body: LatestRatesResponse = response.json().await.map_err(|e| {
            Error::InvalidResponse(format!("Failed to parse rate response: {}", e))
        })?;

        let snapshot = parse_latest(base, body)?;
        debug!("Fetched {} rates for {}", snapshot.rates.len(), base);
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> LatestRatesResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_success() {
        let response = decode(
            r#"{
                "result": "success",
                "base_code": "USD",
                "time_last_update_unix": 1700000000,
                "rates": {"USD": 1, "INR": 83.1, "EUR": 0.92, "BAD": 0}
            }"#,
        );
        let snapshot = parse_latest("USD", response).unwrap();

        assert_eq!(snapshot.base, "USD");
        assert_eq!(snapshot.source, RateSource::Live);
        assert_eq!(snapshot.rate("INR"), Some(83.1));
        assert!(!snapshot.rates.contains_key("USD"));
        assert!(!snapshot.rates.contains_key("BAD"));
        assert_eq!(snapshot.fetched_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_reported_error() {
        let response = decode(r#"{"result": "error", "error-type": "unsupported-code"}"#);
        let err = parse_latest("XYZ", response).unwrap_err();

        assert!(matches!(err, Error::InvalidResponse(ref msg) if msg.contains("unsupported-code")));
    }

    #[test]
    fn test_parse_missing_rates() {
        let response = decode(r#"{"result": "success", "base_code": "USD"}"#);
        assert!(matches!(
            parse_latest("USD", response),
            Err(Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_wrong_base() {
        let response = decode(r#"{"result": "success", "base_code": "EUR", "rates": {}}"#);
        assert!(parse_latest("USD", response).is_err());
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = ConnectorConfig {
            rates_url: "http://localhost:9/latest/".to_string(),
            ..ConnectorConfig::default()
        };
        let connector = ExchangeRateApiConnector::new(&config).unwrap();
        assert_eq!(connector.rates_url, "http://localhost:9/latest");
    }
}

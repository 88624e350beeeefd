mod config;
pub mod currency_directory;
pub mod exchange_rate_api;

pub use config::ConnectorConfig;

use async_trait::async_trait;
use common::{
    models::{CurrencyNames, RateSnapshot},
    Result,
};

/// Source of live spot rates
#[async_trait]
pub trait RateFetcher: Send + Sync {
    /// Latest rates quoted against `base`
    async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot>;
}

/// Source of currency display names
#[async_trait]
pub trait CurrencyDirectory: Send + Sync {
    /// All known currencies, code → name
    async fn list_currencies(&self) -> Result<CurrencyNames>;
}

use crate::{LocalStore, StoreError};
use common::models::AlertRecord;
use serde_json::Value;
use tracing::{debug, warn};

/// Key the alert list lives under
pub const ALERTS_KEY: &str = "fx_alerts";

/// Persists rate alerts as a JSON list in a [`LocalStore`]
#[derive(Debug, Clone)]
pub struct AlertStore {
    store: LocalStore,
}

impl AlertStore {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Load every stored alert. Anything that is not a decodable list
    /// degrades to an empty list.
    pub fn load(&self) -> Vec<AlertRecord> {
        match self.store.get(ALERTS_KEY) {
            None => Vec::new(),
            Some(value @ Value::Array(_)) => match serde_json::from_value(value) {
                Ok(alerts) => alerts,
                Err(e) => {
                    warn!("Stored alerts could not be decoded, ignoring them: {}", e);
                    Vec::new()
                }
            },
            Some(_) => {
                warn!("Stored alerts are not a list, ignoring them");
                Vec::new()
            }
        }
    }

    pub fn save(&self, alerts: &[AlertRecord]) -> Result<(), StoreError> {
        debug!("Saving {} alerts", alerts.len());
        self.store.set(ALERTS_KEY, serde_json::to_value(alerts)?)
    }

    /// Append an alert, returning the full list
    pub fn add(&self, alert: AlertRecord) -> Result<Vec<AlertRecord>, StoreError> {
        let mut alerts = self.load();
        alerts.push(alert);
        self.save(&alerts)?;
        Ok(alerts)
    }

    /// Remove the alert with `id`; returns whether one was removed
    pub fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut alerts = self.load();
        let before = alerts.len();
        alerts.retain(|alert| alert.id != id);
        if alerts.len() == before {
            return Ok(false);
        }
        self.save(&alerts)?;
        Ok(true)
    }
}

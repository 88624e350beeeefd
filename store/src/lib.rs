mod alert_store;
mod config;
mod error;
mod local_store;

pub use alert_store::{AlertStore, ALERTS_KEY};
pub use config::StoreConfig;
pub use error::StoreError;
pub use local_store::LocalStore;

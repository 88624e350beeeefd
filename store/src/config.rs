use std::path::PathBuf;

const DEFAULT_STORE_PATH: &str = "fxboard-store.json";

/// Configuration for the local key-value store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// JSON file holding every stored key
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

impl StoreConfig {
    /// Create a new store configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        match std::env::var("FX_STORE_PATH") {
            Ok(path) if path.trim().is_empty() => {
                Err("FX_STORE_PATH environment variable is empty".to_string())
            }
            Ok(path) => Ok(Self {
                path: PathBuf::from(path),
            }),
            Err(_) => Ok(Self::default()),
        }
    }
}

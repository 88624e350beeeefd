use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for common::Error {
    fn from(err: StoreError) -> Self {
        common::Error::StorageError(err.to_string())
    }
}

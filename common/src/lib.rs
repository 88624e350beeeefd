pub mod convert;
pub mod error;
pub mod models;
pub mod projector;
pub mod samples;
pub mod state;
pub mod trend;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

mod alert;
mod currency;
mod rates;

pub use alert::{AlertRecord, NewAlert, DEFAULT_SCHEDULE};
pub use currency::{normalize_code, CurrencyNames, DisplayMode, RangeKey};
pub use rates::{RateSnapshot, RateSource, RowViewModel};

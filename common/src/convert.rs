use crate::models::RateSnapshot;
use crate::trend::round2;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Result of converting an amount between two currencies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub amount: f64,
    /// Units of `to` per unit of `from`
    pub rate: f64,
    pub inverse_rate: f64,
    /// `amount * rate`, rounded to 2 decimals
    pub converted: f64,
}

/// Convert `amount` of `from` into `to` using any snapshot that quotes both.
///
/// The snapshot may be based on `from`, on `to`, or on a third currency, in
/// which case the rate is crossed through its base.
pub fn convert(amount: f64, from: &str, to: &str, snapshot: &RateSnapshot) -> Result<Conversion> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::ValidationError(
            "Amount must be a non-negative number".to_string(),
        ));
    }

    let rate = if from == to {
        1.0
    } else {
        let per_base = |code: &str| -> Result<f64> {
            if code == snapshot.base {
                return Ok(1.0);
            }
            snapshot.rate(code).ok_or_else(|| {
                Error::NotFound(format!("No rate for {} against {}", code, snapshot.base))
            })
        };
        per_base(to)? / per_base(from)?
    };

    Ok(Conversion {
        from: from.to_string(),
        to: to.to_string(),
        amount,
        rate,
        inverse_rate: 1.0 / rate,
        converted: round2(amount * rate),
    })
}

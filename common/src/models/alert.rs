use crate::models::normalize_code;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schedule applied when an alert is created without one
pub const DEFAULT_SCHEDULE: &str = "09:00";

/// A persisted rate alert
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub id: String,
    pub from: String,
    pub to: String,
    /// Rate that should trigger the alert
    pub threshold: f64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    /// Check times as "HH:MM", sorted
    pub schedule: Vec<String>,
}

/// Alert as submitted by a user, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAlert {
    pub from: String,
    pub to: String,
    pub threshold: f64,
    pub email: String,
    #[serde(default)]
    pub schedule: Vec<String>,
}

impl NewAlert {
    /// Validate the submission and turn it into a record with a fresh id
    pub fn validate(self) -> Result<AlertRecord> {
        let from = normalize_code(&self.from).ok_or_else(|| {
            Error::ValidationError(format!("Invalid currency code: {}", self.from))
        })?;
        let to = normalize_code(&self.to)
            .ok_or_else(|| Error::ValidationError(format!("Invalid currency code: {}", self.to)))?;
        if from == to {
            return Err(Error::ValidationError(
                "Alert currencies must differ".to_string(),
            ));
        }

        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(Error::ValidationError(
                "Threshold must be a positive number".to_string(),
            ));
        }

        let email = self.email.trim().to_string();
        if !is_valid_email(&email) {
            return Err(Error::ValidationError(format!(
                "Invalid email address: {}",
                self.email
            )));
        }

        let mut schedule = Vec::with_capacity(self.schedule.len());
        for slot in &self.schedule {
            let slot = parse_time_slot(slot).ok_or_else(|| {
                Error::ValidationError(format!("Invalid schedule time (expected HH:MM): {}", slot))
            })?;
            schedule.push(slot);
        }
        schedule.sort();
        schedule.dedup();
        if schedule.is_empty() {
            schedule.push(DEFAULT_SCHEDULE.to_string());
        }

        Ok(AlertRecord {
            id: uuid::Uuid::new_v4().to_string(),
            from,
            to,
            threshold: self.threshold,
            email,
            created_at: Utc::now(),
            schedule,
        })
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.contains(char::is_whitespace)
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

// Zero-pads single-digit hours so "9:30" sorts as "09:30"
fn parse_time_slot(slot: &str) -> Option<String> {
    let (hours, minutes) = slot.trim().split_once(':')?;
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(format!("{:02}:{:02}", hours, minutes))
}

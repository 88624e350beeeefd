//! Dashboard state and its transitions.
//!
//! All changes go through [`reduce`]. Rate fetches are tagged with a request
//! id; only the result of the most recent request is ever applied, so
//! responses that arrive out of order cannot overwrite newer state.

use crate::convert::{convert, Conversion};
use crate::models::{CurrencyNames, DisplayMode, RangeKey, RateSnapshot, RowViewModel};
use crate::projector::{project, TableRequest};
use crate::samples::{sample_snapshot, SAMPLE_NOTICE};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardState {
    pub from: String,
    pub to: String,
    pub range: RangeKey,
    pub inverse: bool,
    pub amount: f64,
    pub snapshot: Option<RateSnapshot>,
    /// Id of the newest rate request issued; 0 before any request
    pub latest_request: u64,
    pub loading: bool,
    pub notice: Option<String>,
    /// Why the last fetch fell back to sample rates
    pub last_error: Option<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            from: "USD".to_string(),
            to: "INR".to_string(),
            range: RangeKey::default(),
            inverse: false,
            amount: 1.0,
            snapshot: None,
            latest_request: 0,
            loading: false,
            notice: None,
            last_error: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DashboardAction {
    SetFrom(String),
    SetTo(String),
    Swap,
    SetRange(RangeKey),
    SetInverse(bool),
    SetAmount(f64),
    RatesRequested { request: u64 },
    RatesLoaded { request: u64, snapshot: RateSnapshot },
    RatesFailed { request: u64, base: String, message: String },
}

impl DashboardState {
    pub fn mode(&self) -> DisplayMode {
        DisplayMode::from_inverse(self.inverse)
    }

    /// Currency the table is quoted against
    pub fn base(&self) -> &str {
        self.mode().resolve(&self.from, &self.to).0
    }

    /// Currency pinned to the top of the table
    pub fn focus(&self) -> &str {
        self.mode().resolve(&self.from, &self.to).1
    }

    /// Snapshot for the current base, if one has been applied
    pub fn current_snapshot(&self) -> Option<&RateSnapshot> {
        self.snapshot
            .as_ref()
            .filter(|snapshot| snapshot.base == self.base())
    }

    pub fn needs_fetch(&self) -> bool {
        self.current_snapshot().is_none()
    }

    pub fn rows(&self, names: &CurrencyNames) -> Vec<RowViewModel> {
        match self.current_snapshot() {
            Some(snapshot) => {
                let request =
                    TableRequest::for_pair(&self.from, &self.to, self.range, self.mode());
                project(&request, snapshot, names)
            }
            None => Vec::new(),
        }
    }

    /// Conversion of `amount` from `from` to `to`, if the snapshot quotes both
    pub fn conversion(&self) -> Option<Conversion> {
        let snapshot = self.current_snapshot()?;
        convert(self.amount, &self.from, &self.to, snapshot).ok()
    }
}

/// Apply one action, returning the next state
pub fn reduce(mut state: DashboardState, action: DashboardAction) -> DashboardState {
    match action {
        DashboardAction::SetFrom(code) => state.from = code,
        DashboardAction::SetTo(code) => state.to = code,
        DashboardAction::Swap => std::mem::swap(&mut state.from, &mut state.to),
        DashboardAction::SetRange(range) => state.range = range,
        DashboardAction::SetInverse(inverse) => state.inverse = inverse,
        DashboardAction::SetAmount(amount) => {
            if amount.is_finite() && amount >= 0.0 {
                state.amount = amount;
            }
        }
        DashboardAction::RatesRequested { request } => {
            if request > state.latest_request {
                state.latest_request = request;
                state.loading = true;
            }
        }
        // A response for a base the user has since left is ignorable even
        // when no newer request was issued.
        DashboardAction::RatesLoaded { request, snapshot } => {
            if request == state.latest_request {
                state.loading = false;
                if snapshot.base == state.base() {
                    state.snapshot = Some(snapshot);
                    state.notice = None;
                    state.last_error = None;
                }
            }
        }
        DashboardAction::RatesFailed {
            request,
            base,
            message,
        } => {
            if request == state.latest_request {
                state.loading = false;
                if base == state.base() {
                    state.snapshot = Some(sample_snapshot(&base));
                    state.notice = Some(SAMPLE_NOTICE.to_string());
                    state.last_error = Some(message);
                }
            }
        }
    }
    state
}

/// Hands out strictly increasing request ids
#[derive(Debug, Default)]
pub struct RequestTracker {
    last: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        self.last.fetch_add(1, Ordering::SeqCst) + 1
    }
}

use common::{
    convert::{convert, Conversion},
    models::{
        normalize_code, AlertRecord, CurrencyNames, DisplayMode, NewAlert, RangeKey,
        RateSnapshot, RowViewModel,
    },
    projector::{project, TableRequest},
    samples::{fallback_currency_names, sample_snapshot, SAMPLE_NOTICE},
    state::{reduce, DashboardAction, DashboardState, RequestTracker},
    Error, Result,
};
use connectors::{CurrencyDirectory, RateFetcher};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use store::AlertStore;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Spot rates as served to clients
#[derive(Debug, Clone, Serialize)]
pub struct RatesView {
    pub snapshot: RateSnapshot,
    pub notice: Option<String>,
}

/// A projected rate table
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub base: String,
    pub focus: String,
    pub range: RangeKey,
    pub mode: DisplayMode,
    pub rows: Vec<RowViewModel>,
    pub notice: Option<String>,
}

/// Everything the dashboard page renders
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub from: String,
    pub to: String,
    pub base: String,
    pub focus: String,
    pub range: RangeKey,
    pub inverse: bool,
    pub amount: f64,
    pub loading: bool,
    pub notice: Option<String>,
    pub rows: Vec<RowViewModel>,
    pub conversion: Option<Conversion>,
}

/// A user interaction on the dashboard
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DashboardCommand {
    SetFrom { code: String },
    SetTo { code: String },
    Swap,
    SetRange { range: RangeKey },
    SetInverse { inverse: bool },
    SetAmount { amount: f64 },
    Refresh,
}

/// Service backing the currency dashboard
pub struct DashboardService {
    /// Live spot rate source
    rates: Arc<dyn RateFetcher>,
    /// Currency display names source
    directory: Arc<dyn CurrencyDirectory>,
    /// Persisted rate alerts; the lock serializes read-modify-write cycles
    alerts: Mutex<AlertStore>,
    state: RwLock<DashboardState>,
    requests: RequestTracker,
    /// Live currency listing, once one has been fetched
    names: RwLock<Option<CurrencyNames>>,
}

pub(crate) fn parse_code(raw: &str) -> Result<String> {
    normalize_code(raw)
        .ok_or_else(|| Error::ValidationError(format!("Invalid currency code: {}", raw)))
}

impl DashboardService {
    pub fn new(
        rates: Arc<dyn RateFetcher>,
        directory: Arc<dyn CurrencyDirectory>,
        alerts: AlertStore,
    ) -> Self {
        Self {
            rates,
            directory,
            alerts: Mutex::new(alerts),
            state: RwLock::new(DashboardState::default()),
            requests: RequestTracker::new(),
            names: RwLock::new(None),
        }
    }

    /// Currency names, falling back to the built-in list when the directory
    /// is unavailable. Only live listings are cached.
    pub async fn currency_names(&self) -> CurrencyNames {
        if let Some(names) = self.names.read().await.as_ref() {
            return names.clone();
        }

        match self.directory.list_currencies().await {
            Ok(names) if !names.is_empty() => {
                info!("Loaded {} currency names", names.len());
                *self.names.write().await = Some(names.clone());
                names
            }
            Ok(_) => {
                warn!("Currency directory returned no entries, using fallback list");
                fallback_currency_names()
            }
            Err(e) => {
                warn!("Failed to list currencies, using fallback list: {}", e);
                fallback_currency_names()
            }
        }
    }

    /// Spot rates for `base`; sample rates with a notice if the fetch fails
    pub async fn spot_rates(&self, base: &str) -> Result<RatesView> {
        match self.rates.fetch_rates(base).await {
            Ok(snapshot) => Ok(RatesView {
                snapshot,
                notice: None,
            }),
            Err(e) if e.is_fetch_failure() => {
                warn!("Failed to fetch rates for {}, using sample rates: {}", base, e);
                Ok(RatesView {
                    snapshot: sample_snapshot(base),
                    notice: Some(SAMPLE_NOTICE.to_string()),
                })
            }
            Err(e) => Err(e),
        }
    }

    pub async fn rate_table(
        &self,
        from: &str,
        to: &str,
        range: RangeKey,
        mode: DisplayMode,
    ) -> Result<TableView> {
        let request = TableRequest::for_pair(from, to, range, mode);
        debug!(
            "Projecting rate table for base {} focus {} ({}, {})",
            request.base, request.focus, range, mode
        );

        let rates = self.spot_rates(request.base).await?;
        let names = self.currency_names().await;
        let rows = project(&request, &rates.snapshot, &names);

        Ok(TableView {
            base: request.base.to_string(),
            focus: request.focus.to_string(),
            range,
            mode,
            rows,
            notice: rates.notice,
        })
    }

    pub async fn convert(&self, from: &str, to: &str, amount: f64) -> Result<Conversion> {
        let rates = self.spot_rates(from).await?;
        convert(amount, from, to, &rates.snapshot)
    }

    pub async fn dashboard(&self) -> DashboardView {
        let names = self.currency_names().await;
        let state = self.state.read().await;
        dashboard_view(&state, &names)
    }

    /// Apply a user command and fetch rates if the base changed
    pub async fn apply(&self, command: DashboardCommand) -> Result<DashboardView> {
        let (action, force_refresh) = match command {
            DashboardCommand::SetFrom { code } => {
                (Some(DashboardAction::SetFrom(parse_code(&code)?)), false)
            }
            DashboardCommand::SetTo { code } => {
                (Some(DashboardAction::SetTo(parse_code(&code)?)), false)
            }
            DashboardCommand::Swap => (Some(DashboardAction::Swap), false),
            DashboardCommand::SetRange { range } => (Some(DashboardAction::SetRange(range)), false),
            DashboardCommand::SetInverse { inverse } => {
                (Some(DashboardAction::SetInverse(inverse)), false)
            }
            DashboardCommand::SetAmount { amount } => {
                if !amount.is_finite() || amount < 0.0 {
                    return Err(Error::ValidationError(
                        "Amount must be a non-negative number".to_string(),
                    ));
                }
                (Some(DashboardAction::SetAmount(amount)), false)
            }
            DashboardCommand::Refresh => (None, true),
        };

        let needs_fetch = {
            let mut state = self.state.write().await;
            if let Some(action) = action {
                *state = reduce(state.clone(), action);
            }
            force_refresh || state.needs_fetch()
        };

        if needs_fetch {
            self.refresh_rates().await;
        }

        Ok(self.dashboard().await)
    }

    /// Fetch rates for the current base. The result is dropped if another
    /// refresh was started in the meantime.
    pub async fn refresh_rates(&self) {
        let request = self.requests.next();
        let base = {
            let mut state = self.state.write().await;
            *state = reduce(state.clone(), DashboardAction::RatesRequested { request });
            state.base().to_string()
        };

        debug!("Rate request {} for {}", request, base);
        let action = match self.rates.fetch_rates(&base).await {
            Ok(snapshot) => DashboardAction::RatesLoaded { request, snapshot },
            Err(e) => {
                warn!("Rate request {} for {} failed: {}", request, base, e);
                DashboardAction::RatesFailed {
                    request,
                    base: base.clone(),
                    message: e.to_string(),
                }
            }
        };

        let mut state = self.state.write().await;
        if request != state.latest_request || base != state.base() {
            debug!("Discarding stale rate response {} for {}", request, base);
        }
        *state = reduce(state.clone(), action);
    }

    // Runs blocking file I/O off the runtime workers. The guard is held until
    // the task finishes so read-modify-write cycles never interleave.
    async fn with_alerts<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&AlertStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let guard = self.alerts.lock().await;
        let store = guard.clone();
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| Error::InternalError(format!("Alert store task failed: {}", e)))
    }

    pub async fn list_alerts(&self) -> Result<Vec<AlertRecord>> {
        self.with_alerts(|store| store.load()).await
    }

    pub async fn create_alert(&self, alert: NewAlert) -> Result<AlertRecord> {
        let record = alert.validate()?;
        let stored = record.clone();
        self.with_alerts(move |store| store.add(stored)).await??;
        info!(
            "Created alert {} for {}/{} at {}",
            record.id, record.from, record.to, record.threshold
        );
        Ok(record)
    }

    pub async fn delete_alert(&self, id: &str) -> Result<()> {
        let target = id.to_string();
        if self.with_alerts(move |store| store.remove(&target)).await?? {
            info!("Deleted alert {}", id);
            Ok(())
        } else {
            Err(Error::NotFound(format!("Alert with ID '{}' not found", id)))
        }
    }
}

fn dashboard_view(state: &DashboardState, names: &CurrencyNames) -> DashboardView {
    DashboardView {
        from: state.from.clone(),
        to: state.to.clone(),
        base: state.base().to_string(),
        focus: state.focus().to_string(),
        range: state.range,
        inverse: state.inverse,
        amount: state.amount,
        loading: state.loading,
        notice: state.notice.clone(),
        rows: state.rows(names),
        conversion: state.conversion(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::models::RateSource;
    use std::collections::{BTreeMap, HashMap};
    use std::time::Duration;
    use store::{LocalStore, StoreConfig};

    /// Serves fixed USD-derived rates, optionally slow for some bases
    struct FakeRates {
        usd: BTreeMap<String, f64>,
        delays: HashMap<String, Duration>,
        offline: bool,
    }

    impl FakeRates {
        fn new() -> Self {
            let usd = [("USD", 1.0), ("EUR", 0.8), ("INR", 80.0), ("GBP", 0.5)]
                .into_iter()
                .map(|(code, rate)| (code.to_string(), rate))
                .collect();
            Self {
                usd,
                delays: HashMap::new(),
                offline: false,
            }
        }
    }

    #[async_trait]
    impl RateFetcher for FakeRates {
        async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot> {
            if let Some(delay) = self.delays.get(base) {
                tokio::time::sleep(*delay).await;
            }
            if self.offline {
                return Err(Error::NetworkError("offline".to_string()));
            }
            let per_usd = self
                .usd
                .get(base)
                .copied()
                .ok_or_else(|| Error::InvalidResponse(format!("unsupported {}", base)))?;
            let rates = self
                .usd
                .iter()
                .filter(|(code, _)| code.as_str() != base)
                .map(|(code, rate)| (code.clone(), rate / per_usd))
                .collect();
            Ok(RateSnapshot::new(base, rates, RateSource::Live))
        }
    }

    struct FakeDirectory {
        names: Option<CurrencyNames>,
    }

    #[async_trait]
    impl CurrencyDirectory for FakeDirectory {
        async fn list_currencies(&self) -> Result<CurrencyNames> {
            self.names
                .clone()
                .ok_or_else(|| Error::NetworkError("offline".to_string()))
        }
    }

    fn service_with(
        rates: FakeRates,
        names: Option<CurrencyNames>,
        dir: &tempfile::TempDir,
    ) -> DashboardService {
        let store = LocalStore::new(StoreConfig {
            path: dir.path().join("store.json"),
        });
        DashboardService::new(
            Arc::new(rates),
            Arc::new(FakeDirectory { names }),
            AlertStore::new(store),
        )
    }

    fn service(dir: &tempfile::TempDir) -> DashboardService {
        let names = CurrencyNames::from([("INR".to_string(), "Indian Rupee".to_string())]);
        service_with(FakeRates::new(), Some(names), dir)
    }

    #[tokio::test]
    async fn test_rate_table_direct() {
        let dir = tempfile::tempdir().unwrap();
        let table = service(&dir)
            .rate_table("USD", "INR", RangeKey::Day, DisplayMode::Direct)
            .await
            .unwrap();

        assert_eq!(table.base, "USD");
        let codes: Vec<&str> = table.rows.iter().map(|row| row.code.as_str()).collect();
        assert_eq!(codes, vec!["INR", "EUR", "GBP"]);
        assert_eq!(table.rows[0].name, "Indian Rupee");
        assert!(table.notice.is_none());
    }

    #[tokio::test]
    async fn test_rate_table_inverse() {
        let dir = tempfile::tempdir().unwrap();
        let table = service(&dir)
            .rate_table("USD", "INR", RangeKey::Week, DisplayMode::Inverse)
            .await
            .unwrap();

        assert_eq!(table.base, "INR");
        assert_eq!(table.rows[0].code, "USD");
        assert!(table.rows[0].focus);
        assert!(table.rows.iter().all(|row| row.code != "INR"));
    }

    #[tokio::test]
    async fn test_offline_uses_samples() {
        let dir = tempfile::tempdir().unwrap();
        let mut rates = FakeRates::new();
        rates.offline = true;
        let service = service_with(rates, None, &dir);

        let view = service.spot_rates("USD").await.unwrap();
        assert_eq!(view.snapshot.source, RateSource::Sample);
        assert_eq!(view.notice.as_deref(), Some(SAMPLE_NOTICE));
        assert_eq!(service.currency_names().await, fallback_currency_names());
    }

    #[tokio::test]
    async fn test_convert() {
        let dir = tempfile::tempdir().unwrap();
        let conversion = service(&dir).convert("EUR", "INR", 2.0).await.unwrap();
        assert!((conversion.rate - 100.0).abs() < 1e-9);
        assert_eq!(conversion.converted, 200.0);
    }

    #[tokio::test]
    async fn test_apply_fetches_on_base_change() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);

        let view = service
            .apply(DashboardCommand::SetAmount { amount: 3.0 })
            .await
            .unwrap();
        assert_eq!(view.rows[0].code, "INR");
        assert_eq!(view.conversion.unwrap().converted, 240.0);

        let view = service
            .apply(DashboardCommand::SetInverse { inverse: true })
            .await
            .unwrap();
        assert_eq!(view.base, "INR");
        assert_eq!(view.rows[0].code, "USD");
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn test_apply_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);

        let err = service
            .apply(DashboardCommand::SetFrom {
                code: "dollars".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
        assert_eq!(service.dashboard().await.from, "USD");

        let err = service
            .apply(DashboardCommand::SetAmount { amount: -1.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_slow_stale_response_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let mut rates = FakeRates::new();
        rates
            .delays
            .insert("USD".to_string(), Duration::from_millis(200));
        let service = service_with(rates, None, &dir);

        let slow = service.refresh_rates();
        let fast = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            service
                .apply(DashboardCommand::SetFrom {
                    code: "eur".to_string(),
                })
                .await
        };
        let (_, view) = tokio::join!(slow, fast);
        assert_eq!(view.unwrap().base, "EUR");

        let view = service.dashboard().await;
        assert_eq!(view.base, "EUR");
        assert!(!view.rows.is_empty());
        assert!(view.rows.iter().all(|row| row.code != "EUR"));
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn test_late_response_after_switching_back_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut rates = FakeRates::new();
        rates
            .delays
            .insert("EUR".to_string(), Duration::from_millis(200));
        let service = service_with(rates, None, &dir);
        service.refresh_rates().await;

        let away = service.apply(DashboardCommand::SetFrom {
            code: "EUR".to_string(),
        });
        let back = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            service
                .apply(DashboardCommand::SetFrom {
                    code: "USD".to_string(),
                })
                .await
        };
        let (away, back) = tokio::join!(away, back);
        away.unwrap();
        assert_eq!(back.unwrap().base, "USD");

        let view = service.dashboard().await;
        assert_eq!(view.base, "USD");
        assert!(!view.loading);
        assert_eq!(view.rows[0].code, "INR");
        assert!(view.rows.iter().all(|row| row.code != "USD"));
        assert_eq!(view.conversion.unwrap().converted, 80.0);
    }

    #[tokio::test]
    async fn test_alert_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);

        let record = service
            .create_alert(NewAlert {
                from: "usd".to_string(),
                to: "inr".to_string(),
                threshold: 85.0,
                email: "me@example.com".to_string(),
                schedule: Vec::new(),
            })
            .await
            .unwrap();
        assert_eq!(service.list_alerts().await.unwrap(), vec![record.clone()]);

        service.delete_alert(&record.id).await.unwrap();
        assert!(service.list_alerts().await.unwrap().is_empty());
        assert!(matches!(
            service.delete_alert(&record.id).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_alert_writes_all_persist() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);
        let alert = |threshold: f64| NewAlert {
            from: "USD".to_string(),
            to: "INR".to_string(),
            threshold,
            email: "me@example.com".to_string(),
            schedule: Vec::new(),
        };

        let (a, b, c, d) = tokio::join!(
            service.create_alert(alert(81.0)),
            service.create_alert(alert(82.0)),
            service.create_alert(alert(83.0)),
            service.create_alert(alert(84.0)),
        );
        for result in [a, b, c, d] {
            result.unwrap();
        }

        let mut thresholds: Vec<f64> = service
            .list_alerts()
            .await
            .unwrap()
            .iter()
            .map(|alert| alert.threshold)
            .collect();
        thresholds.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(thresholds, vec![81.0, 82.0, 83.0, 84.0]);
    }

    #[tokio::test]
    async fn test_invalid_alert_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);

        let result = service
            .create_alert(NewAlert {
                from: "USD".to_string(),
                to: "INR".to_string(),
                threshold: 0.0,
                email: "me@example.com".to_string(),
                schedule: Vec::new(),
            })
            .await;
        assert!(matches!(result, Err(Error::ValidationError(_))));
        assert!(service.list_alerts().await.unwrap().is_empty());
    }
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{
    convert::Conversion,
    models::{AlertRecord, CurrencyNames, DisplayMode, NewAlert, RangeKey},
    Error as CommonError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::service::{
    parse_code, DashboardCommand, DashboardService, DashboardView, RatesView, TableView,
};

type SharedService = Arc<DashboardService>;

// Create a wrapper for our common::Error type
pub struct ApiError(CommonError);

// Implement From<CommonError> for ApiError
impl From<CommonError> for ApiError {
    fn from(err: CommonError) -> Self {
        ApiError(err)
    }
}

// Convert our API error wrapper to an Axum response
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            CommonError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            CommonError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            CommonError::NetworkError(msg) => (StatusCode::BAD_GATEWAY, msg),
            CommonError::InvalidResponse(msg) => (StatusCode::BAD_GATEWAY, msg),
            CommonError::HttpError(e) => (
                StatusCode::BAD_GATEWAY,
                format!("External API request failed: {}", e),
            ),
            CommonError::StorageError(msg) => {
                error!("Storage failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            CommonError::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            CommonError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

// Default to the 24H range if none specified
fn parse_range(raw: Option<&str>) -> Result<RangeKey, CommonError> {
    match raw {
        Some(range) => range.parse(),
        None => Ok(RangeKey::default()),
    }
}

// Return every known currency
pub async fn list_currencies(State(service): State<SharedService>) -> Json<CurrencyNames> {
    Json(service.currency_names().await)
}

// Spot rates for a base currency
pub async fn get_rates(
    State(service): State<SharedService>,
    Path(base): Path<String>,
) -> Result<Json<RatesView>, ApiError> {
    let base = parse_code(&base)?;
    Ok(Json(service.spot_rates(&base).await?))
}

#[derive(Debug, Deserialize)]
pub struct TableQuery {
    pub from: String,
    pub to: String,
    pub range: Option<String>,
    pub inverse: Option<bool>,
}

// Rate table for a currency pair
pub async fn get_table(
    State(service): State<SharedService>,
    Query(query): Query<TableQuery>,
) -> Result<Json<TableView>, ApiError> {
    let from = parse_code(&query.from)?;
    let to = parse_code(&query.to)?;
    let range = parse_range(query.range.as_deref())?;
    let mode = DisplayMode::from_inverse(query.inverse.unwrap_or(false));

    let table = service.rate_table(&from, &to, range, mode).await?;
    Ok(Json(table))
}

#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    pub from: String,
    pub to: String,
    pub amount: Option<f64>,
}

// Convert an amount between two currencies
pub async fn get_conversion(
    State(service): State<SharedService>,
    Query(query): Query<ConvertQuery>,
) -> Result<Json<Conversion>, ApiError> {
    let from = parse_code(&query.from)?;
    let to = parse_code(&query.to)?;

    // Default to a single unit
    let amount = query.amount.unwrap_or(1.0);

    Ok(Json(service.convert(&from, &to, amount).await?))
}

pub async fn get_dashboard(State(service): State<SharedService>) -> Json<DashboardView> {
    Json(service.dashboard().await)
}

pub async fn update_dashboard(
    State(service): State<SharedService>,
    Json(command): Json<DashboardCommand>,
) -> Result<Json<DashboardView>, ApiError> {
    Ok(Json(service.apply(command).await?))
}

pub async fn list_alerts(
    State(service): State<SharedService>,
) -> Result<Json<Vec<AlertRecord>>, ApiError> {
    Ok(Json(service.list_alerts().await?))
}

pub async fn create_alert(
    State(service): State<SharedService>,
    Json(alert): Json<NewAlert>,
) -> Result<(StatusCode, Json<AlertRecord>), ApiError> {
    let record = service.create_alert(alert).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn delete_alert(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete_alert(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

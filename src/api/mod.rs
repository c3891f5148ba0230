use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::{
    error::ForecastError,
    forecast::{self, ForecastService, INVALID_DATE_MESSAGE, MISSING_DATE_MESSAGE},
    models::{ForecastResult, Location},
    regression::ModelStore,
    weather::WeatherSource,
};

/// Shared, read-only dependencies of every request
#[derive(Clone)]
pub struct AppState {
    pub models: Arc<ModelStore>,
    pub weather: Arc<dyn WeatherSource>,
    pub location: Location,
}

impl AppState {
    pub fn new(models: ModelStore, weather: impl WeatherSource + 'static, location: Location) -> Self {
        Self {
            models: Arc::new(models),
            weather: Arc::new(weather),
            location,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/GetForecast", get(get_forecast).post(get_forecast))
        .with_state(state)
}

#[instrument(skip_all)]
async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Json<Vec<ForecastResult>>, ForecastError> {
    info!("GetForecast triggered");

    let raw_date = extract_date(&params, &body)?;
    let start = forecast::parse_start_date(&raw_date)?;

    let service = ForecastService {
        models: &state.models,
        weather: state.weather.as_ref(),
        location: &state.location,
    };
    let results = service.forecast_week(start).await?;
    Ok(Json(results))
}

/// Find the start date in the query string, falling back to a JSON body.
///
/// A body that is not valid JSON counts as "no date given".
fn extract_date(params: &HashMap<String, String>, body: &[u8]) -> Result<String, ForecastError> {
    if let Some(date) = params.get("date").filter(|d| !d.is_empty()) {
        return Ok(date.clone());
    }

    let parsed: Option<Value> = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<Value>(body)
            .inspect_err(|e| warn!("Ignoring request body that is not JSON: {}", e))
            .ok()
    };

    match parsed.as_ref().and_then(|json| json.get("date")) {
        Some(Value::String(date)) if !date.is_empty() => Ok(date.clone()),
        None | Some(Value::Null) | Some(Value::String(_)) => {
            Err(ForecastError::validation(MISSING_DATE_MESSAGE))
        }
        Some(_) => Err(ForecastError::validation(INVALID_DATE_MESSAGE)),
    }
}

impl IntoResponse for ForecastError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            error!(error = %self, "Forecast request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, self.user_message()).into_response()
    }
}

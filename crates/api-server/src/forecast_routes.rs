//! Forecast API Routes
//!
//! JSON forecast for one company plus the CSV download of its future part.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use forecast_core::export::{export_file_name, forecast_csv};
use forecast_core::{CompanyForecast, Horizon};
use serde::Deserialize;

use crate::{days_horizon, forecast_err, ApiResponse, AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    /// Forecast days, clamped to the supported range; 30 when absent
    #[serde(default)]
    pub days: Option<String>,
}

impl ForecastQuery {
    pub fn horizon(&self) -> Result<Horizon, AppError> {
        days_horizon(self.days.as_deref())
    }
}

pub fn forecast_routes() -> Router<AppState> {
    Router::new()
        .route("/api/forecast/:ticker", get(get_forecast))
        .route("/api/forecast/:ticker/csv", get(download_forecast_csv))
}

async fn get_forecast(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ApiResponse<CompanyForecast>>, AppError> {
    let horizon = query.horizon()?;
    let forecast = state
        .forecasts
        .forecast_company(&ticker, horizon)
        .await
        .map_err(forecast_err)?;

    Ok(Json(ApiResponse::success(forecast)))
}

async fn download_forecast_csv(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(query): Query<ForecastQuery>,
) -> Result<Response, AppError> {
    let horizon = query.horizon()?;
    let forecast = state
        .forecasts
        .forecast_company(&ticker, horizon)
        .await
        .map_err(forecast_err)?;

    let body = forecast_csv(&forecast.forecast).map_err(forecast_err)?;
    let file_name = export_file_name(&forecast.company, forecast.horizon);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response())
}

//! Financial Report API Routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use forecast_core::ForecastError;
use mse_client::{MseError, ReportTable};

use crate::{forecast_err, ApiResponse, AppError, AppState};

pub fn report_routes() -> Router<AppState> {
    Router::new().route("/api/reports/:ticker", get(get_financial_reports))
}

fn mse_err(e: MseError) -> AppError {
    AppError::with_status(
        StatusCode::BAD_GATEWAY,
        anyhow::anyhow!("MSE.mn request failed: {e}"),
    )
}

async fn get_financial_reports(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<ApiResponse<ReportTable>>, AppError> {
    let company = state
        .registry
        .get(&ticker)
        .ok_or_else(|| forecast_err(ForecastError::UnknownCompany(ticker.clone())))?;

    let table = state
        .mse
        .financial_reports(company.mse_id)
        .await
        .map_err(mse_err)?
        .ok_or_else(|| AppError::not_found("No table found on MSE.mn"))?;

    Ok(Json(ApiResponse::success(table)))
}

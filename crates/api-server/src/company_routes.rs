//! Company Registry API Routes

use axum::{extract::State, routing::get, Json, Router};
use forecast_core::Company;

use crate::{ApiResponse, AppState};

pub fn company_routes() -> Router<AppState> {
    Router::new().route("/api/companies", get(list_companies))
}

/// All covered companies in registry order.
async fn list_companies(State(state): State<AppState>) -> Json<ApiResponse<Vec<Company>>> {
    Json(ApiResponse::success(state.registry.iter().copied().collect()))
}

//! Voice Command API Routes
//!
//! A recording (or an already transcribed text) is turned into a company and
//! horizon and applied to the caller's current selection.

use axum::{
    body::Bytes,
    extract::{Query, State},
    routing::post,
    Json, Router,
};
use forecast_core::{CompanyRegistry, ForecastError, Horizon, Selection};
use serde::{Deserialize, Serialize};
use voice_command::{parse_command, recognize_and_parse, ParsedCommand};

use crate::{days_horizon, forecast_err, ApiResponse, AppError, AppState, DaysParam};

/// The caller's selection before the command; registry defaults when absent.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub days: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TextCommandRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub days: Option<DaysParam>,
}

#[derive(Debug, Serialize)]
pub struct VoiceCommandResponse {
    pub command: ParsedCommand,
    pub selection: Selection,
}

pub fn voice_routes() -> Router<AppState> {
    Router::new()
        .route("/api/voice", post(voice_command))
        .route("/api/voice/text", post(text_command))
}

fn current_selection(
    registry: &CompanyRegistry,
    ticker: Option<&str>,
    horizon: Horizon,
) -> Result<Selection, AppError> {
    let ticker = match ticker {
        Some(t) => registry
            .get(t)
            .ok_or_else(|| forecast_err(ForecastError::UnknownCompany(t.to_string())))?
            .ticker,
        None => registry.default_company().ticker,
    };
    Ok(Selection::new(ticker, horizon))
}

fn respond(command: ParsedCommand, mut selection: Selection) -> Json<ApiResponse<VoiceCommandResponse>> {
    command.apply(&mut selection);
    tracing::info!(
        "Voice command {:?} -> {} for {} days",
        command.text,
        selection.ticker,
        selection.horizon
    );
    Json(ApiResponse::success(VoiceCommandResponse { command, selection }))
}

/// Raw WAV body in, updated selection out.
async fn voice_command(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
    audio: Bytes,
) -> Result<Json<ApiResponse<VoiceCommandResponse>>, AppError> {
    let horizon = days_horizon(query.days.as_deref())?;
    let selection = current_selection(&state.registry, query.ticker.as_deref(), horizon)?;
    let command = recognize_and_parse(state.recognizer.as_ref(), &audio, &state.registry).await;
    Ok(respond(command, selection))
}

async fn text_command(
    State(state): State<AppState>,
    Json(request): Json<TextCommandRequest>,
) -> Result<Json<ApiResponse<VoiceCommandResponse>>, AppError> {
    let horizon = match &request.days {
        Some(days) => days.horizon()?,
        None => Horizon::DEFAULT,
    };
    let selection = current_selection(&state.registry, request.ticker.as_deref(), horizon)?;
    let command = parse_command(request.text.as_deref(), &state.registry);
    Ok(respond(command, selection))
}

//! JSON API for MSE price forecasts.
//!
//! Serves the company list, per-company forecasts (JSON and CSV download),
//! voice commands that pick a company and horizon, and the official
//! financial report table scraped from mse.mn.

pub mod company_routes;
pub mod config;
pub mod forecast_routes;
pub mod report_routes;
pub mod voice_routes;


use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use forecast_client::HttpForecaster;
use forecast_core::{CompanyRegistry, ForecastError, ForecastService, Horizon};
use mse_client::MseClient;
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use voice_command::{HttpSpeechRecognizer, SpeechRecognizer};

use config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub registry: CompanyRegistry,
    pub forecasts: ForecastService,
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub mse: MseClient,
}

/// Envelope for every JSON answer.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Handler error carrying the status code to answer with.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    pub fn with_status(status: StatusCode, error: anyhow::Error) -> Self {
        Self { status, error }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, anyhow::anyhow!(message.into()))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, anyhow::anyhow!(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed ({}): {:#}", self.status, self.error);
        } else {
            tracing::debug!("Request rejected ({}): {:#}", self.status, self.error);
        }
        let body = ApiResponse::<()>::error(format!("{:#}", self.error));
        (self.status, Json(body)).into_response()
    }
}

/// Map ForecastError to AppError with appropriate status codes.
pub fn forecast_err(e: ForecastError) -> AppError {
    let status = match &e {
        ForecastError::UnknownCompany(_) | ForecastError::DataNotFound(_) => StatusCode::NOT_FOUND,
        ForecastError::InvalidData(_) | ForecastError::InsufficientData(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ForecastError::Service(_) | ForecastError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        ForecastError::Csv(_) | ForecastError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    AppError::with_status(status, e.into())
}

/// A `days` value from a JSON body: a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DaysParam {
    Whole(i64),
    Fractional(f64),
    Text(String),
}

impl DaysParam {
    /// Clamp into the supported horizon; fractions are truncated.
    pub fn horizon(&self) -> Result<Horizon, AppError> {
        match self {
            DaysParam::Whole(days) => Ok(Horizon::clamped((*days).max(0) as u64)),
            // float to int casts saturate
            DaysParam::Fractional(days) => Ok(Horizon::clamped(*days as u64)),
            DaysParam::Text(text) => days_horizon(Some(text)),
        }
    }
}

/// Horizon for a `days` query parameter; 30 when absent or blank.
pub fn days_horizon(days: Option<&str>) -> Result<Horizon, AppError> {
    match days {
        None => Ok(Horizon::DEFAULT),
        Some(text) => Horizon::parse_days(text).ok_or_else(|| {
            AppError::bad_request(format!("days must be a whole number, got {:?}", text))
        }),
    }
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    forecast_backend: &'static str,
    speech_backend: &'static str,
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        forecast_backend: state.forecasts.backend_name(),
        speech_backend: state.recognizer.backend_name(),
    })
}

/// Build the router over `state`. Voice uploads are capped at `max_audio_bytes`.
pub fn app(state: AppState, max_audio_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(company_routes::company_routes())
        .merge(forecast_routes::forecast_routes())
        .merge(voice_routes::voice_routes().layer(DefaultBodyLimit::max(max_audio_bytes)))
        .merge(report_routes::report_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json_logging {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env()?;
    tracing::info!("Starting MSE forecast API");
    tracing::info!("  Data directory: {}", config.data_dir.display());
    tracing::info!("  Forecast service: {}", config.forecast.base_url);
    tracing::info!("  Speech service: {}", config.speech.base_url);

    let registry = CompanyRegistry::MSE;
    let forecaster = HttpForecaster::new(config.forecast.clone())?;
    let recognizer = HttpSpeechRecognizer::new(config.speech.clone())?;
    let mse = MseClient::new(Some(config.mse_base_url.clone()), config.mse_timeout)?;

    let state = AppState {
        registry,
        forecasts: ForecastService::new(registry, config.data_dir.clone(), Arc::new(forecaster)),
        recognizer: Arc::new(recognizer),
        mse,
    };

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app(state, config.max_audio_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

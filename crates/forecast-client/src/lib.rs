//! HTTP client for the external time-series forecasting service.
//!
//! The service owns the model (fit + predict); this crate only ships the
//! history over and maps the predictions back into `forecast-core` types.

pub mod forecaster;

pub use forecaster::HttpForecaster;

use anyhow::{Context, Result};
use std::time::Duration;

/// Configuration for the forecasting service
#[derive(Debug, Clone)]
pub struct ForecastClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ForecastClientConfig {
    pub fn from_env() -> Result<Self> {
        let timeout_secs: u64 = std::env::var("FORECAST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .context("FORECAST_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Self {
            base_url: std::env::var("FORECAST_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8005".to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for ForecastClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8005".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use forecast_client::ForecastClientConfig;
use voice_command::SpeechConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    // Per-company series files
    pub data_dir: PathBuf,

    // External services
    pub forecast: ForecastClientConfig,
    pub speech: SpeechConfig,
    pub mse_base_url: String,
    pub mse_timeout: Duration,

    // Largest accepted voice recording
    pub max_audio_bytes: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("API_PORT must be a port number")?,

            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "data".to_string())
                .into(),

            forecast: ForecastClientConfig::from_env()?,
            speech: SpeechConfig {
                timeout: timeout_from_env("SPEECH_TIMEOUT_SECS", 30)?,
                ..SpeechConfig::default()
            },
            mse_base_url: env::var("MSE_BASE_URL")
                .unwrap_or_else(|_| "https://mse.mn".to_string()),
            mse_timeout: timeout_from_env("MSE_TIMEOUT_SECS", 30)?,

            max_audio_bytes: env::var("MAX_AUDIO_BYTES")
                .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
                .parse()
                .context("MAX_AUDIO_BYTES must be a byte count")?,
        };

        Ok(config)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

fn timeout_from_env(var: &str, default_secs: u64) -> Result<Duration> {
    let secs = match env::var(var) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{} must be a whole number of seconds", var))?,
        Err(_) => default_secs,
    };
    Ok(Duration::from_secs(secs))
}

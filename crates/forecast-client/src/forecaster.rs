use async_trait::async_trait;
use chrono::NaiveDate;
use forecast_core::{ForecastError, ForecastPoint, ForecastResult, Forecaster, Horizon, SeriesPoint};
use serde::{Deserialize, Serialize};

use crate::ForecastClientConfig;

#[derive(Debug, Serialize)]
struct HistoryRow {
    ds: NaiveDate,
    y: f64,
}

#[derive(Debug, Serialize)]
struct ForecastRequest<'a> {
    ticker: &'a str,
    history: Vec<HistoryRow>,
    periods: u32,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    forecast: Vec<ForecastPoint>,
}

/// `Forecaster` backed by the forecasting microservice.
#[derive(Clone)]
pub struct HttpForecaster {
    client: reqwest::Client,
    base_url: String,
}

impl HttpForecaster {
    pub fn new(config: ForecastClientConfig) -> ForecastResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ForecastError::Service(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Check service health
    pub async fn health(&self) -> ForecastResult<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(request_error)?;

        Ok(response.status().is_success())
    }
}

fn request_error(e: reqwest::Error) -> ForecastError {
    if e.is_timeout() {
        ForecastError::Service("request timed out".to_string())
    } else {
        ForecastError::Service(format!("HTTP request failed: {}", e))
    }
}

fn build_request<'a>(ticker: &'a str, history: &[SeriesPoint], periods: Horizon) -> ForecastRequest<'a> {
    ForecastRequest {
        ticker,
        history: history
            .iter()
            .map(|p| HistoryRow { ds: p.date, y: p.value })
            .collect(),
        periods: periods.days(),
    }
}

fn decode_response(body: &str) -> ForecastResult<Vec<ForecastPoint>> {
    let mut parsed: ForecastResponse =
        serde_json::from_str(body).map_err(|e| ForecastError::InvalidResponse(e.to_string()))?;
    // callers keep the tail, so order by date
    parsed.forecast.sort_by(|a, b| a.ds.cmp(&b.ds));
    Ok(parsed.forecast)
}

#[async_trait]
impl Forecaster for HttpForecaster {
    async fn forecast(
        &self,
        ticker: &str,
        history: &[SeriesPoint],
        periods: Horizon,
    ) -> ForecastResult<Vec<ForecastPoint>> {
        let request = build_request(ticker, history, periods);

        let response = self
            .client
            .post(format!("{}/forecast", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
                return Err(ForecastError::Service("model not loaded".to_string()));
            }
            return Err(ForecastError::Service(format!("Status: {}", status)));
        }

        let body = response.text().await.map_err(request_error)?;
        let points = decode_response(&body)?;
        tracing::debug!("Forecast service returned {} points for {}", points.len(), ticker);
        Ok(points)
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn test_request_shape() {
        let history = vec![
            SeriesPoint { date: ymd(1), value: 10.0 },
            SeriesPoint { date: ymd(2), value: 10.5 },
        ];
        let request = build_request("APU", &history, Horizon::clamped(14));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["ticker"], "APU");
        assert_eq!(json["periods"], 14);
        assert_eq!(json["history"][1]["ds"], "2024-02-02");
        assert_eq!(json["history"][1]["y"], 10.5);
    }

    #[test]
    fn test_decode_response_sorts_by_date() {
        let body = r#"{"forecast": [
            {"ds": "2024-02-03", "yhat": 11.0, "yhat_lower": 10.0, "yhat_upper": 12.0},
            {"ds": "2024-02-02", "yhat": 10.5, "yhat_lower": 9.5, "yhat_upper": 11.5}
        ]}"#;

        let points = decode_response(body).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].ds, ymd(2));
        assert_eq!(points[1].yhat, 11.0);
    }

    #[test]
    fn test_decode_response_rejects_garbage() {
        let err = decode_response(r#"{"predictions": []}"#).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_a_service_error() {
        let forecaster = HttpForecaster::new(ForecastClientConfig {
            // nothing listens on the discard port
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: std::time::Duration::from_secs(2),
        })
        .unwrap();

        let history = vec![SeriesPoint { date: ymd(1), value: 1.0 }];
        let err = forecaster
            .forecast("APU", &history, Horizon::DEFAULT)
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::Service(_)));
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use crate::series::load_series;
use crate::{
    CompanyForecast, CompanyRegistry, ForecastError, ForecastResult, ForecastSummary, Forecaster,
    Horizon,
};

/// Loads a company's series and runs it through the configured forecaster.
#[derive(Clone)]
pub struct ForecastService {
    registry: CompanyRegistry,
    data_dir: PathBuf,
    forecaster: Arc<dyn Forecaster>,
}

impl ForecastService {
    pub fn new(
        registry: CompanyRegistry,
        data_dir: impl Into<PathBuf>,
        forecaster: Arc<dyn Forecaster>,
    ) -> Self {
        Self {
            registry,
            data_dir: data_dir.into(),
            forecaster,
        }
    }

    pub fn registry(&self) -> &CompanyRegistry {
        &self.registry
    }

    pub fn backend_name(&self) -> &'static str {
        self.forecaster.backend_name()
    }

    /// History plus the trailing `horizon` forecast points for `ticker`.
    pub async fn forecast_company(
        &self,
        ticker: &str,
        horizon: Horizon,
    ) -> ForecastResult<CompanyForecast> {
        let company = self
            .registry
            .get(ticker)
            .ok_or_else(|| ForecastError::UnknownCompany(ticker.to_string()))?;

        let history = load_series(&self.data_dir, company.ticker)?;

        tracing::info!(
            "Forecasting {} for {} days from {} points via {}",
            company.ticker,
            horizon,
            history.len(),
            self.forecaster.backend_name()
        );

        let mut forecast = self
            .forecaster
            .forecast(company.ticker, &history, horizon)
            .await?;

        if forecast.is_empty() {
            return Err(ForecastError::InvalidResponse(format!(
                "{} returned no forecast points for {}",
                self.forecaster.backend_name(),
                company.ticker
            )));
        }

        let keep = horizon.days() as usize;
        if forecast.len() > keep {
            forecast.drain(..forecast.len() - keep);
        }

        let summary = ForecastSummary::from_series(&history, &forecast)?;

        Ok(CompanyForecast {
            company: *company,
            horizon,
            history,
            forecast,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ForecastPoint, SeriesPoint, Signal};
    use async_trait::async_trait;
    use chrono::Duration;

    /// Echoes the history as the fit, then extends it with a fixed daily step.
    struct StepForecaster {
        step: f64,
    }

    #[async_trait]
    impl Forecaster for StepForecaster {
        async fn forecast(
            &self,
            _ticker: &str,
            history: &[SeriesPoint],
            periods: Horizon,
        ) -> ForecastResult<Vec<ForecastPoint>> {
            let mut out: Vec<ForecastPoint> = history
                .iter()
                .map(|p| ForecastPoint {
                    ds: p.date,
                    yhat: p.value,
                    yhat_lower: p.value,
                    yhat_upper: p.value,
                })
                .collect();
            let last = history.last().unwrap();
            for i in 1..=periods.days() {
                let yhat = last.value + self.step * i as f64;
                out.push(ForecastPoint {
                    ds: last.date + Duration::days(i as i64),
                    yhat,
                    yhat_lower: yhat - 1.0,
                    yhat_upper: yhat + 1.0,
                });
            }
            Ok(out)
        }

        fn backend_name(&self) -> &'static str {
            "step"
        }
    }

    struct EmptyForecaster;

    #[async_trait]
    impl Forecaster for EmptyForecaster {
        async fn forecast(
            &self,
            _ticker: &str,
            _history: &[SeriesPoint],
            _periods: Horizon,
        ) -> ForecastResult<Vec<ForecastPoint>> {
            Ok(Vec::new())
        }

        fn backend_name(&self) -> &'static str {
            "empty"
        }
    }

    fn data_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("forecast-core-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("GLMT.csv"),
            "date,value\n2024-01-01,100\n2024-01-02,100\n2024-01-03,100\n",
        )
        .unwrap();
        dir
    }

    #[tokio::test]
    async fn test_forecast_company_keeps_future_tail() {
        let dir = data_dir("tail");
        let service = ForecastService::new(
            CompanyRegistry::MSE,
            &dir,
            Arc::new(StepForecaster { step: 1.0 }),
        );

        let result = service.forecast_company("glmt", Horizon::clamped(20)).await.unwrap();
        assert_eq!(result.company.ticker, "GLMT");
        assert_eq!(result.history.len(), 3);
        assert_eq!(result.forecast.len(), 20);
        assert_eq!(
            result.forecast[0].ds,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()
        );
        // 100 -> 120 is +20%
        assert_eq!(result.summary.signal, Signal::StrongBuy);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_forecast_company_unknown_ticker() {
        let service = ForecastService::new(
            CompanyRegistry::MSE,
            "does-not-matter",
            Arc::new(StepForecaster { step: 0.0 }),
        );
        let err = service.forecast_company("AAPL", Horizon::DEFAULT).await.unwrap_err();
        assert!(matches!(err, ForecastError::UnknownCompany(_)));
    }

    #[tokio::test]
    async fn test_forecast_company_empty_backend_response() {
        let dir = data_dir("empty");
        let service = ForecastService::new(CompanyRegistry::MSE, &dir, Arc::new(EmptyForecaster));
        let err = service.forecast_company("GLMT", Horizon::DEFAULT).await.unwrap_err();
        assert!(matches!(err, ForecastError::InvalidResponse(_)));
        std::fs::remove_dir_all(&dir).ok();
    }
}

use async_trait::async_trait;

use crate::{ForecastPoint, ForecastResult, Horizon, SeriesPoint};

/// Backend that turns a historical series into predictions.
///
/// Implementations return the in-sample fit followed by `periods` future
/// daily points, in date order. Callers keep only the trailing `periods`.
#[async_trait]
pub trait Forecaster: Send + Sync {
    async fn forecast(
        &self,
        ticker: &str,
        history: &[SeriesPoint],
        periods: Horizon,
    ) -> ForecastResult<Vec<ForecastPoint>>;

    fn backend_name(&self) -> &'static str;
}

//! CSV download of the future part of a forecast.

use crate::{Company, ForecastError, ForecastPoint, ForecastResult, Horizon};

/// Serialize forecast points with a `ds,yhat,yhat_lower,yhat_upper` header.
pub fn forecast_csv(points: &[ForecastPoint]) -> ForecastResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for point in points {
        writer.serialize(point)?;
    }
    // An empty slice never triggers the serde header, write it by hand
    if points.is_empty() {
        writer.write_record(["ds", "yhat", "yhat_lower", "yhat_upper"])?;
    }
    writer
        .into_inner()
        .map_err(|e| ForecastError::Io(e.into_error()))
}

/// `{ticker}_{name}_{days}_days_forecast.csv`
pub fn export_file_name(company: &Company, horizon: Horizon) -> String {
    format!(
        "{}_{}_{}_days_forecast.csv",
        company.ticker,
        company.name,
        horizon.days()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompanyRegistry;
    use chrono::NaiveDate;

    #[test]
    fn test_forecast_csv_layout() {
        let points = vec![ForecastPoint {
            ds: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            yhat: 101.5,
            yhat_lower: 99.0,
            yhat_upper: 104.25,
        }];

        let bytes = forecast_csv(&points).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "ds,yhat,yhat_lower,yhat_upper\n2025-03-01,101.5,99.0,104.25\n");
    }

    #[test]
    fn test_forecast_csv_empty_has_header() {
        let text = String::from_utf8(forecast_csv(&[]).unwrap()).unwrap();
        assert_eq!(text, "ds,yhat,yhat_lower,yhat_upper\n");
    }

    #[test]
    fn test_export_file_name() {
        let company = CompanyRegistry::MSE.get("GLMT").unwrap();
        assert_eq!(
            export_file_name(company, Horizon::clamped(90)),
            "GLMT_GOLOMT BANK_90_days_forecast.csv"
        );
    }
}

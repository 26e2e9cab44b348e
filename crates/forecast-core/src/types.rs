use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Company, CompanyRegistry, ForecastError, ForecastResult};

/// Forecast horizon in days, always within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u64", into = "u32")]
pub struct Horizon(u32);

impl Horizon {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 3650;
    pub const DEFAULT: Horizon = Horizon(30);

    /// Clamp any day count into the supported range.
    pub fn clamped(days: u64) -> Self {
        Horizon(days.clamp(Self::MIN as u64, Self::MAX as u64) as u32)
    }

    /// Read a day count typed by a user. Blank text is the default, a
    /// negative number clamps to `MIN` and a digit run too long for `u64`
    /// clamps to `MAX`. `None` when the text is not an integer at all.
    pub fn parse_days(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Some(Self::DEFAULT);
        }

        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if negative {
            return Some(Self::clamped(0));
        }
        Some(Self::clamped(digits.parse().unwrap_or(u64::MAX)))
    }

    pub fn days(&self) -> u32 {
        self.0
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u64> for Horizon {
    fn from(days: u64) -> Self {
        Self::clamped(days)
    }
}

impl From<Horizon> for u32 {
    fn from(horizon: Horizon) -> Self {
        horizon.0
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One observation of a company's historical price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One predicted point with its uncertainty interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

/// Buy/sell recommendation derived from the expected price change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl Signal {
    /// Classify an expected change in percent.
    pub fn from_change_pct(change_pct: f64) -> Self {
        match change_pct {
            c if c > 15.0 => Signal::StrongBuy,
            c if c > 5.0 => Signal::Buy,
            c if c > -5.0 => Signal::Hold,
            c if c > -15.0 => Signal::Sell,
            _ => Signal::StrongSell,
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            Signal::StrongBuy => "STRONG BUY",
            Signal::Buy => "BUY",
            Signal::Hold => "HOLD",
            Signal::Sell => "SELL",
            Signal::StrongSell => "STRONG SELL",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastSummary {
    pub current_price: f64,
    pub future_price: f64,
    pub change_pct: f64,
    pub signal: Signal,
    pub label: &'static str,
}

impl ForecastSummary {
    /// Compare the last observed value with the last predicted value.
    pub fn from_series(history: &[SeriesPoint], forecast: &[ForecastPoint]) -> ForecastResult<Self> {
        let current_price = history
            .last()
            .map(|p| p.value)
            .ok_or_else(|| ForecastError::InsufficientData("empty history".to_string()))?;
        let future_price = forecast
            .last()
            .map(|p| p.yhat)
            .ok_or_else(|| ForecastError::InsufficientData("empty forecast".to_string()))?;

        if current_price == 0.0 {
            return Err(ForecastError::InvalidData(
                "current price is zero, change is undefined".to_string(),
            ));
        }

        let change_pct = (future_price - current_price) / current_price * 100.0;
        let signal = Signal::from_change_pct(change_pct);

        Ok(Self {
            current_price,
            future_price,
            change_pct,
            signal,
            label: signal.to_label(),
        })
    }
}

/// Historical data plus the future part of a forecast for one company
#[derive(Debug, Clone, Serialize)]
pub struct CompanyForecast {
    pub company: Company,
    pub horizon: Horizon,
    pub history: Vec<SeriesPoint>,
    pub forecast: Vec<ForecastPoint>,
    pub summary: ForecastSummary,
}

/// What the dashboard currently shows: a company and a horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub ticker: String,
    pub horizon: Horizon,
}

impl Selection {
    pub fn new(ticker: impl Into<String>, horizon: Horizon) -> Self {
        Self {
            ticker: ticker.into(),
            horizon,
        }
    }

    /// First registry company, 30 days.
    pub fn initial(registry: &CompanyRegistry) -> Self {
        Self::new(registry.default_company().ticker, Horizon::DEFAULT)
    }
}

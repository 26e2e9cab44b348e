use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Unknown company: {0}")]
    UnknownCompany(String),

    #[error("Series data not found: {0}")]
    DataNotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Forecast service error: {0}")]
    Service(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type ForecastResult<T> = Result<T, ForecastError>;

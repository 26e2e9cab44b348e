use thiserror::Error;

#[derive(Error, Debug)]
pub enum MseError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected status from mse.mn: {0}")]
    Status(reqwest::StatusCode),
}

pub type MseResult<T> = Result<T, MseError>;

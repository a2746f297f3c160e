//! CloudStack client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudStackError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CloudStack API error {code}: {text}")]
    Api { code: i64, text: String },

    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),

    #[error("Async job {job_id} failed with code {code}: {text}")]
    JobFailed {
        job_id: String,
        code: i64,
        text: String,
    },

    #[error("Timed out after {seconds}s waiting for async job {job_id}")]
    Timeout { job_id: String, seconds: u64 },

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<CloudStackError> for acs_driver_core::DriverError {
    fn from(err: CloudStackError) -> Self {
        acs_driver_core::DriverError::Provision(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CloudStackError>;

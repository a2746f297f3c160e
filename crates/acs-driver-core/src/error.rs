//! Driver error types

use thiserror::Error;

/// Errors returned by cluster driver operations
#[derive(Error, Debug)]
pub enum DriverError {
    /// Lifecycle operation the driver does not support
    #[error("Not implemented")]
    NotImplemented,

    #[error("Invalid option {name}: {reason}")]
    InvalidOption { name: String, reason: String },

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Provisioning failed: {0}")]
    Provision(String),
}

impl DriverError {
    pub fn invalid_option(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented)
    }
}

pub type Result<T> = std::result::Result<T, DriverError>;

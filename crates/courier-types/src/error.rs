//! Error types for courier-estimator

use thiserror::Error;

use crate::RegionType;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No shipping rate for service type {service_type_id} ({region_type}): route/service not supported")]
    RateNotFound {
        service_type_id: u32,
        region_type: RegionType,
    },

    #[error("{count} shipping rates match service type {service_type_id} ({region_type}); expected exactly one")]
    AmbiguousRate {
        service_type_id: u32,
        region_type: RegionType,
        count: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rate table error: {0}")]
    RateTable(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    /// Message suitable for showing to the person who requested a quote
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidInput(msg) => msg.clone(),
            Error::RateNotFound { .. } => {
                "This route or service is not supported".to_string()
            }
            Error::AmbiguousRate { .. } => {
                "Shipping rates for this route are misconfigured".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid AI base URL")]
    InvalidAiBaseUrl,

    #[error("AI temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("AI max_tokens must be positive")]
    InvalidMaxTokens,

    #[error("History limit must be between 1 and 500")]
    InvalidHistoryLimit,

    #[error("Session TTL must be positive")]
    InvalidSessionTtl,

    #[error("Sweep interval must be positive")]
    InvalidSweepInterval,
}

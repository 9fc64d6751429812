//! Session store configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::session::SessionStoreConfig;

const MAX_HISTORY_LIMIT: usize = 500;

/// Session retention settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Inactivity after which a session is evicted
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: i64,

    /// Seconds between expiry sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// History entries kept per session
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl SessionConfig {
    pub fn store_config(&self) -> SessionStoreConfig {
        SessionStoreConfig::default()
            .with_history_limit(self.history_limit)
            .with_ttl(chrono::Duration::hours(self.ttl_hours))
            .with_sweep_interval(Duration::from_secs(self.sweep_interval_secs))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ttl_hours <= 0 {
            return Err(ValidationError::InvalidSessionTtl);
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        if self.history_limit == 0 || self.history_limit > MAX_HISTORY_LIMIT {
            return Err(ValidationError::InvalidHistoryLimit);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            sweep_interval_secs: default_sweep_interval(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_ttl_hours() -> i64 {
    24
}

fn default_sweep_interval() -> u64 {
    3600
}

fn default_history_limit() -> usize {
    30
}

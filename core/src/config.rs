//! Client configuration loaded from the environment.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_OPTIMIZER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_CSV_PATH: &str = "prices_with_coords.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub optimizer_url: String,
    /// Price table the service should read. Static, never user input.
    pub csv_path: String,
    pub request_timeout: Duration,
    pub log_level: String,
}

impl ClientConfig {
    /// Load configuration, reading a `.env` file first if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if a numeric variable does not parse.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from variables already in the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let or_default = |var: &str, default: &str| -> String {
            lookup(var).unwrap_or_else(|_| default.to_string())
        };

        let timeout_secs = {
            let var = "GROCERY_REQUEST_TIMEOUT_SECS";
            or_default(var, "30")
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                })?
        };

        Ok(Self {
            optimizer_url: or_default("GROCERY_OPTIMIZER_URL", DEFAULT_OPTIMIZER_URL),
            csv_path: or_default("GROCERY_CSV_PATH", DEFAULT_CSV_PATH),
            request_timeout: Duration::from_secs(timeout_secs),
            log_level: or_default("GROCERY_LOG_LEVEL", "info"),
        })
    }
}

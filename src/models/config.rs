//! Configuration data model and validation

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the speed-test server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Nominal time budget per measurement cycle in milliseconds
    #[serde(default = "default_cadence_ms")]
    pub cadence_ms: u64,

    /// Total session duration in milliseconds; cycle count is
    /// `total_duration_ms / cadence_ms` (integer floor)
    #[serde(default = "default_total_duration_ms")]
    pub total_duration_ms: u64,

    /// Request timeout duration in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Emit the final report as JSON instead of the console view
    #[serde(default)]
    pub json_output: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cadence_ms: default_cadence_ms(),
            total_duration_ms: default_total_duration_ms(),
            timeout_seconds: default_timeout_secs(),
            enable_color: default_enable_color(),
            json_output: false,
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the extended sampling profile (1 s cadence over 5 s)
    pub fn apply_extended_profile(&mut self) {
        self.cadence_ms = crate::defaults::EXTENDED_CADENCE_MS;
        self.total_duration_ms = crate::defaults::EXTENDED_TOTAL_DURATION_MS;
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Number of bandwidth cycles one session will run
    pub fn cycle_count(&self) -> u64 {
        self.total_duration_ms.checked_div(self.cadence_ms).unwrap_or(0)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(AppError::config("Base URL cannot be empty"));
        }

        match url::Url::parse(&self.base_url) {
            Ok(parsed) => {
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!(
                        "Base URL must use http or https: {}",
                        self.base_url
                    )));
                }
            }
            Err(e) => {
                return Err(AppError::config(format!(
                    "Invalid base URL '{}': {}",
                    self.base_url, e
                )));
            }
        }

        if self.cadence_ms == 0 {
            return Err(AppError::config("Cadence must be greater than 0 ms"));
        }

        if self.cadence_ms > 60_000 {
            return Err(AppError::config("Cadence cannot exceed 60000 ms"));
        }

        if self.total_duration_ms > 3_600_000 {
            return Err(AppError::config("Total duration cannot exceed 3600000 ms"));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > 300 {
            return Err(AppError::config("Timeout cannot exceed 300 seconds"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var("SPEEDTEST_URL") {
            self.base_url = base_url.trim().to_string();
        }

        if let Ok(cadence) = std::env::var("CADENCE_MS") {
            self.cadence_ms = cadence
                .parse()
                .map_err(|e| AppError::config(format!("Invalid CADENCE_MS value '{}': {}", cadence, e)))?;
        }

        if let Ok(duration) = std::env::var("DURATION_MS") {
            self.total_duration_ms = duration
                .parse()
                .map_err(|e| AppError::config(format!("Invalid DURATION_MS value '{}': {}", duration, e)))?;
        }

        if let Ok(timeout) = std::env::var("TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout
                .parse()
                .map_err(|e| AppError::config(format!("Invalid TIMEOUT_SECONDS value '{}': {}", timeout, e)))?;
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color
                .parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_base_url() -> String {
    crate::defaults::DEFAULT_BASE_URL.to_string()
}

fn default_cadence_ms() -> u64 {
    crate::defaults::DEFAULT_CADENCE_MS
}

fn default_total_duration_ms() -> u64 {
    crate::defaults::DEFAULT_TOTAL_DURATION_MS
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

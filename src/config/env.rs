//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                println!("Loaded configuration from .env file");
            }
        } else if debug {
            println!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "SPEEDTEST_URL" => {
                let parsed = url::Url::parse(value.trim())
                    .map_err(|e| AppError::config(format!("Invalid SPEEDTEST_URL '{}': {}", value, e)))?;
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!(
                        "SPEEDTEST_URL must use http or https: {}",
                        value
                    )));
                }
            }
            "CADENCE_MS" => {
                let cadence: u64 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid CADENCE_MS value '{}': {}", value, e))
                })?;
                if cadence == 0 || cadence > 60_000 {
                    return Err(AppError::config(format!(
                        "CADENCE_MS must be between 1 and 60000, got: {}",
                        cadence
                    )));
                }
            }
            "DURATION_MS" => {
                let duration: u64 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid DURATION_MS value '{}': {}", value, e))
                })?;
                if duration > 3_600_000 {
                    return Err(AppError::config(format!(
                        "DURATION_MS cannot exceed 3600000, got: {}",
                        duration
                    )));
                }
            }
            "TIMEOUT_SECONDS" => {
                let timeout: u64 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid TIMEOUT_SECONDS value '{}': {}", value, e))
                })?;
                if timeout == 0 || timeout > 300 {
                    return Err(AppError::config(format!(
                        "TIMEOUT_SECONDS must be between 1 and 300, got: {}",
                        timeout
                    )));
                }
            }
            "ENABLE_COLOR" => {
                value.parse::<bool>().map_err(|e| {
                    AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e))
                })?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Internet Speed Meter Configuration
#
# Values specified here are used as defaults but can be overridden by
# command-line arguments.

# Base URL of the speed-test server
# SPEEDTEST_URL=http://localhost:3000

# Sampling cadence in milliseconds (time budget per measurement cycle)
# CADENCE_MS=100

# Total session duration in milliseconds
# DURATION_MS=3000

# Request timeout in seconds
# TIMEOUT_SECONDS=10

# Enable colored output (true/false)
# ENABLE_COLOR=true

# Example: the extended profile, one cycle per second for five seconds
# CADENCE_MS=1000
# DURATION_MS=5000
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        let content = Self::create_example_env_content();
        std::fs::write(path, content)
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_env_vars_accepted() {
        assert!(EnvManager::validate_env_var("SPEEDTEST_URL", "http://localhost:3000").is_ok());
        assert!(EnvManager::validate_env_var("CADENCE_MS", "100").is_ok());
        assert!(EnvManager::validate_env_var("DURATION_MS", "3000").is_ok());
        assert!(EnvManager::validate_env_var("TIMEOUT_SECONDS", "10").is_ok());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "true").is_ok());
    }

    #[test]
    fn test_invalid_env_vars_rejected() {
        assert!(EnvManager::validate_env_var("SPEEDTEST_URL", "not-a-url").is_err());
        assert!(EnvManager::validate_env_var("SPEEDTEST_URL", "ftp://example.com").is_err());
        assert!(EnvManager::validate_env_var("CADENCE_MS", "0").is_err());
        assert!(EnvManager::validate_env_var("CADENCE_MS", "999999").is_err());
        assert!(EnvManager::validate_env_var("TIMEOUT_SECONDS", "0").is_err());
        assert!(EnvManager::validate_env_var("TIMEOUT_SECONDS", "301").is_err());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "maybe").is_err());
    }

    #[test]
    fn test_unknown_env_var_ignored() {
        assert!(EnvManager::validate_env_var("UNRELATED", "whatever").is_ok());
    }

    #[test]
    fn test_example_env_content_lists_all_vars() {
        let content = EnvManager::create_example_env_content();
        assert!(content.contains("SPEEDTEST_URL="));
        assert!(content.contains("CADENCE_MS="));
        assert!(content.contains("DURATION_MS="));
        assert!(content.contains("TIMEOUT_SECONDS="));
        assert!(content.contains("ENABLE_COLOR="));
    }
}

//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::Config,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration.
    ///
    /// Precedence, lowest to highest: built-in defaults, .env file,
    /// environment variables, CLI arguments.
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file(self.cli.debug)?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if self.cli.extended {
            config.apply_extended_profile();
        }

        if let Some(ref url) = self.cli.url {
            config.base_url = url.clone();
        }

        if let Some(cadence_ms) = self.cli.cadence_ms {
            config.cadence_ms = cadence_ms;
        }

        if let Some(duration_ms) = self.cli.duration_ms {
            config.total_duration_ms = duration_ms;
        }

        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = timeout;
        }

        config.enable_color = self.cli.use_colors();
        config.json_output = self.cli.json;
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            println!("Applied CLI overrides to configuration");
            println!(
                "Final config: cadence={}ms, duration={}ms, timeout={}s",
                config.cadence_ms, config.total_duration_ms, config.timeout_seconds
            );
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// A non-fatal configuration concern surfaced to the user before the run
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigWarning {
    pub message: String,
}

impl ConfigWarning {
    fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Check a valid configuration for settings that are legal but suspicious
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.cycle_count() == 0 {
        warnings.push(ConfigWarning::new(
            "Duration is shorter than cadence: no bandwidth cycles will run, only the ping probe",
        ));
    }

    if config.cycle_count() > 100 {
        warnings.push(ConfigWarning::new(format!(
            "{} cycles configured; each cycle transfers the full payloads, this may take a while",
            config.cycle_count()
        )));
    }

    if config.cadence_ms < 50 && config.cadence_ms > 0 {
        warnings.push(ConfigWarning::new(
            "Cadence below 50 ms: cycles are gated by real I/O and will likely overrun the budget",
        ));
    }

    warnings
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Base URL: {}", config.base_url));
    summary.push(format!("Cadence: {} ms", config.cadence_ms));
    summary.push(format!("Duration: {} ms", config.total_duration_ms));
    summary.push(format!("Cycles: {}", config.cycle_count()));
    summary.push(format!("Timeout: {}s", config.timeout_seconds));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("JSON Output: {}", config.json_output));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

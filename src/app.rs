//! Main application orchestration and execution

use std::sync::Arc;

use crate::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config},
    error::Result,
    logging::{LogLevel, Logger},
    output::create_reporter,
    probe::HttpTransferProbe,
    session::SpeedTestSession,
};

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        Ok(Self { cli })
    }

    /// Run the application
    pub async fn run(self) -> Result<()> {
        self.cli
            .validate()
            .map_err(crate::error::AppError::validation)?;

        let config = load_config(self.cli)?;
        colored::control::set_override(config.enable_color);

        if config.debug {
            println!("{} v{} (built {})", crate::PKG_NAME, crate::VERSION, env!("BUILD_TIME"));
            println!("\nConfiguration Summary:");
            println!("{}", display_config_summary(&config));
            println!();
        }

        let warnings = validate_config(&config);
        if !warnings.is_empty() && !config.json_output {
            for warning in &warnings {
                eprintln!("Warning: {}", warning.message);
            }
            eprintln!();
        }

        let logger = Logger::new("session")
            .with_min_level(if config.debug {
                LogLevel::Debug
            } else {
                LogLevel::Info
            })
            .with_color(config.enable_color)
            .with_json(config.json_output);

        let probe = Arc::new(HttpTransferProbe::new(&config.base_url, config.timeout())?);
        let session = SpeedTestSession::new(
            probe,
            logger,
            config.cadence_ms,
            config.total_duration_ms,
        );

        let reporter = create_reporter(&config);

        // A fresh session cannot already be running, so the trigger
        // always takes effect here
        session.run(reporter.as_ref()).await;

        Ok(())
    }
}

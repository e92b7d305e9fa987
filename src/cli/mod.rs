//! Command-line interface definition and validation

use clap::Parser;

/// Internet Speed Meter - measure download/upload throughput and latency
#[derive(Parser, Debug, Clone)]
#[command(name = "ism")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the speed-test server
    #[arg(long = "url")]
    pub url: Option<String>,

    /// Sampling cadence in milliseconds (time budget per cycle)
    #[arg(long)]
    pub cadence_ms: Option<u64>,

    /// Total session duration in milliseconds
    #[arg(long)]
    pub duration_ms: Option<u64>,

    /// Use the extended profile: 1 s cadence over a 5 s session
    #[arg(long)]
    pub extended: bool,

    /// Request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Emit the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.extended && (self.cadence_ms.is_some() || self.duration_ms.is_some()) {
            return Err(
                "Cannot combine --extended with --cadence-ms or --duration-ms".to_string(),
            );
        }

        if self.cadence_ms == Some(0) {
            return Err("--cadence-ms must be greater than 0".to_string());
        }

        if self.timeout == Some(0) {
            return Err("--timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true // Force color output when --color is specified
        } else if self.no_color || self.json {
            false
        } else {
            supports_color() // Use automatic detection
        }
    }
}

/// Detect whether the terminal supports colored output
fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    match std::env::var("TERM") {
        Ok(term) => term != "dumb",
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse_and_validate() {
        let cli = Cli::parse_from(["ism"]);
        assert!(cli.validate().is_ok());
        assert!(cli.url.is_none());
        assert!(!cli.extended);
    }

    #[test]
    fn test_conflicting_color_flags_rejected() {
        let cli = Cli::parse_from(["ism", "--color", "--no-color"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_extended_conflicts_with_explicit_cadence() {
        let cli = Cli::parse_from(["ism", "--extended", "--cadence-ms", "250"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_zero_cadence_rejected() {
        let cli = Cli::parse_from(["ism", "--cadence-ms", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_json_disables_colors() {
        let cli = Cli::parse_from(["ism", "--json"]);
        assert!(!cli.use_colors());
    }

    #[test]
    fn test_explicit_flags_parse() {
        let cli = Cli::parse_from([
            "ism",
            "--url",
            "http://speedtest.local:3000",
            "--cadence-ms",
            "250",
            "--duration-ms",
            "2000",
            "--timeout",
            "5",
            "--verbose",
        ]);
        assert!(cli.validate().is_ok());
        assert_eq!(cli.url.as_deref(), Some("http://speedtest.local:3000"));
        assert_eq!(cli.cadence_ms, Some(250));
        assert_eq!(cli.duration_ms, Some(2000));
        assert_eq!(cli.timeout, Some(5));
        assert!(cli.verbose);
    }
}

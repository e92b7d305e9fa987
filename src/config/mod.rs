//! Configuration loading: defaults, .env file, environment, CLI overrides

pub mod env;
pub mod parser;

pub use env::EnvManager;
pub use parser::{display_config_summary, load_config, validate_config, ConfigParser, ConfigWarning};

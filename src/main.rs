//! Internet Speed Meter - Main CLI Application

use clap::Parser;
use internet_speed_meter::{app::App, cli::Cli, error::AppError};
use std::{error::Error, process};

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    let cli = Cli::parse();

    if let Err(e) = run_application(cli).await {
        eprintln!("Error: {}", e);

        if let Some(source) = e.source() {
            eprintln!("Caused by: {}", source);
        }

        print_error_suggestions(&e);

        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> internet_speed_meter::Result<()> {
    let app = App::new(cli)?;
    app.run().await
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Validation(_) | AppError::Parse(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format");
            eprintln!("  - The base URL must start with http:// or https://");
            eprintln!("  - Cadence and timeout must be greater than zero");
        }
        AppError::Network(_) | AppError::HttpRequest(_) => {
            eprintln!();
            eprintln!("Network troubleshooting:");
            eprintln!("  - Check that the speed-test server is reachable");
            eprintln!("  - Verify the base URL with --url");
            eprintln!("  - Check firewall settings");
        }
        AppError::Timeout(_) => {
            eprintln!();
            eprintln!("Timeout troubleshooting:");
            eprintln!("  - Increase the timeout with --timeout");
            eprintln!("  - Try the extended profile with --extended");
        }
        _ => {}
    }
}

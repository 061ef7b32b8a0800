//! Web Vitals Auditor - Main CLI Application
//!
//! Analyzes a URL through the PageSpeed Insights API and renders a
//! prioritized, framework-aware remediation report.

use clap::Parser;
use std::{error::Error, process};
use web_vitals_auditor::{
    app::App,
    cli::Cli,
    error::{AppError, Result},
};

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("Please report this issue with the command you ran.");
        process::exit(1);
    }));

    // Parse command line arguments
    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

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
async fn run_application(cli: Cli) -> Result<()> {
    App::new(cli)?.run().await
}

/// Print actionable suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    eprintln!();
    eprintln!("{}", error.user_friendly_message());
    if error.is_recoverable() {
        eprintln!("\nThis looks transient - re-running the same command may succeed.");
    }
}

//! Courier CLI binary.
//!
//! This binary provides command-line access to Courier's functionality:
//! - Send a one-off request through the retry and rate-limit pipeline
//! - Inspect the configured provider limits

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, list_providers, run_fetch};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        courier::telemetry::init_with_filter("debug")?;
    } else {
        courier::telemetry::init_with_filter("warn")?;
    }

    // Execute the requested command
    match cli.command {
        Commands::Fetch(args) => {
            run_fetch(args, cli.verbose).await?;
        }

        Commands::Providers { config } => {
            list_providers(config.as_deref())?;
        }
    }

    Ok(())
}

//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use courier::Method;
use std::path::PathBuf;

/// Courier - outbound HTTP with single retry and per-provider rate limiting
#[derive(Parser, Debug)]
#[command(name = "courier")]
#[command(about = "Outbound HTTP with single retry and per-provider rate limiting", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one request and print the normalized result as JSON
    Fetch(FetchArgs),

    /// List configured providers and their limits
    Providers {
        /// Configuration file to use instead of the layered defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Arguments for `courier fetch`
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Target URL
    pub url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: Method,

    /// Provider whose rate limiter the request goes through
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Request header as 'Name: value' (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// JSON request body
    #[arg(long)]
    pub json: Option<String>,

    /// Status that ends the request with null instead of an error (repeatable)
    #[arg(long = "abort-status")]
    pub abort_statuses: Vec<u16>,

    /// Print status and headers along with the body
    #[arg(long)]
    pub envelope: bool,

    /// Configuration file to use instead of the layered defaults
    #[arg(long)]
    pub config: Option<PathBuf>,
}

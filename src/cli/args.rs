//! CLI argument definitions using clap
//!
//! Commands:
//! - formflow init --config <path>
//! - formflow serve --config <path> [--port <port>]
//! - formflow report --config <path> --form <id>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// formflow - form submission ingestion, live fan-out and analytics
#[derive(Parser, Debug)]
#[command(name = "formflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and write a default config if none exists
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./formflow.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./formflow.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the analytics report for one form and exit
    Report {
        /// Path to configuration file
        #[arg(long, default_value = "./formflow.json")]
        config: PathBuf,

        /// Form ID
        #[arg(long)]
        form: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

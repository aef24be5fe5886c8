//! CLI module
//!
//! Provides command-line interface for:
//! - init: Create the data directory
//! - serve: Boot the service and run the HTTP server
//! - report: One-shot analytics for a form

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{build_service, init, report, run, run_command, serve};
pub use config::{Config, StorageMode};
pub use errors::{CliError, CliResult};

//! CLI command implementations
//!
//! Boot order for `serve`: config → storage → service → HTTP.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use super::args::Command;
use super::config::{Config, StorageMode};
use super::errors::{CliError, CliResult};
use super::io::write_response;
use crate::core::FormService;
use crate::http_server::HttpServer;
use crate::observability::{log_event, log_event_with_fields, Event, Logger, Severity};
use crate::realtime::SubscriptionRegistry;
use crate::store::{FileFormStore, FormStore, MemFormStore};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(&config, port),
        Command::Report { config, form } => report(&config, &form),
    }
}

/// Create the data directory; writes a default config if none exists
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    if !config_path.exists() {
        config.save(config_path)?;
    }

    let data_dir = config.data_path();
    if is_initialized(data_dir) {
        return Err(CliError::AlreadyInitialized(config.data_dir.clone()));
    }
    FileFormStore::open(data_dir)?;

    write_response(json!({"initialized": true, "data_dir": config.data_dir}))
}

/// Start the HTTP server and block until it exits
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    log_event(Event::BootStart);

    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }
    Logger::set_min_severity(config.log_level);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("data_dir", &config.data_dir),
            ("addr", &config.http.socket_addr()),
        ],
    );

    let service = Arc::new(build_service(&config)?);
    let server = HttpServer::with_config(config.http.clone(), service);
    log_event(Event::BootComplete);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print one form's analytics report
pub fn report(config_path: &Path, form_id: &str) -> CliResult<()> {
    let config = Config::load(config_path)?;
    if config.storage == StorageMode::Memory {
        return Err(CliError::config_error(
            "report needs file storage; a memory store starts empty",
        ));
    }
    // Quiet unless something goes wrong; stdout carries the report
    Logger::set_min_severity(Severity::Warn);

    let service = build_service(&config)?;
    let report = service.generate_report(form_id, Utc::now())?;
    write_response(serde_json::to_value(report)?)
}

/// Assemble the service from configuration
pub fn build_service(config: &Config) -> CliResult<FormService> {
    let store: Arc<dyn FormStore> = match config.storage {
        StorageMode::Memory => Arc::new(MemFormStore::new()),
        StorageMode::File => Arc::new(FileFormStore::open(config.data_path())?),
    };
    let registry = Arc::new(SubscriptionRegistry::with_buffer(config.subscriber_buffer));
    Ok(FormService::with_registry(store, registry))
}

fn is_initialized(data_dir: &Path) -> bool {
    data_dir.join("forms").exists() && data_dir.join("submissions").exists()
}

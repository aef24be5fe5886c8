//! Configuration file
//!
//! JSON, every key optional. A missing file means all defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;
use crate::observability::Severity;
use crate::realtime::DEFAULT_SUBSCRIBER_BUFFER;

/// Where forms and submissions live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Process memory; lost on exit
    Memory,
    /// JSON documents under `data_dir`
    #[default]
    File,
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory for the file store
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default)]
    pub storage: StorageMode,

    /// host, port, cors_origins
    #[serde(flatten)]
    pub http: HttpServerConfig,

    /// Per-observer channel capacity (frames)
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,

    /// Lowest severity written to the log
    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_data_dir() -> String {
    "./formflow-data".to_string()
}

fn default_subscriber_buffer() -> usize {
    DEFAULT_SUBSCRIBER_BUFFER
}

fn default_log_level() -> Severity {
    Severity::Info
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage: StorageMode::default(),
            http: HttpServerConfig::default(),
            subscriber_buffer: default_subscriber_buffer(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;
        Self::parse(&content)
    }

    /// Parse and validate configuration JSON
    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.storage == StorageMode::File && self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir is required for file storage"));
        }

        if self.subscriber_buffer == 0 {
            return Err(CliError::config_error("subscriber_buffer must be > 0"));
        }

        if self.http.port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }

        self.http
            .parse_socket_addr()
            .map_err(|e| CliError::config_error(format!("Invalid host/port: {}", e)))?;

        if !self.http.allows_any_origin() {
            self.http.origin_headers().map_err(|origin| {
                CliError::config_error(format!("Invalid CORS origin: {}", origin))
            })?;
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Write this configuration as pretty JSON
    pub fn save(&self, path: &Path) -> CliResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

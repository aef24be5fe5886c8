//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::io;

use thiserror::Error;

use crate::core::CoreError;
use crate::store::StoreError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file missing fields or invalid
    #[error("FORMFLOW_CLI_CONFIG_ERROR: {0}")]
    Config(String),

    /// I/O error (filesystem, stdout)
    #[error("FORMFLOW_CLI_IO_ERROR: {0}")]
    Io(String),

    /// Data directory already initialized
    #[error("FORMFLOW_CLI_ALREADY_INITIALIZED: Data directory already initialized: {0}")]
    AlreadyInitialized(String),

    /// Server could not start
    #[error("FORMFLOW_CLI_BOOT_FAILED: {0}")]
    BootFailed(String),

    /// A service operation failed
    #[error("{}: {}", .0.code(), .0)]
    Core(#[from] CoreError),
}

impl CliError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::BootFailed(msg.into())
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        match self {
            Self::Config(_) => "FORMFLOW_CLI_CONFIG_ERROR",
            Self::Io(_) => "FORMFLOW_CLI_IO_ERROR",
            Self::AlreadyInitialized(_) => "FORMFLOW_CLI_ALREADY_INITIALIZED",
            Self::BootFailed(_) => "FORMFLOW_CLI_BOOT_FAILED",
            Self::Core(e) => e.code(),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Io(format!("JSON error: {}", e))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::BootFailed(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::config_error("port must be > 0");
        assert_eq!(err.to_string(), "FORMFLOW_CLI_CONFIG_ERROR: port must be > 0");
        assert_eq!(err.code_str(), "FORMFLOW_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_core_error_code_passes_through() {
        let err = CliError::from(CoreError::not_found("f1"));
        assert_eq!(err.code_str(), "FORM_NOT_FOUND");
        assert!(err.to_string().starts_with("FORM_NOT_FOUND: "));
    }
}

//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Backing storage could not be reached or written
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be decoded
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// Identifier cannot be mapped to a storage location
    #[error("Invalid identifier: {0}")]
    InvalidId(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Unavailable(_) => "STORE_UNAVAILABLE",
            StoreError::Corrupt(_) => "STORE_CORRUPT",
            StoreError::InvalidId(_) => "STORE_INVALID_ID",
        }
    }
}

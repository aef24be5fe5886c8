//! # Real-Time Errors
//!
//! Error types for the real-time module.

use thiserror::Error;
use uuid::Uuid;

/// Result type for real-time operations
pub type RealtimeResult<T> = Result<T, RealtimeError>;

/// Real-time errors
#[derive(Debug, Clone, Error)]
pub enum RealtimeError {
    /// Observer's receiving side is gone
    #[error("Subscriber {0} disconnected")]
    SubscriberGone(Uuid),

    /// Observer's buffer is full
    #[error("Subscriber {0} is not keeping up")]
    SubscriberLagging(Uuid),

    /// Frame could not be encoded
    #[error("Invalid message format: {0}")]
    InvalidMessage(String),
}

impl RealtimeError {
    /// Returns the close code for WebSocket
    pub fn close_code(&self) -> u16 {
        match self {
            RealtimeError::SubscriberGone(_) => 1000,
            RealtimeError::SubscriberLagging(_) => 1008,
            RealtimeError::InvalidMessage(_) => 1011,
        }
    }
}

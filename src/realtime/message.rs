//! # Real-Time Messages
//!
//! Frames pushed to observers. The only frame is `response_created`.

use serde::{Deserialize, Serialize};

use super::errors::{RealtimeError, RealtimeResult};
use crate::submission::Submission;

/// WebSocket message to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A submission was accepted for the observed form
    ResponseCreated(Submission),
}

impl ServerMessage {
    /// Encode as a JSON text frame
    pub fn to_json(&self) -> RealtimeResult<String> {
        serde_json::to_string(self).map_err(|e| RealtimeError::InvalidMessage(e.to_string()))
    }
}

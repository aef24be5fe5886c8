//! Request Context
//!
//! Caller identity and timing carried through a service call.

use std::time::Instant;

use uuid::Uuid;

use super::error::{CoreError, CoreResult};
use crate::schema::Form;

/// Context for one service call
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID for tracing
    pub request_id: Uuid,

    /// Identity set by the upstream authenticator, if any
    pub caller: Option<String>,

    /// Start time for duration tracking
    started_at: Instant,
}

impl RequestContext {
    /// Create a context for an identified caller
    pub fn for_caller(caller: impl Into<String>) -> Self {
        Self::new(Some(caller.into()))
    }

    /// Create an anonymous context
    pub fn anonymous() -> Self {
        Self::new(None)
    }

    /// Create a context from an optional identity, treating blank as absent
    pub fn new(caller: Option<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            caller: caller.filter(|c| !c.trim().is_empty()),
            started_at: Instant::now(),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }

    /// The caller ID, or `AuthRequired`
    pub fn require_caller(&self) -> CoreResult<&str> {
        self.caller.as_deref().ok_or(CoreError::AuthRequired)
    }

    /// Require that the caller owns `form`
    pub fn require_owner(&self, form: &Form) -> CoreResult<()> {
        let caller = self.require_caller()?;
        if form.is_owned_by(caller) {
            Ok(())
        } else {
            Err(CoreError::AccessDenied)
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

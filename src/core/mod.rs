//! # Core Module
//!
//! The service layer every transport routes through: ingestion, form
//! lifecycle and analytics over a shared store and subscription registry.
//!
//! ## Design Principles
//!
//! - Validation happens before anything is stored
//! - Publishing happens only after the submission is stored
//! - Fan-out failures never surface to the submitter
//! - Ownership is checked here, not in the transport

pub mod context;
pub mod error;
mod ingest;
pub mod lifecycle;
mod service;

pub use context::RequestContext;
pub use error::{CoreError, CoreResult};
pub use lifecycle::{FormDraft, FormUpdate};
pub use service::FormService;

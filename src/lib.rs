//! formflow - form submission ingestion, live fan-out and analytics
//!
//! Submissions are validated against a form's schema (with conditional
//! field visibility), stored, pushed to live observers of that form, and
//! folded into on-demand statistics.

pub mod analytics;
pub mod cli;
pub mod core;
pub mod http_server;
pub mod observability;
pub mod realtime;
pub mod schema;
pub mod store;
pub mod submission;

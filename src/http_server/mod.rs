//! # HTTP Server Module
//!
//! Axum transport over [`crate::core::FormService`].
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET|POST /api/forms` - List / create the caller's forms
//! - `GET|PUT /api/forms/:id` - Read / update a form
//! - `POST /api/forms/:id/responses` - Submit answers (public)
//! - `GET /api/forms/:id/analytics` - Owner-only report
//! - `GET /ws/forms/:id` - Live submissions (WebSocket)
//! - `GET /realtime/stats` - Observers per form
//! - `GET /observability/metrics` - Counters
//!
//! The caller is identified by the `x-user-id` header.

pub mod config;
pub mod form_routes;
pub mod observability_routes;
pub mod realtime_routes;
pub mod response;
pub mod server;

pub use config::HttpServerConfig;
pub use form_routes::CALLER_HEADER;
pub use response::{ApiError, ErrorResponse};
pub use server::HttpServer;

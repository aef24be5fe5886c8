//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Monotonic counters
//! - Typed lifecycle events
//!
//! Observability is read-only: nothing here can fail a request.
//!
//! ```ignore
//! use formflow::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::FormCreated, &[("form_id", "f1")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_submissions_accepted();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

//! Observable events
//!
//! Every lifecycle point that produces a log line has a typed name here.

use std::fmt;

use super::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    BootStart,
    BootComplete,
    Serving,
    ShutdownComplete,
    ConfigLoaded,

    // Forms
    FormCreated,
    FormUpdated,
    FormPublished,

    // Ingestion
    SubmissionAccepted,
    SubmissionRejected,
    StorageFailed,

    // Live channel
    SubscriberConnected,
    SubscriberDisconnected,
    SubscriberEvicted,
    BroadcastPublished,

    // Analytics
    ReportGenerated,

    // Transport
    RequestFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "FORMFLOW_STARTUP_BEGIN",
            Event::BootComplete => "FORMFLOW_STARTUP_COMPLETE",
            Event::Serving => "FORMFLOW_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::FormCreated => "FORM_CREATED",
            Event::FormUpdated => "FORM_UPDATED",
            Event::FormPublished => "FORM_PUBLISHED",

            Event::SubmissionAccepted => "SUBMISSION_ACCEPTED",
            Event::SubmissionRejected => "SUBMISSION_REJECTED",
            Event::StorageFailed => "STORAGE_FAILED",

            Event::SubscriberConnected => "SUBSCRIBER_CONNECTED",
            Event::SubscriberDisconnected => "SUBSCRIBER_DISCONNECTED",
            Event::SubscriberEvicted => "SUBSCRIBER_EVICTED",
            Event::BroadcastPublished => "BROADCAST_PUBLISHED",

            Event::ReportGenerated => "REPORT_GENERATED",

            Event::RequestFailed => "REQUEST_FAILED",
        }
    }

    /// Severity the event is normally logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SubmissionRejected | Event::SubscriberEvicted => Severity::Warn,
            Event::StorageFailed | Event::RequestFailed => Severity::Error,
            Event::BroadcastPublished => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

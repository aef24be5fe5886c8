//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, then `severity`, then fields sorted by key
//! - Synchronous, no buffering
//! - Lines below the process-wide minimum severity are dropped

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Severity::Trace,
            1 => Severity::Info,
            2 => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Info as u8);

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Set the lowest severity that is written
    pub fn set_min_severity(severity: Severity) {
        MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
    }

    /// Current minimum severity
    pub fn min_severity() -> Severity {
        Severity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    fn enabled(severity: Severity) -> bool {
        severity >= Self::min_severity()
    }

    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !Self::enabled(severity) {
            return;
        }
        if severity >= Severity::Error {
            Self::write_line(&mut io::stderr().lock(), severity, event, fields);
        } else {
            Self::write_line(&mut io::stdout().lock(), severity, event, fields);
        }
    }

    fn write_line<W: Write>(writer: &mut W, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = Self::render(severity, event, fields);
        // Logging never fails the caller
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    /// Render one line, newline included
    pub fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);

        let mut output = String::with_capacity(128);
        output.push_str("{\"event\":");
        output.push_str(&quote(event));
        output.push_str(",\"severity\":");
        output.push_str(&quote(severity.as_str()));
        for (key, value) in sorted {
            output.push(',');
            output.push_str(&quote(key));
            output.push(':');
            output.push_str(&quote(value));
        }
        output.push_str("}\n");
        output
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

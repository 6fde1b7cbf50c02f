//! Structured diagnostic logging.
//!
//! The controller records every noteworthy transition (rejections, upload
//! start, completion, failures with status and body) through an injected
//! [`DiagnosticSink`] rather than writing raw objects to the console. The
//! default sink routes serialized events through the `log` crate, which
//! `console_log` renders in the browser console.

use log::Level;
use serde::Serialize;

/// One structured diagnostic record.
#[derive(Clone, Debug, Serialize)]
pub struct DiagnosticEvent {
    /// Which part of the form produced the event.
    pub scope: &'static str,
    /// Human-readable summary.
    pub message: String,
    /// Machine-readable context (status codes, counts, response bodies).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl DiagnosticEvent {
    pub fn new(scope: &'static str, message: impl Into<String>) -> Self {
        Self {
            scope,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Destination for diagnostic events.
///
/// Injected into the controller so tests can observe what gets logged
/// without a console.
pub trait DiagnosticSink {
    fn record(&self, level: Level, event: DiagnosticEvent);
}

/// Default sink: serialized events through the `log` crate.
pub struct ConsoleDiagnostics;

impl DiagnosticSink for ConsoleDiagnostics {
    fn record(&self, level: Level, event: DiagnosticEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => log::log!(level, "{json}"),
            Err(_) => log::log!(level, "[{}] {}", event.scope, event.message),
        }
    }
}

/// Capturing sink for unit tests.
#[cfg(test)]
pub struct CapturingSink(pub std::cell::RefCell<Vec<(Level, DiagnosticEvent)>>);

#[cfg(test)]
impl CapturingSink {
    pub fn new() -> Self {
        Self(std::cell::RefCell::new(Vec::new()))
    }
}

#[cfg(test)]
impl DiagnosticSink for CapturingSink {
    fn record(&self, level: Level, event: DiagnosticEvent) {
        self.0.borrow_mut().push((level, event));
    }
}

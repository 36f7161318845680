//! Injected diagnostics sink.
//!
//! Anything worth keeping about a lookup - backend failures, scale
//! anomalies, what the OCR saw before a timeout - is handed to a sink owned
//! by the locator instance instead of ambient global state. The calling
//! automation layer decides what to do with the events.

use tracing::{debug, warn};

use crate::backend::EngineKind;

/// A diagnostic event emitted during a locate request.
#[derive(Debug, Clone)]
pub enum DiagEvent {
    /// An OCR source failed; the lookup continued with the next one.
    BackendFailed {
        engine: EngineKind,
        message: String,
    },
    /// A non-positive scale factor was replaced by 1.0.
    DegenerateScale {
        engine: EngineKind,
        scale_x: f32,
        scale_y: f32,
    },
    /// A full pass over every source produced no match. The lines the last
    /// responding source saw are included for inspection.
    NoMatch { last_seen_lines: Vec<String> },
    /// A wait loop gave up at its deadline.
    Timeout { elapsed_ms: u64 },
}

/// Receiver for diagnostic events, injected per locator instance.
pub trait DiagnosticsSink {
    fn record(&self, event: DiagEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&self, _event: DiagEvent) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, event: DiagEvent) {
        match event {
            DiagEvent::BackendFailed { engine, message } => {
                warn!(%engine, %message, "ocr source failed");
            }
            DiagEvent::DegenerateScale {
                engine,
                scale_x,
                scale_y,
            } => {
                warn!(%engine, scale_x, scale_y, "degenerate scale factor from source");
            }
            DiagEvent::NoMatch { last_seen_lines } => {
                debug!(lines = ?last_seen_lines, "no line matched the target");
            }
            DiagEvent::Timeout { elapsed_ms } => {
                warn!(elapsed_ms, "timed out waiting for text");
            }
        }
    }
}

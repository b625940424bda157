// crates/pickset-server/src/audit.rs
// ============================================================================
// Module: Pickset Audit Logging
// Description: Structured audit events for HTTP requests and queue flushes.
// Purpose: Emit JSON-lines logs without hard dependencies on a log pipeline.
// Dependencies: pickset-core, serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for the Pickset server.
//! Every event is a single JSON object on its own line, so deployments can
//! route stderr or the audit file into whatever collector they already run.
//!
//! Queue flushes originate inside the synchronous engine; [`EngineAuditBridge`]
//! adapts an [`AuditSink`] to the engine's [`FlushAuditSink`] interface.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use pickset_core::FlushAuditSink;
use pickset_core::FlushReport;
use pickset_core::FlushTrigger;
use pickset_core::QueueLane;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome classification for an HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    /// Request was accepted or answered.
    Ok,
    /// Request was rejected as malformed.
    Rejected,
    /// Engine state was unavailable.
    Unavailable,
}

/// HTTP request audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct HttpRequestEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// HTTP method.
    pub method: &'static str,
    /// Matched route template.
    pub route: &'static str,
    /// Response status code.
    pub status: u16,
    /// Request outcome.
    pub outcome: RequestOutcome,
    /// Error message returned to the client, if any.
    pub error: Option<String>,
}

/// Inputs required to construct an HTTP request event.
pub struct HttpRequestEventParams {
    /// HTTP method.
    pub method: &'static str,
    /// Matched route template.
    pub route: &'static str,
    /// Response status code.
    pub status: u16,
    /// Request outcome.
    pub outcome: RequestOutcome,
    /// Error message returned to the client, if any.
    pub error: Option<String>,
}

/// Queue flush audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct QueueFlushEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Lane that flushed.
    pub lane: QueueLane,
    /// Why the lane flushed.
    pub trigger: FlushTrigger,
    /// Operations buffered in the window.
    pub received: usize,
    /// Identifiers newly added.
    pub added: usize,
    /// Identifiers deselected.
    pub removed: usize,
    /// Select requests dropped for identifiers outside the universe.
    pub rejected: usize,
    /// Whether a reorder was applied.
    pub reordered: bool,
    /// Moves applied.
    pub moved: usize,
    /// Selection size after the flush.
    pub selection_len: usize,
    /// Universe size after the flush.
    pub universe_len: u64,
}

impl HttpRequestEvent {
    /// Creates a new request event with a consistent timestamp.
    #[must_use]
    pub fn new(params: HttpRequestEventParams) -> Self {
        Self {
            event: "http_request",
            timestamp_ms: now_ms(),
            method: params.method,
            route: params.route,
            status: params.status,
            outcome: params.outcome,
            error: params.error,
        }
    }
}

impl QueueFlushEvent {
    /// Creates a flush event from an engine report.
    #[must_use]
    pub fn new(report: &FlushReport) -> Self {
        Self {
            event: "queue_flush",
            timestamp_ms: now_ms(),
            lane: report.lane,
            trigger: report.trigger,
            received: report.received,
            added: report.added,
            removed: report.removed,
            rejected: report.rejected,
            reordered: report.reordered,
            moved: report.moved,
            selection_len: report.selection_len,
            universe_len: report.universe_len,
        }
    }
}

/// Milliseconds since the Unix epoch, zero if the clock is before it.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for Pickset server events.
pub trait AuditSink: Send + Sync {
    /// Record an HTTP request event.
    fn record_request(&self, event: &HttpRequestEvent);

    /// Record a queue flush event.
    fn record_flush(&self, _event: &QueueFlushEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record_request(&self, event: &HttpRequestEvent) {
        write_stderr(event);
    }

    fn record_flush(&self, event: &QueueFlushEvent) {
        write_stderr(event);
    }
}

/// Writes one serialized event to stderr.
fn write_stderr(event: &impl Serialize) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(std::io::stderr(), "{payload}");
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event.
    fn append(&self, event: &impl Serialize) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_request(&self, event: &HttpRequestEvent) {
        self.append(event);
    }

    fn record_flush(&self, event: &QueueFlushEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_request(&self, _event: &HttpRequestEvent) {}

    fn record_flush(&self, _event: &QueueFlushEvent) {}
}

// ============================================================================
// SECTION: Engine Bridge
// ============================================================================

/// Forwards engine flush reports to an [`AuditSink`].
pub struct EngineAuditBridge {
    /// Destination sink.
    sink: Arc<dyn AuditSink>,
}

impl EngineAuditBridge {
    /// Wraps a server audit sink.
    #[must_use]
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self {
            sink,
        }
    }
}

impl FlushAuditSink for EngineAuditBridge {
    fn record_flush(&self, report: &FlushReport) {
        self.sink.record_flush(&QueueFlushEvent::new(report));
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

// crates/pickset-core/src/interfaces/mod.rs
// ============================================================================
// Module: Pickset Interfaces
// Description: Clock and flush audit seams used by the selection engine.
// Purpose: Let hosts inject time sources and logging without core changes.
// Dependencies: crate::runtime
// ============================================================================

//! ## Overview
//! The engine reads time through [`Clock`] and reports every applied batch
//! through [`FlushAuditSink`]. Production hosts pass the system clock and a
//! JSON-lines sink; tests pass a manual clock and a recording sink.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Instant;

use crate::runtime::FlushReport;

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Monotonic time source for queue deadlines.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

// ============================================================================
// SECTION: Flush Audit
// ============================================================================

/// Receives a report for every queue flush that applied a batch.
pub trait FlushAuditSink: Send + Sync {
    /// Records a flush report.
    fn record_flush(&self, report: &FlushReport);
}

/// Flush audit sink that discards reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFlushAuditSink;

impl FlushAuditSink for NoopFlushAuditSink {
    fn record_flush(&self, _report: &FlushReport) {}
}

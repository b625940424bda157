// crates/pickset-core/src/lib.rs
// ============================================================================
// Module: Pickset Core Library
// Description: Public API surface for the Pickset membership and ordering core.
// Purpose: Expose identifier, selection, availability, and queue types.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Pickset core keeps two disjoint sets of positive integer identifiers: an
//! ordered selection and the available complement inside an implicit
//! identifier universe. Client writes are buffered and coalesced by a
//! two-lane mutation queue and applied in a fixed order; reads always flush
//! first. The crate is synchronous and transport-agnostic.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use interfaces::Clock;
pub use interfaces::FlushAuditSink;
pub use interfaces::NoopFlushAuditSink;
pub use runtime::DeadlineTimer;
pub use runtime::EngineConfig;
pub use runtime::FlushReport;
pub use runtime::FlushTrigger;
pub use runtime::ManualClock;
pub use runtime::MutationQueue;
pub use runtime::QueueConfig;
pub use runtime::QueueLane;
pub use runtime::SelectionEngine;
pub use runtime::SelectionOp;
pub use runtime::SystemClock;

// crates/pickset-server/src/lib.rs
// ============================================================================
// Module: Pickset Server Library
// Description: HTTP API, selection service, and audit sinks.
// Purpose: Host the selection engine behind a JSON HTTP interface.
// Dependencies: axum, pickset-config, pickset-core, serde, tokio
// ============================================================================

//! ## Overview
//! `pickset-server` wires a [`pickset_core::SelectionEngine`] into an axum
//! router. The engine lives behind one mutex in [`SelectionService`]; a
//! driver task flushes lanes on their deadlines, and every read flushes first.
//! Inputs are untrusted and parsed in [`boundary`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod boundary;
pub mod server;
pub mod service;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::FileAuditSink;
pub use audit::HttpRequestEvent;
pub use audit::NoopAuditSink;
pub use audit::QueueFlushEvent;
pub use audit::StderrAuditSink;
pub use boundary::BoundaryError;
pub use server::PicksetServer;
pub use server::ServerError;
pub use service::SelectionService;
pub use service::ServiceError;

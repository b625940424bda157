// crates/pickset-config/src/lib.rs
// ============================================================================
// Module: Pickset Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for pickset.toml semantics.
// Dependencies: pickset-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! `pickset-config` defines the configuration model for the Pickset service.
//! Loading is strict and fail-closed: oversized files, unknown fields, and
//! out-of-range values are rejected before the server starts.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;

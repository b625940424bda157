// crates/pickset-core/src/runtime/mod.rs
// ============================================================================
// Module: Pickset Runtime
// Description: Mutation queue, deadline timers, clocks, and the engine.
// Purpose: Turn buffered client writes into applied, consistent batches.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime buffers writes in a two-lane [`MutationQueue`], tracks batch
//! windows with [`DeadlineTimer`], and applies coalesced batches through the
//! [`SelectionEngine`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod clock;
pub mod engine;
pub mod queue;
pub mod timer;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use clock::ManualClock;
pub use clock::SystemClock;
pub use engine::EngineConfig;
pub use engine::FlushReport;
pub use engine::FlushTrigger;
pub use engine::SelectionEngine;
pub use queue::DEFAULT_SELECTION_WINDOW;
pub use queue::DEFAULT_UNIVERSE_WINDOW;
pub use queue::MutationQueue;
pub use queue::QueueConfig;
pub use queue::QueueLane;
pub use queue::SelectionBatch;
pub use queue::SelectionOp;
pub use queue::UniverseBatch;
pub use timer::DeadlineTimer;

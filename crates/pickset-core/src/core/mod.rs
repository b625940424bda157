// crates/pickset-core/src/core/mod.rs
// ============================================================================
// Module: Pickset Core Types
// Description: Identifier, universe, selection, availability, and page types.
// Purpose: Group the in-memory membership and ordering model.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types describe the data model: identifiers, the identifier universe,
//! the ordered selection, and the derived availability view. None of these
//! types know about queuing or timers; see [`crate::runtime`] for that.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod availability;
pub mod identifiers;
pub mod page;
pub mod selection;
pub mod universe;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use availability::AvailabilityView;
pub use identifiers::IdFilter;
pub use identifiers::Identifier;
pub use page::DEFAULT_PAGE_LIMIT;
pub use page::MAX_PAGE_LIMIT;
pub use page::Page;
pub use page::PageRequest;
pub use selection::SelectionStore;
pub use universe::DEFAULT_RANGE_MAX;
pub use universe::IdentifierUniverse;

// crates/pickset-core/src/core/universe.rs
// ============================================================================
// Module: Identifier Universe
// Description: Implicit dense identifier range plus sparse custom identifiers.
// Purpose: Answer membership without materializing the dense range.
// Dependencies: crate::core::identifiers
// ============================================================================

//! ## Overview
//! The universe is every identifier that exists: the dense range `1..=N` plus
//! custom identifiers added at runtime. The dense range is never stored.
//! Custom identifiers grow monotonically and are kept in ascending order so
//! the availability walk can visit them after the dense range.
//!
//! Custom identifiers that already fall inside `1..=N` are members of the
//! dense range and are not recorded a second time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::collections::btree_set;

use crate::core::identifiers::Identifier;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default upper bound of the dense identifier range.
pub const DEFAULT_RANGE_MAX: u64 = 1_000_000;

// ============================================================================
// SECTION: Identifier Universe
// ============================================================================

/// Set of all known identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierUniverse {
    /// Inclusive upper bound of the dense range.
    range_max: Identifier,
    /// Custom identifiers strictly above `range_max`.
    custom: BTreeSet<Identifier>,
}

impl IdentifierUniverse {
    /// Creates a universe covering `1..=range_max` with no custom identifiers.
    #[must_use]
    pub const fn new(range_max: Identifier) -> Self {
        Self {
            range_max,
            custom: BTreeSet::new(),
        }
    }

    /// Returns the inclusive upper bound of the dense range.
    #[must_use]
    pub const fn range_max(&self) -> Identifier {
        self.range_max
    }

    /// Returns true when `id` is part of the universe.
    #[must_use]
    pub fn contains(&self, id: Identifier) -> bool {
        self.in_range(id) || self.custom.contains(&id)
    }

    /// Returns true when `id` lies inside the dense range.
    #[must_use]
    pub fn in_range(&self, id: Identifier) -> bool {
        id <= self.range_max
    }

    /// Adds custom identifiers. Known identifiers are ignored.
    ///
    /// Returns the number of identifiers that were new to the universe.
    pub fn add_custom(&mut self, ids: impl IntoIterator<Item = Identifier>) -> usize {
        let mut added = 0;
        for id in ids {
            if !self.in_range(id) && self.custom.insert(id) {
                added += 1;
            }
        }
        added
    }

    /// Returns the greatest identifier currently known.
    #[must_use]
    pub fn max_id(&self) -> Identifier {
        self.custom.last().copied().unwrap_or(self.range_max)
    }

    /// Returns the number of custom identifiers.
    #[must_use]
    pub fn custom_len(&self) -> usize {
        self.custom.len()
    }

    /// Returns the total number of identifiers in the universe.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.range_max.get().saturating_add(self.custom.len() as u64)
    }

    /// Always false: the dense range holds at least one identifier.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterates custom identifiers in ascending order.
    pub fn custom_ids(&self) -> btree_set::Iter<'_, Identifier> {
        self.custom.iter()
    }
}

impl Default for IdentifierUniverse {
    fn default() -> Self {
        Self::new(Identifier::new(DEFAULT_RANGE_MAX).unwrap_or(Identifier::MIN))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

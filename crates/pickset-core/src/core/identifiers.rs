// crates/pickset-core/src/core/identifiers.rs
// ============================================================================
// Module: Pickset Identifiers
// Description: Positive integer identifiers and exact-match filters.
// Purpose: Provide a strongly typed, serializable ID with a stable numeric form.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every item in Pickset is named by a positive integer [`Identifier`].
//! Identifiers serialize as bare JSON numbers. Positivity is enforced by the
//! constructor; boundary layers reject zero before an identifier is built.
//!
//! [`IdFilter`] captures the exact-ID filter accepted by the read paths. The
//! filter text is parsed once so the stores never see raw strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU64;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier
// ============================================================================

/// Positive integer identifier for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(NonZeroU64);

impl Identifier {
    /// Smallest valid identifier.
    pub const MIN: Self = Self(NonZeroU64::MIN);

    /// Creates an identifier from a raw value, rejecting zero.
    #[must_use]
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }

    /// Returns the next identifier, or `None` on overflow.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<NonZeroU64> for Identifier {
    fn from(value: NonZeroU64) -> Self {
        Self(value)
    }
}

impl From<Identifier> for u64 {
    fn from(value: Identifier) -> Self {
        value.get()
    }
}

// ============================================================================
// SECTION: Filters
// ============================================================================

/// Exact-ID filter applied to available or selected pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdFilter {
    /// Match a single identifier.
    Exact(Identifier),
    /// Filter text was present but does not name a valid identifier.
    Unmatchable,
}

impl IdFilter {
    /// Parses raw filter text.
    ///
    /// Returns `None` when the trimmed text is empty (no filter). Text that is
    /// not a positive base-10 integer becomes [`IdFilter::Unmatchable`], which
    /// matches nothing.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let parsed = trimmed.parse::<u64>().ok().and_then(Identifier::new);
        Some(parsed.map_or(Self::Unmatchable, Self::Exact))
    }

    /// Returns the identifier this filter matches, if any.
    #[must_use]
    pub const fn target(self) -> Option<Identifier> {
        match self {
            Self::Exact(id) => Some(id),
            Self::Unmatchable => None,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

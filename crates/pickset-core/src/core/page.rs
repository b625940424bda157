// crates/pickset-core/src/core/page.rs
// ============================================================================
// Module: Pagination
// Description: Page requests and page results for available/selected reads.
// Purpose: Keep the 1-based page convention in one place.
// Dependencies: serde, crate::core::identifiers
// ============================================================================

//! ## Overview
//! Pages are 1-based. A request for page `p` with limit `l` reads the window
//! starting at offset `(p - 1) * l`. The boundary layer caps the limit; the
//! request type only guarantees that page and limit are at least one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::identifiers::IdFilter;
use crate::core::identifiers::Identifier;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default number of identifiers per page.
pub const DEFAULT_PAGE_LIMIT: usize = 20;
/// Hard cap on identifiers per page.
pub const MAX_PAGE_LIMIT: usize = 100;

// ============================================================================
// SECTION: Page Types
// ============================================================================

/// Read request for one page of identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    page: u64,
    /// Maximum identifiers on the page.
    limit: usize,
    /// Optional exact-ID filter.
    filter: Option<IdFilter>,
}

impl PageRequest {
    /// Creates a request; page and limit are raised to at least one.
    #[must_use]
    pub fn new(page: u64, limit: usize, filter: Option<IdFilter>) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            filter,
        }
    }

    /// Returns the first page with the default limit and no filter.
    #[must_use]
    pub fn first() -> Self {
        Self::new(1, DEFAULT_PAGE_LIMIT, None)
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the exact-ID filter, if any.
    #[must_use]
    pub const fn filter(&self) -> Option<IdFilter> {
        self.filter
    }

    /// Returns the zero-based offset of the first identifier on the page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit as u64)
    }
}

/// One page of identifiers plus the total matching count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Identifiers on this page.
    pub ids: Vec<Identifier>,
    /// Total identifiers matching the request filter.
    pub total: u64,
}

// ============================================================================
// SECTION: Tests
// ============================================================================

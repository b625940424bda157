// crates/pickset-core/src/core/availability.rs
// ============================================================================
// Module: Availability View
// Description: On-demand complement of the selection within the universe.
// Purpose: Page through available identifiers without materializing the range.
// Dependencies: crate::core::{identifiers, selection, universe}
// ============================================================================

//! ## Overview
//! An identifier is available when it belongs to the universe and is not
//! selected. The view borrows the universe and the selection and computes
//! pages on demand. Ascending order is the dense range `1..=N` followed by the
//! custom identifiers.
//!
//! Locating the `offset`-th available identifier inside the dense range walks
//! the sorted selection once instead of scanning from 1, so deep pages near
//! `N` cost the same as the first page.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::identifiers::IdFilter;
use crate::core::identifiers::Identifier;
use crate::core::selection::SelectionStore;
use crate::core::universe::IdentifierUniverse;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Upper bound on the capacity reserved up front for a single page.
const MAX_PAGE_PREALLOC: usize = 128;

// ============================================================================
// SECTION: Availability View
// ============================================================================

/// Read-only view over the available identifiers.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityView<'a> {
    /// Universe of known identifiers.
    universe: &'a IdentifierUniverse,
    /// Current selection.
    selection: &'a SelectionStore,
}

impl<'a> AvailabilityView<'a> {
    /// Creates a view over the given universe and selection.
    #[must_use]
    pub const fn new(universe: &'a IdentifierUniverse, selection: &'a SelectionStore) -> Self {
        Self {
            universe,
            selection,
        }
    }

    /// Returns true when `id` is in the universe and not selected.
    #[must_use]
    pub fn is_available(&self, id: Identifier) -> bool {
        self.universe.contains(id) && !self.selection.contains(id)
    }

    /// Returns up to `limit` available identifiers starting at `offset`.
    #[must_use]
    pub fn slice(&self, offset: u64, limit: usize) -> Vec<Identifier> {
        let mut page = Vec::with_capacity(limit.min(MAX_PAGE_PREALLOC));
        if limit == 0 {
            return page;
        }
        let range_max = self.universe.range_max();
        let available_in_range = range_max.get() - self.selected_in_range();
        let custom_skip = if offset < available_in_range {
            let mut cursor = self.nth_in_range(offset);
            while let Some(id) = cursor
                && id <= range_max
                && page.len() < limit
            {
                if !self.selection.contains(id) {
                    page.push(id);
                }
                cursor = id.next();
            }
            0
        } else {
            offset - available_in_range
        };
        let remaining = limit - page.len();
        if remaining > 0 {
            page.extend(
                self.universe
                    .custom_ids()
                    .copied()
                    .filter(|id| !self.selection.contains(*id))
                    .skip(usize::try_from(custom_skip).unwrap_or(usize::MAX))
                    .take(remaining),
            );
        }
        page
    }

    /// Returns `[id]` when the filter names an available identifier.
    #[must_use]
    pub fn filtered(&self, filter: IdFilter) -> Vec<Identifier> {
        filter.target().filter(|id| self.is_available(*id)).into_iter().collect()
    }

    /// Returns a page of available identifiers, optionally narrowed by a filter.
    #[must_use]
    pub fn page(&self, filter: Option<IdFilter>, offset: u64, limit: usize) -> Vec<Identifier> {
        match filter {
            None => self.slice(offset, limit),
            Some(filter) => self
                .filtered(filter)
                .into_iter()
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(limit)
                .collect(),
        }
    }

    /// Counts the available identifiers matching `filter`.
    #[must_use]
    pub fn total(&self, filter: Option<IdFilter>) -> u64 {
        match filter {
            Some(filter) => self.filtered(filter).len() as u64,
            None => {
                let selected_members = self
                    .selection
                    .ascending()
                    .filter(|id| self.universe.contains(**id))
                    .count() as u64;
                self.universe.len().saturating_sub(selected_members)
            }
        }
    }

    /// Counts selected identifiers inside the dense range.
    fn selected_in_range(&self) -> u64 {
        let range_max = self.universe.range_max();
        self.selection.ascending().take_while(|id| **id <= range_max).count() as u64
    }

    /// Returns the `n`-th (zero-based) available identifier in the dense range.
    ///
    /// Starts from the candidate `n + 1` and shifts it right once for every
    /// selected identifier at or below it. The caller bounds `n` by the number
    /// of available identifiers in range.
    fn nth_in_range(&self, n: u64) -> Option<Identifier> {
        let mut candidate = n.checked_add(1)?;
        for selected in self.selection.ascending() {
            if selected.get() > candidate {
                break;
            }
            candidate += 1;
        }
        Identifier::new(candidate)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions use unwrap/expect for clarity."
    )]

    use super::AvailabilityView;
    use crate::core::identifiers::IdFilter;
    use crate::core::identifiers::Identifier;
    use crate::core::selection::SelectionStore;
    use crate::core::universe::IdentifierUniverse;

    fn id(raw: u64) -> Identifier {
        Identifier::new(raw).expect("nonzero id")
    }

    fn raw(ids: &[Identifier]) -> Vec<u64> {
        ids.iter().map(|value| value.get()).collect()
    }

    #[test]
    fn deep_page_on_million_range() {
        let universe = IdentifierUniverse::default();
        let selection = SelectionStore::new();
        let view = AvailabilityView::new(&universe, &selection);
        assert_eq!(raw(&view.slice(999_998, 20)), vec![999_999, 1_000_000]);
        assert_eq!(view.total(None), 1_000_000);
    }

    #[test]
    fn slice_skips_selected_ids() {
        let universe = IdentifierUniverse::new(id(10));
        let mut selection = SelectionStore::new();
        selection.add([id(2), id(3), id(7)]);
        let view = AvailabilityView::new(&universe, &selection);
        assert_eq!(raw(&view.slice(0, 4)), vec![1, 4, 5, 6]);
        assert_eq!(raw(&view.slice(1, 3)), vec![4, 5, 6]);
        assert_eq!(raw(&view.slice(4, 10)), vec![8, 9, 10]);
        assert_eq!(view.total(None), 7);
    }

    #[test]
    fn slice_continues_into_custom_ids() {
        let mut universe = IdentifierUniverse::new(id(5));
        universe.add_custom([id(40), id(12), id(30)]);
        let mut selection = SelectionStore::new();
        selection.add([id(5), id(30)]);
        let view = AvailabilityView::new(&universe, &selection);
        assert_eq!(raw(&view.slice(2, 10)), vec![3, 4, 12, 40]);
        assert_eq!(raw(&view.slice(4, 10)), vec![12, 40]);
        assert_eq!(raw(&view.slice(5, 10)), vec![40]);
        assert!(view.slice(6, 10).is_empty());
        assert_eq!(view.total(None), 6);
    }

    #[test]
    fn slice_with_zero_limit_is_empty() {
        let universe = IdentifierUniverse::new(id(5));
        let selection = SelectionStore::new();
        let view = AvailabilityView::new(&universe, &selection);
        assert!(view.slice(0, 0).is_empty());
    }

    #[test]
    fn fully_selected_range_yields_custom_ids_only() {
        let mut universe = IdentifierUniverse::new(id(3));
        universe.add_custom([id(9)]);
        let mut selection = SelectionStore::new();
        selection.add([id(1), id(2), id(3)]);
        let view = AvailabilityView::new(&universe, &selection);
        assert_eq!(raw(&view.slice(0, 5)), vec![9]);
        assert_eq!(view.total(None), 1);
    }

    #[test]
    fn filtered_requires_universe_membership_and_no_selection() {
        let mut universe = IdentifierUniverse::new(id(100));
        universe.add_custom([id(500)]);
        let mut selection = SelectionStore::new();
        selection.add([id(42)]);
        let view = AvailabilityView::new(&universe, &selection);
        assert_eq!(raw(&view.filtered(IdFilter::Exact(id(7)))), vec![7]);
        assert!(view.filtered(IdFilter::Exact(id(42))).is_empty());
        assert!(view.filtered(IdFilter::Exact(id(200))).is_empty());
        assert_eq!(raw(&view.filtered(IdFilter::Exact(id(500)))), vec![500]);
        assert!(view.filtered(IdFilter::Unmatchable).is_empty());
        assert_eq!(view.total(Some(IdFilter::Exact(id(7)))), 1);
        assert_eq!(view.total(Some(IdFilter::Exact(id(42)))), 0);
        assert!(view.page(Some(IdFilter::Exact(id(7))), 20, 20).is_empty());
    }
}

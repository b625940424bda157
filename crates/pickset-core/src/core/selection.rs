// crates/pickset-core/src/core/selection.rs
// ============================================================================
// Module: Selection Store
// Description: Ordered, duplicate-free sequence of selected identifiers.
// Purpose: Own the add, remove, reorder, and move algorithms.
// Dependencies: crate::core::identifiers
// ============================================================================

//! ## Overview
//! The selection is a user-ordered sequence of identifiers with set semantics:
//! an identifier appears at most once. The sequence order is authoritative;
//! a sorted membership index is maintained alongside it so that membership
//! tests and ascending walks (used by the availability view) stay cheap.
//!
//! Operations are linear in the selection size. Selections are edited at
//! human pace, so the sequence is a plain vector.
//!
//! Invariants:
//! - `order` never contains duplicates.
//! - `members` holds exactly the identifiers in `order`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::collections::HashSet;
use std::collections::btree_set;

use crate::core::identifiers::IdFilter;
use crate::core::identifiers::Identifier;

// ============================================================================
// SECTION: Selection Store
// ============================================================================

/// Ordered set of selected identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    /// User-controlled order.
    order: Vec<Identifier>,
    /// Sorted membership index mirroring `order`.
    members: BTreeSet<Identifier>,
}

impl SelectionStore {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            order: Vec::new(),
            members: BTreeSet::new(),
        }
    }

    /// Returns the number of selected identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns true when `id` is selected.
    #[must_use]
    pub fn contains(&self, id: Identifier) -> bool {
        self.members.contains(&id)
    }

    /// Appends identifiers that are not yet selected, in input order.
    ///
    /// Identifiers already present keep their position. Returns the number of
    /// newly selected identifiers.
    pub fn add(&mut self, ids: impl IntoIterator<Item = Identifier>) -> usize {
        let mut added = 0;
        for id in ids {
            if self.members.insert(id) {
                self.order.push(id);
                added += 1;
            }
        }
        added
    }

    /// Removes `id` when present. Returns whether anything was removed.
    pub fn remove(&mut self, id: Identifier) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.order.retain(|existing| *existing != id);
        true
    }

    /// Moves the selected identifiers named in `desired` to the front.
    ///
    /// Named identifiers keep the order given (first occurrence wins for
    /// repeats); identifiers that are not selected are ignored. Identifiers
    /// not named keep their relative order after the named ones.
    pub fn reorder(&mut self, desired: &[Identifier]) {
        let mut seen = HashSet::with_capacity(desired.len());
        let mut reordered = Vec::with_capacity(self.order.len());
        for id in desired {
            if self.members.contains(id) && seen.insert(*id) {
                reordered.push(*id);
            }
        }
        if reordered.is_empty() {
            return;
        }
        reordered.extend(self.order.iter().copied().filter(|id| !seen.contains(id)));
        self.order = reordered;
    }

    /// Relocates `move_id` immediately before `before_id`.
    ///
    /// No-op when `move_id` is not selected. When `before_id` is `None` or not
    /// selected (after `move_id` is taken out), `move_id` goes to the end.
    /// Returns whether `move_id` was selected.
    pub fn move_before(&mut self, move_id: Identifier, before_id: Option<Identifier>) -> bool {
        let Some(current) = self.position(move_id) else {
            return false;
        };
        self.order.remove(current);
        let target = before_id.and_then(|anchor| self.position(anchor));
        match target {
            Some(index) => self.order.insert(index, move_id),
            None => self.order.push(move_id),
        }
        true
    }

    /// Returns a copy of the full selection order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Identifier> {
        self.order.clone()
    }

    /// Returns the selection order as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Identifier] {
        &self.order
    }

    /// Returns a page of the selection, optionally narrowed by an exact filter.
    ///
    /// With a filter the candidate list is `[id]` when `id` is selected and
    /// empty otherwise; the page window is applied to that list.
    #[must_use]
    pub fn filtered_slice(
        &self,
        filter: Option<IdFilter>,
        offset: usize,
        limit: usize,
    ) -> Vec<Identifier> {
        match filter {
            None => self.order.iter().skip(offset).take(limit).copied().collect(),
            Some(filter) => {
                self.filter_match(filter).into_iter().skip(offset).take(limit).collect()
            }
        }
    }

    /// Counts the identifiers matching `filter` (all selected when `None`).
    #[must_use]
    pub fn count(&self, filter: Option<IdFilter>) -> usize {
        match filter {
            None => self.order.len(),
            Some(filter) => usize::from(self.filter_match(filter).is_some()),
        }
    }

    /// Iterates selected identifiers in ascending numeric order.
    pub fn ascending(&self) -> btree_set::Iter<'_, Identifier> {
        self.members.iter()
    }

    /// Iterates selected identifiers in ascending order starting at `from`.
    pub fn ascending_from(&self, from: Identifier) -> btree_set::Range<'_, Identifier> {
        self.members.range(from ..)
    }

    /// Resolves an exact filter against the selection.
    fn filter_match(&self, filter: IdFilter) -> Option<Identifier> {
        filter.target().filter(|id| self.members.contains(id))
    }

    /// Returns the index of `id` in the order.
    fn position(&self, id: Identifier) -> Option<usize> {
        if !self.members.contains(&id) {
            return None;
        }
        self.order.iter().position(|existing| *existing == id)
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

    use super::SelectionStore;
    use crate::core::identifiers::IdFilter;
    use crate::core::identifiers::Identifier;

    fn ids(raw: &[u64]) -> Vec<Identifier> {
        raw.iter().map(|value| Identifier::new(*value).expect("nonzero id")).collect()
    }

    fn raw(store: &SelectionStore) -> Vec<u64> {
        store.as_slice().iter().map(|id| id.get()).collect()
    }

    fn store_with(raw_ids: &[u64]) -> SelectionStore {
        let mut store = SelectionStore::new();
        store.add(ids(raw_ids));
        store
    }

    #[test]
    fn add_is_idempotent_and_keeps_positions() {
        let mut store = store_with(&[1, 2, 3]);
        assert_eq!(store.add(ids(&[2, 4, 1, 4])), 1);
        assert_eq!(raw(&store), vec![1, 2, 3, 4]);
        assert_eq!(store.add(ids(&[4])), 0);
        assert_eq!(raw(&store), vec![1, 2, 3, 4]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut store = store_with(&[1, 2]);
        assert!(!store.remove(ids(&[9])[0]));
        assert!(store.remove(ids(&[1])[0]));
        assert_eq!(raw(&store), vec![2]);
        assert!(!store.contains(ids(&[1])[0]));
    }

    #[test]
    fn reorder_moves_named_ids_to_front() {
        let mut store = store_with(&[1, 2, 3, 4]);
        store.reorder(&ids(&[3, 1]));
        assert_eq!(raw(&store), vec![3, 1, 2, 4]);
    }

    #[test]
    fn reorder_ignores_unselected_and_repeated_ids() {
        let mut store = store_with(&[1, 2, 3]);
        store.reorder(&ids(&[9, 3, 3, 2]));
        assert_eq!(raw(&store), vec![3, 2, 1]);
        store.reorder(&ids(&[42]));
        assert_eq!(raw(&store), vec![3, 2, 1]);
    }

    #[test]
    fn move_before_and_to_end() {
        let mut store = store_with(&[1, 2, 3]);
        assert!(store.move_before(ids(&[3])[0], Some(ids(&[1])[0])));
        assert_eq!(raw(&store), vec![3, 1, 2]);

        let mut store = store_with(&[1, 2, 3]);
        assert!(store.move_before(ids(&[3])[0], None));
        assert_eq!(raw(&store), vec![1, 2, 3]);
        assert!(store.move_before(ids(&[1])[0], None));
        assert_eq!(raw(&store), vec![2, 3, 1]);
    }

    #[test]
    fn move_with_unknown_anchor_appends() {
        let mut store = store_with(&[1, 2]);
        assert!(store.move_before(ids(&[1])[0], Some(ids(&[99])[0])));
        assert_eq!(raw(&store), vec![2, 1]);
    }

    #[test]
    fn move_of_unselected_id_is_noop() {
        let mut store = store_with(&[1, 2]);
        assert!(!store.move_before(ids(&[7])[0], Some(ids(&[1])[0])));
        assert_eq!(raw(&store), vec![1, 2]);
    }

    #[test]
    fn move_before_itself_appends() {
        let mut store = store_with(&[1, 2, 3]);
        assert!(store.move_before(ids(&[1])[0], Some(ids(&[1])[0])));
        assert_eq!(raw(&store), vec![2, 3, 1]);
    }

    #[test]
    fn filtered_slice_and_count() {
        let store = store_with(&[5, 42, 7]);
        let exact = IdFilter::parse("42");
        assert_eq!(store.filtered_slice(exact, 0, 20), ids(&[42]));
        assert_eq!(store.count(exact), 1);
        let missing = IdFilter::parse("8");
        assert!(store.filtered_slice(missing, 0, 20).is_empty());
        assert_eq!(store.count(missing), 0);
        let garbage = IdFilter::parse("forty-two");
        assert!(store.filtered_slice(garbage, 0, 20).is_empty());
        assert_eq!(store.count(garbage), 0);
        assert_eq!(store.filtered_slice(None, 1, 1), ids(&[42]));
        assert_eq!(store.count(None), 3);
        assert!(store.filtered_slice(exact, 20, 20).is_empty());
    }

    #[test]
    fn ascending_views_follow_numeric_order() {
        let store = store_with(&[40, 1, 20, 3]);
        let ascending: Vec<u64> = store.ascending().map(|id| id.get()).collect();
        assert_eq!(ascending, vec![1, 3, 20, 40]);
        let tail: Vec<u64> = store.ascending_from(ids(&[4])[0]).map(|id| id.get()).collect();
        assert_eq!(tail, vec![20, 40]);
    }
}

// crates/pickset-core/src/runtime/queue.rs
// ============================================================================
// Module: Mutation Queue
// Description: Buffered client mutations with per-lane batch windows.
// Purpose: Coalesce bursts of writes into consistent batches.
// Dependencies: serde, crate::core, crate::runtime::timer
// ============================================================================

//! ## Overview
//! The queue has two independent lanes, each with its own [`DeadlineTimer`]:
//!
//! - The **universe** lane buffers `AddElement` operations for a long window
//!   and drains them as a de-duplicated list of identifiers.
//! - The **selection** lane buffers add, remove, reorder, and move operations
//!   for a short window and drains them as a [`SelectionBatch`].
//!
//! Draining a lane disarms its timer. Applying a drained batch is the
//! engine's job; the queue only buffers and coalesces.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::collections::HashSet;
use std::time::Duration;
use std::time::Instant;

use serde::Serialize;

use crate::core::identifiers::Identifier;
use crate::runtime::timer::DeadlineTimer;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default batch window for the universe lane.
pub const DEFAULT_UNIVERSE_WINDOW: Duration = Duration::from_secs(10);
/// Default batch window for the selection lane.
pub const DEFAULT_SELECTION_WINDOW: Duration = Duration::from_secs(1);

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Queue lane identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueLane {
    /// Universe growth (`AddElement`).
    Universe,
    /// Selection membership and order.
    Selection,
}

/// Buffered selection mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOp {
    /// Select an identifier.
    Add(Identifier),
    /// Deselect an identifier.
    Remove(Identifier),
    /// Move the named selected identifiers to the front, in order.
    Reorder(Vec<Identifier>),
    /// Relocate one selected identifier before another (or to the end).
    Move {
        /// Identifier to relocate.
        move_id: Identifier,
        /// Anchor identifier; `None` means append at the end.
        before_id: Option<Identifier>,
    },
}

/// Batch window configuration for both lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    /// Batch window for `AddElement` operations.
    pub universe_window: Duration,
    /// Batch window for selection operations.
    pub selection_window: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            universe_window: DEFAULT_UNIVERSE_WINDOW,
            selection_window: DEFAULT_SELECTION_WINDOW,
        }
    }
}

// ============================================================================
// SECTION: Batches
// ============================================================================

/// Drained universe lane contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniverseBatch {
    /// Distinct identifiers in first-arrival order.
    pub ids: Vec<Identifier>,
    /// Number of buffered operations before de-duplication.
    pub received: usize,
}

impl UniverseBatch {
    /// De-duplicates buffered `AddElement` identifiers.
    #[must_use]
    pub fn coalesce(ops: Vec<Identifier>) -> Self {
        let received = ops.len();
        let mut seen = HashSet::with_capacity(received);
        let ids = ops.into_iter().filter(|id| seen.insert(*id)).collect();
        Self {
            ids,
            received,
        }
    }
}

/// Drained and coalesced selection lane contents.
///
/// Apply order is fixed: removals, then the batch add, then the reorder, then
/// each move in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionBatch {
    /// Identifiers to deselect.
    pub remove: BTreeSet<Identifier>,
    /// Identifiers to select, in first-arrival order.
    pub add: Vec<Identifier>,
    /// Last reorder seen in the window; earlier ones are discarded.
    pub reorder: Option<Vec<Identifier>>,
    /// Every move in arrival order.
    pub moves: Vec<(Identifier, Option<Identifier>)>,
    /// Number of buffered operations before coalescing.
    pub received: usize,
}

impl SelectionBatch {
    /// Partitions buffered operations into a batch.
    ///
    /// For add and remove of the same identifier the later operation wins: a
    /// remove cancels an earlier pending add, while an add after a remove keeps
    /// both so the identifier is deselected and then appended again.
    #[must_use]
    pub fn coalesce(ops: Vec<SelectionOp>) -> Self {
        let mut batch = Self {
            received: ops.len(),
            ..Self::default()
        };
        let mut pending_add = HashSet::new();
        for op in ops {
            match op {
                SelectionOp::Add(id) => {
                    if pending_add.insert(id) {
                        batch.add.push(id);
                    }
                }
                SelectionOp::Remove(id) => {
                    if pending_add.remove(&id) {
                        batch.add.retain(|existing| *existing != id);
                    }
                    batch.remove.insert(id);
                }
                SelectionOp::Reorder(ids) => batch.reorder = Some(ids),
                SelectionOp::Move {
                    move_id,
                    before_id,
                } => batch.moves.push((move_id, before_id)),
            }
        }
        batch
    }
}

// ============================================================================
// SECTION: Mutation Queue
// ============================================================================

/// Two-lane buffer of pending mutations.
#[derive(Debug, Clone)]
pub struct MutationQueue {
    /// Buffered `AddElement` identifiers.
    universe_ops: Vec<Identifier>,
    /// Universe lane timer.
    universe_timer: DeadlineTimer,
    /// Buffered selection operations in arrival order.
    selection_ops: Vec<SelectionOp>,
    /// Selection lane timer.
    selection_timer: DeadlineTimer,
}

impl MutationQueue {
    /// Creates an empty queue with the given windows.
    #[must_use]
    pub const fn new(config: QueueConfig) -> Self {
        Self {
            universe_ops: Vec::new(),
            universe_timer: DeadlineTimer::new(config.universe_window),
            selection_ops: Vec::new(),
            selection_timer: DeadlineTimer::new(config.selection_window),
        }
    }

    /// Buffers an `AddElement`. Returns true when this armed the lane timer.
    pub fn push_add_element(&mut self, id: Identifier, now: Instant) -> bool {
        self.universe_ops.push(id);
        self.universe_timer.schedule(now)
    }

    /// Buffers selection operations in order.
    ///
    /// Returns true when this armed the lane timer. An empty input buffers
    /// nothing and leaves the timer alone.
    pub fn push_selection(
        &mut self,
        ops: impl IntoIterator<Item = SelectionOp>,
        now: Instant,
    ) -> bool {
        let before = self.selection_ops.len();
        self.selection_ops.extend(ops);
        if self.selection_ops.len() == before {
            return false;
        }
        self.selection_timer.schedule(now)
    }

    /// Returns the number of buffered operations in `lane`.
    #[must_use]
    pub fn pending(&self, lane: QueueLane) -> usize {
        match lane {
            QueueLane::Universe => self.universe_ops.len(),
            QueueLane::Selection => self.selection_ops.len(),
        }
    }

    /// Returns the timer for `lane`.
    #[must_use]
    pub const fn timer(&self, lane: QueueLane) -> &DeadlineTimer {
        match lane {
            QueueLane::Universe => &self.universe_timer,
            QueueLane::Selection => &self.selection_timer,
        }
    }

    /// Returns the earliest pending deadline across both lanes.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.universe_timer.deadline(), self.selection_timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Returns true when `lane` has an armed timer that is due at `now`.
    #[must_use]
    pub fn is_due(&self, lane: QueueLane, now: Instant) -> bool {
        self.timer(lane).is_due(now)
    }

    /// Disarms the universe timer and drains the lane.
    ///
    /// Returns `None` when the lane was idle.
    pub fn take_universe(&mut self) -> Option<UniverseBatch> {
        if !self.universe_timer.fire_now() {
            return None;
        }
        Some(UniverseBatch::coalesce(std::mem::take(&mut self.universe_ops)))
    }

    /// Disarms the selection timer and drains the lane.
    ///
    /// Returns `None` when the lane was idle.
    pub fn take_selection(&mut self) -> Option<SelectionBatch> {
        if !self.selection_timer.fire_now() {
            return None;
        }
        Some(SelectionBatch::coalesce(std::mem::take(&mut self.selection_ops)))
    }
}

impl Default for MutationQueue {
    fn default() -> Self {
        Self::new(QueueConfig::default())
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

    use std::time::Duration;
    use std::time::Instant;

    use super::MutationQueue;
    use super::QueueConfig;
    use super::QueueLane;
    use super::SelectionBatch;
    use super::SelectionOp;
    use super::UniverseBatch;
    use crate::core::identifiers::Identifier;

    fn id(raw: u64) -> Identifier {
        Identifier::new(raw).expect("nonzero id")
    }

    #[test]
    fn universe_batch_dedups_in_arrival_order() {
        let batch = UniverseBatch::coalesce(vec![id(5), id(3), id(5), id(9), id(3)]);
        assert_eq!(batch.ids, vec![id(5), id(3), id(9)]);
        assert_eq!(batch.received, 5);
    }

    #[test]
    fn selection_batch_keeps_last_reorder_and_all_moves() {
        let batch = SelectionBatch::coalesce(vec![
            SelectionOp::Reorder(vec![id(1)]),
            SelectionOp::Move {
                move_id: id(2),
                before_id: None,
            },
            SelectionOp::Reorder(vec![id(3), id(2)]),
            SelectionOp::Move {
                move_id: id(1),
                before_id: Some(id(3)),
            },
        ]);
        assert_eq!(batch.reorder, Some(vec![id(3), id(2)]));
        assert_eq!(batch.moves, vec![(id(2), None), (id(1), Some(id(3)))]);
        assert_eq!(batch.received, 4);
    }

    #[test]
    fn remove_after_add_cancels_the_add() {
        let batch = SelectionBatch::coalesce(vec![
            SelectionOp::Add(id(5)),
            SelectionOp::Add(id(6)),
            SelectionOp::Remove(id(5)),
        ]);
        assert_eq!(batch.add, vec![id(6)]);
        assert!(batch.remove.contains(&id(5)));
    }

    #[test]
    fn add_after_remove_keeps_both() {
        let batch =
            SelectionBatch::coalesce(vec![SelectionOp::Remove(id(5)), SelectionOp::Add(id(5))]);
        assert_eq!(batch.add, vec![id(5)]);
        assert!(batch.remove.contains(&id(5)));
    }

    #[test]
    fn lanes_arm_independently() {
        let now = Instant::now();
        let mut queue = MutationQueue::new(QueueConfig {
            universe_window: Duration::from_secs(10),
            selection_window: Duration::from_secs(1),
        });
        assert!(queue.push_add_element(id(7), now));
        assert!(!queue.push_add_element(id(8), now));
        assert!(queue.push_selection([SelectionOp::Add(id(1))], now));
        assert_eq!(queue.next_deadline(), Some(now + Duration::from_secs(1)));
        assert!(queue.is_due(QueueLane::Selection, now + Duration::from_secs(1)));
        assert!(!queue.is_due(QueueLane::Universe, now + Duration::from_secs(1)));
        assert_eq!(queue.pending(QueueLane::Universe), 2);
    }

    #[test]
    fn empty_push_does_not_arm() {
        let mut queue = MutationQueue::default();
        assert!(!queue.push_selection(Vec::new(), Instant::now()));
        assert!(!queue.timer(QueueLane::Selection).is_armed());
        assert!(queue.take_selection().is_none());
    }

    #[test]
    fn take_disarms_and_drains() {
        let now = Instant::now();
        let mut queue = MutationQueue::default();
        queue.push_selection([SelectionOp::Add(id(1)), SelectionOp::Remove(id(2))], now);
        let batch = queue.take_selection().expect("batch");
        assert_eq!(batch.received, 2);
        assert_eq!(queue.pending(QueueLane::Selection), 0);
        assert!(queue.next_deadline().is_none());
        assert!(queue.take_selection().is_none());
    }
}

// crates/pickset-core/src/runtime/engine.rs
// ============================================================================
// Module: Selection Engine
// Description: Single owner of the universe, selection, and mutation queue.
// Purpose: Apply coalesced batches and serve reads after a forced flush.
// Dependencies: serde, crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`SelectionEngine`] is the one logical owner of all Pickset state. Writes
//! are buffered in the [`MutationQueue`]; reads force both lanes to flush
//! first, so a caller always observes its own earlier writes.
//!
//! Batches are applied in a fixed order:
//! 1. pending `AddElement` identifiers join the universe (a selection flush
//!    drains the universe lane first so new identifiers are selectable),
//! 2. removals,
//! 3. the batch add (identifiers outside the universe are dropped),
//! 4. the last reorder of the window,
//! 5. every move in arrival order.
//!
//! The engine is synchronous. Hosts that share it across threads wrap it in a
//! single mutex and drive deadlines with [`SelectionEngine::next_deadline`]
//! and [`SelectionEngine::flush_due`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::core::AvailabilityView;
use crate::core::Identifier;
use crate::core::IdentifierUniverse;
use crate::core::Page;
use crate::core::PageRequest;
use crate::core::SelectionStore;
use crate::interfaces::Clock;
use crate::interfaces::FlushAuditSink;
use crate::interfaces::NoopFlushAuditSink;
use crate::runtime::clock::SystemClock;
use crate::runtime::queue::MutationQueue;
use crate::runtime::queue::QueueConfig;
use crate::runtime::queue::QueueLane;
use crate::runtime::queue::SelectionBatch;
use crate::runtime::queue::SelectionOp;
use crate::runtime::queue::UniverseBatch;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Selection engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Inclusive upper bound of the dense identifier range.
    pub range_max: Identifier,
    /// Batch windows for the mutation queue.
    pub queue: QueueConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            range_max: IdentifierUniverse::default().range_max(),
            queue: QueueConfig::default(),
        }
    }
}

// ============================================================================
// SECTION: Flush Reports
// ============================================================================

/// Reason a lane flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushTrigger {
    /// The lane's batch window elapsed.
    Deadline,
    /// A read or an explicit flush cut the window short.
    Forced,
}

/// Summary of one applied batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    /// Lane that flushed.
    pub lane: QueueLane,
    /// Why it flushed.
    pub trigger: FlushTrigger,
    /// Operations buffered in the window.
    pub received: usize,
    /// Identifiers newly added to the universe or the selection.
    pub added: usize,
    /// Identifiers removed from the selection.
    pub removed: usize,
    /// Select requests dropped because the identifier is not in the universe.
    pub rejected: usize,
    /// Whether a reorder was applied.
    pub reordered: bool,
    /// Moves applied to selected identifiers.
    pub moved: usize,
    /// Selection size after the flush.
    pub selection_len: usize,
    /// Universe size after the flush.
    pub universe_len: u64,
}

// ============================================================================
// SECTION: Selection Engine
// ============================================================================

/// Owner of the universe, selection, and mutation queue.
pub struct SelectionEngine {
    /// Known identifiers.
    universe: IdentifierUniverse,
    /// Ordered selection.
    selection: SelectionStore,
    /// Pending mutations.
    queue: MutationQueue,
    /// Time source for lane deadlines.
    clock: Arc<dyn Clock>,
    /// Receiver for flush reports.
    audit: Arc<dyn FlushAuditSink>,
}

impl SelectionEngine {
    /// Creates an empty engine.
    #[must_use]
    pub fn new(
        config: EngineConfig,
        clock: Arc<dyn Clock>,
        audit: Arc<dyn FlushAuditSink>,
    ) -> Self {
        Self {
            universe: IdentifierUniverse::new(config.range_max),
            selection: SelectionStore::new(),
            queue: MutationQueue::new(config.queue),
            clock,
            audit,
        }
    }

    /// Creates an engine on the system clock with flush reports discarded.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self::new(config, Arc::new(SystemClock), Arc::new(NoopFlushAuditSink))
    }

    // ------------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------------

    /// Queues a custom identifier for the universe.
    ///
    /// Returns true when this armed the universe lane timer.
    pub fn enqueue_add_element(&mut self, id: Identifier) -> bool {
        let now = self.clock.now();
        self.queue.push_add_element(id, now)
    }

    /// Queues selection of one identifier.
    pub fn enqueue_add_selected(&mut self, id: Identifier) -> bool {
        self.enqueue_selection([SelectionOp::Add(id)])
    }

    /// Queues selection of several identifiers, preserving their order.
    pub fn enqueue_add_selected_batch(
        &mut self,
        ids: impl IntoIterator<Item = Identifier>,
    ) -> bool {
        self.enqueue_selection(ids.into_iter().map(SelectionOp::Add))
    }

    /// Queues deselection of one identifier.
    pub fn enqueue_remove_selected(&mut self, id: Identifier) -> bool {
        self.enqueue_selection([SelectionOp::Remove(id)])
    }

    /// Queues a partial reorder of the selection.
    pub fn enqueue_reorder_selected(&mut self, ids: Vec<Identifier>) -> bool {
        self.enqueue_selection([SelectionOp::Reorder(ids)])
    }

    /// Queues a move of `move_id` before `before_id` (or to the end).
    pub fn enqueue_move_selected(
        &mut self,
        move_id: Identifier,
        before_id: Option<Identifier>,
    ) -> bool {
        self.enqueue_selection([SelectionOp::Move {
            move_id,
            before_id,
        }])
    }

    /// Buffers selection operations on the selection lane.
    fn enqueue_selection(&mut self, ops: impl IntoIterator<Item = SelectionOp>) -> bool {
        let now = self.clock.now();
        self.queue.push_selection(ops, now)
    }

    // ------------------------------------------------------------------------
    // Flushing
    // ------------------------------------------------------------------------

    /// Returns the earliest pending lane deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.next_deadline()
    }

    /// Returns the number of buffered operations in `lane`.
    #[must_use]
    pub fn pending(&self, lane: QueueLane) -> usize {
        self.queue.pending(lane)
    }

    /// Flushes every lane whose deadline has passed.
    pub fn flush_due(&mut self) -> Vec<FlushReport> {
        let now = self.clock.now();
        let mut reports = Vec::new();
        if self.queue.is_due(QueueLane::Universe, now) {
            reports.extend(self.flush_universe(FlushTrigger::Deadline));
        }
        if self.queue.is_due(QueueLane::Selection, now) {
            reports.extend(self.flush_selection(FlushTrigger::Deadline));
        }
        reports
    }

    /// Cancels both lane timers and applies whatever is buffered.
    ///
    /// Idempotent: a second call with nothing buffered returns no reports.
    pub fn flush_all(&mut self) -> Vec<FlushReport> {
        let mut reports = Vec::new();
        reports.extend(self.flush_universe(FlushTrigger::Forced));
        reports.extend(self.flush_selection(FlushTrigger::Forced));
        reports
    }

    /// Drains and applies the universe lane.
    fn flush_universe(&mut self, trigger: FlushTrigger) -> Option<FlushReport> {
        let batch = self.queue.take_universe()?;
        let report = self.apply_universe(batch, trigger);
        self.audit.record_flush(&report);
        Some(report)
    }

    /// Drains and applies the selection lane, universe lane first.
    fn flush_selection(&mut self, trigger: FlushTrigger) -> Vec<FlushReport> {
        let Some(batch) = self.queue.take_selection() else {
            return Vec::new();
        };
        let mut reports = Vec::with_capacity(2);
        reports.extend(self.flush_universe(FlushTrigger::Forced));
        let report = self.apply_selection(batch, trigger);
        self.audit.record_flush(&report);
        reports.push(report);
        reports
    }

    /// Applies a universe batch.
    fn apply_universe(&mut self, batch: UniverseBatch, trigger: FlushTrigger) -> FlushReport {
        let added = self.universe.add_custom(batch.ids);
        FlushReport {
            lane: QueueLane::Universe,
            trigger,
            received: batch.received,
            added,
            removed: 0,
            rejected: 0,
            reordered: false,
            moved: 0,
            selection_len: self.selection.len(),
            universe_len: self.universe.len(),
        }
    }

    /// Applies a selection batch in the fixed order.
    fn apply_selection(&mut self, batch: SelectionBatch, trigger: FlushTrigger) -> FlushReport {
        let mut removed = 0;
        for id in &batch.remove {
            if self.selection.remove(*id) {
                removed += 1;
            }
        }
        let (members, outsiders): (Vec<Identifier>, Vec<Identifier>) =
            batch.add.into_iter().partition(|id| self.universe.contains(*id));
        let added = self.selection.add(members);
        let reordered = match batch.reorder {
            Some(order) => {
                self.selection.reorder(&order);
                true
            }
            None => false,
        };
        let mut moved = 0;
        for (move_id, before_id) in batch.moves {
            if self.selection.move_before(move_id, before_id) {
                moved += 1;
            }
        }
        FlushReport {
            lane: QueueLane::Selection,
            trigger,
            received: batch.received,
            added,
            removed,
            rejected: outsiders.len(),
            reordered,
            moved,
            selection_len: self.selection.len(),
            universe_len: self.universe.len(),
        }
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Returns a page of available identifiers after a forced flush.
    pub fn available_page(&mut self, request: PageRequest) -> Page {
        self.flush_all();
        let view = AvailabilityView::new(&self.universe, &self.selection);
        Page {
            ids: view.page(request.filter(), request.offset(), request.limit()),
            total: view.total(request.filter()),
        }
    }

    /// Returns a page of selected identifiers after a forced flush.
    pub fn selected_page(&mut self, request: PageRequest) -> Page {
        self.flush_all();
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        Page {
            ids: self.selection.filtered_slice(request.filter(), offset, request.limit()),
            total: self.selection.count(request.filter()) as u64,
        }
    }

    /// Returns the full selection order after a forced flush.
    pub fn selected_order(&mut self) -> Vec<Identifier> {
        self.flush_all();
        self.selection.snapshot()
    }

    /// Returns the greatest known identifier after a forced flush.
    pub fn max_id(&mut self) -> Identifier {
        self.flush_all();
        self.universe.max_id()
    }

    /// Returns the universe as of the last flush.
    #[must_use]
    pub const fn universe(&self) -> &IdentifierUniverse {
        &self.universe
    }

    /// Returns the selection as of the last flush.
    #[must_use]
    pub const fn selection(&self) -> &SelectionStore {
        &self.selection
    }
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl std::fmt::Debug for SelectionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("universe", &self.universe)
            .field("selection", &self.selection)
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

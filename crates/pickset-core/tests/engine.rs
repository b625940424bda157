// crates/pickset-core/tests/engine.rs
// ============================================================================
// Module: Selection Engine Tests
// Description: Queue coalescing, flush ordering, and read-after-write checks.
// Purpose: Exercise the engine through its public operations with a manual clock.
// ============================================================================

//! ## Overview
//! Drives [`SelectionEngine`] with a [`ManualClock`] so batch windows can be
//! stepped without sleeping, and records every flush report.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use pickset_core::EngineConfig;
use pickset_core::FlushAuditSink;
use pickset_core::FlushReport;
use pickset_core::FlushTrigger;
use pickset_core::IdFilter;
use pickset_core::Identifier;
use pickset_core::ManualClock;
use pickset_core::PageRequest;
use pickset_core::QueueConfig;
use pickset_core::QueueLane;
use pickset_core::SelectionEngine;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

#[derive(Default)]
struct RecordingSink {
    reports: Mutex<Vec<FlushReport>>,
}

impl RecordingSink {
    fn reports(&self) -> Vec<FlushReport> {
        self.reports.lock().expect("reports lock").clone()
    }
}

impl FlushAuditSink for RecordingSink {
    fn record_flush(&self, report: &FlushReport) {
        self.reports.lock().expect("reports lock").push(report.clone());
    }
}

struct Harness {
    engine: SelectionEngine,
    clock: Arc<ManualClock>,
    sink: Arc<RecordingSink>,
}

fn harness(range_max: u64) -> Harness {
    let clock = Arc::new(ManualClock::new());
    let sink = Arc::new(RecordingSink::default());
    let config = EngineConfig {
        range_max: id(range_max),
        queue: QueueConfig {
            universe_window: Duration::from_secs(10),
            selection_window: Duration::from_secs(1),
        },
    };
    let engine = SelectionEngine::new(config, clock.clone(), sink.clone());
    Harness {
        engine,
        clock,
        sink,
    }
}

fn id(raw: u64) -> Identifier {
    Identifier::new(raw).expect("nonzero id")
}

fn ids(raw: &[u64]) -> Vec<Identifier> {
    raw.iter().map(|value| id(*value)).collect()
}

fn order(engine: &mut SelectionEngine) -> Vec<u64> {
    engine.selected_order().iter().map(|value| value.get()).collect()
}

fn applied(engine: &SelectionEngine) -> Vec<u64> {
    engine.selection().as_slice().iter().map(|value| value.get()).collect()
}

// ============================================================================
// SECTION: Coalescing
// ============================================================================

#[test]
fn add_then_remove_in_one_window_nets_to_removed() {
    let mut h = harness(100);
    h.engine.enqueue_add_selected(id(5));
    h.engine.enqueue_remove_selected(id(5));
    assert!(order(&mut h.engine).is_empty());
}

#[test]
fn remove_then_add_in_one_window_reappends() {
    let mut h = harness(100);
    h.engine.enqueue_add_selected_batch(ids(&[5, 6]));
    assert_eq!(order(&mut h.engine), vec![5, 6]);
    h.engine.enqueue_remove_selected(id(5));
    h.engine.enqueue_add_selected(id(5));
    assert_eq!(order(&mut h.engine), vec![6, 5]);
}

#[test]
fn removal_is_not_undone_by_stale_reorder() {
    let mut h = harness(100);
    h.engine.enqueue_add_selected_batch(ids(&[1, 2, 3]));
    h.engine.selected_order();
    h.engine.enqueue_reorder_selected(ids(&[3, 2, 1]));
    h.engine.enqueue_remove_selected(id(2));
    assert_eq!(order(&mut h.engine), vec![3, 1]);
}

#[test]
fn only_last_reorder_in_window_applies() {
    let mut h = harness(100);
    h.engine.enqueue_add_selected_batch(ids(&[1, 2, 3, 4]));
    h.engine.selected_order();
    h.engine.enqueue_reorder_selected(ids(&[4, 3, 2, 1]));
    h.engine.enqueue_reorder_selected(ids(&[3, 1]));
    assert_eq!(order(&mut h.engine), vec![3, 1, 2, 4]);
}

#[test]
fn queued_move_can_position_newly_added_id() {
    let mut h = harness(100);
    h.engine.enqueue_add_selected_batch(ids(&[1, 2]));
    h.engine.enqueue_move_selected(id(2), Some(id(1)));
    h.engine.enqueue_add_selected(id(3));
    h.engine.enqueue_move_selected(id(3), Some(id(2)));
    assert_eq!(order(&mut h.engine), vec![3, 2, 1]);
}

#[test]
fn moves_apply_after_reorder_in_arrival_order() {
    let mut h = harness(100);
    h.engine.enqueue_add_selected_batch(ids(&[1, 2, 3]));
    h.engine.selected_order();
    h.engine.enqueue_move_selected(id(1), None);
    h.engine.enqueue_reorder_selected(ids(&[1]));
    h.engine.enqueue_move_selected(id(2), Some(id(1)));
    assert_eq!(order(&mut h.engine), vec![3, 2, 1]);
}

// ============================================================================
// SECTION: Deadlines
// ============================================================================

#[test]
fn selection_lane_flushes_on_its_deadline() {
    let mut h = harness(100);
    h.engine.enqueue_add_selected(id(7));
    assert!(h.engine.flush_due().is_empty());
    h.clock.advance(Duration::from_millis(999));
    assert!(h.engine.flush_due().is_empty());
    assert!(h.engine.selection().is_empty());
    h.clock.advance(Duration::from_millis(1));
    let reports = h.engine.flush_due();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].lane, QueueLane::Selection);
    assert_eq!(reports[0].trigger, FlushTrigger::Deadline);
    assert_eq!(applied(&h.engine), vec![7]);
    assert!(h.engine.next_deadline().is_none());
}

#[test]
fn burst_shares_the_first_deadline() {
    let mut h = harness(100);
    assert!(h.engine.enqueue_add_selected(id(1)));
    let deadline = h.engine.next_deadline().expect("armed");
    h.clock.advance(Duration::from_millis(600));
    assert!(!h.engine.enqueue_add_selected(id(2)));
    assert_eq!(h.engine.next_deadline(), Some(deadline));
    h.clock.advance(Duration::from_millis(400));
    h.engine.flush_due();
    assert_eq!(applied(&h.engine), vec![1, 2]);
}

#[test]
fn universe_lane_waits_for_its_long_window() {
    let mut h = harness(10);
    h.engine.enqueue_add_element(id(500));
    h.clock.advance(Duration::from_secs(9));
    assert!(h.engine.flush_due().is_empty());
    assert!(!h.engine.universe().contains(id(500)));
    h.clock.advance(Duration::from_secs(1));
    let reports = h.engine.flush_due();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].lane, QueueLane::Universe);
    assert_eq!(reports[0].added, 1);
    assert!(h.engine.universe().contains(id(500)));
}

#[test]
fn selection_flush_drains_pending_universe_additions() {
    let mut h = harness(10);
    h.engine.enqueue_add_element(id(500));
    h.engine.enqueue_add_selected(id(500));
    h.clock.advance(Duration::from_secs(1));
    let reports = h.engine.flush_due();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].lane, QueueLane::Universe);
    assert_eq!(reports[0].trigger, FlushTrigger::Forced);
    assert_eq!(reports[1].lane, QueueLane::Selection);
    assert_eq!(applied(&h.engine), vec![500]);
    assert!(h.engine.next_deadline().is_none());
}

// ============================================================================
// SECTION: Forced Flush and Reads
// ============================================================================

#[test]
fn reads_observe_prior_writes_without_waiting() {
    let mut h = harness(100);
    h.engine.enqueue_add_selected_batch(ids(&[10, 20, 30]));
    let page = h.engine.selected_page(PageRequest::new(1, 2, None));
    assert_eq!(page.ids, ids(&[10, 20]));
    assert_eq!(page.total, 3);
    let available = h.engine.available_page(PageRequest::new(1, 3, None));
    assert_eq!(available.ids, ids(&[1, 2, 3]));
    assert_eq!(available.total, 97);
}

#[test]
fn forced_flush_is_idempotent() {
    let mut h = harness(100);
    h.engine.enqueue_add_selected(id(1));
    h.engine.enqueue_add_element(id(400));
    let first = h.engine.flush_all();
    assert_eq!(first.len(), 2);
    assert!(first.iter().all(|report| report.trigger == FlushTrigger::Forced));
    assert!(h.engine.flush_all().is_empty());
    assert_eq!(h.sink.reports().len(), 2);
}

#[test]
fn selecting_outside_the_universe_is_rejected() {
    let mut h = harness(100);
    h.engine.enqueue_add_selected_batch(ids(&[5, 1000]));
    let reports = h.engine.flush_all();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].added, 1);
    assert_eq!(reports[0].rejected, 1);
    assert_eq!(applied(&h.engine), vec![5]);
}

#[test]
fn custom_ids_are_paged_after_the_dense_range() {
    let mut h = harness(3);
    h.engine.enqueue_add_element(id(9));
    h.engine.enqueue_add_element(id(7));
    h.engine.enqueue_add_selected(id(2));
    let page = h.engine.available_page(PageRequest::new(1, 10, None));
    assert_eq!(page.ids, ids(&[1, 3, 7, 9]));
    assert_eq!(page.total, 4);
    assert_eq!(h.engine.max_id(), id(9));
}

#[test]
fn filtered_reads_match_exact_ids() {
    let mut h = harness(100);
    h.engine.enqueue_add_selected(id(42));
    let selected = h.engine.selected_page(PageRequest::new(1, 20, IdFilter::parse("42")));
    assert_eq!(selected.ids, ids(&[42]));
    assert_eq!(selected.total, 1);
    let available = h.engine.available_page(PageRequest::new(1, 20, IdFilter::parse("42")));
    assert!(available.ids.is_empty());
    assert_eq!(available.total, 0);
    let garbage = h.engine.selected_page(PageRequest::new(1, 20, IdFilter::parse("x42")));
    assert!(garbage.ids.is_empty());
    assert_eq!(garbage.total, 0);
    let other = h.engine.available_page(PageRequest::new(1, 20, IdFilter::parse("41")));
    assert_eq!(other.ids, ids(&[41]));
}

#[test]
fn deep_available_page_on_default_universe() {
    let mut engine = SelectionEngine::default();
    let request = PageRequest::new(50_000, 20, None);
    let page = engine.available_page(request);
    assert_eq!(page.ids.first().map(|value| value.get()), Some(999_981));
    assert_eq!(page.ids.last().map(|value| value.get()), Some(1_000_000));
    assert_eq!(page.total, 1_000_000);
}

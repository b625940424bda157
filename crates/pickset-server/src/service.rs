// crates/pickset-server/src/service.rs
// ============================================================================
// Module: Selection Service
// Description: Shared handle to the selection engine plus its deadline driver.
// Purpose: Serialize engine access and flush lanes when their windows close.
// Dependencies: pickset-core, tokio
// ============================================================================

//! ## Overview
//! [`SelectionService`] owns the single [`SelectionEngine`] behind one mutex.
//! Handlers never hold the lock across an `.await`. Writes that arm an idle
//! lane wake the driver task, which sleeps until the earliest lane deadline
//! and then flushes whatever is due. A poisoned lock is reported as
//! [`ServiceError::Unavailable`] rather than panicking the handler.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use pickset_core::Identifier;
use pickset_core::Page;
use pickset_core::PageRequest;
use pickset_core::SelectionEngine;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Selection service errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Engine lock was poisoned by a panicking holder.
    #[error("selection engine unavailable")]
    Unavailable,
}

// ============================================================================
// SECTION: Selection Service
// ============================================================================

/// Cloneable handle to the shared selection engine.
#[derive(Clone)]
pub struct SelectionService {
    /// Engine state.
    engine: Arc<Mutex<SelectionEngine>>,
    /// Wakes the driver when a lane timer is newly armed.
    wake: Arc<Notify>,
}

impl SelectionService {
    /// Wraps an engine.
    #[must_use]
    pub fn new(engine: SelectionEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            wake: Arc::new(Notify::new()),
        }
    }

    /// Queues a custom identifier for the universe.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unavailable`] when the engine lock is poisoned.
    pub fn add_element(&self, id: Identifier) -> Result<(), ServiceError> {
        self.write(|engine| engine.enqueue_add_element(id))
    }

    /// Queues selection of one identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unavailable`] when the engine lock is poisoned.
    pub fn select(&self, id: Identifier) -> Result<(), ServiceError> {
        self.write(|engine| engine.enqueue_add_selected(id))
    }

    /// Queues selection of several identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unavailable`] when the engine lock is poisoned.
    pub fn select_batch(&self, ids: Vec<Identifier>) -> Result<(), ServiceError> {
        self.write(|engine| engine.enqueue_add_selected_batch(ids))
    }

    /// Queues deselection of one identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unavailable`] when the engine lock is poisoned.
    pub fn deselect(&self, id: Identifier) -> Result<(), ServiceError> {
        self.write(|engine| engine.enqueue_remove_selected(id))
    }

    /// Queues a partial reorder.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unavailable`] when the engine lock is poisoned.
    pub fn reorder(&self, order: Vec<Identifier>) -> Result<(), ServiceError> {
        self.write(|engine| engine.enqueue_reorder_selected(order))
    }

    /// Queues a move of `move_id` before `before_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unavailable`] when the engine lock is poisoned.
    pub fn move_selected(
        &self,
        move_id: Identifier,
        before_id: Option<Identifier>,
    ) -> Result<(), ServiceError> {
        self.write(|engine| engine.enqueue_move_selected(move_id, before_id))
    }

    /// Returns a page of available identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unavailable`] when the engine lock is poisoned.
    pub fn available(&self, request: PageRequest) -> Result<Page, ServiceError> {
        Ok(self.lock()?.available_page(request))
    }

    /// Returns a page of selected identifiers in selection order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unavailable`] when the engine lock is poisoned.
    pub fn selected(&self, request: PageRequest) -> Result<Page, ServiceError> {
        Ok(self.lock()?.selected_page(request))
    }

    /// Returns the full selection order.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unavailable`] when the engine lock is poisoned.
    pub fn order(&self) -> Result<Vec<Identifier>, ServiceError> {
        Ok(self.lock()?.selected_order())
    }

    /// Applies everything buffered in both lanes.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unavailable`] when the engine lock is poisoned.
    pub fn flush(&self) -> Result<(), ServiceError> {
        self.lock()?.flush_all();
        Ok(())
    }

    /// Spawns the task that flushes lanes when their deadlines pass.
    ///
    /// The task exits once the engine lock is poisoned. Callers abort the
    /// returned handle on shutdown.
    #[must_use]
    pub fn spawn_driver(&self) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move { service.drive().await })
    }

    /// Driver loop.
    async fn drive(self) {
        loop {
            let Ok(deadline) = self.lock().map(|engine| engine.next_deadline()) else {
                return;
            };
            match deadline {
                None => self.wake.notified().await,
                Some(deadline) => {
                    tokio::select! {
                        () = tokio::time::sleep_until(Instant::from_std(deadline)) => {
                            let Ok(mut engine) = self.lock() else {
                                return;
                            };
                            engine.flush_due();
                        }
                        () = self.wake.notified() => {}
                    }
                }
            }
        }
    }

    /// Runs a write and wakes the driver when it armed a lane.
    fn write(&self, op: impl FnOnce(&mut SelectionEngine) -> bool) -> Result<(), ServiceError> {
        let armed = op(&mut *self.lock()?);
        if armed {
            self.wake.notify_one();
        }
        Ok(())
    }

    /// Locks the engine.
    fn lock(&self) -> Result<MutexGuard<'_, SelectionEngine>, ServiceError> {
        self.engine.lock().map_err(|_| ServiceError::Unavailable)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

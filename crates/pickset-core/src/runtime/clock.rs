// crates/pickset-core/src/runtime/clock.rs
// ============================================================================
// Module: Pickset Clocks
// Description: System and manually advanced clock implementations.
// Purpose: Drive queue deadlines from real time or from tests.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! [`SystemClock`] reads the monotonic system clock. [`ManualClock`] only
//! moves when [`ManualClock::advance`] is called, which lets tests step
//! through batch windows without sleeping.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::Instant;

use crate::interfaces::Clock;

// ============================================================================
// SECTION: System Clock
// ============================================================================

/// Clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// ============================================================================
// SECTION: Manual Clock
// ============================================================================

/// Clock that advances only on request.
#[derive(Debug)]
pub struct ManualClock {
    /// Instant captured at construction.
    origin: Instant,
    /// Nanoseconds elapsed since `origin`.
    elapsed_nanos: AtomicU64,
}

impl ManualClock {
    /// Creates a manual clock anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed_nanos: AtomicU64::new(0),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let step = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        let _ = self.elapsed_nanos.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
            Some(current.saturating_add(step))
        });
    }

    /// Returns the time elapsed since construction.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::SeqCst))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

// crates/pickset-core/src/runtime/timer.rs
// ============================================================================
// Module: Deadline Timer
// Description: Single-shot deadline owned by a queue lane.
// Purpose: Model batch windows explicitly so flushes are testable.
// Dependencies: std::time
// ============================================================================

//! ## Overview
//! A [`DeadlineTimer`] is armed by the first enqueue into an idle lane and
//! stays armed until the lane flushes. Re-arming an armed timer keeps the
//! original deadline, so a burst of writes is flushed one window after the
//! first write of the burst. The timer holds no thread or task; a host driver
//! polls [`DeadlineTimer::deadline`] and flushes once it is due.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;
use std::time::Instant;

// ============================================================================
// SECTION: Deadline Timer
// ============================================================================

/// Single-shot deadline with a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineTimer {
    /// Delay between arming and the deadline.
    delay: Duration,
    /// Pending deadline while armed.
    deadline: Option<Instant>,
}

impl DeadlineTimer {
    /// Creates an idle timer with the given delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Returns the configured delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Arms the timer at `now + delay` unless it is already armed.
    ///
    /// Returns true when this call armed the timer.
    pub fn schedule(&mut self, now: Instant) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + self.delay);
        true
    }

    /// Disarms the timer. Returns whether it was armed.
    pub const fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Disarms the timer so the caller can run its flush immediately.
    ///
    /// Returns whether the timer was armed, i.e. whether there is work to run.
    pub const fn fire_now(&mut self) -> bool {
        self.cancel()
    }

    /// Returns true while a deadline is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns the pending deadline.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true when armed and `now` has reached the deadline.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

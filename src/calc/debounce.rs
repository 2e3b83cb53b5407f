//! Debounced recompute scheduling
//!
//! Rapid quantity edits should coalesce into one recalculation instead of
//! recomputing on every keystroke. The debouncer is a plain state machine
//! over caller-supplied instants; it owns no threads or timers, so the
//! single-threaded session loop stays in control.

use std::time::{Duration, Instant};

/// How long a burst of edits is allowed to settle before recomputing
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Deadline tracker for pending recomputes
///
/// Each `mark` supersedes any pending deadline; only the most recent edit's
/// deadline ever fires.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer with a custom settle window
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Record an edit at `now`, pushing the deadline out by the window
    pub fn mark(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Whether a recompute is pending
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop any pending deadline without firing
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Check the deadline at `now`; fires at most once per mark
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}

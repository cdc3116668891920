//! A shared Hybrid Logical Clock.
//!
//! Hands out timestamps to every writer on a replica. Successive calls to
//! [`HybridClock::now`] on the same clock never repeat or go backwards, so
//! operations on one causal chain (add, then undo the add) always compare
//! in issue order.

use crate::HybridTimestamp;
use std::sync::{Mutex, PoisonError};

/// Thread-safe timestamp source for one replica.
#[derive(Debug, Default)]
pub struct HybridClock {
    last: Mutex<HybridTimestamp>,
}

impl HybridClock {
    /// Creates a clock starting at the current wall time.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(HybridTimestamp::now())
    }

    /// Creates a clock whose first issued timestamp is after `start`.
    #[must_use]
    pub fn starting_at(start: HybridTimestamp) -> Self {
        Self {
            last: Mutex::new(start),
        }
    }

    /// Issues the next local timestamp.
    pub fn now(&self) -> HybridTimestamp {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        *last = last.tick();
        *last
    }

    /// Folds in a timestamp observed from another replica.
    ///
    /// Returns the updated clock value, which is greater than `remote`.
    pub fn observe(&self, remote: &HybridTimestamp) -> HybridTimestamp {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        *last = last.receive(remote);
        *last
    }

    /// Returns the most recently issued timestamp without advancing.
    #[must_use]
    pub fn peek(&self) -> HybridTimestamp {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//! Timestamps that order `add` and `remove` calls.
//!
//! The set only needs a total order, plus one guarantee from whoever issues
//! timestamps: an operation that causally follows another on the same
//! replica (an add, then the remove that undoes it) gets a strictly greater
//! timestamp. [`HybridTimestamp`] provides that by pairing wall-clock
//! milliseconds with a counter that absorbs events inside one millisecond.
//!
//! Independent replicas can still produce equal timestamps. The set resolves
//! an add/remove tie as present, so equality is a normal outcome here.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock milliseconds and a per-millisecond counter.
///
/// Field order is the comparison order: wall time first, then the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HybridTimestamp {
    wall_time: u64,
    logical: u32,
}

/// Milliseconds since the Unix epoch; a clock set before the epoch reads 0.
fn wall_clock_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

impl HybridTimestamp {
    /// Timestamp for the current wall-clock millisecond, counter zero.
    #[must_use]
    pub fn now() -> Self {
        Self::new(wall_clock_millis(), 0)
    }

    #[must_use]
    pub const fn new(wall_time: u64, logical: u32) -> Self {
        Self { wall_time, logical }
    }

    #[must_use]
    pub const fn wall_time(&self) -> u64 {
        self.wall_time
    }

    #[must_use]
    pub const fn logical(&self) -> u32 {
        self.logical
    }

    /// The smallest timestamp greater than `self`.
    ///
    /// A full counter carries into the wall time, so the successor stays
    /// strictly greater. Only `(u64::MAX, u32::MAX)` has no successor and
    /// maps to itself.
    #[must_use]
    pub const fn successor(&self) -> Self {
        if self.logical == u32::MAX {
            Self::new(self.wall_time.saturating_add(1), 0)
        } else {
            Self::new(self.wall_time, self.logical + 1)
        }
    }

    /// Moves to `now` if the wall clock has passed us, otherwise to our successor.
    const fn advance(self, now: u64) -> Self {
        if now > self.wall_time {
            Self::new(now, 0)
        } else {
            self.successor()
        }
    }

    /// Timestamp for the next local event, strictly after `self`.
    #[must_use]
    pub fn tick(&self) -> Self {
        self.advance(wall_clock_millis())
    }

    /// Timestamp for the next local event after seeing `remote`, strictly
    /// after both.
    #[must_use]
    pub fn receive(&self, remote: &Self) -> Self {
        (*self).max(*remote).advance(wall_clock_millis())
    }

    /// `self < other`.
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self < other
    }

    /// `self > other`.
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self > other
    }
}

impl Default for HybridTimestamp {
    fn default() -> Self {
        Self::now()
    }
}

/// `<wall_time>.<logical>`, e.g. `1700000000000.3`.
impl fmt::Display for HybridTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.wall_time, self.logical)
    }
}

impl FromStr for HybridTimestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (wall, logical) = s
            .split_once('.')
            .ok_or_else(|| Error::InvalidTimestamp(format!("missing '.' separator in {s:?}")))?;
        let wall_time = wall
            .parse::<u64>()
            .map_err(|e| Error::InvalidTimestamp(format!("wall time {wall:?}: {e}")))?;
        let logical = logical
            .parse::<u32>()
            .map_err(|e| Error::InvalidTimestamp(format!("logical counter {logical:?}: {e}")))?;
        Ok(Self::new(wall_time, logical))
    }
}

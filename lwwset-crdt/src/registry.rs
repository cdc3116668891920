//! One side of the set: element to the greatest timestamp ever submitted.

use crate::error::SetOp;
use crate::snapshot::Entries;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use tracing::trace;

/// A lock-guarded timestamp map.
///
/// Every mutation is a single map insert, so a poisoned lock still guards a
/// consistent map and is recovered rather than propagated.
#[derive(Debug)]
pub(crate) struct Registry<E, T> {
    /// The operation that writes to this side, for log events.
    side: SetOp,
    entries: RwLock<HashMap<E, T>>,
}

impl<E, T> Registry<E, T>
where
    E: Eq + Hash + Clone + Debug,
    T: Ord + Clone + Debug,
{
    pub(crate) fn new(side: SetOp) -> Self {
        Self::from_entries(side, HashMap::new())
    }

    pub(crate) fn from_entries(side: SetOp, entries: Entries<E, T>) -> Self {
        Self {
            side,
            entries: RwLock::new(entries),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, HashMap<E, T>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `timestamp` for `element` unless an equal or later one is
    /// already present. Returns true if the stored value changed.
    pub(crate) fn apply(&self, element: E, timestamp: T) -> bool {
        let op = self.side;
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.get_mut(&element) {
            Some(stored) if *stored >= timestamp => {
                trace!(
                    %op,
                    ?element,
                    ?timestamp,
                    ?stored,
                    "write skipped: stored timestamp is not older"
                );
                false
            }
            Some(stored) => {
                trace!(%op, ?element, ?timestamp, previous = ?stored, "write applied");
                *stored = timestamp;
                true
            }
            None => {
                trace!(%op, ?element, ?timestamp, "write applied to new element");
                entries.insert(element, timestamp);
                true
            }
        }
    }

    /// Applies every entry under a single write-lock acquisition.
    /// Returns how many stored values changed.
    pub(crate) fn apply_all(&self, incoming: Entries<E, T>) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let mut changed = 0;
        for (element, timestamp) in incoming {
            if apply_max(&mut entries, element, timestamp) {
                changed += 1;
            }
        }
        changed
    }

    pub(crate) fn get<Q>(&self, element: &Q) -> Option<T>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.read().get(element).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.read().len()
    }
}

/// Monotone max write. Ties keep the stored value.
pub(crate) fn apply_max<E, T>(entries: &mut HashMap<E, T>, element: E, timestamp: T) -> bool
where
    E: Eq + Hash,
    T: Ord,
{
    match entries.get_mut(&element) {
        Some(current) if *current >= timestamp => false,
        Some(current) => {
            *current = timestamp;
            true
        }
        None => {
            entries.insert(element, timestamp);
            true
        }
    }
}

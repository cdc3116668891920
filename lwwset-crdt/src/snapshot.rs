//! Serializable copy of both registries.
//!
//! This is the hand-off point for a persistence layer (store and restore a
//! replica) and for a replication layer (ship state to another replica and
//! [`merge`](LwwSetSnapshot::merge) it there).

use crate::lww_set::is_member;
use crate::registry::apply_max;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Element to timestamp mapping for one side of the set.
pub type Entries<E, T> = HashMap<E, T>;

/// Point-in-time state of an [`LwwElementSet`](crate::LwwElementSet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LwwSetSnapshot<E, T>
where
    E: Eq + Hash,
{
    /// Latest add timestamp per element.
    pub adds: Entries<E, T>,
    /// Latest remove timestamp per element.
    pub removes: Entries<E, T>,
}

impl<E, T> Default for LwwSetSnapshot<E, T>
where
    E: Eq + Hash,
{
    fn default() -> Self {
        Self {
            adds: HashMap::new(),
            removes: HashMap::new(),
        }
    }
}

impl<E, T> LwwSetSnapshot<E, T>
where
    E: Eq + Hash + Clone,
    T: Ord + Clone,
{
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Membership of `element` in this snapshot.
    #[must_use]
    pub fn exists<Q>(&self, element: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        is_member(self.adds.get(element), self.removes.get(element))
    }

    /// All members of this snapshot, in no particular order.
    #[must_use]
    pub fn elements(&self) -> Vec<E> {
        self.adds
            .iter()
            .filter(|(element, added)| is_member(Some(*added), self.removes.get(*element)))
            .map(|(element, _)| element.clone())
            .collect()
    }

    /// Folds `other` into this snapshot, keeping the later timestamp per
    /// element on each side.
    ///
    /// This operation is:
    /// - Commutative: merge(a, b) == merge(b, a)
    /// - Associative: merge(merge(a, b), c) == merge(a, merge(b, c))
    /// - Idempotent: merge(a, a) == a
    pub fn merge(&mut self, other: &Self) {
        for (element, timestamp) in &other.adds {
            apply_max(&mut self.adds, element.clone(), timestamp.clone());
        }
        for (element, timestamp) in &other.removes {
            apply_max(&mut self.removes, element.clone(), timestamp.clone());
        }
    }

    /// Creates a new snapshot that is the merge of this and another.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.merge(other);
        result
    }

    /// Iterates over every element named on either side.
    pub(crate) fn touched(&self) -> impl Iterator<Item = &E> {
        self.adds.keys().chain(self.removes.keys())
    }
}

//! Last-Writer-Wins Element Set (LWW-Element-Set).
//!
//! A CRDT set built from two timestamped registries. `add` records the
//! latest time an element was asserted present, `remove` the latest time it
//! was asserted absent. An element is a member when it has an add record
//! that is not older than its remove record, so an add and a remove with the
//! same timestamp leave the element present (add-wins).
//!
//! Registries only ever grow. Removing an element leaves a tombstone in the
//! remove registry, which is what lets a late-arriving, older add be ignored.
//!
//! # Concurrency
//!
//! Each registry sits behind its own [`RwLock`](std::sync::RwLock). `add`
//! takes only the add registry's write lock and `remove` only the remove
//! registry's, so the two never block each other. Reads (`exists`,
//! `elements`, `len`, `snapshot`) hold read locks on *both* registries,
//! always add then remove, so every answer is computed from one consistent
//! snapshot of the pair. A read is not linearizable with an in-flight write:
//! it sees the state from either just before or just after that write.

use crate::config::LwwSetConfig;
use crate::element::Element;
use crate::error::{LwwSetError, Result, SetOp};
use crate::registry::Registry;
use crate::snapshot::LwwSetSnapshot;
use lwwset_types::HybridTimestamp;
use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, warn};

/// Membership rule: added, and the add is not older than any remove.
pub(crate) fn is_member<T: Ord>(added: Option<&T>, removed: Option<&T>) -> bool {
    match (added, removed) {
        (Some(added), Some(removed)) => added >= removed,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// A Last-Writer-Wins Element Set.
///
/// Every operation takes `&self`; share one instance between threads with
/// an `Arc`.
///
/// Two adds (or two removes) carrying equal timestamps keep whichever one
/// was stored first. Equal timestamps are therefore not a total order over
/// writes of the same kind, but the outcome is the same timestamp either way.
#[derive(Debug)]
pub struct LwwElementSet<E, T = HybridTimestamp>
where
    E: Element,
    T: Ord + Clone + Debug,
{
    config: LwwSetConfig,
    adds: Registry<E, T>,
    removes: Registry<E, T>,
}

impl<E, T> LwwElementSet<E, T>
where
    E: Element,
    T: Ord + Clone + Debug,
{
    /// Creates an empty set with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LwwSetConfig::default())
    }

    /// Creates an empty set.
    #[must_use]
    pub fn with_config(config: LwwSetConfig) -> Self {
        Self {
            config,
            adds: Registry::new(SetOp::Add),
            removes: Registry::new(SetOp::Remove),
        }
    }

    /// Restores a set from a snapshot.
    ///
    /// Fails without building anything if any element is over the size limit.
    pub fn from_snapshot(snapshot: LwwSetSnapshot<E, T>, config: LwwSetConfig) -> Result<Self> {
        for element in snapshot.touched() {
            validate(&config, element, SetOp::Restore)?;
        }
        debug!(
            adds = snapshot.adds.len(),
            removes = snapshot.removes.len(),
            "restored set from snapshot"
        );
        Ok(Self {
            config,
            adds: Registry::from_entries(SetOp::Add, snapshot.adds),
            removes: Registry::from_entries(SetOp::Remove, snapshot.removes),
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &LwwSetConfig {
        &self.config
    }

    /// Records that `element` was present at `timestamp`.
    ///
    /// The stored add timestamp only moves forward; an older or equal
    /// timestamp is accepted and ignored. `Ok` means the write was applied
    /// (or safely skipped), not that the element is a member: a remove with a
    /// later timestamp may already be stored, or may arrive right after.
    pub fn add(&self, element: E, timestamp: T) -> Result<()> {
        validate(&self.config, &element, SetOp::Add)?;
        self.adds.apply(element, timestamp);
        Ok(())
    }

    /// Records that `element` was absent at `timestamp`.
    ///
    /// Mirror image of [`add`](Self::add) on the remove registry.
    pub fn remove(&self, element: E, timestamp: T) -> Result<()> {
        validate(&self.config, &element, SetOp::Remove)?;
        self.removes.apply(element, timestamp);
        Ok(())
    }

    /// Returns true if `element` is currently a member.
    #[must_use]
    pub fn exists<Q>(&self, element: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let adds = self.adds.read();
        let removes = self.removes.read();
        is_member(adds.get(element), removes.get(element))
    }

    /// Returns every current member, in no particular order.
    #[must_use]
    pub fn elements(&self) -> Vec<E> {
        let adds = self.adds.read();
        let removes = self.removes.read();
        adds.iter()
            .filter(|(element, added)| is_member(Some(*added), removes.get(*element)))
            .map(|(element, _)| element.clone())
            .collect()
    }

    /// Returns the number of current members.
    #[must_use]
    pub fn len(&self) -> usize {
        let adds = self.adds.read();
        let removes = self.removes.read();
        adds.iter()
            .filter(|(element, added)| is_member(Some(*added), removes.get(*element)))
            .count()
    }

    /// Returns true if the set has no current members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries in the add and remove registries.
    ///
    /// Unlike [`len`](Self::len) this never decreases.
    #[must_use]
    pub fn registry_sizes(&self) -> (usize, usize) {
        (self.adds.len(), self.removes.len())
    }

    /// Returns the stored add timestamp for `element`.
    #[must_use]
    pub fn add_timestamp<Q>(&self, element: &Q) -> Option<T>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.adds.get(element)
    }

    /// Returns the stored remove timestamp for `element`.
    #[must_use]
    pub fn remove_timestamp<Q>(&self, element: &Q) -> Option<T>
    where
        E: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.removes.get(element)
    }

    /// Copies both registries.
    #[must_use]
    pub fn snapshot(&self) -> LwwSetSnapshot<E, T> {
        let adds = self.adds.read();
        let removes = self.removes.read();
        LwwSetSnapshot {
            adds: adds.clone(),
            removes: removes.clone(),
        }
    }

    /// Merges a snapshot from another replica into this set.
    ///
    /// Every element is validated before anything is applied; on error the
    /// set is unchanged. Replaying the same snapshot is a no-op.
    pub fn merge_snapshot(&self, snapshot: LwwSetSnapshot<E, T>) -> Result<()> {
        for element in snapshot.touched() {
            validate(&self.config, element, SetOp::Merge)?;
        }
        let adds_changed = self.adds.apply_all(snapshot.adds);
        let removes_changed = self.removes.apply_all(snapshot.removes);
        debug!(adds_changed, removes_changed, "merged snapshot");
        Ok(())
    }

    /// Merges another set into this one.
    ///
    /// This operation is:
    /// - Commutative: merge(a, b) == merge(b, a)
    /// - Associative: merge(merge(a, b), c) == merge(a, merge(b, c))
    /// - Idempotent: merge(a, a) == a
    pub fn merge(&self, other: &Self) -> Result<()> {
        // Copy first: `other` may be `self`, and its read guards must be
        // released before our write locks are taken.
        self.merge_snapshot(other.snapshot())
    }
}

fn validate<E: Element>(config: &LwwSetConfig, element: &E, op: SetOp) -> Result<()> {
    let size = element.encoded_len();
    if size > config.max_element_bytes {
        warn!(%op, size, limit = config.max_element_bytes, "rejected oversized element");
        return Err(LwwSetError::ElementSizeExceeded {
            op,
            size,
            limit: config.max_element_bytes,
        });
    }
    Ok(())
}

impl<E, T> Default for LwwElementSet<E, T>
where
    E: Element,
    T: Ord + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E, T> Clone for LwwElementSet<E, T>
where
    E: Element,
    T: Ord + Clone + Debug,
{
    fn clone(&self) -> Self {
        let snapshot = self.snapshot();
        Self {
            config: self.config.clone(),
            adds: Registry::from_entries(SetOp::Add, snapshot.adds),
            removes: Registry::from_entries(SetOp::Remove, snapshot.removes),
        }
    }
}

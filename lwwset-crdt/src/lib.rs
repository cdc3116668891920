//! Last-Writer-Wins Element Set CRDT.
//!
//! - [`LwwElementSet`] — concurrent set keyed by element, resolved by timestamp
//! - [`LwwSetSnapshot`] — serializable copy of its registries, for
//!   persistence and replica-to-replica merge
//! - [`Element`] — identifiers the set can hold, with their encoded size
//!
//! Replicas converge once every `add`/`remove` is known everywhere.
//! Operations are commutative, associative, and idempotent, so replication
//! can deliver them at least once and in any order.

mod config;
mod element;
mod error;
mod lww_set;
mod registry;
mod snapshot;

pub use config::{DEFAULT_MAX_ELEMENT_BYTES, LwwSetConfig};
pub use element::Element;
pub use error::{LwwSetError, Result, SetOp};
pub use lww_set::LwwElementSet;
pub use lwwset_types::{HybridClock, HybridTimestamp};
pub use snapshot::{Entries, LwwSetSnapshot};

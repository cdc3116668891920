//! Element identifiers stored in the set.

use std::fmt::Debug;
use std::hash::Hash;
use std::mem::size_of;
use std::sync::Arc;

/// An opaque, immutable identifier that can be stored in an
/// [`LwwElementSet`](crate::LwwElementSet).
///
/// `encoded_len` is the size checked against
/// [`LwwSetConfig::max_element_bytes`](crate::LwwSetConfig::max_element_bytes):
/// the payload bytes plus the size of the owning handle.
pub trait Element: Eq + Hash + Clone + Debug {
    /// Encoded size of this element in bytes.
    fn encoded_len(&self) -> usize;
}

impl Element for String {
    fn encoded_len(&self) -> usize {
        self.len().saturating_add(size_of::<Self>())
    }
}

impl Element for Box<str> {
    fn encoded_len(&self) -> usize {
        self.len().saturating_add(size_of::<Self>())
    }
}

impl Element for Arc<str> {
    fn encoded_len(&self) -> usize {
        self.len().saturating_add(size_of::<Self>())
    }
}

impl Element for Vec<u8> {
    fn encoded_len(&self) -> usize {
        self.len().saturating_add(size_of::<Self>())
    }
}

//! Error types for the set.

use std::fmt;
use thiserror::Error;

/// Result type for set operations.
pub type Result<T> = std::result::Result<T, LwwSetError>;

/// The operation that rejected an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Add,
    Remove,
    Merge,
    Restore,
}

impl fmt::Display for SetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Remove => f.write_str("remove"),
            Self::Merge => f.write_str("merge"),
            Self::Restore => f.write_str("restore"),
        }
    }
}

/// Errors that can occur in set operations.
///
/// Retrying the same element always fails the same way; the caller has to
/// shrink or drop it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LwwSetError {
    /// Element is larger than the configured maximum.
    #[error("failed to {op} element: {size} bytes exceeds the maximum of {limit} bytes")]
    ElementSizeExceeded { op: SetOp, size: usize, limit: usize },
}

//! Core type definitions for the LWW element set.
//!
//! This crate defines the ordering primitives the set is built on:
//! - Hybrid Logical Clock timestamps
//! - A thread-safe clock that hands out strictly increasing timestamps
//!
//! The set itself is generic over any totally ordered timestamp; these
//! types are the default source.

mod clock;
mod timestamp;

pub use clock::HybridClock;
pub use timestamp::HybridTimestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

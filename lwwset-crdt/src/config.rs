//! Set configuration.

use serde::{Deserialize, Serialize};

/// Largest element a set accepts by default: 512 MiB.
pub const DEFAULT_MAX_ELEMENT_BYTES: usize = 1 << 29;

/// Configuration for an [`LwwElementSet`](crate::LwwElementSet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LwwSetConfig {
    /// Maximum encoded size of an element, in bytes.
    pub max_element_bytes: usize,
}

impl LwwSetConfig {
    /// Returns this config with a different element size limit.
    #[must_use]
    pub fn with_max_element_bytes(mut self, max_element_bytes: usize) -> Self {
        self.max_element_bytes = max_element_bytes;
        self
    }
}

impl Default for LwwSetConfig {
    fn default() -> Self {
        Self {
            max_element_bytes: DEFAULT_MAX_ELEMENT_BYTES,
        }
    }
}

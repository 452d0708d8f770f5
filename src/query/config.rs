//! Cursor configuration.

use serde::{Deserialize, Serialize};

/// Default staging buffer capacity, in rows.
pub const DEFAULT_BUFFER_SIZE: usize = 512;

/// Settings consumed when building a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CursorConfig {
    /// Rows decoded per Parquet staging refill
    pub buffer_size: usize,

    /// Return strings and bytes as views into the staging buffer
    #[serde(rename = "useUnsafeStringReader")]
    pub zero_copy_strings: bool,
}

impl CursorConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the staging buffer capacity. Zero selects the default.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Enable or disable zero-copy string and byte values.
    pub fn with_zero_copy_strings(mut self, enabled: bool) -> Self {
        self.zero_copy_strings = enabled;
        self
    }

    /// Capacity actually used for the staging buffer.
    pub fn effective_buffer_size(&self) -> usize {
        if self.buffer_size == 0 {
            DEFAULT_BUFFER_SIZE
        } else {
            self.buffer_size
        }
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            zero_copy_strings: false,
        }
    }
}

//! Raw result payloads returned by the engine.

use crate::types::ResultFormat;
use bytes::Bytes;
use std::fmt;

/// The raw bytes produced by one query execution.
///
/// A buffer is immutable and deliberately not `Clone`: it is moved into
/// exactly one cursor and its memory is released when that cursor closes.
pub struct ResultBuffer {
    /// Format the engine declared for the payload
    format: ResultFormat,
    /// Encoded container bytes
    data: Bytes,
}

impl ResultBuffer {
    /// Wrap an engine payload.
    pub fn new(format: ResultFormat, data: impl Into<Bytes>) -> Self {
        Self {
            format,
            data: data.into(),
        }
    }

    /// Get the declared format.
    pub fn format(&self) -> &ResultFormat {
        &self.format
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the engine produced a zero-length payload.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Hand the payload over to a decoder.
    pub(crate) fn into_bytes(self) -> Bytes {
        self.data
    }
}

impl fmt::Debug for ResultBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultBuffer")
            .field("format", &self.format)
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_accessors() {
        let buffer = ResultBuffer::new(ResultFormat::Parquet, vec![1u8, 2, 3]);

        assert_eq!(buffer.format(), &ResultFormat::Parquet);
        assert_eq!(buffer.len(), 3);
        assert!(!buffer.is_empty());
        assert_eq!(buffer.as_bytes(), &[1, 2, 3]);
        assert_eq!(buffer.into_bytes(), Bytes::from_static(&[1, 2, 3]));
    }

    #[test]
    fn test_debug_omits_payload() {
        let buffer = ResultBuffer::new(ResultFormat::Arrow, vec![0xAB; 64]);
        let debug = format!("{:?}", buffer);
        assert!(debug.contains("len: 64"));
        assert!(!debug.contains("171"));
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = ResultBuffer::new(ResultFormat::Arrow, Bytes::new());
        assert!(buffer.is_empty());
    }
}

//! Row cursor contract and format dispatch.
//!
//! This module defines the [`RowCursor`] trait shared by both decoders and the
//! [`Cursor`] sum type that selects a decoder from a [`ResultFormat`].

use crate::error::{ConfigError, CursorError, DriverError};
use crate::query::buffer::ResultBuffer;
use crate::query::config::CursorConfig;
use crate::query::file::FileCursor;
use crate::query::stream::StreamCursor;
use crate::types::{ResultFormat, Value};
use arrow_schema::SchemaRef;
use tracing::{debug, warn};

/// Outcome of a successful [`RowCursor::next`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// A row was written into the destination slots
    Row,
    /// No rows remain; repeated calls keep returning this
    EndOfData,
}

impl Fetch {
    pub fn is_row(&self) -> bool {
        matches!(self, Fetch::Row)
    }
}

/// Position and lifecycle flags of a cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorState {
    /// Number of batches read from the container so far
    pub batch_index: usize,
    /// Next row to hand out within the current batch
    pub row_index: usize,
    /// All rows have been returned
    pub exhausted: bool,
    /// The cursor was closed, explicitly or by a fatal decode error
    pub closed: bool,
}

/// Pull-based access to the rows of a decoded result.
///
/// Every operation takes `&mut self`; a cursor serves exactly one caller at a
/// time and has no internal locking.
pub trait RowCursor {
    /// Column names in positional order.
    ///
    /// # Errors
    /// Returns `CursorError::Closed` after [`close`](RowCursor::close)
    fn columns(&self) -> Result<&[String], CursorError>;

    /// Advance one row and write its values into `dest`.
    ///
    /// `dest` must hold exactly one slot per column. Values written may borrow
    /// from the cursor for as long as the `&mut` borrow of this call lives.
    ///
    /// # Errors
    /// - `CursorError::Closed` if the cursor was closed
    /// - `CursorError::ColumnCountMismatch` if `dest` has the wrong width
    /// - `CursorError::Decode` on malformed data; the cursor is closed afterwards
    fn next<'c>(&'c mut self, dest: &mut [Value<'c>]) -> Result<Fetch, CursorError>;

    /// Release the reader and buffers. Safe to call any number of times.
    fn close(&mut self) -> Result<(), CursorError>;

    /// Advance one row into freshly allocated slots.
    fn next_row(&mut self) -> Result<Option<Vec<Value<'_>>>, CursorError> {
        let width = self.columns()?.len();
        let mut row = vec![Value::Null; width];
        match self.next(&mut row)? {
            Fetch::Row => Ok(Some(row)),
            Fetch::EndOfData => Ok(None),
        }
    }

    /// Advance one row and copy every value out of the cursor.
    fn next_owned_row(&mut self) -> Result<Option<Vec<Value<'static>>>, CursorError> {
        Ok(self
            .next_row()?
            .map(|row| row.into_iter().map(Value::into_owned).collect()))
    }
}

/// A cursor over one query result, in either supported container format.
#[derive(Debug)]
pub enum Cursor {
    /// Arrow IPC result
    Stream(StreamCursor),
    /// Parquet result
    File(FileCursor),
}

impl Cursor {
    /// Build the cursor matching `format`, taking ownership of `buffer`.
    ///
    /// The buffer is not touched for an unknown format. Arrow payloads are
    /// opened and their schema read immediately; Parquet payloads only have
    /// their footer parsed, with row decoding deferred to the first `next`.
    ///
    /// # Errors
    /// - `ConfigError::UnsupportedFormat` for `ResultFormat::Unknown`
    /// - `CursorError::Decode` if the container cannot be opened
    ///
    /// # Example
    ///
    /// ```
    /// use chdb_cursor::query::{Cursor, CursorConfig, ResultBuffer};
    /// use chdb_cursor::types::ResultFormat;
    ///
    /// let buffer = ResultBuffer::new(ResultFormat::Arrow, Vec::new());
    /// let result = Cursor::build(&ResultFormat::parse("orc"), buffer, &CursorConfig::default());
    /// assert!(result.is_err());
    /// ```
    pub fn build(
        format: &ResultFormat,
        buffer: ResultBuffer,
        config: &CursorConfig,
    ) -> Result<Self, DriverError> {
        if let ResultFormat::Unknown(tag) = format {
            return Err(ConfigError::UnsupportedFormat(tag.clone()).into());
        }

        if buffer.format() != format {
            warn!(
                declared = %buffer.format(),
                requested = %format,
                "result buffer declares a different format than requested"
            );
        }
        debug!(format = %format, bytes = buffer.len(), "building cursor");

        match format {
            ResultFormat::Arrow => Ok(Cursor::Stream(StreamCursor::open(buffer)?)),
            ResultFormat::Parquet => Ok(Cursor::File(FileCursor::open(buffer, config)?)),
            ResultFormat::Unknown(tag) => Err(ConfigError::UnsupportedFormat(tag.clone()).into()),
        }
    }

    /// Format this cursor decodes.
    pub fn format(&self) -> ResultFormat {
        match self {
            Cursor::Stream(_) => ResultFormat::Arrow,
            Cursor::File(_) => ResultFormat::Parquet,
        }
    }

    /// Arrow schema of the result, if the payload declared one.
    pub fn schema(&self) -> Option<SchemaRef> {
        match self {
            Cursor::Stream(c) => c.schema(),
            Cursor::File(c) => c.schema(),
        }
    }

    pub fn state(&self) -> CursorState {
        match self {
            Cursor::Stream(c) => c.state(),
            Cursor::File(c) => c.state(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }
}

impl RowCursor for Cursor {
    fn columns(&self) -> Result<&[String], CursorError> {
        match self {
            Cursor::Stream(c) => c.columns(),
            Cursor::File(c) => c.columns(),
        }
    }

    fn next<'c>(&'c mut self, dest: &mut [Value<'c>]) -> Result<Fetch, CursorError> {
        match self {
            Cursor::Stream(c) => c.next(dest),
            Cursor::File(c) => c.next(dest),
        }
    }

    fn close(&mut self) -> Result<(), CursorError> {
        match self {
            Cursor::Stream(c) => c.close(),
            Cursor::File(c) => c.close(),
        }
    }
}

//! Row cursor over Parquet payloads.
//!
//! The footer is parsed when the cursor is opened. Rows are then decoded in
//! blocks of at most `buffer_size` into a [`StagingBuffer`], one block at a
//! time, and handed out from there.
//!
//! With zero-copy strings enabled, string and binary values are views into
//! the staged block. The borrow checker ties each view to the `next` call
//! that produced it, so a view cannot be held across the following `next`:
//!
//! ```compile_fail
//! use chdb_cursor::query::{CursorConfig, FileCursor, ResultBuffer, RowCursor};
//!
//! fn hold_across_refill(buffer: ResultBuffer) -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CursorConfig::default().with_zero_copy_strings(true);
//!     let mut cursor = FileCursor::open(buffer, &config)?;
//!     let first = cursor.next_row()?;
//!     let second = cursor.next_row()?;
//!     println!("{:?} {:?}", first, second);
//!     Ok(())
//! }
//! ```
//!
//! Copy the value with [`Value::into_owned`] to keep it longer.

use crate::arrow_conversion::{check_batch, fill_row, StringMode};
use crate::error::{CursorError, DecodeError};
use crate::query::buffer::ResultBuffer;
use crate::query::config::CursorConfig;
use crate::query::results::{CursorState, Fetch, RowCursor};
use crate::query::staging::StagingBuffer;
use crate::types::{column_names, describe_schema, ColumnMetadata, Value};
use arrow_schema::SchemaRef;
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};
use std::fmt;
use tracing::{debug, warn};

/// Cursor over a Parquet result.
pub struct FileCursor {
    reader: Option<ParquetRecordBatchReader>,
    schema: Option<SchemaRef>,
    columns: Vec<ColumnMetadata>,
    names: Vec<String>,
    staging: StagingBuffer,
    mode: StringMode,
    state: CursorState,
    total_rows: usize,
    row_groups: usize,
}

impl FileCursor {
    /// Parse the Parquet footer and prepare a reader decoding
    /// `config.effective_buffer_size()` rows per block.
    ///
    /// A zero-length payload yields a cursor without a schema.
    ///
    /// # Errors
    /// Returns `CursorError::Decode` if the footer or schema cannot be read
    pub fn open(buffer: ResultBuffer, config: &CursorConfig) -> Result<Self, CursorError> {
        let capacity = config.effective_buffer_size();
        let mode = StringMode::from_zero_copy(config.zero_copy_strings);
        let data = buffer.into_bytes();

        if data.is_empty() {
            debug!("parquet payload is empty, cursor has no schema");
            return Ok(Self {
                reader: None,
                schema: None,
                columns: Vec::new(),
                names: Vec::new(),
                staging: StagingBuffer::new(capacity),
                mode,
                state: CursorState::default(),
                total_rows: 0,
                row_groups: 0,
            });
        }

        let builder = ParquetRecordBatchReaderBuilder::try_new(data)?;
        let schema = builder.schema().clone();
        let columns = describe_schema(&schema)?;
        let metadata = builder.metadata();
        let total_rows = usize::try_from(metadata.file_metadata().num_rows()).unwrap_or(0);
        let row_groups = metadata.num_row_groups();

        let reader = builder.with_batch_size(capacity).build()?;
        debug!(
            rows = total_rows,
            row_groups,
            buffer_size = capacity,
            zero_copy = config.zero_copy_strings,
            "opened parquet cursor"
        );

        Ok(Self {
            reader: Some(reader),
            names: column_names(&columns),
            schema: Some(schema),
            columns,
            staging: StagingBuffer::new(capacity),
            mode,
            state: CursorState::default(),
            total_rows,
            row_groups,
        })
    }

    /// Arrow schema recorded in the footer.
    pub fn schema(&self) -> Option<SchemaRef> {
        self.schema.clone()
    }

    pub fn column_metadata(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Row count declared by the footer.
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn row_groups(&self) -> usize {
        self.row_groups
    }

    /// Number of blocks decoded into the staging buffer so far.
    pub fn batch_reads(&self) -> usize {
        self.staging.refills()
    }

    /// Staging capacity in rows.
    pub fn buffer_size(&self) -> usize {
        self.staging.capacity()
    }

    /// Whether string and binary values borrow from the staging buffer.
    pub fn zero_copy(&self) -> bool {
        self.mode == StringMode::Borrow
    }

    /// Decode the next block. `Ok(false)` means no rows remain.
    fn refill(&mut self) -> Result<bool, CursorError> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(false);
        };

        match reader.next() {
            None => Ok(false),
            Some(Err(e)) => Err(e.into()),
            Some(Ok(batch)) if batch.num_rows() == 0 => Ok(false),
            Some(Ok(batch)) => {
                debug!(
                    batch = self.state.batch_index,
                    rows = batch.num_rows(),
                    "decoded parquet block"
                );
                self.staging.load(batch)?;
                self.state.batch_index += 1;
                self.state.row_index = 0;
                Ok(true)
            }
        }
    }

    fn finish(&mut self) {
        debug!(blocks = self.staging.refills(), "parquet cursor exhausted");
        self.state.exhausted = true;
        self.staging.clear();
        self.reader = None;
    }

    fn fail(&mut self, err: CursorError) -> CursorError {
        warn!(error = %err, batch = self.state.batch_index, "parquet cursor failed, closing");
        self.reader = None;
        self.staging.clear();
        self.state.closed = true;
        err
    }
}

impl RowCursor for FileCursor {
    fn columns(&self) -> Result<&[String], CursorError> {
        if self.state.closed {
            return Err(CursorError::Closed);
        }
        Ok(&self.names)
    }

    fn next<'c>(&'c mut self, dest: &mut [Value<'c>]) -> Result<Fetch, CursorError> {
        if self.state.closed {
            return Err(CursorError::Closed);
        }
        if self.state.exhausted {
            return Ok(Fetch::EndOfData);
        }
        if dest.len() != self.names.len() {
            return Err(CursorError::ColumnCountMismatch {
                expected: self.names.len(),
                actual: dest.len(),
            });
        }

        if self.staging.needs_refill() {
            match self.refill() {
                Ok(true) => {}
                Ok(false) => {
                    self.finish();
                    return Ok(Fetch::EndOfData);
                }
                Err(e) => return Err(self.fail(e)),
            }
        }

        let Some(row) = self.staging.take_row() else {
            self.finish();
            return Ok(Fetch::EndOfData);
        };

        // Fresh blocks are checked while no view into them exists yet.
        if row == 0 {
            let checked = self
                .staging
                .batch()
                .map_or(Ok(()), |batch| check_batch(batch, self.names.len()));
            if let Err(e) = checked {
                return Err(self.fail(e.into()));
            }
        }

        // `dest` borrows the staged block for 'c; only disjoint fields may change
        // below, so the block stays staged until `close`.
        let filled = match self.staging.batch() {
            Some(batch) => fill_row(batch, row, self.mode, dest),
            None => Err(DecodeError::SchemaMismatch(
                "staging buffer holds no block".to_string(),
            )),
        };
        if let Err(e) = filled {
            warn!(error = %e, batch = self.state.batch_index, "parquet cursor failed, closing");
            self.reader = None;
            self.state.closed = true;
            return Err(e.into());
        }

        self.state.row_index = row + 1;
        Ok(Fetch::Row)
    }

    fn close(&mut self) -> Result<(), CursorError> {
        if !self.state.closed {
            debug!(blocks = self.staging.refills(), "closing parquet cursor");
        }
        self.reader = None;
        self.staging.clear();
        self.state.closed = true;
        Ok(())
    }
}

impl fmt::Debug for FileCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCursor")
            .field("columns", &self.names)
            .field("total_rows", &self.total_rows)
            .field("row_groups", &self.row_groups)
            .field("buffer_size", &self.staging.capacity())
            .field("mode", &self.mode)
            .field("state", &self.state)
            .finish()
    }
}

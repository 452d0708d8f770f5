//! Row cursor over Arrow IPC payloads.
//!
//! Both IPC framings are accepted: the file framing, recognised by its
//! leading `ARROW1` magic and footer, and the stream framing of a schema
//! message followed by record batches. Batches are read one at a time as
//! rows are consumed.

use crate::arrow_conversion::fill_row_owned;
use crate::error::{CursorError, DecodeError};
use crate::query::buffer::ResultBuffer;
use crate::query::results::{CursorState, Fetch, RowCursor};
use crate::types::{column_names, describe_schema, ColumnMetadata, Value};
use arrow::ipc::reader::{FileReader, StreamReader};
use arrow_array::RecordBatch;
use arrow_schema::{ArrowError, SchemaRef};
use bytes::Bytes;
use std::fmt;
use std::io;
use tracing::{debug, warn};

const IPC_FILE_MAGIC: &[u8] = b"ARROW1";

/// IPC reader for either framing.
enum IpcReader {
    File(FileReader<io::Cursor<Bytes>>),
    Stream(StreamReader<io::Cursor<Bytes>>),
}

impl IpcReader {
    fn open(data: Bytes) -> Result<Self, ArrowError> {
        if data.starts_with(IPC_FILE_MAGIC) {
            Ok(IpcReader::File(FileReader::try_new(io::Cursor::new(data), None)?))
        } else {
            Ok(IpcReader::Stream(StreamReader::try_new(
                io::Cursor::new(data),
                None,
            )?))
        }
    }

    fn schema(&self) -> SchemaRef {
        match self {
            IpcReader::File(r) => r.schema(),
            IpcReader::Stream(r) => r.schema(),
        }
    }

    fn next_batch(&mut self) -> Option<Result<RecordBatch, ArrowError>> {
        match self {
            IpcReader::File(r) => r.next(),
            IpcReader::Stream(r) => r.next(),
        }
    }

    fn framing(&self) -> &'static str {
        match self {
            IpcReader::File(_) => "file",
            IpcReader::Stream(_) => "stream",
        }
    }
}

/// Cursor over an Arrow IPC result.
///
/// Values are always copied out of the current batch; there is no zero-copy
/// mode for this format.
pub struct StreamCursor {
    reader: Option<IpcReader>,
    schema: Option<SchemaRef>,
    columns: Vec<ColumnMetadata>,
    names: Vec<String>,
    batch: Option<RecordBatch>,
    state: CursorState,
}

impl StreamCursor {
    /// Open an IPC payload and read its schema. No batch is read yet.
    ///
    /// A zero-length payload yields a cursor without a schema: no columns,
    /// and end of data on the first `next`.
    ///
    /// # Errors
    /// Returns `CursorError::Decode` if the framing or schema is invalid, or a
    /// column type has no row value mapping
    pub fn open(buffer: ResultBuffer) -> Result<Self, CursorError> {
        let data = buffer.into_bytes();
        if data.is_empty() {
            debug!("arrow payload is empty, cursor has no schema");
            return Ok(Self {
                reader: None,
                schema: None,
                columns: Vec::new(),
                names: Vec::new(),
                batch: None,
                state: CursorState::default(),
            });
        }

        let reader = IpcReader::open(data)?;
        let schema = reader.schema();
        let columns = describe_schema(&schema)?;
        debug!(
            framing = reader.framing(),
            columns = columns.len(),
            "opened arrow cursor"
        );

        Ok(Self {
            reader: Some(reader),
            names: column_names(&columns),
            schema: Some(schema),
            columns,
            batch: None,
            state: CursorState::default(),
        })
    }

    /// Arrow schema of the payload, if it declared one.
    pub fn schema(&self) -> Option<SchemaRef> {
        self.schema.clone()
    }

    /// Metadata for every column.
    pub fn column_metadata(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Number of record batches read from the payload.
    pub fn batches_read(&self) -> usize {
        self.state.batch_index
    }

    fn has_pending_row(&self) -> bool {
        self.batch
            .as_ref()
            .is_some_and(|batch| self.state.row_index < batch.num_rows())
    }

    fn load_next_batch(&mut self) -> Result<bool, CursorError> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(false);
        };

        match reader.next_batch() {
            None => Ok(false),
            Some(Err(e)) => Err(e.into()),
            Some(Ok(batch)) => {
                if batch.num_columns() != self.names.len() {
                    return Err(DecodeError::SchemaMismatch(format!(
                        "batch {} has {} columns, schema declares {}",
                        self.state.batch_index,
                        batch.num_columns(),
                        self.names.len()
                    ))
                    .into());
                }
                debug!(
                    batch = self.state.batch_index,
                    rows = batch.num_rows(),
                    "read arrow batch"
                );
                self.batch = Some(batch);
                self.state.batch_index += 1;
                self.state.row_index = 0;
                Ok(true)
            }
        }
    }

    fn release(&mut self) {
        self.reader = None;
        self.batch = None;
    }

    fn fail(&mut self, err: CursorError) -> CursorError {
        warn!(error = %err, batch = self.state.batch_index, "arrow cursor failed, closing");
        self.release();
        self.state.closed = true;
        err
    }
}

impl RowCursor for StreamCursor {
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

        while !self.has_pending_row() {
            match self.load_next_batch() {
                Ok(true) => {}
                Ok(false) => {
                    debug!(batches = self.state.batch_index, "arrow cursor exhausted");
                    self.state.exhausted = true;
                    self.release();
                    return Ok(Fetch::EndOfData);
                }
                Err(e) => return Err(self.fail(e)),
            }
        }

        let row = self.state.row_index;
        let filled = match &self.batch {
            Some(batch) => fill_row_owned(batch, row, dest),
            None => Ok(()),
        };
        if let Err(e) = filled {
            return Err(self.fail(e.into()));
        }

        self.state.row_index += 1;
        Ok(Fetch::Row)
    }

    fn close(&mut self) -> Result<(), CursorError> {
        if !self.state.closed {
            debug!(batches = self.state.batch_index, "closing arrow cursor");
        }
        self.release();
        self.state.closed = true;
        Ok(())
    }
}

impl fmt::Debug for StreamCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamCursor")
            .field("framing", &self.reader.as_ref().map(IpcReader::framing))
            .field("columns", &self.names)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures::{arrow_file, arrow_stream, people_batch, people_schema};
    use crate::types::ResultFormat;

    fn open(bytes: Vec<u8>) -> StreamCursor {
        StreamCursor::open(ResultBuffer::new(ResultFormat::Arrow, bytes)).unwrap()
    }

    fn count_rows(cursor: &mut StreamCursor) -> usize {
        let mut rows = 0;
        while cursor.next_row().unwrap().is_some() {
            rows += 1;
        }
        rows
    }

    #[test]
    fn test_reads_all_rows_across_batches() {
        let mut cursor = open(arrow_stream(&[
            people_batch(0, 3),
            people_batch(3, 2),
            people_batch(5, 4),
        ]));

        assert_eq!(count_rows(&mut cursor), 9);
        assert_eq!(cursor.batches_read(), 3);
        assert!(cursor.state().exhausted);
    }

    #[test]
    fn test_end_of_data_is_idempotent() {
        let mut cursor = open(arrow_stream(&[people_batch(0, 1)]));
        assert!(cursor.next_row().unwrap().is_some());

        let mut dest = vec![Value::Null; cursor.columns().unwrap().len()];
        assert_eq!(cursor.next(&mut dest).unwrap(), Fetch::EndOfData);
        let mut dest = vec![Value::Null; cursor.columns().unwrap().len()];
        assert_eq!(cursor.next(&mut dest).unwrap(), Fetch::EndOfData);
    }

    #[test]
    fn test_exhaustion_releases_payload() {
        let mut cursor = open(arrow_stream(&[people_batch(0, 2)]));
        assert_eq!(count_rows(&mut cursor), 2);

        assert!(cursor.state().exhausted);
        assert!(cursor.reader.is_none());
        assert!(cursor.batch.is_none());
        assert_eq!(cursor.columns().unwrap().len(), people_schema().fields().len());
        assert!(cursor.next_row().unwrap().is_none());
    }

    #[test]
    fn test_row_values_in_order() {
        let mut cursor = open(arrow_stream(&[people_batch(10, 2)]));

        let first = cursor.next_owned_row().unwrap().unwrap();
        let second = cursor.next_owned_row().unwrap().unwrap();

        assert_eq!(first[0], Value::Int64(10));
        assert_eq!(first[1].as_str(), Some("person-10"));
        assert_eq!(second[0], Value::Int64(11));
        assert!(!first[1].is_borrowed());
    }

    #[test]
    fn test_file_framing() {
        let mut cursor = open(arrow_file(&[people_batch(0, 2), people_batch(2, 2)]));
        assert!(format!("{:?}", cursor).contains("file"));
        assert_eq!(count_rows(&mut cursor), 4);
    }

    #[test]
    fn test_columns_before_and_after_exhaustion() {
        let mut cursor = open(arrow_stream(&[people_batch(0, 1)]));
        let expected: Vec<String> = people_schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();

        assert_eq!(cursor.columns().unwrap(), expected.as_slice());
        count_rows(&mut cursor);
        assert_eq!(cursor.columns().unwrap(), expected.as_slice());
    }

    #[test]
    fn test_zero_rows_keeps_schema() {
        let mut cursor = open(arrow_stream(&[]));
        assert_eq!(cursor.columns().unwrap().len(), people_schema().fields().len());
        assert!(cursor.next_row().unwrap().is_none());
    }

    #[test]
    fn test_empty_batches_are_skipped() {
        let mut cursor = open(arrow_stream(&[
            people_batch(0, 0),
            people_batch(0, 2),
            people_batch(2, 0),
        ]));
        assert_eq!(count_rows(&mut cursor), 2);
    }

    #[test]
    fn test_empty_payload_has_no_schema() {
        let mut cursor = open(Vec::new());
        assert!(cursor.schema().is_none());
        assert!(cursor.columns().unwrap().is_empty());
        assert!(cursor.next_row().unwrap().is_none());
    }

    #[test]
    fn test_garbage_payload_fails_to_open() {
        let result = StreamCursor::open(ResultBuffer::new(ResultFormat::Arrow, vec![7u8; 32]));
        assert!(matches!(result, Err(CursorError::Decode(_))));
    }

    #[test]
    fn test_truncated_stream_fails_then_closes() {
        let mut bytes = arrow_stream(&[people_batch(0, 2), people_batch(2, 50)]);
        bytes.truncate(bytes.len() - 64);
        let mut cursor = open(bytes);

        assert!(cursor.next_row().unwrap().is_some());
        assert!(cursor.next_row().unwrap().is_some());
        assert!(matches!(cursor.next_row(), Err(CursorError::Decode(_))));
        assert!(cursor.state().closed);
        assert!(matches!(cursor.next_row(), Err(CursorError::Closed)));
    }

    #[test]
    fn test_wrong_slot_count_is_not_fatal() {
        let mut cursor = open(arrow_stream(&[people_batch(0, 1)]));
        let mut dest = vec![Value::Null; 1];
        assert!(matches!(
            cursor.next(&mut dest),
            Err(CursorError::ColumnCountMismatch { actual: 1, .. })
        ));
        assert!(!cursor.state().closed);
        assert!(cursor.next_row().unwrap().is_some());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut cursor = open(arrow_stream(&[people_batch(0, 5)]));
        cursor.next_row().unwrap();

        cursor.close().unwrap();
        cursor.close().unwrap();

        assert!(matches!(cursor.next_row(), Err(CursorError::Closed)));
        assert!(matches!(cursor.columns(), Err(CursorError::Closed)));
    }
}

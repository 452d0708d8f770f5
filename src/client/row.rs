//! Single-row and statement results.

use crate::error::{CursorError, DriverError, QueryError};
use crate::query::{Cursor, RowCursor};
use crate::types::Value;

/// Result of [`Connection::query_row`](crate::client::Connection::query_row).
///
/// Holds either the cursor or the error the query failed with, so that the
/// error surfaces from [`scan`](SingleRow::scan).
#[derive(Debug)]
pub struct SingleRow {
    result: Result<Cursor, DriverError>,
}

impl SingleRow {
    pub(crate) fn new(result: Result<Cursor, DriverError>) -> Self {
        Self { result }
    }

    /// The error the query failed with, if any, without consuming the row.
    pub fn err(&self) -> Option<&DriverError> {
        self.result.as_ref().err()
    }

    /// Return the first row and close the cursor. Further rows are discarded.
    ///
    /// # Errors
    /// - the deferred query error, if the query failed
    /// - `QueryError::NoRows` if the result is empty
    /// - `CursorError::Decode` if the first row cannot be decoded
    pub fn scan(self) -> Result<Vec<Value<'static>>, DriverError> {
        let mut cursor = self.result?;
        let row = cursor.next_owned_row()?;
        cursor.close()?;
        row.ok_or_else(|| QueryError::NoRows.into())
    }

    /// Like [`scan`](SingleRow::scan), writing the row into `dest`.
    ///
    /// # Errors
    /// Also returns `CursorError::ColumnCountMismatch` if `dest` does not hold
    /// one slot per column
    pub fn scan_into(self, dest: &mut [Value<'static>]) -> Result<(), DriverError> {
        let mut cursor = self.result?;
        let width = cursor.columns()?.len();
        if width != dest.len() {
            cursor.close()?;
            return Err(CursorError::ColumnCountMismatch {
                expected: width,
                actual: dest.len(),
            }
            .into());
        }

        let row = cursor.next_owned_row()?;
        cursor.close()?;
        let row = row.ok_or(QueryError::NoRows)?;
        for (slot, value) in dest.iter_mut().zip(row) {
            *slot = value;
        }
        Ok(())
    }
}

/// Result of [`Connection::exec`](crate::client::Connection::exec).
///
/// The engine reports neither generated keys nor affected row counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecResult {
    _private: (),
}

impl ExecResult {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Always returns `QueryError::NotSupported`
    pub fn last_insert_id(&self) -> Result<i64, QueryError> {
        Err(QueryError::NotSupported("last insert id"))
    }

    /// # Errors
    /// Always returns `QueryError::NotSupported`
    pub fn rows_affected(&self) -> Result<u64, QueryError> {
        Err(QueryError::NotSupported("rows affected"))
    }
}

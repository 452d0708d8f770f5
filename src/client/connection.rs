//! Connection over a query engine.
//!
//! A `Connection` interpolates parameters, runs the query on the engine with
//! the configured format, session and UDF path, and wraps the payload in a
//! [`Cursor`].

use crate::client::row::{ExecResult, SingleRow};
use crate::connection::{ConnectionParams, ExecuteRequest, QueryEngine};
use crate::error::{DriverError, QueryError};
use crate::query::{interpolate, Cursor, Parameter, ResultBuffer, RowCursor};
use crate::types::ResultFormat;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// An open connection.
///
/// Connections hold no engine-side state of their own; a persistent session,
/// if configured, is identified by its path and owned by the engine.
pub struct Connection {
    engine: Arc<dyn QueryEngine>,
    params: ConnectionParams,
}

impl Connection {
    pub(crate) fn new(engine: Arc<dyn QueryEngine>, params: ConnectionParams) -> Self {
        Self { engine, params }
    }

    /// Settings this connection was opened with.
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Result format requested for every query.
    pub fn format(&self) -> &ResultFormat {
        &self.params.format
    }

    /// Run a query and return a cursor over its rows.
    ///
    /// # Errors
    /// - `QueryError::ParameterBindingError` if `args` do not match the placeholders
    /// - `QueryError::ExecutionFailed` if the engine rejects the query
    /// - `QueryError::NoResult` if the engine returned no payload
    /// - `CursorError::Decode` if the payload cannot be opened
    pub fn query(&self, sql: &str, args: &[Parameter]) -> Result<Cursor, DriverError> {
        let buffer = self.run(sql, args)?.ok_or(QueryError::NoResult)?;
        Cursor::build(&self.params.format, buffer, &self.params.cursor)
    }

    /// Run a query expected to return a single row.
    ///
    /// Errors are deferred to [`SingleRow::scan`].
    pub fn query_row(&self, sql: &str, args: &[Parameter]) -> SingleRow {
        SingleRow::new(self.query(sql, args))
    }

    /// Run a statement for its side effects, discarding any rows.
    ///
    /// A statement that produces no payload is a success.
    pub fn exec(&self, sql: &str, args: &[Parameter]) -> Result<ExecResult, DriverError> {
        if let Some(buffer) = self.run(sql, args)? {
            let mut cursor = Cursor::build(&self.params.format, buffer, &self.params.cursor)?;
            cursor.close()?;
        }
        Ok(ExecResult::new())
    }

    /// # Errors
    /// Always returns `QueryError::NotSupported`
    pub fn begin(&self) -> Result<(), DriverError> {
        Err(QueryError::NotSupported("transactions").into())
    }

    /// # Errors
    /// Always returns `QueryError::NotSupported`
    pub fn prepare(&self, _sql: &str) -> Result<(), DriverError> {
        Err(QueryError::NotSupported("prepared statements").into())
    }

    /// Close the connection. Nothing is held open, so this always succeeds.
    pub fn close(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn run(&self, sql: &str, args: &[Parameter]) -> Result<Option<ResultBuffer>, DriverError> {
        let request = ExecuteRequest {
            query: interpolate(sql, args)?,
            format: self.params.format.clone(),
            udf_path: self.params.udf_path.clone(),
            session: self.params.session.clone(),
        };

        debug!(
            format = request.format.engine_name(),
            params = args.len(),
            session = request.session.as_deref().unwrap_or("<none>"),
            "executing query"
        );
        let result = self.engine.execute(&request)?;
        debug!(bytes = result.as_ref().map(ResultBuffer::len), "query finished");
        Ok(result)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

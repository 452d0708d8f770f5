//! The embedded query engine seam.

use crate::error::QueryError;
use crate::query::ResultBuffer;
use crate::types::ResultFormat;

/// One query as handed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteRequest {
    /// SQL text with parameters already interpolated
    pub query: String,
    /// Container format the result should be encoded in
    pub format: ResultFormat,
    /// Directory of user-defined functions
    pub udf_path: Option<String>,
    /// Persistent session path; `None` runs the query statelessly
    pub session: Option<String>,
}

/// An engine that executes SQL and returns an encoded result payload.
///
/// `Ok(None)` means the statement produced no payload at all (typical for
/// DDL and inserts), which is different from a result with zero rows.
pub trait QueryEngine: Send + Sync {
    /// Execute one query.
    ///
    /// # Errors
    /// Returns `QueryError::ExecutionFailed` if the engine rejects the query
    fn execute(&self, request: &ExecuteRequest) -> Result<Option<ResultBuffer>, QueryError>;
}

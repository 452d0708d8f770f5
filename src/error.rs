//! Error types for chdb-cursor.
//!
//! This module defines domain-specific error types organized by functional area.

use std::fmt;
use thiserror::Error;

/// Top-level error type encompassing all possible errors.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Configuration and connection-string errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Query execution errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Row cursor errors
    #[error(transparent)]
    Cursor(#[from] CursorError),
}

/// Errors raised while building configuration or choosing a result format.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The requested result format has no decoder
    #[error("Unsupported result format: {0}")]
    UnsupportedFormat(String),

    /// Invalid configuration parameter
    #[error("Invalid parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Connection string parsing error
    #[error("Failed to parse connection string: {0}")]
    ParseError(String),
}

/// Errors related to query execution.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The engine rejected or failed the query
    #[error("Query execution failed: {0}")]
    ExecutionFailed(String),

    /// The engine returned no result payload at all
    #[error("Query produced no result")]
    NoResult,

    /// A single-row query matched nothing
    #[error("No rows in result set")]
    NoRows,

    /// Parameter binding error
    #[error("Parameter binding error for parameter {index}: {message}")]
    ParameterBindingError { index: usize, message: String },

    /// Operation the driver does not implement
    #[error("Not supported: {0}")]
    NotSupported(&'static str),
}

/// Errors returned by row cursors.
#[derive(Error, Debug)]
pub enum CursorError {
    /// The container bytes could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The cursor was used after it was closed
    #[error("Cursor is closed")]
    Closed,

    /// The destination slots do not match the column count
    #[error("Expected {expected} destination slots, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },
}

/// Errors raised while decoding Arrow IPC or Parquet payloads.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Arrow IPC decoding failure
    #[error("Arrow error: {0}")]
    Arrow(String),

    /// Parquet decoding failure
    #[error("Parquet error: {0}")]
    Parquet(String),

    /// Batch layout disagrees with the declared schema
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Column type with no row value mapping
    #[error("Unsupported type {data_type} for column '{column}'")]
    UnsupportedType { column: String, data_type: String },
}

/// Stable error categories for callers that branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Unknown error
    Unknown = 0,
    /// Invalid argument or configuration
    InvalidArgument = 1,
    /// Operation not valid in the current state
    InvalidState = 2,
    /// Not implemented
    NotImplemented = 3,
    /// Query error
    Query = 4,
    /// Malformed result payload
    Decode = 5,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Unknown => write!(f, "UNKNOWN"),
            ErrorCode::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            ErrorCode::InvalidState => write!(f, "INVALID_STATE"),
            ErrorCode::NotImplemented => write!(f, "NOT_IMPLEMENTED"),
            ErrorCode::Query => write!(f, "QUERY"),
            ErrorCode::Decode => write!(f, "DECODE"),
        }
    }
}

impl DriverError {
    /// Map to an error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            DriverError::Config(_) => ErrorCode::InvalidArgument,
            DriverError::Query(e) => e.code(),
            DriverError::Cursor(e) => e.code(),
        }
    }

    /// Whether this error is a fatal decode failure.
    pub fn is_decode(&self) -> bool {
        matches!(self, DriverError::Cursor(CursorError::Decode(_)))
    }
}

impl QueryError {
    /// Map to an error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            QueryError::NotSupported(_) => ErrorCode::NotImplemented,
            QueryError::ParameterBindingError { .. } => ErrorCode::InvalidArgument,
            _ => ErrorCode::Query,
        }
    }
}

impl CursorError {
    /// Map to an error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            CursorError::Decode(_) => ErrorCode::Decode,
            CursorError::Closed => ErrorCode::InvalidState,
            CursorError::ColumnCountMismatch { .. } => ErrorCode::InvalidArgument,
        }
    }
}

// Conversions from external error types
impl From<arrow_schema::ArrowError> for DecodeError {
    fn from(err: arrow_schema::ArrowError) -> Self {
        DecodeError::Arrow(err.to_string())
    }
}

impl From<parquet::errors::ParquetError> for DecodeError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        DecodeError::Parquet(err.to_string())
    }
}

impl From<arrow_schema::ArrowError> for CursorError {
    fn from(err: arrow_schema::ArrowError) -> Self {
        CursorError::Decode(err.into())
    }
}

impl From<parquet::errors::ParquetError> for CursorError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        CursorError::Decode(err.into())
    }
}

impl From<DecodeError> for DriverError {
    fn from(err: DecodeError) -> Self {
        DriverError::Cursor(CursorError::Decode(err))
    }
}

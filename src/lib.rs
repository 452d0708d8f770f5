//! # chdb-cursor
//!
//! Row cursors over the encoded results of an embedded analytical engine.
//!
//! The engine answers each query with one buffer of bytes, either an Arrow
//! IPC payload or a Parquet file. This crate decodes that buffer lazily and
//! hands out rows one at a time as typed [`Value`]s, with optional zero-copy
//! string views for Parquet results.
//!
//! ## Example
//!
//! ```no_run
//! # use chdb_cursor::*;
//! # use std::sync::Arc;
//! # fn example(engine: Arc<dyn QueryEngine>) -> Result<(), Box<dyn std::error::Error>> {
//! // Create a driver over the engine and open a connection
//! let driver = Driver::new(engine);
//! let connection = driver.open("driverType=arrow")?;
//!
//! // Run a query and walk its rows
//! let mut cursor = connection.query("SELECT number FROM numbers(10)", &[])?;
//! while let Some(row) = cursor.next_row()? {
//!     println!("{:?}", row);
//! }
//!
//! // Release the result buffer
//! cursor.close()?;
//! # Ok(())
//! # }
//! ```

pub mod arrow_conversion;
pub mod client;
pub mod connection;
pub mod error;
pub mod query;
pub mod types;

pub use client::{Connection, Connector, Driver, ExecResult, SingleRow};
pub use connection::{ConnectionParams, ExecuteRequest, QueryEngine};
pub use error::{ConfigError, CursorError, DecodeError, DriverError, ErrorCode, QueryError};
pub use query::{Cursor, CursorConfig, Fetch, Parameter, ResultBuffer, RowCursor};
pub use types::{ResultFormat, Value};

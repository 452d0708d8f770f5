//! Result materialization.
//!
//! A query result arrives as one [`ResultBuffer`] of encoded bytes. A
//! [`Cursor`] is built over it for the requested format and hands out rows
//! one at a time:
//!
//! - `results` - the [`RowCursor`] contract and the [`Cursor`] dispatch
//! - `stream` - Arrow IPC decoding
//! - `file` - Parquet decoding through a bounded [`StagingBuffer`]
//! - `statement` - `?` parameter interpolation
//!
//! # Example
//!
//! ```
//! use chdb_cursor::query::{Cursor, CursorConfig, ResultBuffer, RowCursor};
//! use chdb_cursor::types::ResultFormat;
//!
//! # fn example() -> Result<(), chdb_cursor::DriverError> {
//! let buffer = ResultBuffer::new(ResultFormat::Arrow, Vec::new());
//! let mut cursor = Cursor::build(&ResultFormat::Arrow, buffer, &CursorConfig::default())?;
//!
//! while let Some(row) = cursor.next_row()? {
//!     println!("{:?}", row);
//! }
//! cursor.close()?;
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod buffer;
pub mod config;
pub mod file;
pub mod results;
pub mod staging;
pub mod statement;
pub mod stream;

pub use buffer::ResultBuffer;
pub use config::{CursorConfig, DEFAULT_BUFFER_SIZE};
pub use file::FileCursor;
pub use results::{Cursor, CursorState, Fetch, RowCursor};
pub use staging::StagingBuffer;
pub use statement::{interpolate, Parameter};
pub use stream::StreamCursor;

//! Driver, connector and connection over an embedded engine.
//!
//! # Architecture
//!
//! - `Driver` - metadata and factory; parses connection strings
//! - `Connector` - validated settings bound to an engine
//! - `Connection` - runs queries and builds cursors over their results
//! - `SingleRow` / `ExecResult` - results of `query_row` and `exec`
//!
//! # Example
//!
//! ```no_run
//! use chdb_cursor::client::Driver;
//! use chdb_cursor::connection::QueryEngine;
//! use chdb_cursor::query::{Parameter, RowCursor};
//! use std::sync::Arc;
//!
//! # fn example(engine: Arc<dyn QueryEngine>) -> Result<(), chdb_cursor::DriverError> {
//! let driver = Driver::new(engine);
//! let connection = driver.open("driverType=parquet;bufferSize=1024")?;
//!
//! let mut cursor = connection.query("SELECT * FROM t WHERE id > ?", &[Parameter::from(10i64)])?;
//! println!("{:?}", cursor.columns()?);
//! while let Some(row) = cursor.next_row()? {
//!     println!("{:?}", row);
//! }
//! cursor.close()?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod connector;
pub mod driver;
pub mod row;

pub use connection::Connection;
pub use connector::Connector;
pub use driver::Driver;
pub use row::{ExecResult, SingleRow};

//! Connection configuration and the query engine seam.
//!
//! # Example
//!
//! ```
//! # use chdb_cursor::connection::{ConnectionParams, ConnectionParamsBuilder};
//! # use chdb_cursor::types::ResultFormat;
//! # use std::str::FromStr;
//! // Using ConnectionParamsBuilder
//! let params = ConnectionParamsBuilder::new()
//!     .format(ResultFormat::Parquet)
//!     .buffer_size(1024)
//!     .zero_copy_strings(true)
//!     .build()?;
//!
//! // Or parse from a connection string
//! let parsed = ConnectionParams::from_str(
//!     "driverType=parquet;bufferSize=1024;useUnsafeStringReader=true",
//! )?;
//! assert_eq!(params, parsed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;
pub mod params;

pub use engine::{ExecuteRequest, QueryEngine};
pub use params::{ConnectionParams, ConnectionParamsBuilder};

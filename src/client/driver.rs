//! Driver entry point.
//!
//! The `Driver` carries metadata about the crate and is the factory for
//! connectors and connections over one query engine.

use crate::client::{Connection, Connector};
use crate::connection::{ConnectionParams, QueryEngine};
use crate::error::DriverError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Driver over an embedded query engine.
///
/// # Example
///
/// ```
/// use chdb_cursor::client::Driver;
/// use chdb_cursor::connection::{ExecuteRequest, QueryEngine};
/// use chdb_cursor::error::QueryError;
/// use chdb_cursor::query::ResultBuffer;
/// use std::sync::Arc;
///
/// struct NullEngine;
///
/// impl QueryEngine for NullEngine {
///     fn execute(&self, _: &ExecuteRequest) -> Result<Option<ResultBuffer>, QueryError> {
///         Ok(None)
///     }
/// }
///
/// let driver = Driver::new(Arc::new(NullEngine));
/// println!("Driver: {} v{}", driver.name(), driver.version());
/// let connection = driver.open("driverType=arrow").unwrap();
/// assert!(connection.exec("CREATE TABLE t (x UInt8) ENGINE = Memory", &[]).is_ok());
/// ```
#[derive(Clone)]
pub struct Driver {
    engine: Arc<dyn QueryEngine>,
    name: String,
    version: String,
}

impl Driver {
    /// Create a driver over `engine`.
    pub fn new(engine: Arc<dyn QueryEngine>) -> Self {
        Self {
            engine,
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Get the driver name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the driver version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Parse `connection_string` and open a connection.
    ///
    /// # Errors
    /// Returns `DriverError::Config` if the string is malformed or names an
    /// unsupported format
    pub fn open(&self, connection_string: &str) -> Result<Connection, DriverError> {
        self.open_connector(connection_string)?.connect()
    }

    /// Parse `connection_string` into a reusable connector.
    ///
    /// The format is not checked until [`Connector::connect`].
    pub fn open_connector(&self, connection_string: &str) -> Result<Connector, DriverError> {
        let params = ConnectionParams::from_str(connection_string)?;
        Ok(Connector::new(Arc::clone(&self.engine), params))
    }

    /// Check if a connection string would open a connection.
    pub fn validate_connection_string(&self, connection_string: &str) -> bool {
        ConnectionParams::from_str(connection_string)
            .is_ok_and(|params| params.format.is_supported())
    }
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("name", &self.name)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

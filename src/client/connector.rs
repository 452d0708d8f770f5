//! Reusable connection factory.

use crate::client::Connection;
use crate::connection::{ConnectionParams, QueryEngine};
use crate::error::{ConfigError, DriverError};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Parsed connection settings bound to an engine.
#[derive(Clone)]
pub struct Connector {
    engine: Arc<dyn QueryEngine>,
    params: ConnectionParams,
}

impl Connector {
    pub fn new(engine: Arc<dyn QueryEngine>, params: ConnectionParams) -> Self {
        Self { engine, params }
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Open a connection with these settings.
    ///
    /// # Errors
    /// Returns `ConfigError::UnsupportedFormat` if the format is unknown
    pub fn connect(&self) -> Result<Connection, DriverError> {
        if !self.params.format.is_supported() {
            return Err(ConfigError::UnsupportedFormat(self.params.format.to_string()).into());
        }

        debug!(
            format = %self.params.format,
            session = self.params.session.as_deref().unwrap_or("<none>"),
            buffer_size = self.params.cursor.buffer_size,
            "opening connection"
        );
        Ok(Connection::new(Arc::clone(&self.engine), self.params.clone()))
    }
}

impl fmt::Debug for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

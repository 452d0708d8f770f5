//! Connection string parsing and validation.
//!
//! A connection string is a `;`-separated list of `key=value` pairs:
//!
//! | key                     | meaning                                        |
//! |-------------------------|------------------------------------------------|
//! | `session`               | path of a persistent engine session            |
//! | `udfPath`               | directory of user-defined functions            |
//! | `driverType`            | result format, `arrow` (default) or `parquet`  |
//! | `bufferSize`            | Parquet staging rows, default 512              |
//! | `useUnsafeStringReader` | `true` for zero-copy string values             |
//!
//! Other keys are kept as attributes.

use crate::error::ConfigError;
use crate::query::{CursorConfig, DEFAULT_BUFFER_SIZE};
use crate::types::ResultFormat;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

const SESSION_KEY: &str = "session";
const UDF_PATH_KEY: &str = "udfPath";
const DRIVER_TYPE_KEY: &str = "driverType";
const BUFFER_SIZE_KEY: &str = "bufferSize";
const ZERO_COPY_KEY: &str = "useUnsafeStringReader";

/// Settings for connections opened from one connector.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionParams {
    /// Persistent session path; `None` runs each query statelessly
    pub session: Option<String>,

    /// Directory the engine loads user-defined functions from
    pub udf_path: Option<String>,

    /// Result format requested from the engine
    pub format: ResultFormat,

    /// Cursor settings applied to every result
    pub cursor: CursorConfig,

    /// Additional connection attributes
    pub attributes: HashMap<String, String>,
}

impl ConnectionParams {
    /// Create a new ConnectionParamsBuilder.
    pub fn builder() -> ConnectionParamsBuilder {
        ConnectionParamsBuilder::new()
    }
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            session: None,
            udf_path: None,
            format: ResultFormat::default(),
            cursor: CursorConfig::default(),
            attributes: HashMap::new(),
        }
    }
}

impl FromStr for ConnectionParams {
    type Err = ConfigError;

    /// Parse a `key=value;key=value` connection string.
    ///
    /// Keys and values are trimmed; an empty string gives all defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// # use chdb_cursor::connection::ConnectionParams;
    /// # use chdb_cursor::types::ResultFormat;
    /// # use std::str::FromStr;
    /// let params = ConnectionParams::from_str("driverType=parquet; bufferSize=100")?;
    /// assert_eq!(params.format, ResultFormat::Parquet);
    /// assert_eq!(params.cursor.buffer_size, 100);
    ///
    /// let params = ConnectionParams::from_str("")?;
    /// assert_eq!(params.format, ResultFormat::Arrow);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pairs = parse_pairs(s)?;
        let mut builder = ConnectionParamsBuilder::new();

        for (key, value) in pairs {
            builder = match key.as_str() {
                SESSION_KEY => builder.session(&value),
                UDF_PATH_KEY => builder.udf_path(&value),
                DRIVER_TYPE_KEY => builder.format(ResultFormat::parse(&value)),
                BUFFER_SIZE_KEY => builder.buffer_size(parse_buffer_size(&value)),
                ZERO_COPY_KEY => builder.zero_copy_strings(value.eq_ignore_ascii_case("true")),
                _ => builder.attribute(&key, &value),
            };
        }

        builder.build()
    }
}

impl fmt::Display for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(session) = &self.session {
            parts.push(format!("{SESSION_KEY}={session}"));
        }
        if let Some(udf_path) = &self.udf_path {
            parts.push(format!("{UDF_PATH_KEY}={udf_path}"));
        }
        parts.push(format!("{DRIVER_TYPE_KEY}={}", self.format));
        parts.push(format!("{BUFFER_SIZE_KEY}={}", self.cursor.buffer_size));
        parts.push(format!("{ZERO_COPY_KEY}={}", self.cursor.zero_copy_strings));

        let mut attributes: Vec<_> = self.attributes.iter().collect();
        attributes.sort();
        for (key, value) in attributes {
            parts.push(format!("{key}={value}"));
        }

        write!(f, "{}", parts.join(";"))
    }
}

/// Builder for constructing ConnectionParams with validation.
#[derive(Debug, Clone, Default)]
pub struct ConnectionParamsBuilder {
    session: Option<String>,
    udf_path: Option<String>,
    format: Option<ResultFormat>,
    buffer_size: Option<usize>,
    zero_copy_strings: Option<bool>,
    attributes: HashMap<String, String>,
}

impl ConnectionParamsBuilder {
    /// Create a new ConnectionParamsBuilder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run queries in the persistent session stored at `path`.
    pub fn session(mut self, path: &str) -> Self {
        self.session = Some(path.to_string());
        self
    }

    /// Set the user-defined function directory.
    pub fn udf_path(mut self, path: &str) -> Self {
        self.udf_path = Some(path.to_string());
        self
    }

    /// Set the result format.
    pub fn format(mut self, format: ResultFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the Parquet staging capacity. Zero selects the default.
    pub fn buffer_size(mut self, rows: usize) -> Self {
        self.buffer_size = Some(rows);
        self
    }

    /// Enable or disable zero-copy string values.
    pub fn zero_copy_strings(mut self, enabled: bool) -> Self {
        self.zero_copy_strings = Some(enabled);
        self
    }

    /// Add a custom connection attribute.
    pub fn attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Build the ConnectionParams with validation.
    ///
    /// An unknown format is accepted here and rejected when connecting.
    pub fn build(self) -> Result<ConnectionParams, ConfigError> {
        if self.session.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::InvalidParameter {
                parameter: SESSION_KEY.to_string(),
                message: "Session path cannot be empty".to_string(),
            });
        }

        let buffer_size = match self.buffer_size {
            Some(0) | None => DEFAULT_BUFFER_SIZE,
            Some(rows) => rows,
        };

        Ok(ConnectionParams {
            session: self.session,
            udf_path: self.udf_path.filter(|path| !path.is_empty()),
            format: self.format.unwrap_or_default(),
            cursor: CursorConfig::new()
                .with_buffer_size(buffer_size)
                .with_zero_copy_strings(self.zero_copy_strings.unwrap_or(false)),
            attributes: self.attributes,
        })
    }
}

/// Split a connection string into trimmed key/value pairs.
fn parse_pairs(s: &str) -> Result<Vec<(String, String)>, ConfigError> {
    let mut pairs = Vec::new();

    for pair in s.split(';') {
        if pair.trim().is_empty() {
            continue;
        }

        let (key, value) = pair.split_once('=').ok_or_else(|| {
            ConfigError::ParseError(format!("Invalid key=value pair: {}", pair.trim()))
        })?;

        pairs.push((key.trim().to_string(), value.trim().to_string()));
    }

    Ok(pairs)
}

/// Parse a staging capacity, falling back to the default on bad input.
fn parse_buffer_size(value: &str) -> usize {
    match value.parse::<i64>() {
        Ok(rows) if rows > 0 => usize::try_from(rows).unwrap_or(DEFAULT_BUFFER_SIZE),
        Ok(rows) => {
            warn!(value = rows, default = DEFAULT_BUFFER_SIZE, "bufferSize must be positive, using default");
            DEFAULT_BUFFER_SIZE
        }
        Err(_) => {
            warn!(value, default = DEFAULT_BUFFER_SIZE, "bufferSize is not a number, using default");
            DEFAULT_BUFFER_SIZE
        }
    }
}

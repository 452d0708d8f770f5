//! Result payload formats produced by the engine.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Encoding of a query result payload.
///
/// `Arrow` is the streaming columnar container (Arrow IPC), `Parquet` the
/// structured file container. Any other tag parses to `Unknown`, which keeps
/// the original text for error reporting and can never be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResultFormat {
    /// Arrow IPC (stream or file framing)
    #[default]
    Arrow,
    /// Parquet file
    Parquet,
    /// Unrecognized format tag
    Unknown(String),
}

impl ResultFormat {
    /// Parse a format tag, case-insensitively.
    ///
    /// ```
    /// use chdb_cursor::types::ResultFormat;
    ///
    /// assert_eq!(ResultFormat::parse("parquet"), ResultFormat::Parquet);
    /// assert_eq!(ResultFormat::parse(" ARROW "), ResultFormat::Arrow);
    /// assert!(!ResultFormat::parse("ORC").is_supported());
    /// ```
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim();
        match tag.to_ascii_uppercase().as_str() {
            "ARROW" => ResultFormat::Arrow,
            "PARQUET" => ResultFormat::Parquet,
            _ => ResultFormat::Unknown(tag.to_string()),
        }
    }

    /// Output format name handed to the engine.
    pub fn engine_name(&self) -> &str {
        match self {
            ResultFormat::Arrow => "Arrow",
            ResultFormat::Parquet => "Parquet",
            ResultFormat::Unknown(_) => "Invalid",
        }
    }

    /// Whether a cursor can be built for this format.
    pub fn is_supported(&self) -> bool {
        !matches!(self, ResultFormat::Unknown(_))
    }
}

impl fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultFormat::Unknown(tag) => write!(f, "{}", tag),
            other => write!(f, "{}", other.engine_name()),
        }
    }
}

impl FromStr for ResultFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ResultFormat::parse(s))
    }
}

impl From<String> for ResultFormat {
    fn from(value: String) -> Self {
        ResultFormat::parse(&value)
    }
}

impl From<ResultFormat> for String {
    fn from(value: ResultFormat) -> Self {
        value.to_string()
    }
}

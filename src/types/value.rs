//! Typed row values.

use arrow_schema::TimeUnit;
use std::borrow::Cow;
use std::sync::Arc;

/// A single cell value produced by a row cursor.
///
/// Strings and byte strings are either owned copies or borrowed views into
/// the cursor's decoded batch. A borrowed view carries the lifetime of the
/// `next` call that produced it, so it cannot outlive the next refill or the
/// cursor's `close`; use [`Value::into_owned`] to keep it longer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value<'a> {
    /// SQL NULL
    #[default]
    Null,
    /// Boolean value
    Boolean(bool),
    /// Signed integer of any width
    Int64(i64),
    /// Unsigned integer of any width
    UInt64(u64),
    /// Floating point of any width
    Float64(f64),
    /// Fixed-point decimal: `value * 10^-scale`
    Decimal128 { value: i128, precision: u8, scale: i8 },
    /// Days since the UNIX epoch
    Date32(i32),
    /// Milliseconds since the UNIX epoch
    Date64(i64),
    /// Timestamp in the given unit since the UNIX epoch
    Timestamp {
        value: i64,
        unit: TimeUnit,
        timezone: Option<Arc<str>>,
    },
    /// UTF-8 string
    Utf8(Cow<'a, str>),
    /// Raw bytes
    Binary(Cow<'a, [u8]>),
}

impl<'a> Value<'a> {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if the value aliases cursor-owned memory.
    pub fn is_borrowed(&self) -> bool {
        matches!(
            self,
            Value::Utf8(Cow::Borrowed(_)) | Value::Binary(Cow::Borrowed(_))
        )
    }

    /// Copy any borrowed data so the value no longer depends on the cursor.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(b) => Value::Boolean(b),
            Value::Int64(i) => Value::Int64(i),
            Value::UInt64(u) => Value::UInt64(u),
            Value::Float64(f) => Value::Float64(f),
            Value::Decimal128 {
                value,
                precision,
                scale,
            } => Value::Decimal128 {
                value,
                precision,
                scale,
            },
            Value::Date32(d) => Value::Date32(d),
            Value::Date64(d) => Value::Date64(d),
            Value::Timestamp {
                value,
                unit,
                timezone,
            } => Value::Timestamp {
                value,
                unit,
                timezone,
            },
            Value::Utf8(s) => Value::Utf8(Cow::Owned(s.into_owned())),
            Value::Binary(b) => Value::Binary(Cow::Owned(b.into_owned())),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view of the value, if it fits in `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(i) => Some(*i),
            Value::UInt64(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Byte view of a string or binary value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Utf8(s) => Some(s.as_bytes()),
            Value::Binary(b) => Some(b.as_ref()),
            _ => None,
        }
    }
}

impl From<bool> for Value<'static> {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value<'static> {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<f64> for Value<'static> {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<String> for Value<'static> {
    fn from(value: String) -> Self {
        Value::Utf8(Cow::Owned(value))
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::Utf8(Cow::Borrowed(value))
    }
}

impl From<Vec<u8>> for Value<'static> {
    fn from(value: Vec<u8>) -> Self {
        Value::Binary(Cow::Owned(value))
    }
}

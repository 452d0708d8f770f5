//! Mapping from Arrow data types to the row value kinds a cursor produces.

use crate::error::DecodeError;
use arrow_schema::DataType;

/// Logical kind of the [`Value`](crate::types::Value) a column yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Column of all NULLs
    Null,
    Boolean,
    /// Any signed integer width
    Int64,
    /// Any unsigned integer width
    UInt64,
    /// Float32 or Float64
    Float64,
    Decimal128,
    Date32,
    Date64,
    Timestamp,
    /// Utf8, LargeUtf8 or Utf8View
    Utf8,
    /// Binary, LargeBinary, BinaryView or FixedSizeBinary
    Binary,
}

/// Type mapper for Arrow column types.
pub struct TypeMapper;

impl TypeMapper {
    /// Map an Arrow DataType to the value kind rows will carry.
    ///
    /// Dictionary-encoded columns map to the kind of their dictionary values.
    ///
    /// # Arguments
    /// * `column` - Column name, used for error reporting
    /// * `data_type` - The Arrow type to map
    ///
    /// # Errors
    /// Returns `DecodeError::UnsupportedType` if no row value mapping exists
    pub fn value_kind(column: &str, data_type: &DataType) -> Result<ValueKind, DecodeError> {
        match data_type {
            DataType::Null => Ok(ValueKind::Null),

            DataType::Boolean => Ok(ValueKind::Boolean),

            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
                Ok(ValueKind::Int64)
            }

            DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
                Ok(ValueKind::UInt64)
            }

            DataType::Float32 | DataType::Float64 => Ok(ValueKind::Float64),

            DataType::Decimal128(_, _) => Ok(ValueKind::Decimal128),

            DataType::Date32 => Ok(ValueKind::Date32),

            DataType::Date64 => Ok(ValueKind::Date64),

            DataType::Timestamp(_, _) => Ok(ValueKind::Timestamp),

            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => Ok(ValueKind::Utf8),

            DataType::Binary
            | DataType::LargeBinary
            | DataType::BinaryView
            | DataType::FixedSizeBinary(_) => Ok(ValueKind::Binary),

            DataType::Dictionary(key, value) if key.is_dictionary_key_type() => {
                Self::value_kind(column, value)
            }

            _ => Err(DecodeError::UnsupportedType {
                column: column.to_string(),
                data_type: data_type.to_string(),
            }),
        }
    }
}

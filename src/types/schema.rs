//! Column metadata derived from a container's embedded Arrow schema.

use crate::error::DecodeError;
use crate::types::{TypeMapper, ValueKind};
use arrow_schema::{DataType, Schema};

/// Column metadata from a result container.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetadata {
    /// Column name
    pub name: String,
    /// Declared Arrow type
    pub data_type: DataType,
    /// Kind of value rows carry for this column
    pub kind: ValueKind,
    /// Whether the column is nullable
    pub nullable: bool,
}

/// Describe every column of a schema, rejecting types rows cannot carry.
///
/// # Errors
/// Returns `DecodeError::UnsupportedType` for the first unmappable column
pub fn describe_schema(schema: &Schema) -> Result<Vec<ColumnMetadata>, DecodeError> {
    schema
        .fields()
        .iter()
        .map(|field| {
            let kind = TypeMapper::value_kind(field.name(), field.data_type())?;
            Ok(ColumnMetadata {
                name: field.name().clone(),
                data_type: field.data_type().clone(),
                kind,
                nullable: field.is_nullable(),
            })
        })
        .collect()
}

/// Column names of a described schema, in order.
pub fn column_names(columns: &[ColumnMetadata]) -> Vec<String> {
    columns.iter().map(|c| c.name.clone()).collect()
}

//! Result formats, row values and column metadata.

mod format;
mod mapping;
mod schema;
mod value;

pub use format::ResultFormat;
pub use mapping::{TypeMapper, ValueKind};
pub use schema::{column_names, describe_schema, ColumnMetadata};
pub use value::Value;

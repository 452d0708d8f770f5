//! Conversion of Arrow array cells into row values.
//!
//! Record batches are columnar; cursors hand out one row at a time. The
//! functions here read a single cell per column and either copy
//! variable-width data or borrow it from the batch buffers.

use crate::error::DecodeError;
use crate::types::{TypeMapper, Value};
use arrow_array::cast::AsArray;
use arrow_array::types::{
    ArrowDictionaryKeyType, Date32Type, Date64Type, Decimal128Type, Float32Type, Float64Type,
    Int16Type, Int32Type, Int64Type, Int8Type, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow_array::{Array, DictionaryArray, RecordBatch};
use arrow_schema::{DataType, TimeUnit};
use std::borrow::Cow;

/// How string and binary cells are materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringMode {
    /// Copy into caller-owned storage
    #[default]
    Copy,
    /// Borrow from the batch buffers
    Borrow,
}

impl StringMode {
    /// Mode for the given zero-copy setting.
    pub fn from_zero_copy(zero_copy: bool) -> Self {
        if zero_copy {
            StringMode::Borrow
        } else {
            StringMode::Copy
        }
    }
}

/// Read the cell at `row` of `array`.
///
/// # Errors
/// Returns `DecodeError::UnsupportedType` for column types without a row value mapping
pub fn value_at(array: &dyn Array, row: usize, mode: StringMode) -> Result<Value<'_>, DecodeError> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }

    let value = match array.data_type() {
        DataType::Null => Value::Null,
        DataType::Boolean => Value::Boolean(array.as_boolean().value(row)),

        DataType::Int8 => Value::Int64(i64::from(array.as_primitive::<Int8Type>().value(row))),
        DataType::Int16 => Value::Int64(i64::from(array.as_primitive::<Int16Type>().value(row))),
        DataType::Int32 => Value::Int64(i64::from(array.as_primitive::<Int32Type>().value(row))),
        DataType::Int64 => Value::Int64(array.as_primitive::<Int64Type>().value(row)),

        DataType::UInt8 => Value::UInt64(u64::from(array.as_primitive::<UInt8Type>().value(row))),
        DataType::UInt16 => {
            Value::UInt64(u64::from(array.as_primitive::<UInt16Type>().value(row)))
        }
        DataType::UInt32 => {
            Value::UInt64(u64::from(array.as_primitive::<UInt32Type>().value(row)))
        }
        DataType::UInt64 => Value::UInt64(array.as_primitive::<UInt64Type>().value(row)),

        DataType::Float32 => {
            Value::Float64(f64::from(array.as_primitive::<Float32Type>().value(row)))
        }
        DataType::Float64 => Value::Float64(array.as_primitive::<Float64Type>().value(row)),

        DataType::Decimal128(precision, scale) => Value::Decimal128 {
            value: array.as_primitive::<Decimal128Type>().value(row),
            precision: *precision,
            scale: *scale,
        },

        DataType::Date32 => Value::Date32(array.as_primitive::<Date32Type>().value(row)),
        DataType::Date64 => Value::Date64(array.as_primitive::<Date64Type>().value(row)),

        DataType::Timestamp(unit, timezone) => {
            let value = match unit {
                TimeUnit::Second => array.as_primitive::<TimestampSecondType>().value(row),
                TimeUnit::Millisecond => {
                    array.as_primitive::<TimestampMillisecondType>().value(row)
                }
                TimeUnit::Microsecond => {
                    array.as_primitive::<TimestampMicrosecondType>().value(row)
                }
                TimeUnit::Nanosecond => array.as_primitive::<TimestampNanosecondType>().value(row),
            };
            Value::Timestamp {
                value,
                unit: *unit,
                timezone: timezone.clone(),
            }
        }

        DataType::Utf8 => text(array.as_string::<i32>().value(row), mode),
        DataType::LargeUtf8 => text(array.as_string::<i64>().value(row), mode),
        DataType::Utf8View => text(array.as_string_view().value(row), mode),

        DataType::Binary => binary(array.as_binary::<i32>().value(row), mode),
        DataType::LargeBinary => binary(array.as_binary::<i64>().value(row), mode),
        DataType::BinaryView => binary(array.as_binary_view().value(row), mode),
        DataType::FixedSizeBinary(_) => binary(array.as_fixed_size_binary().value(row), mode),

        DataType::Dictionary(key, _) => {
            return match key.as_ref() {
                DataType::Int8 => dictionary_value(array.as_dictionary::<Int8Type>(), row, mode),
                DataType::Int16 => dictionary_value(array.as_dictionary::<Int16Type>(), row, mode),
                DataType::Int32 => dictionary_value(array.as_dictionary::<Int32Type>(), row, mode),
                DataType::Int64 => dictionary_value(array.as_dictionary::<Int64Type>(), row, mode),
                DataType::UInt8 => dictionary_value(array.as_dictionary::<UInt8Type>(), row, mode),
                DataType::UInt16 => {
                    dictionary_value(array.as_dictionary::<UInt16Type>(), row, mode)
                }
                DataType::UInt32 => {
                    dictionary_value(array.as_dictionary::<UInt32Type>(), row, mode)
                }
                DataType::UInt64 => {
                    dictionary_value(array.as_dictionary::<UInt64Type>(), row, mode)
                }
                other => Err(unsupported(other)),
            };
        }

        other => return Err(unsupported(other)),
    };

    Ok(value)
}

/// Write every column of `row` into `dest`, borrowing or copying per `mode`.
///
/// # Errors
/// Returns `DecodeError::SchemaMismatch` if the batch width differs from `dest`
pub fn fill_row<'a>(
    batch: &'a RecordBatch,
    row: usize,
    mode: StringMode,
    dest: &mut [Value<'a>],
) -> Result<(), DecodeError> {
    check_width(batch, dest.len())?;
    let fields = batch.schema_ref().fields();
    for ((slot, column), field) in dest.iter_mut().zip(batch.columns()).zip(fields) {
        *slot = value_at(column.as_ref(), row, mode).map_err(|e| for_column(e, field.name()))?;
    }
    Ok(())
}

/// Write every column of `row` into `dest` as owned values.
///
/// The slots do not borrow from `batch`, so the batch may be replaced while
/// the caller still holds them.
pub fn fill_row_owned(
    batch: &RecordBatch,
    row: usize,
    dest: &mut [Value<'_>],
) -> Result<(), DecodeError> {
    check_width(batch, dest.len())?;
    let fields = batch.schema_ref().fields();
    for ((slot, column), field) in dest.iter_mut().zip(batch.columns()).zip(fields) {
        *slot = value_at(column.as_ref(), row, StringMode::Copy)
            .map_err(|e| for_column(e, field.name()))?
            .into_owned();
    }
    Ok(())
}

/// Check that `batch` is `width` columns wide and every column has a row
/// value mapping, so that filling any of its rows cannot fail.
///
/// # Errors
/// Returns `DecodeError::SchemaMismatch` on a width difference and
/// `DecodeError::UnsupportedType` naming the first unmapped column
pub fn check_batch(batch: &RecordBatch, width: usize) -> Result<(), DecodeError> {
    check_width(batch, width)?;
    for field in batch.schema_ref().fields() {
        TypeMapper::value_kind(field.name(), field.data_type())?;
    }
    Ok(())
}

fn check_width(batch: &RecordBatch, width: usize) -> Result<(), DecodeError> {
    if batch.num_columns() != width {
        return Err(DecodeError::SchemaMismatch(format!(
            "batch has {} columns, schema declares {}",
            batch.num_columns(),
            width
        )));
    }
    Ok(())
}

fn dictionary_value<K: ArrowDictionaryKeyType>(
    array: &DictionaryArray<K>,
    row: usize,
    mode: StringMode,
) -> Result<Value<'_>, DecodeError> {
    match array.key(row) {
        Some(key) => value_at(array.values().as_ref(), key, mode),
        None => Ok(Value::Null),
    }
}

fn text(value: &str, mode: StringMode) -> Value<'_> {
    match mode {
        StringMode::Borrow => Value::Utf8(Cow::Borrowed(value)),
        StringMode::Copy => Value::Utf8(Cow::Owned(value.to_owned())),
    }
}

fn binary(value: &[u8], mode: StringMode) -> Value<'_> {
    match mode {
        StringMode::Borrow => Value::Binary(Cow::Borrowed(value)),
        StringMode::Copy => Value::Binary(Cow::Owned(value.to_vec())),
    }
}

fn for_column(err: DecodeError, name: &str) -> DecodeError {
    match err {
        DecodeError::UnsupportedType { data_type, .. } => DecodeError::UnsupportedType {
            column: name.to_string(),
            data_type,
        },
        other => other,
    }
}

fn unsupported(data_type: &DataType) -> DecodeError {
    DecodeError::UnsupportedType {
        column: String::new(),
        data_type: data_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::builder::StringDictionaryBuilder;
    use arrow_array::{
        BinaryArray, BooleanArray, Decimal128Array, Float32Array, Int16Array, Int64Array,
        ListArray, StringArray, TimestampMillisecondArray, UInt8Array,
    };
    use arrow_schema::{Field, Schema};
    use std::sync::Arc;

    #[test]
    fn test_primitive_values() {
        let ints = Int16Array::from(vec![Some(-3), None]);
        assert_eq!(value_at(&ints, 0, StringMode::Copy).unwrap(), Value::Int64(-3));
        assert_eq!(value_at(&ints, 1, StringMode::Copy).unwrap(), Value::Null);

        let bytes = UInt8Array::from(vec![200]);
        assert_eq!(value_at(&bytes, 0, StringMode::Copy).unwrap(), Value::UInt64(200));

        let floats = Float32Array::from(vec![0.5]);
        assert_eq!(value_at(&floats, 0, StringMode::Copy).unwrap(), Value::Float64(0.5));

        let bools = BooleanArray::from(vec![false]);
        assert_eq!(value_at(&bools, 0, StringMode::Copy).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn test_decimal_and_timestamp() {
        let decimals = Decimal128Array::from(vec![12345])
            .with_precision_and_scale(10, 2)
            .unwrap();
        assert_eq!(
            value_at(&decimals, 0, StringMode::Copy).unwrap(),
            Value::Decimal128 {
                value: 12345,
                precision: 10,
                scale: 2
            }
        );

        let stamps = TimestampMillisecondArray::from(vec![1_700_000_000_000]).with_timezone("UTC");
        match value_at(&stamps, 0, StringMode::Copy).unwrap() {
            Value::Timestamp {
                value,
                unit,
                timezone,
            } => {
                assert_eq!(value, 1_700_000_000_000);
                assert_eq!(unit, TimeUnit::Millisecond);
                assert_eq!(timezone.as_deref(), Some("UTC"));
            }
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_string_modes() {
        let strings = StringArray::from(vec!["alice", "bob"]);

        let copied = value_at(&strings, 1, StringMode::Copy).unwrap();
        assert!(!copied.is_borrowed());
        assert_eq!(copied.as_str(), Some("bob"));

        let borrowed = value_at(&strings, 1, StringMode::Borrow).unwrap();
        assert!(borrowed.is_borrowed());
        assert_eq!(borrowed, copied);
    }

    #[test]
    fn test_binary_borrow() {
        let blobs = BinaryArray::from(vec![&b"\x00\x01"[..]]);
        let value = value_at(&blobs, 0, StringMode::Borrow).unwrap();
        assert!(value.is_borrowed());
        assert_eq!(value.as_bytes(), Some(&b"\x00\x01"[..]));
    }

    #[test]
    fn test_dictionary_values() {
        let mut builder = StringDictionaryBuilder::<Int32Type>::new();
        builder.append_value("red");
        builder.append_null();
        builder.append_value("red");
        let dict = builder.finish();

        assert_eq!(
            value_at(&dict, 0, StringMode::Copy).unwrap().as_str(),
            Some("red")
        );
        assert!(value_at(&dict, 1, StringMode::Copy).unwrap().is_null());
        assert!(value_at(&dict, 2, StringMode::Borrow).unwrap().is_borrowed());
    }

    #[test]
    fn test_unsupported_type() {
        let list = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![Some(vec![Some(1)])]);
        assert!(matches!(
            value_at(&list, 0, StringMode::Copy),
            Err(DecodeError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_unsupported_column_is_named() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("tags", DataType::new_list(DataType::Int32, true), true),
        ]));
        let tags = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![Some(vec![Some(1)])]);
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Int64Array::from(vec![1])), Arc::new(tags)],
        )
        .unwrap();

        let mut dest = vec![Value::Null; 2];
        match fill_row_owned(&batch, 0, &mut dest) {
            Err(DecodeError::UnsupportedType { column, .. }) => assert_eq!(column, "tags"),
            other => panic!("unexpected result {:?}", other),
        }
        let err = fill_row(&batch, 0, StringMode::Borrow, &mut dest).unwrap_err();
        assert!(err.to_string().contains("'tags'"), "{err}");

        match check_batch(&batch, 2) {
            Err(DecodeError::UnsupportedType { column, .. }) => assert_eq!(column, "tags"),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(matches!(check_batch(&batch, 3), Err(DecodeError::SchemaMismatch(_))));
    }

    #[test]
    fn test_check_batch_accepts_mapped_columns() {
        let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(vec![1]))]).unwrap();
        check_batch(&batch, 1).unwrap();
    }

    #[test]
    fn test_fill_row_width_mismatch() {
        let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(vec![1, 2]))]).unwrap();

        let mut dest = vec![Value::Null; 2];
        assert!(matches!(
            fill_row(&batch, 0, StringMode::Copy, &mut dest),
            Err(DecodeError::SchemaMismatch(_))
        ));

        let mut dest = vec![Value::Null; 1];
        fill_row_owned(&batch, 1, &mut dest).unwrap();
        assert_eq!(dest[0], Value::Int64(2));
    }
}

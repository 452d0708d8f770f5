//! Common test utilities for chdb-cursor integration tests.
//!
//! Payloads are produced with the real Arrow IPC and Parquet writers, and
//! [`FixtureEngine`] stands in for the embedded engine: it encodes a fixed
//! table in whatever format each request asks for.

#![allow(dead_code)]

use arrow::ipc::writer::{FileWriter, StreamWriter};
use arrow_array::types::Int32Type;
use arrow_array::{
    ArrayRef, BinaryArray, Date32Array, Decimal128Array, DictionaryArray, Float64Array,
    Int32Array, RecordBatch, StringArray, TimestampMicrosecondArray, UInt64Array,
};
use arrow_schema::{DataType, Field, Schema, SchemaRef, TimeUnit};
use chdb_cursor::error::QueryError;
use chdb_cursor::{ExecuteRequest, QueryEngine, ResultBuffer, ResultFormat};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::sync::{Arc, Mutex};

pub const COLUMN_NAMES: [&str; 9] = [
    "id", "label", "amount", "price", "payload", "day", "seen_at", "region", "hits",
];

/// Schema covering every value family the cursors decode.
pub fn orders_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("label", DataType::Utf8, true),
        Field::new("amount", DataType::Float64, false),
        Field::new("price", DataType::Decimal128(10, 2), true),
        Field::new("payload", DataType::Binary, true),
        Field::new("day", DataType::Date32, false),
        Field::new(
            "seen_at",
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            false,
        ),
        Field::new(
            "region",
            DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8)),
            false,
        ),
        Field::new("hits", DataType::UInt64, false),
    ]))
}

/// `rows` orders with ids starting at `start`. Labels are NULL for ids divisible by 4.
///
/// Every batch carries the same region dictionary, as the IPC file framing
/// rejects dictionary replacement.
pub fn orders_batch(start: i32, rows: usize) -> RecordBatch {
    let ids: Vec<i32> = (start..start + rows as i32).collect();
    let regions = ["north", "south", "east", "west"];

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(ids.clone())),
        Arc::new(StringArray::from(
            ids.iter()
                .map(|id| (id % 4 != 0).then(|| format!("order-{id}")))
                .collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from_iter_values(
            ids.iter().map(|id| f64::from(*id) / 4.0),
        )),
        Arc::new(
            Decimal128Array::from(
                ids.iter()
                    .map(|id| (id % 5 != 0).then(|| i128::from(*id) * 101))
                    .collect::<Vec<_>>(),
            )
            .with_precision_and_scale(10, 2)
            .unwrap(),
        ),
        Arc::new(BinaryArray::from_iter(
            ids.iter().map(|id| Some(format!("blob{id}").into_bytes())),
        )),
        Arc::new(Date32Array::from_iter_values(ids.iter().map(|id| 19_000 + id))),
        Arc::new(
            TimestampMicrosecondArray::from_iter_values(
                ids.iter().map(|id| 1_700_000_000_000_000 + i64::from(*id)),
            )
            .with_timezone("UTC"),
        ),
        Arc::new(
            DictionaryArray::<Int32Type>::try_new(
                Int32Array::from_iter_values(ids.iter().map(|id| id % regions.len() as i32)),
                Arc::new(StringArray::from(regions.to_vec())),
            )
            .unwrap(),
        ),
        Arc::new(UInt64Array::from_iter_values(
            ids.iter().map(|id| u64::MAX - *id as u64),
        )),
    ];

    RecordBatch::try_new(orders_schema(), columns).unwrap()
}

/// Split `total` rows into batches of at most `per_batch`.
pub fn orders(total: usize, per_batch: usize) -> Vec<RecordBatch> {
    let per_batch = per_batch.max(1);
    (0..total)
        .step_by(per_batch)
        .map(|start| orders_batch(start as i32, per_batch.min(total - start)))
        .collect()
}

pub fn arrow_stream(schema: &SchemaRef, batches: &[RecordBatch]) -> Vec<u8> {
    let mut writer = StreamWriter::try_new(Vec::new(), schema).unwrap();
    for batch in batches {
        writer.write(batch).unwrap();
    }
    writer.finish().unwrap();
    writer.into_inner().unwrap()
}

pub fn arrow_file(schema: &SchemaRef, batches: &[RecordBatch]) -> Vec<u8> {
    let mut writer = FileWriter::try_new(Vec::new(), schema).unwrap();
    for batch in batches {
        writer.write(batch).unwrap();
    }
    writer.finish().unwrap();
    writer.into_inner().unwrap()
}

pub fn parquet_file(
    schema: &SchemaRef,
    batches: &[RecordBatch],
    row_group_size: Option<usize>,
) -> Vec<u8> {
    let mut props = WriterProperties::builder();
    if let Some(size) = row_group_size {
        props = props.set_max_row_group_size(size);
    }
    let mut writer = ArrowWriter::try_new(Vec::new(), schema.clone(), Some(props.build())).unwrap();
    for batch in batches {
        writer.write(batch).unwrap();
    }
    writer.into_inner().unwrap()
}

pub fn arrow_buffer(batches: &[RecordBatch]) -> ResultBuffer {
    ResultBuffer::new(ResultFormat::Arrow, arrow_stream(&orders_schema(), batches))
}

pub fn parquet_buffer(batches: &[RecordBatch]) -> ResultBuffer {
    ResultBuffer::new(
        ResultFormat::Parquet,
        parquet_file(&orders_schema(), batches, None),
    )
}

/// In-process engine answering every SELECT with the same table.
///
/// Statements starting with `CREATE`, `INSERT` or `DROP` produce no payload;
/// a query containing `FAIL` is rejected.
pub struct FixtureEngine {
    batches: Vec<RecordBatch>,
    requests: Mutex<Vec<ExecuteRequest>>,
}

impl FixtureEngine {
    pub fn new(batches: Vec<RecordBatch>) -> Self {
        Self {
            batches,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request executed so far.
    pub fn requests(&self) -> Vec<ExecuteRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl QueryEngine for FixtureEngine {
    fn execute(&self, request: &ExecuteRequest) -> Result<Option<ResultBuffer>, QueryError> {
        self.requests.lock().unwrap().push(request.clone());

        let verb = request
            .query
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        if request.query.contains("FAIL") {
            return Err(QueryError::ExecutionFailed(format!(
                "Code: 62. Syntax error in '{}'",
                request.query
            )));
        }
        if matches!(verb.as_str(), "CREATE" | "INSERT" | "DROP") {
            return Ok(None);
        }

        let schema = orders_schema();
        let data = match &request.format {
            ResultFormat::Arrow => arrow_stream(&schema, &self.batches),
            ResultFormat::Parquet => parquet_file(&schema, &self.batches, None),
            ResultFormat::Unknown(tag) => {
                return Err(QueryError::ExecutionFailed(format!("Unknown output format {tag}")))
            }
        };
        Ok(Some(ResultBuffer::new(request.format.clone(), data)))
    }
}

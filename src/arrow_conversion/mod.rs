//! Arrow data format conversion utilities.
//!
//! This module turns cells of decoded Arrow record batches into row values.

mod converter;

pub use converter::{check_batch, fill_row, fill_row_owned, value_at, StringMode};

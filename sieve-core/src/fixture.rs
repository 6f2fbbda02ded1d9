//! Ten-row reference batch and the results the query must produce on it
//!
//! `discount` is stored dictionary-encoded and decoded on load. The string
//! columns use a non-contiguous layout: `status` row 2 is `"AR"`, and the
//! empty comments all point at offset 0.

use crate::error::Result;
use crate::execution::batch::{InputBatch, ItemColumns};
use crate::execution::columnar::{StringColumn, decode_dictionary};

/// Expected `discount_ratio` of the reference query on [`reference_batch`]
pub const EXPECTED_DISCOUNT_RATIO: f64 = 5.8893854;

/// Expected `avg_price` of the reference query on [`reference_batch`]
pub const EXPECTED_AVG_PRICE: f64 = 16.566666;

/// Absolute tolerance when comparing against the expected results
pub const RESULT_TOLERANCE: f64 = 1e-6;

/// Rows of [`reference_batch`] selected by the reference query
pub const EXPECTED_SELECTION: [u32; 5] = [0, 3, 5, 7, 9];

const DISCOUNT_DICTIONARY: [f64; 4] = [0.04, 0.05, 0.07, 0.08];
const DISCOUNT_IDS: [u32; 10] = [2, 0, 3, 1, 0, 2, 2, 1, 3, 1];

/// Build the reference batch
pub fn reference_batch() -> Result<InputBatch> {
    let status = StringColumn::new(
        vec![0, 1, 2, 4, 5, 6, 7, 8, 9, 10],
        vec![1, 1, 2, 1, 1, 1, 1, 1, 1, 1],
        b"AAARNAANAAA".to_vec(),
    )?;
    let comment = StringColumn::new(
        vec![0, 0, 0, 5, 0, 0, 0, 0, 20, 0],
        vec![5, 0, 0, 15, 5, 0, 0, 0, 12, 5],
        b"PROMOPROMO IN SUMMERPROMO WINTER".to_vec(),
    )?;

    InputBatch::new(ItemColumns {
        quantity: vec![6, 18, 6, 30, 24, 12, 18, 6, 24, 12],
        price: vec![19.9, 24.9, 9.9, 14.9, 9.9, 19.9, 24.9, 19.9, 9.9, 14.9],
        discount: decode_dictionary(&DISCOUNT_DICTIONARY, &DISCOUNT_IDS)?,
        status,
        comment,
    })
}

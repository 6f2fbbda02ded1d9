//! Batches flowing through the filter and aggregate stages
//!
//! `InputBatch` is what a producer hands in, `FilteredBatch` only comes out of
//! [`gather_batch`](crate::execution::gather::gather_batch), and
//! `AggregatedBatch` only comes out of the aggregator. All three are
//! immutable once built.

use crate::error::{Error, Result};
use crate::execution::columnar::StringColumn;
use serde::{Deserialize, Serialize};

/// Row-parallel columns of the `item` table
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemColumns {
    /// Ordered quantity
    pub quantity: Vec<i32>,
    /// Unit price
    pub price: Vec<f64>,
    /// Discount as a fraction of price
    pub discount: Vec<f64>,
    /// Single-letter line status
    pub status: StringColumn,
    /// Free-text comment
    pub comment: StringColumn,
}

impl ItemColumns {
    /// Row count shared by every column, or an error naming the first outlier
    fn row_count(&self) -> Result<usize> {
        let num_rows = self.quantity.len();
        let others = [
            ("price", self.price.len()),
            ("discount", self.discount.len()),
            ("status", self.status.len()),
            ("comment", self.comment.len()),
        ];
        for (name, len) in others {
            if len != num_rows {
                return Err(Error::batch(format!(
                    "column '{}' has {} rows, expected {}",
                    name, len, num_rows
                )));
            }
        }
        for (name, column) in [("status", &self.status), ("comment", &self.comment)] {
            if !column.is_valid() {
                return Err(Error::batch(format!(
                    "string column '{}' has mismatched offset and length arrays",
                    name
                )));
            }
        }
        Ok(num_rows)
    }
}

/// Batch handed to the filter
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ItemColumns", into = "ItemColumns")]
pub struct InputBatch {
    num_rows: usize,
    columns: ItemColumns,
}

impl InputBatch {
    /// Wrap columns after checking they all have the same row count
    ///
    /// String columns must have matching offset/length arrays. Their byte
    /// ranges are not re-checked here; predicates treat a bad range as no
    /// match.
    pub fn new(columns: ItemColumns) -> Result<Self> {
        let num_rows = columns.row_count()?;
        Ok(Self { num_rows, columns })
    }

    /// Parse a JSON batch; shape checks run as part of deserialization
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Column storage
    pub fn columns(&self) -> &ItemColumns {
        &self.columns
    }
}

impl TryFrom<ItemColumns> for InputBatch {
    type Error = Error;

    fn try_from(columns: ItemColumns) -> Result<Self> {
        Self::new(columns)
    }
}

impl From<InputBatch> for ItemColumns {
    fn from(batch: InputBatch) -> Self {
        batch.columns
    }
}

/// Rows of an input batch that passed the filter, compacted
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FilteredBatch {
    num_rows: usize,
    #[serde(flatten)]
    columns: ItemColumns,
}

impl FilteredBatch {
    pub(crate) fn from_gathered(num_rows: usize, columns: ItemColumns) -> Self {
        Self { num_rows, columns }
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Column storage
    pub fn columns(&self) -> &ItemColumns {
        &self.columns
    }
}

/// Single-row result of the aggregate stage
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregatedBatch {
    num_rows: usize,
    discount_ratio: Vec<f64>,
    avg_price: Vec<f64>,
}

impl AggregatedBatch {
    pub(crate) fn new(discount_ratio: f64, avg_price: f64) -> Self {
        Self {
            num_rows: 1,
            discount_ratio: vec![discount_ratio],
            avg_price: vec![avg_price],
        }
    }

    /// Always 1
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// `100 * sum(price * discount) / sum(price)`; NaN over an empty batch
    pub fn discount_ratio(&self) -> f64 {
        self.discount_ratio[0]
    }

    /// Average price of the rows at the target discount; NaN if there are none
    pub fn avg_price(&self) -> f64 {
        self.avg_price[0]
    }
}

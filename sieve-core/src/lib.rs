//! Sieve Core - Vectorized Filter and Aggregate Kernel
//!
//! This crate evaluates one fixed analytical query over a columnar batch of
//! the `item` table:
//! - Byte-level predicates over offset/length encoded string columns
//! - Selection vectors for AND refinement and OR merging
//! - Gather of primitive and string columns into a compacted batch
//! - Single-pass aggregation of the compacted batch
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              InputBatch                      │
//! │  (quantity, price, discount, status, comment)│
//! └──────────────┬──────────────────────────────┘
//!                │
//! ┌──────────────┴──────────────────────────────┐
//! │          Predicate Operators                 │
//! │   (between, less-than, equal-char, LIKE)    │
//! └──────────────┬──────────────────────────────┘
//!                │ SelectionVector (AND ∪ LIKE)
//! ┌──────────────┴──────────────────────────────┐
//! │               Gather                         │
//! │   (primitive copy, string re-layout)        │
//! └──────────────┬──────────────────────────────┘
//!                │ FilteredBatch
//! ┌──────────────┴──────────────────────────────┐
//! │             Aggregate                        │
//! │   (discount_ratio, avg_price)               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use sieve_core::{aggregate, filter, fixture};
//!
//! let input = fixture::reference_batch().unwrap();
//! let filtered = filter(&input).unwrap();
//! assert_eq!(filtered.num_rows(), 5);
//!
//! let result = aggregate(&filtered);
//! assert!((result.avg_price() - fixture::EXPECTED_AVG_PRICE).abs() < fixture::RESULT_TOLERANCE);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod execution;
pub mod fixture;

pub use error::{Error, Result};
pub use execution::{
    AggregatedBatch, FilteredBatch, InputBatch, ItemColumns, ItemQuery, LikePattern, QueryParams,
    SelectionVector, StringColumn, aggregate, filter,
};

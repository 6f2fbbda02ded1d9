//! Vectorized Query Execution
//!
//! Column-at-a-time evaluation of the `item` query: predicate operators
//! produce selection vectors, gather compacts the batch to the selected
//! rows, and the aggregator reduces it to one result row.

pub mod batch;
pub mod columnar;
pub mod gather;
pub mod operators;
pub mod predicates;
pub mod query;
pub mod selection;

// Re-export main types
pub use batch::{AggregatedBatch, FilteredBatch, InputBatch, ItemColumns};
pub use columnar::{StringColumn, decode_dictionary};
pub use gather::{gather_batch, gather_primitive, gather_string_column};
pub use operators::VectorizedOperators;
pub use predicates::{LikePattern, is_equal_to_single_char, is_like_pattern};
pub use query::{ItemQuery, QueryParams, aggregate, filter};
pub use selection::SelectionVector;

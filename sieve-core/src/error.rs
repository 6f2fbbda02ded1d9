//! Error types for Sieve Core

use thiserror::Error;

/// Result type alias using Sieve Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the Sieve kernel
///
/// Predicate evaluation never produces one of these: a malformed column is a
/// "no match" there. Errors come from constructors and from gather.
#[derive(Error, Debug)]
pub enum Error {
    /// JSON (de)serialization errors for batches
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// String column layout errors (mismatched arrays, byte range outside buffer)
    #[error("String column error: {0}")]
    StringColumn(String),

    /// Batch shape errors (column row counts disagree)
    #[error("Batch error: {0}")]
    Batch(String),

    /// Selection vector errors (unsorted or duplicated indices)
    #[error("Selection error: {0}")]
    Selection(String),

    /// LIKE pattern errors
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Query parameter errors
    #[error("Config error: {0}")]
    Config(String),

    /// Row index outside the addressed column or dictionary
    #[error("Row index {index} out of bounds for {row_count} rows")]
    RowOutOfBounds {
        /// Offending index
        index: usize,
        /// Number of addressable rows
        row_count: usize,
    },
}

impl Error {
    /// Create a string column error
    pub fn string_column(msg: impl Into<String>) -> Self {
        Self::StringColumn(msg.into())
    }

    /// Create a batch error
    pub fn batch(msg: impl Into<String>) -> Self {
        Self::Batch(msg.into())
    }

    /// Create a selection error
    pub fn selection(msg: impl Into<String>) -> Self {
        Self::Selection(msg.into())
    }

    /// Create a pattern error
    pub fn pattern(msg: impl Into<String>) -> Self {
        Self::Pattern(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a row out of bounds error
    pub fn row_out_of_bounds(index: usize, row_count: usize) -> Self {
        Self::RowOutOfBounds { index, row_count }
    }
}

//! Columnar Gather
//!
//! Compacts columns to the rows named by a list of indices. Output row `i`
//! is source row `indices[i]`, so a selection vector keeps the original
//! relative row order.
//!
//! String columns are rebuilt in two passes: the first computes lengths,
//! contiguous offsets and the total byte size; the buffer is then allocated
//! once at that size and the second pass copies each row's bytes into place.

use crate::error::{Error, Result};
use crate::execution::batch::{FilteredBatch, InputBatch, ItemColumns};
use crate::execution::columnar::{StringColumn, to_u32};
use crate::execution::selection::SelectionVector;

/// Compact every column of `input` to the selected rows
pub fn gather_batch(input: &InputBatch, selection: &SelectionVector) -> Result<FilteredBatch> {
    let source = input.columns();
    let indices = selection.as_slice();

    let _span = tracing::debug_span!(
        "vectorized_batch",
        batch_size = input.num_rows() as u64,
        selectivity = selectivity(input.num_rows(), indices.len()),
        op = "gather",
    )
    .entered();

    let columns = ItemColumns {
        quantity: gather_primitive(&source.quantity, indices)?,
        price: gather_primitive(&source.price, indices)?,
        discount: gather_primitive(&source.discount, indices)?,
        status: gather_string_column(&source.status, indices)?,
        comment: gather_string_column(&source.comment, indices)?,
    };

    tracing::debug!(
        output_rows = indices.len(),
        status_bytes = columns.status.buffer().len(),
        comment_bytes = columns.comment.buffer().len(),
        "gather complete"
    );

    Ok(FilteredBatch::from_gathered(indices.len(), columns))
}

pub(crate) fn selectivity(input_rows: usize, output_rows: usize) -> f64 {
    if input_rows == 0 {
        0.0
    } else {
        output_rows as f64 / input_rows as f64
    }
}

/// `output[i] = values[indices[i]]`
pub fn gather_primitive<T: Copy>(values: &[T], indices: &[u32]) -> Result<Vec<T>> {
    indices
        .iter()
        .map(|&idx| {
            values
                .get(idx as usize)
                .copied()
                .ok_or_else(|| Error::row_out_of_bounds(idx as usize, values.len()))
        })
        .collect()
}

/// Rebuild `column` with only the rows in `indices`, laid out contiguously
pub fn gather_string_column(column: &StringColumn, indices: &[u32]) -> Result<StringColumn> {
    let row_count = column.len();
    let mut offset = Vec::with_capacity(indices.len());
    let mut length = Vec::with_capacity(indices.len());
    let mut ranges = Vec::with_capacity(indices.len());

    // Pass 1: sizes and offsets
    let mut total = 0usize;
    for &idx in indices {
        let row = idx as usize;
        if row >= row_count {
            return Err(Error::row_out_of_bounds(row, row_count));
        }
        let (start, end) = column.row_range(row).ok_or_else(|| {
            Error::string_column(format!(
                "row {} spans bytes outside the {}-byte buffer",
                row,
                column.buffer().len()
            ))
        })?;
        offset.push(to_u32(total)?);
        length.push(column.lengths()[row]);
        ranges.push((start, end));
        total += end - start;
    }
    to_u32(total)?;

    // Pass 2: one allocation, then copy
    let mut buffer = vec![0u8; total];
    let source = column.buffer();
    for (&(start, end), &off) in ranges.iter().zip(&offset) {
        let off = off as usize;
        buffer[off..off + (end - start)].copy_from_slice(&source[start..end]);
    }

    Ok(StringColumn::from_raw_parts(offset, length, buffer))
}

//! Vectorized Selection Operators
//!
//! Column-at-a-time predicate operators that produce [`SelectionVector`]s.
//! `select_*` scans every row of a column; `refine_*` only tests rows an
//! earlier stage already selected, which is how AND-chains are evaluated.
//!
//! Each operator emits a `vectorized_batch` tracing span carrying the input
//! size, the selectivity and the operator name.

use crate::error::Result;
use crate::execution::columnar::StringColumn;
use crate::execution::gather::selectivity;
use crate::execution::predicates::{LikePattern, is_equal_to_single_char, is_like_pattern};
use crate::execution::selection::{SelectionVector, check_row_count};
use tracing::span::EnteredSpan;

/// Rows per inner loop; sized for 256-bit lanes of 64-bit values
pub const SIMD_WIDTH: usize = 32 / 8;

/// Predicate operators over primitive and string columns
pub struct VectorizedOperators {
    vector_width: usize,
}

impl VectorizedOperators {
    /// Create new vectorized operators
    pub fn new() -> Self {
        Self {
            vector_width: SIMD_WIDTH,
        }
    }

    /// Rows where `min <= value <= max`
    pub fn select_between_f64(
        &self,
        values: &[f64],
        min: f64,
        max: f64,
    ) -> Result<SelectionVector> {
        let stage = enter_stage("between_f64", values.len());
        check_row_count(values.len())?;

        let mut indices = Vec::with_capacity(values.len());
        for (i, chunk) in values.chunks(self.vector_width).enumerate() {
            let start_idx = i * self.vector_width;
            for (j, &val) in chunk.iter().enumerate() {
                if val >= min && val <= max {
                    indices.push((start_idx + j) as u32);
                }
            }
        }

        let selection = SelectionVector::from_ascending(indices);
        finish_stage(&stage, values.len(), &selection);
        Ok(selection)
    }

    /// Rows where `value < bound`
    pub fn select_less_i32(&self, values: &[i32], bound: i32) -> Result<SelectionVector> {
        let stage = enter_stage("less_i32", values.len());
        let selection = SelectionVector::select(values.len(), |row| values[row] < bound)?;
        finish_stage(&stage, values.len(), &selection);
        Ok(selection)
    }

    /// Rows whose string is exactly the byte `ch`
    pub fn select_equal_char(
        &self,
        column: &StringColumn,
        row_count: usize,
        ch: u8,
    ) -> Result<SelectionVector> {
        let stage = enter_stage("equal_char", row_count);
        let selection =
            SelectionVector::select(row_count, |row| is_equal_to_single_char(row, column, ch))?;
        finish_stage(&stage, row_count, &selection);
        Ok(selection)
    }

    /// Rows whose string matches a single-wildcard LIKE pattern
    pub fn select_like(
        &self,
        column: &StringColumn,
        row_count: usize,
        pattern: &LikePattern,
    ) -> Result<SelectionVector> {
        let stage = enter_stage("like", row_count);
        let selection =
            SelectionVector::select(row_count, |row| is_like_pattern(row, column, pattern))?;
        finish_stage(&stage, row_count, &selection);
        Ok(selection)
    }

    /// Selected rows where `min <= value <= max`
    pub fn refine_between_f64(
        &self,
        selection: &SelectionVector,
        values: &[f64],
        min: f64,
        max: f64,
    ) -> SelectionVector {
        let stage = enter_stage("refine_between_f64", selection.len());
        let refined = selection.refine(|row| {
            values
                .get(row)
                .is_some_and(|&val| val >= min && val <= max)
        });
        finish_stage(&stage, selection.len(), &refined);
        refined
    }

    /// Selected rows where `value < bound`
    pub fn refine_less_i32(
        &self,
        selection: &SelectionVector,
        values: &[i32],
        bound: i32,
    ) -> SelectionVector {
        let stage = enter_stage("refine_less_i32", selection.len());
        let refined = selection.refine(|row| values.get(row).is_some_and(|&val| val < bound));
        finish_stage(&stage, selection.len(), &refined);
        refined
    }

    /// Selected rows whose string is exactly the byte `ch`
    pub fn refine_equal_char(
        &self,
        selection: &SelectionVector,
        column: &StringColumn,
        ch: u8,
    ) -> SelectionVector {
        let stage = enter_stage("refine_equal_char", selection.len());
        let refined = selection.refine(|row| is_equal_to_single_char(row, column, ch));
        finish_stage(&stage, selection.len(), &refined);
        refined
    }

    /// OR of two selections
    pub fn merge_or(&self, left: &SelectionVector, right: &SelectionVector) -> SelectionVector {
        let input_rows = left.len() + right.len();
        let stage = enter_stage("merge_or", input_rows);
        let merged = left.union(right);
        finish_stage(&stage, input_rows, &merged);
        merged
    }
}

impl Default for VectorizedOperators {
    fn default() -> Self {
        Self::new()
    }
}

// Selectivity is only known once the stage has run; it is recorded on exit.
fn enter_stage(op: &'static str, input_rows: usize) -> EnteredSpan {
    tracing::debug_span!(
        "vectorized_batch",
        batch_size = input_rows as u64,
        selectivity = tracing::field::Empty,
        op = op,
    )
    .entered()
}

fn finish_stage(stage: &EnteredSpan, input_rows: usize, output: &SelectionVector) {
    stage.record("selectivity", selectivity(input_rows, output.len()));
    tracing::debug!(output_rows = output.len(), "stage complete");
}

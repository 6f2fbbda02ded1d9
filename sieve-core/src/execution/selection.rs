//! Selection Vectors
//!
//! A selection vector names the rows of a batch that passed a filter, as
//! strictly increasing `u32` row indices. Every constructor here keeps that
//! invariant, so consumers (gather, further refinement, OR merge) can rely on
//! it without re-checking.

use crate::error::{Error, Result};
use std::cmp::Ordering;

/// Ascending, duplicate-free row indices
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionVector {
    indices: Vec<u32>,
}

impl SelectionVector {
    /// Selection with no rows
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every row of a batch with `row_count` rows
    pub fn identity(row_count: usize) -> Result<Self> {
        check_row_count(row_count)?;
        Ok(Self {
            indices: (0..row_count).map(|row| row as u32).collect(),
        })
    }

    /// Wrap indices after checking they are strictly increasing
    pub fn from_indices(indices: Vec<u32>) -> Result<Self> {
        if let Some(pos) = indices.windows(2).position(|w| w[0] >= w[1]) {
            return Err(Error::selection(format!(
                "indices must be strictly increasing: {} at position {} is followed by {}",
                indices[pos],
                pos,
                indices[pos + 1]
            )));
        }
        Ok(Self { indices })
    }

    /// Wrap indices a scan produced in row order
    pub(crate) fn from_ascending(indices: Vec<u32>) -> Self {
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        Self { indices }
    }

    /// Scan rows `0..row_count` in order and keep those matching `predicate`
    pub fn select<F>(row_count: usize, mut predicate: F) -> Result<Self>
    where
        F: FnMut(usize) -> bool,
    {
        check_row_count(row_count)?;
        let mut indices = Vec::with_capacity(row_count);
        for row in 0..row_count {
            if predicate(row) {
                indices.push(row as u32);
            }
        }
        Ok(Self { indices })
    }

    /// Keep the already selected rows that also match `predicate`
    pub fn refine<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(usize) -> bool,
    {
        let mut indices = Vec::with_capacity(self.indices.len());
        for &row in &self.indices {
            if predicate(row as usize) {
                indices.push(row);
            }
        }
        Self { indices }
    }

    /// OR of two selections: ascending, each row once
    ///
    /// Two-pointer merge. On equal heads both sides advance and the row is
    /// emitted once; once either side runs out, the other's tail is copied.
    pub fn union(&self, other: &SelectionVector) -> Self {
        let (a, b) = (&self.indices, &other.indices);
        let mut merged = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);

        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                Ordering::Less => {
                    merged.push(a[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    merged.push(b[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    merged.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&a[i..]);
        merged.extend_from_slice(&b[j..]);

        Self { indices: merged }
    }

    /// Selected row indices
    pub fn as_slice(&self) -> &[u32] {
        &self.indices
    }

    /// Number of selected rows
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True when no row is selected
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Selected rows as `usize`
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().map(|&row| row as usize)
    }
}

impl AsRef<[u32]> for SelectionVector {
    fn as_ref(&self) -> &[u32] {
        &self.indices
    }
}

pub(crate) fn check_row_count(row_count: usize) -> Result<()> {
    if row_count as u64 > u32::MAX as u64 + 1 {
        return Err(Error::selection(format!(
            "{} rows cannot be addressed with u32 row indices",
            row_count
        )));
    }
    Ok(())
}

//! Columnar Data Structures for the Filter Kernel
//!
//! Variable-length strings are stored as three parallel pieces: a start
//! offset and a byte length per row, plus one shared byte buffer holding the
//! bytes of every row with no separators.
//!
//! ```text
//! "Hi", "there"
//!
//! offset  |  0  2
//! length  |  2  5
//! buffer  |  H  i  t  h  e  r  e
//! ```
//!
//! Rows do not have to be laid out contiguously or in row order. Several rows
//! may share bytes, which is how dictionary-like producers avoid copying.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Variable-length byte string column
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StringColumnParts", into = "StringColumnParts")]
pub struct StringColumn {
    offset: Vec<u32>,
    length: Vec<u32>,
    buffer: Vec<u8>,
}

impl StringColumn {
    /// Create a checked column from its three arrays
    ///
    /// Fails if the offset and length arrays disagree on the row count or if
    /// any row's byte range reaches past the end of `buffer`.
    pub fn new(offset: Vec<u32>, length: Vec<u32>, buffer: Vec<u8>) -> Result<Self> {
        if offset.len() != length.len() {
            return Err(Error::string_column(format!(
                "offset array has {} rows but length array has {}",
                offset.len(),
                length.len()
            )));
        }

        for (row, (&off, &len)) in offset.iter().zip(&length).enumerate() {
            let end = off as usize + len as usize;
            if end > buffer.len() {
                return Err(Error::string_column(format!(
                    "row {} spans bytes {}..{} but buffer holds {}",
                    row,
                    off,
                    end,
                    buffer.len()
                )));
            }
        }

        Ok(Self {
            offset,
            length,
            buffer,
        })
    }

    /// Wrap arrays without checking them
    ///
    /// Predicates stay total over such a column: a mismatched or out-of-range
    /// row is reported as "no match". Gather refuses rows whose byte range
    /// falls outside the buffer.
    pub fn from_raw_parts(offset: Vec<u32>, length: Vec<u32>, buffer: Vec<u8>) -> Self {
        Self {
            offset,
            length,
            buffer,
        }
    }

    /// Build a column with rows laid out contiguously in row order
    pub fn from_values<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut offset = Vec::new();
        let mut length = Vec::new();
        let mut buffer = Vec::new();

        for value in values {
            let bytes = value.as_ref();
            let start = to_u32(buffer.len())?;
            offset.push(start);
            length.push(to_u32(bytes.len())?);
            buffer.extend_from_slice(bytes);
        }
        // The end of the last row must stay addressable as u32 as well.
        to_u32(buffer.len())?;

        Ok(Self {
            offset,
            length,
            buffer,
        })
    }

    /// Offset and length arrays agree on the row count
    pub fn is_valid(&self) -> bool {
        self.offset.len() == self.length.len()
    }

    /// Number of rows addressable through both the offset and length arrays
    pub fn len(&self) -> usize {
        self.offset.len().min(self.length.len())
    }

    /// True when the column has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-row start offsets
    pub fn offsets(&self) -> &[u32] {
        &self.offset
    }

    /// Per-row byte lengths
    pub fn lengths(&self) -> &[u32] {
        &self.length
    }

    /// Shared byte buffer
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Sum of all row lengths
    pub fn total_len(&self) -> usize {
        self.length.iter().map(|&l| l as usize).sum()
    }

    /// Byte range of `row` within the buffer, if the row exists and fits
    #[inline]
    pub(crate) fn row_range(&self, row: usize) -> Option<(usize, usize)> {
        let start = *self.offset.get(row)? as usize;
        let len = *self.length.get(row)? as usize;
        let end = start.checked_add(len)?;
        (end <= self.buffer.len()).then_some((start, end))
    }

    /// Bytes of `row`, or `None` if the row is missing or malformed
    pub fn value(&self, row: usize) -> Option<&[u8]> {
        self.row_range(row).map(|(start, end)| &self.buffer[start..end])
    }

    /// Row values in order; malformed rows yield an empty slice
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.len()).map(move |row| self.value(row).unwrap_or(&[]))
    }
}

/// Materialize a dictionary-encoded column
///
/// `ids[i]` indexes into `dictionary`. An id past the end of the dictionary
/// is an error rather than a panic.
pub fn decode_dictionary<T: Copy>(dictionary: &[T], ids: &[u32]) -> Result<Vec<T>> {
    ids.iter()
        .map(|&id| {
            dictionary
                .get(id as usize)
                .copied()
                .ok_or_else(|| Error::row_out_of_bounds(id as usize, dictionary.len()))
        })
        .collect()
}

pub(crate) fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        Error::string_column(format!("{} exceeds the u32 offset range", value))
    })
}

/// Serialized form: the buffer is written as text when it is valid UTF-8
#[derive(Serialize, Deserialize)]
struct StringColumnParts {
    offset: Vec<u32>,
    length: Vec<u32>,
    buffer: BufferRepr,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum BufferRepr {
    Text(String),
    Bytes(Vec<u8>),
}

impl TryFrom<StringColumnParts> for StringColumn {
    type Error = Error;

    fn try_from(parts: StringColumnParts) -> Result<Self> {
        let buffer = match parts.buffer {
            BufferRepr::Text(text) => text.into_bytes(),
            BufferRepr::Bytes(bytes) => bytes,
        };
        StringColumn::new(parts.offset, parts.length, buffer)
    }
}

impl From<StringColumn> for StringColumnParts {
    fn from(column: StringColumn) -> Self {
        let buffer = match String::from_utf8(column.buffer) {
            Ok(text) => BufferRepr::Text(text),
            Err(e) => BufferRepr::Bytes(e.into_bytes()),
        };
        Self {
            offset: column.offset,
            length: column.length,
            buffer,
        }
    }
}

//! Byte-level string predicates over [`StringColumn`]
//!
//! Both predicates are total: an invalid column, a row id outside the column
//! or a byte range outside the buffer all evaluate to `false`. This lets a
//! malformed column take part in a scan without aborting the batch.
//!
//! The row id is bounded by the column's *byte buffer* length, not by its row
//! count. Rows past the end of the offset/length arrays are still rejected.

use crate::error::{Error, Result};
use crate::execution::columnar::StringColumn;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Wildcard byte of a LIKE pattern, matching any (possibly empty) byte run
pub const WILDCARD: u8 = b'%';

#[inline]
fn row_in_range(row_id: usize, column: &StringColumn) -> bool {
    column.is_valid() && row_id < column.buffer().len()
}

/// `column[row_id] = 'ch'` for a one-byte literal
#[inline]
pub fn is_equal_to_single_char(row_id: usize, column: &StringColumn, ch: u8) -> bool {
    if !row_in_range(row_id, column) {
        return false;
    }
    match (column.lengths().get(row_id), column.offsets().get(row_id)) {
        (Some(&1), Some(&off)) => column.buffer().get(off as usize) == Some(&ch),
        _ => false,
    }
}

/// `column[row_id] LIKE pattern` for a single-wildcard pattern
#[inline]
pub fn is_like_pattern(row_id: usize, column: &StringColumn, pattern: &LikePattern) -> bool {
    if !row_in_range(row_id, column) {
        return false;
    }
    let Some(&len) = column.lengths().get(row_id) else {
        return false;
    };
    if (len as usize) < pattern.literal_len() {
        return false;
    }
    match column.row_range(row_id) {
        Some((start, end)) => pattern.matches_anchors(&column.buffer()[start..end]),
        None => false,
    }
}

/// LIKE pattern with exactly one `%`, split into a literal prefix and suffix
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LikePattern {
    pattern: Cow<'static, [u8]>,
    wildcard: usize,
}

/// `PROMO%SUMMER`, the reference `comment` pattern
pub(crate) const PROMO_SUMMER: LikePattern = LikePattern::from_static(b"PROMO%SUMMER", 5);

impl LikePattern {
    /// Pattern whose wildcard position is known at compile time
    ///
    /// Evaluated in a const item, a wrong `wildcard` fails the build.
    pub(crate) const fn from_static(pattern: &'static [u8], wildcard: usize) -> Self {
        assert!(wildcard < pattern.len() && pattern[wildcard] == WILDCARD);
        Self {
            pattern: Cow::Borrowed(pattern),
            wildcard,
        }
    }

    /// Parse a pattern; zero or several wildcards are rejected
    pub fn new(pattern: impl Into<Vec<u8>>) -> Result<Self> {
        let pattern: Vec<u8> = pattern.into();
        let mut wildcards = pattern
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b == WILDCARD)
            .map(|(i, _)| i);

        match (wildcards.next(), wildcards.next()) {
            (Some(wildcard), None) => Ok(Self {
                pattern: Cow::Owned(pattern),
                wildcard,
            }),
            (None, _) => Err(Error::pattern(format!(
                "pattern {:?} has no '%' wildcard",
                String::from_utf8_lossy(&pattern)
            ))),
            (Some(_), Some(_)) => Err(Error::pattern(format!(
                "pattern {:?} has more than one '%' wildcard",
                String::from_utf8_lossy(&pattern)
            ))),
        }
    }

    /// Literal bytes before the wildcard
    pub fn prefix(&self) -> &[u8] {
        &self.pattern[..self.wildcard]
    }

    /// Literal bytes after the wildcard
    pub fn suffix(&self) -> &[u8] {
        &self.pattern[self.wildcard + 1..]
    }

    /// Minimum length of a matching value: the pattern minus its wildcard
    pub fn literal_len(&self) -> usize {
        self.pattern.len() - 1
    }

    /// Raw pattern bytes, wildcard included
    pub fn as_bytes(&self) -> &[u8] {
        &self.pattern
    }

    /// Match a standalone value
    pub fn matches(&self, value: &[u8]) -> bool {
        value.len() >= self.literal_len() && self.matches_anchors(value)
    }

    // Caller guarantees value.len() >= literal_len(), so the anchors never overlap.
    #[inline]
    fn matches_anchors(&self, value: &[u8]) -> bool {
        value.starts_with(self.prefix()) && value.ends_with(self.suffix())
    }
}

impl FromStr for LikePattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.as_bytes())
    }
}

impl TryFrom<String> for LikePattern {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s.into_bytes())
    }
}

impl From<LikePattern> for String {
    fn from(pattern: LikePattern) -> Self {
        String::from_utf8_lossy(&pattern.pattern).into_owned()
    }
}

impl fmt::Display for LikePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promo_summer() -> LikePattern {
        "PROMO%SUMMER".parse().unwrap()
    }

    #[test]
    fn test_is_equal_to_single_char() {
        let column = StringColumn::from_values(["A", "AR", "N", "", "A"]).unwrap();

        let matches: Vec<bool> = (0..5)
            .map(|row| is_equal_to_single_char(row, &column, b'A'))
            .collect();
        assert_eq!(matches, vec![true, false, false, false, true]);
    }

    #[test]
    fn test_is_equal_to_single_char_out_of_range() {
        let column = StringColumn::from_values(["A", "A"]).unwrap();

        assert!(!is_equal_to_single_char(2, &column, b'A'));
        assert!(!is_equal_to_single_char(usize::MAX, &column, b'A'));
        assert!(!is_equal_to_single_char(0, &StringColumn::default(), b'A'));
    }

    #[test]
    fn test_is_equal_to_single_char_wrong_length_arrays() {
        let column = StringColumn::from_raw_parts(vec![0, 1, 2], vec![1, 1], b"AAA".to_vec());

        for row in 0..3 {
            assert!(!is_equal_to_single_char(row, &column, b'A'));
        }
    }

    #[test]
    fn test_row_bound_follows_buffer_length() {
        // Three rows but a one-byte buffer: only row 0 can be addressed.
        let column = StringColumn::from_values(["", "", "A"]).unwrap();

        assert_eq!(column.value(2), Some(&b"A"[..]));
        assert!(!is_equal_to_single_char(2, &column, b'A'));
    }

    #[test]
    fn test_row_past_arrays_within_buffer() {
        // Buffer is longer than the row count; row 3 is inside the buffer bound
        // but has no offset/length entry.
        let column = StringColumn::from_values(["AAA", "A"]).unwrap();

        assert!(is_equal_to_single_char(1, &column, b'A'));
        assert!(!is_equal_to_single_char(3, &column, b'A'));
        assert!(!is_like_pattern(3, &column, &"A%".parse().unwrap()));
    }

    #[test]
    fn test_like_promo_summer_table() {
        let cases: [(&str, bool); 6] = [
            ("", false),
            ("a", false),
            ("PROM0SUMMER", false),
            ("PROMOSUMMER", true),
            ("PROMO SUMMER", true),
            ("PROMO123SUMMER", true),
        ];
        let column = StringColumn::from_values(cases.iter().map(|(s, _)| s)).unwrap();
        let pattern = promo_summer();

        for (row, (value, expected)) in cases.iter().enumerate() {
            assert_eq!(
                is_like_pattern(row, &column, &pattern),
                *expected,
                "row {row} {value:?}"
            );
            assert_eq!(pattern.matches(value.as_bytes()), *expected);
        }
    }

    #[test]
    fn test_like_rejects_overlapping_anchors() {
        // "PROMOSUMMER" contains both anchors only if they overlap
        let pattern: LikePattern = "PROMO%MOSUMMER".parse().unwrap();
        assert!(!pattern.matches(b"PROMOSUMMER"));
        assert!(pattern.matches(b"PROMOMOSUMMER"));
    }

    #[test]
    fn test_like_shared_offsets() {
        let buffer = b"PROMOPROMO IN SUMMERPROMO WINTER".to_vec();
        let column =
            StringColumn::new(vec![0, 5, 20, 0], vec![5, 15, 12, 5], buffer).unwrap();
        let pattern = promo_summer();

        let matches: Vec<bool> = (0..4)
            .map(|row| is_like_pattern(row, &column, &pattern))
            .collect();
        assert_eq!(matches, vec![false, true, false, false]);
    }

    #[test]
    fn test_like_invalid_column() {
        let column = StringColumn::from_raw_parts(vec![0], vec![], b"PROMOSUMMER".to_vec());
        assert!(!is_like_pattern(0, &column, &promo_summer()));
    }

    #[test]
    fn test_like_range_outside_buffer() {
        let column = StringColumn::from_raw_parts(vec![4], vec![11], b"PROMOSUMMER".to_vec());
        assert!(!is_like_pattern(0, &column, &promo_summer()));
    }

    #[test]
    fn test_like_edge_wildcards() {
        let column = StringColumn::from_values(["", "abc"]).unwrap();
        let any: LikePattern = "%".parse().unwrap();
        let starts: LikePattern = "ab%".parse().unwrap();
        let ends: LikePattern = "%bc".parse().unwrap();

        assert_eq!(any.literal_len(), 0);
        assert!(is_like_pattern(1, &column, &any));
        assert!(is_like_pattern(1, &column, &starts));
        assert!(is_like_pattern(1, &column, &ends));
        assert!(any.matches(b""));
    }

    #[test]
    fn test_empty_buffer_matches_nothing() {
        // Every row is empty, so the buffer bound excludes every row id.
        let column = StringColumn::from_values(["", ""]).unwrap();
        let any: LikePattern = "%".parse().unwrap();

        assert!(!is_like_pattern(0, &column, &any));
    }

    #[test]
    fn test_pattern_parsing() {
        let pattern = promo_summer();
        assert_eq!(pattern.prefix(), b"PROMO");
        assert_eq!(pattern.suffix(), b"SUMMER");
        assert_eq!(pattern.literal_len(), 11);
        assert_eq!(pattern.to_string(), "PROMO%SUMMER");

        assert!(matches!(
            "PROMO".parse::<LikePattern>(),
            Err(Error::Pattern(_))
        ));
        assert!(matches!(
            "%PROMO%".parse::<LikePattern>(),
            Err(Error::Pattern(_))
        ));
    }

    #[test]
    fn test_pattern_serde() {
        let json = serde_json::to_string(&promo_summer()).unwrap();
        assert_eq!(json, "\"PROMO%SUMMER\"");

        let back: LikePattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, promo_summer());
        assert!(serde_json::from_str::<LikePattern>("\"PROMO\"").is_err());
    }

    #[test]
    fn test_static_pattern_matches_parsed() {
        let parsed: LikePattern = "PROMO%SUMMER".parse().unwrap();

        assert_eq!(PROMO_SUMMER, parsed);
        assert_eq!(PROMO_SUMMER.prefix(), b"PROMO");
        assert_eq!(PROMO_SUMMER.suffix(), b"SUMMER");
        assert_eq!(PROMO_SUMMER.to_string(), "PROMO%SUMMER");
    }
}

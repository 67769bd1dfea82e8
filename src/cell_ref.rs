//! Utilities for parsing Excel-style cell references and ranges.
//!
//! All positions are 0-indexed: "A1" is `(col 0, row 0)`.

use crate::error::{Result, XlhtmlError};

/// Columns in a sheet (A..XFD).
pub const MAX_COLS: u32 = 16_384;

/// Rows in a sheet.
pub const MAX_ROWS: u32 = 1_048_576;

/// True when `(col, row)` lies inside the sheet limits.
pub const fn in_sheet(col: u32, row: u32) -> bool {
    col < MAX_COLS && row < MAX_ROWS
}

/// An inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start_col: u32,
    pub start_row: u32,
    pub end_col: u32,
    pub end_row: u32,
}

impl CellRange {
    /// Build a range from two corners given in any order.
    pub fn new(col_a: u32, row_a: u32, col_b: u32, row_b: u32) -> Self {
        Self {
            start_col: col_a.min(col_b),
            start_row: row_a.min(row_b),
            end_col: col_a.max(col_b),
            end_row: row_a.max(row_b),
        }
    }

    pub const fn single(col: u32, row: u32) -> Self {
        Self {
            start_col: col,
            start_row: row,
            end_col: col,
            end_row: row,
        }
    }

    pub const fn contains(&self, col: u32, row: u32) -> bool {
        col >= self.start_col && col <= self.end_col && row >= self.start_row && row <= self.end_row
    }

    /// Number of columns covered.
    pub const fn width(&self) -> u32 {
        self.end_col - self.start_col + 1
    }

    /// Number of rows covered.
    pub const fn height(&self) -> u32 {
        self.end_row - self.start_row + 1
    }
}

/// Parse a cell reference like "A1" or "$B$7" into `(col, row)`.
pub fn parse_cell_ref(cell_ref: &str) -> Result<(u32, u32)> {
    let invalid = || XlhtmlError::CellRef(cell_ref.to_string());
    let text = cell_ref.trim();

    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for ch in text.chars() {
        match ch {
            '$' => {}
            'A'..='Z' | 'a'..='z' if !saw_row => {
                let digit = u32::from(ch.to_ascii_uppercase()) - u32::from('A') + 1;
                col = col
                    .checked_mul(26)
                    .and_then(|c| c.checked_add(digit))
                    .ok_or_else(invalid)?;
                saw_col = true;
            }
            '0'..='9' if saw_col => {
                let digit = u32::from(ch) - u32::from('0');
                row = row
                    .checked_mul(10)
                    .and_then(|r| r.checked_add(digit))
                    .ok_or_else(invalid)?;
                saw_row = true;
            }
            _ => return Err(invalid()),
        }
    }

    if !saw_col || !saw_row || row == 0 || !in_sheet(col - 1, row - 1) {
        return Err(invalid());
    }

    Ok((col - 1, row - 1))
}

/// Parse a range like "A1:B10" (or a single cell "A1").
pub fn parse_cell_range(range: &str) -> Result<CellRange> {
    if let Some((start, end)) = range.split_once(':') {
        let (start_col, start_row) = parse_cell_ref(start)?;
        let (end_col, end_row) = parse_cell_ref(end)?;
        Ok(CellRange::new(start_col, start_row, end_col, end_row))
    } else {
        let (col, row) = parse_cell_ref(range)?;
        Ok(CellRange::single(col, row))
    }
}

/// Parse a space separated sqref like "A1:A10 C1:C10".
///
/// Malformed parts are dropped.
pub fn parse_sqref(sqref: &str) -> Vec<CellRange> {
    sqref
        .split_whitespace()
        .filter_map(|part| match parse_cell_range(part) {
            Ok(range) => Some(range),
            Err(err) => {
                log::debug!("dropping sqref part: {err}");
                None
            }
        })
        .collect()
}

/// Column letters for a 0-indexed column ("A" for 0, "AA" for 26).
pub fn col_to_letters(col: u32) -> String {
    let mut n = u64::from(col) + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = u8::try_from((n - 1) % 26).unwrap_or(0);
        letters.push(char::from(b'A' + rem));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1").unwrap(), (0, 0));
        assert_eq!(parse_cell_ref("$C$5").unwrap(), (2, 4));
        assert_eq!(parse_cell_ref("aa10").unwrap(), (26, 9));
        assert!(parse_cell_ref("A0").is_err());
        assert!(parse_cell_ref("12").is_err());
        assert!(parse_cell_ref("1A").is_err());
        assert!(parse_cell_ref("").is_err());
    }

    #[test]
    fn test_refs_past_sheet_limits_rejected() {
        assert_eq!(parse_cell_ref("XFD1048576").unwrap(), (16_383, 1_048_575));
        assert!(parse_cell_ref("XFE1").is_err());
        assert!(parse_cell_ref("A1048577").is_err());
        assert!(parse_cell_range("A1:FXSHRXW1").is_err());
        assert!(!in_sheet(MAX_COLS, 0));
        assert!(in_sheet(0, MAX_ROWS - 1));
    }

    #[test]
    fn test_parse_cell_range_normalizes_corners() {
        let range = parse_cell_range("C3:B2").unwrap();
        assert_eq!(range, CellRange::new(1, 1, 2, 2));
        assert_eq!(range.width(), 2);
        assert_eq!(range.height(), 2);
        assert!(range.contains(2, 1));
        assert!(!range.contains(3, 1));
    }

    #[test]
    fn test_parse_sqref_skips_garbage() {
        let ranges = parse_sqref("A1:A3 ?? D4");
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1], CellRange::single(3, 3));
    }

    #[test]
    fn test_col_to_letters() {
        assert_eq!(col_to_letters(0), "A");
        assert_eq!(col_to_letters(25), "Z");
        assert_eq!(col_to_letters(26), "AA");
        assert_eq!(col_to_letters(701), "ZZ");
        assert_eq!(col_to_letters(702), "AAA");
    }
}

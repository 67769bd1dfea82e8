//! Column and row sizing.
//!
//! Widths are kept in characters and heights in pixels, each with a prefix
//! sum so the offset of any column or row is a single lookup. Positions past
//! the computed extent are extrapolated with the sheet defaults.

use std::collections::HashMap;

use super::Length;
use crate::cell_ref::{in_sheet, parse_cell_range};
use crate::options::RenderOptions;
use crate::types::{ColumnDef, RowDef, Sheet};

/// Computed geometry of one sheet.
#[derive(Debug, Clone)]
pub struct SheetGrid {
    /// Column widths in characters (0 for hidden columns).
    col_chars: Vec<f64>,
    /// `col_offsets[i]` = characters left of column i; one extra trailing entry.
    col_offsets: Vec<f64>,
    /// Row heights in px (0 for hidden rows).
    row_heights: Vec<f64>,
    /// `row_offsets[i]` = px above row i; one extra trailing entry.
    row_offsets: Vec<f64>,
    default_col_chars: f64,
    default_row_px: f64,
    px_per_char: f64,
    /// Columns render as percentages of `total_chars`.
    percent: bool,
    total_chars: f64,
}

impl SheetGrid {
    /// Compute the grid for a sheet.
    pub fn compute(sheet: &Sheet, options: &RenderOptions) -> Self {
        let (col_count, row_count) = sheet_extent(sheet);

        let default_col_chars = sheet
            .default_col_width
            .unwrap_or(options.default_col_width);
        let default_row_px = sheet
            .default_row_height
            .unwrap_or(options.default_row_height)
            * options.px_per_point;

        let col_chars: Vec<f64> = (0..col_count)
            .map(|col| column_chars(&sheet.columns, col, default_col_chars))
            .collect();
        let col_offsets = prefix_sums(&col_chars);
        let total_chars = col_offsets.last().copied().unwrap_or(0.0);

        let rows: HashMap<u32, &RowDef> = sheet.rows.iter().map(|r| (r.row, r)).collect();
        let row_heights: Vec<f64> = (0..row_count)
            .map(|row| match rows.get(&row) {
                Some(def) if def.hidden => 0.0,
                Some(RowDef {
                    height: Some(height),
                    custom_height: true,
                    ..
                }) => height * options.px_per_point,
                _ => default_row_px,
            })
            .collect();
        let row_offsets = prefix_sums(&row_heights);

        let percent = options.percent_columns && total_chars.is_finite() && total_chars > 0.0;

        Self {
            col_chars,
            col_offsets,
            row_heights,
            row_offsets,
            default_col_chars,
            default_row_px,
            px_per_char: options.px_per_char,
            percent,
            total_chars,
        }
    }

    pub fn col_count(&self) -> usize {
        self.col_chars.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_heights.len()
    }

    /// True when columns are sized as percentages.
    pub const fn is_percent(&self) -> bool {
        self.percent
    }

    /// Width of a column as a CSS length.
    pub fn column_width(&self, col: u32) -> Length {
        let chars = at(&self.col_chars, col).unwrap_or(self.default_col_chars);
        self.chars_to_length(chars)
    }

    /// Width of `span` columns starting at `col`.
    pub fn columns_width(&self, col: u32, span: u32) -> Length {
        let end = col.saturating_add(span);
        self.chars_to_length(self.chars_before(end) - self.chars_before(col))
    }

    /// Height of a row in px.
    pub fn row_height(&self, row: u32) -> f64 {
        at(&self.row_heights, row).unwrap_or(self.default_row_px)
    }

    /// Height of `span` rows starting at `row`, in px.
    pub fn rows_height(&self, row: u32, span: u32) -> f64 {
        self.row_offset(row.saturating_add(span)) - self.row_offset(row)
    }

    /// Top edge of a row in px.
    pub fn row_offset(&self, row: u32) -> f64 {
        extrapolate(&self.row_offsets, row, self.default_row_px)
    }

    /// Left edge of a column in px.
    pub fn col_offset_px(&self, col: u32) -> f64 {
        self.chars_before(col) * self.px_per_char
    }

    /// Left edge of a column plus a px offset inside it.
    pub fn col_position(&self, col: u32, offset_px: f64) -> Length {
        self.chars_to_length(self.chars_before(col)).add_px(offset_px)
    }

    /// Horizontal distance between two column positions.
    ///
    /// On percentage columns this is always a `calc()` so the px part of the
    /// offsets stays visible.
    pub fn col_distance(&self, from: (u32, f64), to: (u32, f64)) -> Length {
        let chars = self.chars_before(to.0) - self.chars_before(from.0);
        let px = to.1 - from.1;
        if self.percent {
            Length::Calc {
                percent: chars / self.total_chars * 100.0,
                px,
            }
        } else {
            Length::Px(chars * self.px_per_char + px)
        }
    }

    /// Total width in px.
    pub fn total_width_px(&self) -> f64 {
        self.total_chars * self.px_per_char
    }

    /// Total height in px.
    pub fn total_height_px(&self) -> f64 {
        self.row_offsets.last().copied().unwrap_or(0.0)
    }

    fn chars_before(&self, col: u32) -> f64 {
        extrapolate(&self.col_offsets, col, self.default_col_chars)
    }

    fn chars_to_length(&self, chars: f64) -> Length {
        if self.percent {
            Length::Percent(chars / self.total_chars * 100.0)
        } else {
            Length::Px(chars * self.px_per_char)
        }
    }
}

/// Width in characters of one column. The last matching definition wins.
fn column_chars(columns: &[ColumnDef], col: u32, default: f64) -> f64 {
    let def = columns
        .iter()
        .rev()
        .find(|c| c.first <= col && col <= c.last);
    match def {
        Some(def) if def.hidden || def.collapsed => 0.0,
        Some(ColumnDef {
            width: Some(width),
            custom_width: true,
            ..
        }) if width.is_finite() && *width >= 0.0 => *width,
        _ => default,
    }
}

/// Number of columns and rows the sheet uses, within the sheet limits.
fn sheet_extent(sheet: &Sheet) -> (u32, u32) {
    let mut cols = 0u32;
    let mut rows = 0u32;
    let mut grow = |col: u32, row: u32| {
        cols = cols.max(col.saturating_add(1));
        rows = rows.max(row.saturating_add(1));
    };

    if let Some(dimension) = sheet.dimension.as_deref() {
        match parse_cell_range(dimension) {
            Ok(range) => grow(range.end_col, range.end_row),
            Err(err) => log::debug!("ignoring sheet dimension: {err}"),
        }
    }
    for cell in &sheet.cells {
        if in_sheet(cell.col, cell.row) {
            grow(cell.col, cell.row);
        } else {
            log::debug!("cell ({}, {}) is outside the sheet", cell.col, cell.row);
        }
    }
    for merge in &sheet.merges {
        if let Ok(range) = parse_cell_range(merge) {
            grow(range.end_col, range.end_row);
        }
    }
    (cols, rows)
}

fn prefix_sums(values: &[f64]) -> Vec<f64> {
    let mut sums = Vec::with_capacity(values.len() + 1);
    let mut acc = 0.0;
    sums.push(acc);
    for v in values {
        acc += v;
        sums.push(acc);
    }
    sums
}

fn at(values: &[f64], idx: u32) -> Option<f64> {
    usize::try_from(idx).ok().and_then(|i| values.get(i)).copied()
}

/// Prefix sum at `idx`, extended past the end with `step` per entry.
fn extrapolate(offsets: &[f64], idx: u32, step: f64) -> f64 {
    if let Some(v) = at(offsets, idx) {
        return v;
    }
    let last = offsets.last().copied().unwrap_or(0.0);
    let known = offsets.len().saturating_sub(1);
    #[allow(clippy::cast_precision_loss)]
    let missing = usize::try_from(idx)
        .unwrap_or(usize::MAX)
        .saturating_sub(known) as f64;
    last + missing * step
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::{Cell, CellType};

    fn blank(col: u32, row: u32) -> Cell {
        Cell {
            col,
            row,
            value: None,
            cell_type: CellType::default(),
            style: 0,
        }
    }

    fn sheet(dimension: &str) -> Sheet {
        Sheet {
            name: "S".to_string(),
            dimension: Some(dimension.to_string()),
            ..Sheet::default()
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_uniform_percent_columns() {
        let grid = SheetGrid::compute(&sheet("A1:D3"), &RenderOptions::default());
        assert_eq!(grid.col_count(), 4);
        assert_eq!(grid.row_count(), 3);
        assert!(grid.is_percent());
        assert_eq!(grid.column_width(0).to_string(), "25%");
        assert_close(grid.row_height(2), 20.0);
        assert_close(grid.row_offset(3), 60.0);
    }

    #[test]
    fn test_percent_widths_sum_to_100() {
        let mut s = sheet("A1:F1");
        s.columns = vec![ColumnDef {
            first: 2,
            last: 3,
            width: Some(31.7),
            custom_width: true,
            ..ColumnDef::default()
        }];
        let grid = SheetGrid::compute(&s, &RenderOptions::default());
        let total: f64 = (0..6)
            .map(|c| match grid.column_width(c) {
                Length::Percent(p) => p,
                other => panic!("expected percent, got {other:?}"),
            })
            .sum();
        assert_close(total, 100.0);
    }

    #[test]
    fn test_custom_hidden_and_plain_widths() {
        let mut s = sheet("A1:C1");
        s.columns = vec![
            ColumnDef {
                first: 0,
                last: 0,
                width: Some(20.0),
                custom_width: true,
                ..ColumnDef::default()
            },
            ColumnDef {
                first: 1,
                last: 1,
                hidden: true,
                ..ColumnDef::default()
            },
            ColumnDef {
                first: 2,
                last: 2,
                width: Some(50.0),
                custom_width: false,
                ..ColumnDef::default()
            },
        ];
        let opts = RenderOptions {
            percent_columns: false,
            ..RenderOptions::default()
        };
        let grid = SheetGrid::compute(&s, &opts);
        assert_eq!(grid.column_width(0), Length::Px(140.0));
        assert_eq!(grid.column_width(1), Length::Px(0.0));
        // width without customWidth falls back to the default
        assert_eq!(grid.column_width(2), Length::Px(8.43 * 7.0));
        assert_close(grid.col_offset_px(2), 140.0);
    }

    #[test]
    fn test_empty_sheet_uses_px() {
        let grid = SheetGrid::compute(&Sheet::default(), &RenderOptions::default());
        assert_eq!(grid.col_count(), 0);
        assert!(!grid.is_percent());
        assert_eq!(grid.column_width(3), Length::Px(8.43 * 7.0));
        assert_close(grid.row_offset(2), 40.0);
    }

    #[test]
    fn test_row_heights() {
        let mut s = sheet("A1:A4");
        s.default_row_height = Some(12.0);
        s.rows = vec![
            RowDef {
                row: 0,
                height: Some(30.0),
                custom_height: true,
                hidden: false,
            },
            RowDef {
                row: 1,
                height: Some(30.0),
                custom_height: false,
                hidden: false,
            },
            RowDef {
                row: 2,
                height: Some(30.0),
                custom_height: true,
                hidden: true,
            },
        ];
        let grid = SheetGrid::compute(&s, &RenderOptions::default());
        assert_close(grid.row_height(0), 40.0);
        assert_close(grid.row_height(1), 16.0);
        assert_close(grid.row_height(2), 0.0);
        assert_close(grid.row_offset(4), 72.0);
        assert_close(grid.rows_height(0, 2), 56.0);
        // past the extent: default height per row
        assert_close(grid.row_offset(6), 104.0);
    }

    #[test]
    fn test_row_offsets_non_decreasing() {
        let mut s = sheet("A1:A50");
        s.rows = (0..50)
            .step_by(3)
            .map(|row| RowDef {
                row,
                height: Some(f64::from(row % 7)),
                custom_height: true,
                hidden: row % 2 == 0,
            })
            .collect();
        let grid = SheetGrid::compute(&s, &RenderOptions::default());
        for row in 0..60 {
            assert!(grid.row_offset(row + 1) >= grid.row_offset(row));
        }
    }

    #[test]
    fn test_extent_includes_cells_and_merges() {
        let mut s = sheet("bogus");
        s.merges = vec!["B2:E7".to_string()];
        let grid = SheetGrid::compute(&s, &RenderOptions::default());
        assert_eq!(grid.col_count(), 5);
        assert_eq!(grid.row_count(), 7);
    }

    #[test]
    fn test_extent_ignores_positions_past_sheet_limits() {
        let mut s = sheet("A1:FXSHRXW1");
        s.merges = vec!["A1:B4294967295".to_string(), "C1:C3".to_string()];
        s.cells = vec![blank(1, 4_000_000_000), blank(u32::MAX - 1, 0), blank(3, 1)];
        let grid = SheetGrid::compute(&s, &RenderOptions::default());
        assert_eq!(grid.col_count(), 4);
        assert_eq!(grid.row_count(), 3);
    }

    #[test]
    fn test_col_distance_on_percent_columns() {
        let grid = SheetGrid::compute(&sheet("A1:E1"), &RenderOptions::default());
        let width = grid.col_distance((1, 0.0), (3, 0.0));
        assert_eq!(width.to_string(), "calc(40% + 0px)");
        assert_eq!(grid.columns_width(1, 2).to_string(), "40%");
    }
}

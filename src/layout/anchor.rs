//! Drawing placement.
//!
//! Anchors carry EMU offsets; everything here is converted to px first.

use serde::Serialize;

use super::{Length, SheetGrid};
use crate::options::RenderOptions;
use crate::types::{AnchorPoint, DrawingAnchor};

/// Absolute box of a drawing on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub left: Length,
    pub top: Length,
    pub width: Length,
    pub height: Length,
}

/// Place an anchored drawing on the grid.
pub fn place_drawing(anchor: &DrawingAnchor, grid: &SheetGrid, options: &RenderOptions) -> Placement {
    match *anchor {
        DrawingAnchor::Absolute { x, y, cx, cy } => Placement {
            left: Length::Px(options.emu_to_px(x)),
            top: Length::Px(options.emu_to_px(y)),
            width: Length::Px(options.emu_to_px(cx).max(0.0)),
            height: Length::Px(options.emu_to_px(cy).max(0.0)),
        },
        DrawingAnchor::OneCell { from, cx, cy } => Placement {
            left: grid.col_position(from.col, options.emu_to_px(from.col_off)),
            top: Length::Px(row_position(grid, &from, options)),
            width: Length::Px(options.emu_to_px(cx).max(0.0)),
            height: Length::Px(options.emu_to_px(cy).max(0.0)),
        },
        DrawingAnchor::TwoCell { from, to } => {
            let top = row_position(grid, &from, options);
            let bottom = row_position(grid, &to, options);
            Placement {
                left: grid.col_position(from.col, options.emu_to_px(from.col_off)),
                top: Length::Px(top),
                width: grid.col_distance(
                    (from.col, options.emu_to_px(from.col_off)),
                    (to.col, options.emu_to_px(to.col_off)),
                ),
                height: Length::Px((bottom - top).max(0.0)),
            }
        }
    }
}

fn row_position(grid: &SheetGrid, point: &AnchorPoint, options: &RenderOptions) -> f64 {
    grid.row_offset(point.row) + options.emu_to_px(point.row_off)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::Sheet;

    fn grid(percent_columns: bool) -> (SheetGrid, RenderOptions) {
        let options = RenderOptions {
            percent_columns,
            ..RenderOptions::default()
        };
        let sheet = Sheet {
            dimension: Some("A1:E10".to_string()),
            ..Sheet::default()
        };
        (SheetGrid::compute(&sheet, &options), options)
    }

    #[test]
    fn test_absolute_anchor() {
        let (grid, options) = grid(true);
        let placement = place_drawing(
            &DrawingAnchor::Absolute {
                x: 952_500,
                y: 95_250,
                cx: 1_905_000,
                cy: -5,
            },
            &grid,
            &options,
        );
        assert_eq!(placement.left, Length::Px(100.0));
        assert_eq!(placement.top, Length::Px(10.0));
        assert_eq!(placement.width, Length::Px(200.0));
        assert_eq!(placement.height, Length::Px(0.0));
    }

    #[test]
    fn test_one_cell_anchor_px_columns() {
        let (grid, options) = grid(false);
        let placement = place_drawing(
            &DrawingAnchor::OneCell {
                from: AnchorPoint {
                    col: 2,
                    row: 1,
                    col_off: 9525 * 3,
                    row_off: 0,
                },
                cx: 9525 * 50,
                cy: 9525 * 40,
            },
            &grid,
            &options,
        );
        assert_eq!(placement.left.to_string(), "121.02px");
        assert_eq!(placement.top.to_string(), "20px");
        assert_eq!(placement.width, Length::Px(50.0));
    }

    #[test]
    fn test_two_cell_anchor_percent_columns() {
        let (grid, options) = grid(true);
        let placement = place_drawing(
            &DrawingAnchor::TwoCell {
                from: AnchorPoint::cell(1, 1),
                to: AnchorPoint::cell(2, 3),
            },
            &grid,
            &options,
        );
        assert_eq!(placement.left.to_string(), "20%");
        assert_eq!(placement.width.to_string(), "calc(20% + 0px)");
        assert_eq!(placement.width.to_string(), format!("calc({} + 0px)", grid.column_width(1)));
        assert_eq!(placement.height.to_string(), "40px");
    }

    #[test]
    fn test_two_cell_anchor_with_offsets() {
        let (grid, options) = grid(false);
        let placement = place_drawing(
            &DrawingAnchor::TwoCell {
                from: AnchorPoint {
                    col: 0,
                    row: 0,
                    col_off: 9525 * 10,
                    row_off: 9525 * 5,
                },
                to: AnchorPoint {
                    col: 1,
                    row: 1,
                    col_off: 9525 * 4,
                    row_off: 9525 * 5,
                },
            },
            &grid,
            &options,
        );
        assert_eq!(placement.left.to_string(), "10px");
        assert_eq!(placement.width.to_string(), "53.01px");
        assert_eq!(placement.height.to_string(), "20px");
    }
}

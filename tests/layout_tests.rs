//! Layout tests: column widths, row heights, merged spans and drawing boxes.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::approx_constant,
    clippy::cast_possible_truncation,
    clippy::absurd_extreme_comparisons,
    clippy::cast_lossless
)]

mod common;

use common::{assert_close, cell, render, render_with, SheetBuilder, WorkbookBuilder};
use xlhtml::layout::{place_drawing, Length, SheetGrid};
use xlhtml::{
    AnchorPoint, ColumnDef, Drawing, DrawingAnchor, DrawingPayload, RenderOptions, RowDef, Sheet,
};

/// Three columns of 10, 20 and 10 characters over two rows.
fn grid_sheet() -> SheetBuilder {
    SheetBuilder::new("Grid")
        .column(0, 0, 10.0)
        .column(1, 1, 20.0)
        .column(2, 2, 10.0)
        .cell("A1", 1.0)
        .cell("C2", 2.0)
}

// ============================================================================
// LENGTH FORMATTING
// ============================================================================

#[test]
fn test_length_display() {
    assert_eq!(Length::Px(20.0).to_string(), "20px");
    assert_eq!(Length::Px(12.345_67).to_string(), "12.3457px");
    assert_eq!(Length::Percent(25.0).to_string(), "25%");
    assert_eq!(
        Length::Calc {
            percent: 50.0,
            px: -1.0
        }
        .to_string(),
        "calc(50% - 1px)"
    );
    assert_eq!(Length::Percent(10.0).add_px(0.0), Length::Percent(10.0));
    assert_eq!(
        Length::Percent(10.0).add_px(3.0).to_string(),
        "calc(10% + 3px)"
    );
}

// ============================================================================
// COLUMNS
// ============================================================================

mod columns {
    use super::*;

    #[test]
    fn test_percent_widths_share_total() {
        let sheet = grid_sheet().build();
        let grid = SheetGrid::compute(&sheet, &RenderOptions::default());
        assert!(grid.is_percent());
        assert_eq!(grid.col_count(), 3);
        assert_eq!(grid.column_width(0).to_string(), "25%");
        assert_eq!(grid.column_width(1).to_string(), "50%");
        assert_eq!(grid.columns_width(1, 2).to_string(), "75%");
        assert_close(grid.total_width_px(), 280.0);
    }

    #[test]
    fn test_pixel_widths_when_percent_disabled() {
        let sheet = grid_sheet().build();
        let options = RenderOptions {
            percent_columns: false,
            ..RenderOptions::default()
        };
        let grid = SheetGrid::compute(&sheet, &options);
        assert!(!grid.is_percent());
        assert_eq!(grid.column_width(0), Length::Px(70.0));
        assert_eq!(grid.column_width(1), Length::Px(140.0));
        assert_close(grid.col_offset_px(2), 210.0);
    }

    #[test]
    fn test_width_without_custom_flag_uses_default() {
        let sheet = Sheet {
            name: "S".to_string(),
            dimension: Some("A1:B1".to_string()),
            default_col_width: Some(10.0),
            columns: vec![ColumnDef {
                first: 0,
                last: 0,
                width: Some(30.0),
                custom_width: false,
                ..ColumnDef::default()
            }],
            ..Sheet::default()
        };
        let grid = SheetGrid::compute(&sheet, &RenderOptions::default());
        assert_eq!(grid.column_width(0).to_string(), "50%");
    }

    #[test]
    fn test_hidden_column_has_no_width() {
        let sheet = Sheet {
            name: "S".to_string(),
            dimension: Some("A1:C1".to_string()),
            columns: vec![ColumnDef {
                first: 1,
                last: 1,
                hidden: true,
                ..ColumnDef::default()
            }],
            ..Sheet::default()
        };
        let grid = SheetGrid::compute(&sheet, &RenderOptions::default());
        assert_eq!(grid.column_width(1).to_string(), "0%");
        assert_eq!(grid.column_width(0).to_string(), "50%");
    }
}

// ============================================================================
// ROWS
// ============================================================================

mod rows {
    use super::*;

    #[test]
    fn test_custom_height_and_default() {
        let workbook = WorkbookBuilder::new()
            .sheet(grid_sheet().row_height(1, 30.0))
            .build();
        let out = render(&workbook);
        assert_close(out[0].rows[0].height, 20.0);
        assert_close(out[0].rows[1].height, 40.0);
        assert_close(out[0].header.total_height_px, 60.0);
    }

    #[test]
    fn test_hidden_row_collapses() {
        let mut sheet = grid_sheet().build();
        sheet.rows.push(RowDef {
            row: 0,
            height: Some(50.0),
            custom_height: true,
            hidden: true,
        });
        let grid = SheetGrid::compute(&sheet, &RenderOptions::default());
        assert_close(grid.row_height(0), 0.0);
        assert_close(grid.row_offset(1), 0.0);
        // past the extent rows continue at the default height
        assert_close(grid.row_offset(4), 20.0 + 2.0 * 20.0);
    }

    #[test]
    fn test_sheet_default_height_in_points() {
        let mut sheet = grid_sheet().build();
        sheet.default_row_height = Some(30.0);
        let grid = SheetGrid::compute(&sheet, &RenderOptions::default());
        assert_close(grid.row_height(0), 40.0);
        assert_close(grid.rows_height(0, 2), 80.0);
    }
}

// ============================================================================
// MERGED SPANS
// ============================================================================

#[test]
fn test_merged_cell_spans_widths_and_heights() {
    let workbook = WorkbookBuilder::new()
        .sheet(grid_sheet().cell("B1", "wide").merge("B1:C2"))
        .build();
    let out = render(&workbook);
    let merged = cell(&out[0].rows, "B1");
    assert_eq!((merged.colspan, merged.rowspan), (2, 2));
    assert_eq!(merged.width.to_string(), "75%");
    assert_eq!(merged.height, Length::Px(40.0));
}

// ============================================================================
// DRAWINGS
// ============================================================================

mod drawings {
    use super::*;

    fn two_cell() -> DrawingAnchor {
        DrawingAnchor::TwoCell {
            from: AnchorPoint {
                col: 1,
                row: 0,
                col_off: 9525,
                row_off: 0,
            },
            to: AnchorPoint::cell(2, 1),
        }
    }

    #[test]
    fn test_two_cell_anchor_on_percent_columns() {
        let sheet = grid_sheet().build();
        let options = RenderOptions::default();
        let grid = SheetGrid::compute(&sheet, &options);
        let placement = place_drawing(&two_cell(), &grid, &options);
        assert_eq!(placement.left.to_string(), "calc(25% + 1px)");
        assert_eq!(placement.width.to_string(), "calc(50% - 1px)");
        assert_eq!(placement.top.to_string(), "0px");
        assert_eq!(placement.height.to_string(), "20px");
    }

    #[test]
    fn test_two_cell_width_matches_spanned_columns() {
        let sheet = grid_sheet().column(3, 3, 40.0).cell("D1", 4.0).build();
        let options = RenderOptions::default();
        let grid = SheetGrid::compute(&sheet, &options);
        let anchor = DrawingAnchor::TwoCell {
            from: AnchorPoint::cell(1, 0),
            to: AnchorPoint::cell(3, 0),
        };
        let placement = place_drawing(&anchor, &grid, &options);
        let Length::Calc { percent, px } = placement.width else {
            panic!("expected calc width, got {:?}", placement.width);
        };
        let Length::Percent(span) = grid.columns_width(1, 2) else {
            panic!("expected percent columns");
        };
        assert_close(percent, span);
        assert_close(px, 0.0);
        assert_eq!(placement.width.to_string(), "calc(37.5% + 0px)");
    }

    #[test]
    fn test_two_cell_anchor_in_pixels() {
        let sheet = grid_sheet().build();
        let options = RenderOptions {
            percent_columns: false,
            ..RenderOptions::default()
        };
        let grid = SheetGrid::compute(&sheet, &options);
        let placement = place_drawing(&two_cell(), &grid, &options);
        assert_eq!(placement.left, Length::Px(71.0));
        assert_eq!(placement.width, Length::Px(139.0));
    }

    #[test]
    fn test_absolute_and_one_cell_anchors() {
        let sheet = grid_sheet().build();
        let options = RenderOptions::default();
        let grid = SheetGrid::compute(&sheet, &options);

        let absolute = DrawingAnchor::Absolute {
            x: 952_500,
            y: 190_500,
            cx: 1_905_000,
            cy: 952_500,
        };
        let placement = place_drawing(&absolute, &grid, &options);
        assert_eq!(placement.left, Length::Px(100.0));
        assert_eq!(placement.top, Length::Px(20.0));
        assert_eq!(placement.width, Length::Px(200.0));
        assert_eq!(placement.height, Length::Px(100.0));

        let one_cell = DrawingAnchor::OneCell {
            from: AnchorPoint::cell(2, 1),
            cx: 476_250,
            cy: 476_250,
        };
        let placement = place_drawing(&one_cell, &grid, &options);
        assert_eq!(placement.left.to_string(), "75%");
        assert_eq!(placement.top, Length::Px(20.0));
        assert_eq!(placement.width, Length::Px(50.0));
    }

    #[test]
    fn test_hidden_drawing_visibility_follows_options() {
        let drawing = Drawing {
            anchor: two_cell(),
            name: Some("Logo".to_string()),
            hidden: true,
            payload: DrawingPayload::Shape {
                shape_type: Some("rect".to_string()),
                text: None,
            },
        };
        let workbook = WorkbookBuilder::new()
            .sheet(grid_sheet().drawing(drawing))
            .build();

        let out = render(&workbook);
        assert_eq!(out[0].drawings.len(), 1);
        assert!(!out[0].drawings[0].visible);
        assert_eq!(out[0].drawings[0].data_uri, None);

        let shown = render_with(
            &workbook,
            RenderOptions {
                show_hidden_drawings: true,
                ..RenderOptions::default()
            },
        );
        assert!(shown[0].drawings[0].visible);
    }
}

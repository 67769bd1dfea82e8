//! Shared builders for workbook models used across the integration tests.
#![allow(
    dead_code,
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

use xlhtml::cell_ref::parse_cell_ref;
use xlhtml::{
    CellFormat, CellType, CellValue, CfCondition, CfOperator, CfRule, ColorSpec,
    ConditionalFormatting, DifferentialFormat, Fill, PatternType, RenderOptions, RenderedCell,
    RenderedRow, Sheet, SheetOutput, StyleSheet, Workbook,
};

// ============================================================================
// Sheet Builder
// ============================================================================

pub struct SheetBuilder {
    sheet: Sheet,
}

impl SheetBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            sheet: Sheet {
                name: name.to_string(),
                ..Sheet::default()
            },
        }
    }

    /// Add a cell by A1 reference. The type follows the value.
    pub fn cell(self, reference: &str, value: impl Into<CellValue>) -> Self {
        let value = value.into();
        let cell_type = match value {
            CellValue::Number(_) => CellType::Number,
            CellValue::Text(_) => CellType::String,
        };
        self.typed_cell(reference, value, cell_type, 0)
    }

    pub fn styled_cell(self, reference: &str, value: impl Into<CellValue>, style: u32) -> Self {
        let value = value.into();
        let cell_type = match value {
            CellValue::Number(_) => CellType::Number,
            CellValue::Text(_) => CellType::String,
        };
        self.typed_cell(reference, value, cell_type, style)
    }

    pub fn typed_cell(
        mut self,
        reference: &str,
        value: impl Into<CellValue>,
        cell_type: CellType,
        style: u32,
    ) -> Self {
        let (col, row) = parse_cell_ref(reference).expect("bad cell reference in test");
        self.sheet.cells.push(xlhtml::Cell {
            col,
            row,
            value: Some(value.into()),
            cell_type,
            style,
        });
        self
    }

    pub fn merge(mut self, range: &str) -> Self {
        self.sheet.merges.push(range.to_string());
        self
    }

    pub fn dimension(mut self, range: &str) -> Self {
        self.sheet.dimension = Some(range.to_string());
        self
    }

    pub fn column(mut self, first: u32, last: u32, width: f64) -> Self {
        self.sheet.columns.push(xlhtml::ColumnDef {
            first,
            last,
            width: Some(width),
            custom_width: true,
            ..xlhtml::ColumnDef::default()
        });
        self
    }

    pub fn row_height(mut self, row: u32, height: f64) -> Self {
        self.sheet.rows.push(xlhtml::RowDef {
            row,
            height: Some(height),
            custom_height: true,
            hidden: false,
        });
        self
    }

    pub fn conditional(mut self, sqref: &str, rules: Vec<CfRule>) -> Self {
        self.sheet.conditional_formatting.push(ConditionalFormatting {
            sqref: Some(sqref.to_string()),
            rules,
        });
        self
    }

    pub fn drawing(mut self, drawing: xlhtml::Drawing) -> Self {
        self.sheet.drawings.push(drawing);
        self
    }

    pub fn build(self) -> Sheet {
        self.sheet
    }
}

// ============================================================================
// Workbook Builder
// ============================================================================

#[derive(Default)]
pub struct WorkbookBuilder {
    workbook: Workbook,
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, sheet: SheetBuilder) -> Self {
        self.workbook.sheets.push(sheet.build());
        self
    }

    pub fn styles(mut self, styles: StyleSheet) -> Self {
        self.workbook.styles = styles;
        self
    }

    pub fn shared_strings(mut self, strings: &[&str]) -> Self {
        self.workbook.shared_strings = strings.iter().map(|s| (*s).to_string()).collect();
        self
    }

    pub fn date1904(mut self) -> Self {
        self.workbook.date1904 = true;
        self
    }

    pub fn build(self) -> Workbook {
        self.workbook
    }
}

// ============================================================================
// Style Helpers
// ============================================================================

pub fn solid_fill(hex: &str) -> Fill {
    Fill::Pattern {
        pattern: PatternType::Solid,
        fg_color: Some(ColorSpec::rgb(hex)),
        bg_color: None,
    }
}

/// A differential format that only sets a background.
pub fn dxf_fill(hex: &str) -> DifferentialFormat {
    DifferentialFormat {
        fill: Some(Fill::Pattern {
            pattern: PatternType::Solid,
            fg_color: None,
            bg_color: Some(ColorSpec::rgb(hex)),
        }),
        ..DifferentialFormat::default()
    }
}

/// A cell format pointing at one number format id.
pub fn number_format_xf(num_fmt_id: u32) -> CellFormat {
    CellFormat {
        num_fmt_id: Some(num_fmt_id),
        apply_number_format: Some(true),
        ..CellFormat::default()
    }
}

pub fn cell_is(priority: i32, dxf_id: u32, operator: CfOperator, formulas: &[&str]) -> CfRule {
    CfRule {
        priority,
        dxf_id: Some(dxf_id),
        condition: CfCondition::CellIs {
            operator,
            formulas: formulas.iter().map(|f| (*f).to_string()).collect(),
        },
    }
}

// ============================================================================
// Rendering Helpers
// ============================================================================

pub fn render(workbook: &Workbook) -> Vec<SheetOutput> {
    xlhtml::Conversion::new(workbook, RenderOptions::default())
        .render_all()
        .expect("render failed")
}

pub fn render_with(workbook: &Workbook, options: RenderOptions) -> Vec<SheetOutput> {
    xlhtml::Conversion::new(workbook, options)
        .render_all()
        .expect("render failed")
}

/// The rendered cell at an A1 reference, if it was emitted.
pub fn find_cell<'a>(rows: &'a [RenderedRow], reference: &str) -> Option<&'a RenderedCell> {
    let (col, row) = parse_cell_ref(reference).expect("bad cell reference in test");
    rows.iter()
        .find(|r| r.row == row)
        .and_then(|r| r.cells.iter().find(|c| c.col == col))
}

pub fn cell<'a>(rows: &'a [RenderedRow], reference: &str) -> &'a RenderedCell {
    find_cell(rows, reference).unwrap_or_else(|| panic!("cell {reference} was not rendered"))
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

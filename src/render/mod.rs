//! Sheet rendering.
//!
//! One forward pass per sheet: rows top to bottom, cells left to right. Each
//! cell is styled, formatted and sized, and every finished row goes straight
//! to a [`RowSink`]. Drawings follow once all rows are out.

mod sink;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

pub use sink::{JsonLinesSink, RowSink, SheetOutput};

use crate::cell_ref::{col_to_letters, in_sheet};
use crate::conditional::{CellSubject, ConditionalEvaluator};
use crate::error::{Result, XlhtmlError};
use crate::layout::{place_drawing, Length, MergeMap, MergeRole, SheetGrid};
use crate::options::RenderOptions;
use crate::styles::{CellStyle, Container, CssMap, StyleResolver};
use crate::types::{Cell, CellType, CellValue, Drawing, DrawingPayload, ImageFormat, Sheet, Workbook};

/// A cell ready to be written out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedCell {
    pub col: u32,
    pub row: u32,
    pub style: CssMap,
    /// Wrapper containers, outermost first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<Container>,
    pub text: String,
    pub colspan: u32,
    pub rowspan: u32,
    pub width: Length,
    pub height: Length,
}

/// A finished row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedRow {
    pub row: u32,
    /// Height in px (0 for hidden rows).
    pub height: f64,
    pub cells: Vec<RenderedCell>,
}

/// A drawing with its box resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedDrawing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub left: Length,
    pub top: Length,
    pub width: Length,
    pub height: Length,
    pub visible: bool,
    pub payload: DrawingPayload,
    /// `data:` URI for image payloads with decodable data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_uri: Option<String>,
}

/// Sheet-level information handed to the sink before the rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetHeader {
    pub index: usize,
    pub name: String,
    /// Width of every column, in order.
    pub columns: Vec<Length>,
    pub total_width_px: f64,
    pub total_height_px: f64,
}

/// Progress report, sent once per completed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowProgress {
    pub row: u32,
    pub rows_done: usize,
    pub rows_total: usize,
}

/// State for converting one workbook. Caches live as long as this value.
#[derive(Debug)]
pub struct Conversion<'a> {
    workbook: &'a Workbook,
    options: RenderOptions,
    styles: StyleResolver<'a>,
}

impl<'a> Conversion<'a> {
    pub fn new(workbook: &'a Workbook, options: RenderOptions) -> Self {
        Self {
            workbook,
            options,
            styles: StyleResolver::new(&workbook.styles, workbook.theme.as_ref()),
        }
    }

    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn date1904(&self) -> bool {
        self.workbook.date1904 || self.options.date1904
    }

    /// Render every sheet into memory.
    pub fn render_all(&mut self) -> Result<Vec<SheetOutput>> {
        (0..self.workbook.sheets.len())
            .map(|index| {
                let mut output = SheetOutput::default();
                self.render_sheet(index, &mut output, |_| {})?;
                Ok(output)
            })
            .collect()
    }

    /// Render one sheet into `sink`, reporting progress after each row.
    pub fn render_sheet<S, P>(&mut self, index: usize, sink: &mut S, mut progress: P) -> Result<()>
    where
        S: RowSink + ?Sized,
        P: FnMut(RowProgress),
    {
        let workbook = self.workbook;
        let sheet = workbook
            .sheets
            .get(index)
            .ok_or_else(|| XlhtmlError::Other(format!("no sheet at index {index}")))?;

        let grid = SheetGrid::compute(sheet, &self.options);
        let merges = MergeMap::from_refs(&sheet.merges);
        let rules = ConditionalEvaluator::new(&sheet.conditional_formatting);

        sink.begin_sheet(&sheet_header(index, sheet, &grid))?;

        let mut cells: Vec<&Cell> = sheet
            .cells
            .iter()
            .filter(|c| in_sheet(c.col, c.row))
            .collect();
        cells.sort_by_key(|c| (c.row, c.col));
        let mut pending = cells.as_slice();

        let rows_total = grid.row_count();
        for (done, row) in (0..rows_total).zip(0u32..) {
            let split = pending.iter().take_while(|c| c.row == row).count();
            let (row_cells, rest) = pending.split_at(split);
            pending = rest;

            let rendered = self.render_row(row, row_cells, &grid, &merges, &rules);
            sink.row(rendered)?;
            progress(RowProgress {
                row,
                rows_done: done + 1,
                rows_total,
            });
        }

        let drawings = sheet
            .drawings
            .iter()
            .map(|d| self.place(d, &grid))
            .collect();
        sink.drawings(drawings)
    }

    fn render_row(
        &mut self,
        row: u32,
        row_cells: &[&Cell],
        grid: &SheetGrid,
        merges: &MergeMap,
        rules: &ConditionalEvaluator<'_>,
    ) -> RenderedRow {
        let mut cells: Vec<RenderedCell> = Vec::with_capacity(row_cells.len());
        let mut blanks = merge_anchors_without_data(row, row_cells, merges).into_iter().peekable();

        for &cell in row_cells {
            while let Some(blank) = blanks.next_if(|b| b.col < cell.col) {
                cells.extend(self.render_cell(&blank, grid, merges, rules));
            }
            cells.extend(self.render_cell(cell, grid, merges, rules));
        }
        for blank in blanks {
            cells.extend(self.render_cell(&blank, grid, merges, rules));
        }

        RenderedRow {
            row,
            height: grid.row_height(row),
            cells,
        }
    }

    /// `None` for cells hidden under a merge.
    fn render_cell(
        &mut self,
        cell: &Cell,
        grid: &SheetGrid,
        merges: &MergeMap,
        rules: &ConditionalEvaluator<'_>,
    ) -> Option<RenderedCell> {
        let (colspan, rowspan) = match merges.role(cell.col, cell.row) {
            MergeRole::Covered { .. } => return None,
            MergeRole::Anchor { colspan, rowspan } => (colspan, rowspan),
            MergeRole::Single => (1, 1),
        };

        let raw = self.raw_text(cell);
        let number = cell
            .value
            .as_ref()
            .filter(|_| cell.cell_type.is_numeric())
            .and_then(CellValue::as_number);
        let subject = CellSubject::new(number, &raw);

        let style = self.styles.resolve(cell, &subject, rules);
        let text = self.display_text(cell, &raw, &style);

        Some(RenderedCell {
            col: cell.col,
            row: cell.row,
            style: style.css,
            containers: style.containers,
            text,
            colspan,
            rowspan,
            width: grid.columns_width(cell.col, colspan),
            height: Length::Px(grid.rows_height(cell.row, rowspan)),
        })
    }

    /// The stored text of a cell, with shared strings looked up.
    fn raw_text(&self, cell: &Cell) -> String {
        let Some(value) = cell.value.as_ref() else {
            return String::new();
        };
        if cell.cell_type == CellType::SharedString {
            if let Some(text) = self.workbook.shared_string(value) {
                return text.to_string();
            }
            log::debug!(
                "shared string {:?} missing at {}{}",
                value,
                col_to_letters(cell.col),
                u64::from(cell.row) + 1
            );
        }
        value.raw_text().into_owned()
    }

    fn display_text(&self, cell: &Cell, raw: &str, style: &CellStyle) -> String {
        let Some(value) = cell.value.as_ref() else {
            return String::new();
        };
        match cell.cell_type {
            CellType::Boolean => {
                let truthy = value.as_number().map_or_else(
                    || raw.eq_ignore_ascii_case("true"),
                    |n| n != 0.0,
                );
                let text = if truthy { "TRUE" } else { "FALSE" };
                text.to_string()
            }
            CellType::Error => raw.to_string(),
            CellType::String | CellType::SharedString => style.number_format.format_text(raw),
            CellType::Number | CellType::Date => {
                style.number_format.format(value, self.date1904())
            }
        }
    }

    fn place(&self, drawing: &Drawing, grid: &SheetGrid) -> PlacedDrawing {
        let placement = place_drawing(&drawing.anchor, grid, &self.options);
        PlacedDrawing {
            name: drawing.name.clone(),
            left: placement.left,
            top: placement.top,
            width: placement.width,
            height: placement.height,
            visible: !drawing.hidden || self.options.show_hidden_drawings,
            payload: drawing.payload.clone(),
            data_uri: data_uri(&drawing.payload),
        }
    }
}

/// Blank cells for merge anchors in `row` that have no data cell.
fn merge_anchors_without_data(row: u32, row_cells: &[&Cell], merges: &MergeMap) -> Vec<Cell> {
    let mut blanks: Vec<Cell> = merges
        .regions()
        .iter()
        .filter(|r| r.start_row == row)
        .filter(|r| {
            matches!(
                merges.role(r.start_col, row),
                MergeRole::Anchor { .. }
            )
        })
        .filter(|r| !row_cells.iter().any(|c| c.col == r.start_col))
        .map(|r| Cell {
            col: r.start_col,
            row,
            value: None,
            cell_type: CellType::default(),
            style: 0,
        })
        .collect();
    blanks.sort_by_key(|c| c.col);
    blanks.dedup_by_key(|c| c.col);
    blanks
}

fn sheet_header(index: usize, sheet: &Sheet, grid: &SheetGrid) -> SheetHeader {
    SheetHeader {
        index,
        name: sheet.name.clone(),
        columns: (0..grid.col_count())
            .zip(0u32..)
            .map(|(_, col)| grid.column_width(col))
            .collect(),
        total_width_px: grid.total_width_px(),
        total_height_px: grid.total_height_px(),
    }
}

/// `data:` URI for an image payload; the MIME type is sniffed when missing.
fn data_uri(payload: &DrawingPayload) -> Option<String> {
    let DrawingPayload::Image { mime_type, data } = payload else {
        return None;
    };
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = match STANDARD.decode(&compact) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::debug!("image data is not base64: {err}");
            return None;
        }
    };
    let mime = mime_type
        .clone()
        .unwrap_or_else(|| ImageFormat::from_magic_bytes(&bytes).mime_type().to_string());
    Some(format!("data:{mime};base64,{compact}"))
}

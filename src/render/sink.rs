//! Destinations for rendered rows.

use std::io::Write;

use serde::Serialize;

use super::{PlacedDrawing, RenderedRow, SheetHeader};
use crate::error::Result;

/// Receives a sheet row by row, as soon as each row is finished.
pub trait RowSink {
    /// Called once before the first row of a sheet.
    fn begin_sheet(&mut self, _header: &SheetHeader) -> Result<()> {
        Ok(())
    }

    fn row(&mut self, row: RenderedRow) -> Result<()>;

    /// Called once after the last row, with every drawing of the sheet.
    fn drawings(&mut self, _drawings: Vec<PlacedDrawing>) -> Result<()> {
        Ok(())
    }
}

/// Collects one sheet in memory.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetOutput {
    pub header: SheetHeader,
    pub rows: Vec<RenderedRow>,
    pub drawings: Vec<PlacedDrawing>,
}

impl RowSink for SheetOutput {
    fn begin_sheet(&mut self, header: &SheetHeader) -> Result<()> {
        self.header = header.clone();
        Ok(())
    }

    fn row(&mut self, row: RenderedRow) -> Result<()> {
        self.rows.push(row);
        Ok(())
    }

    fn drawings(&mut self, drawings: Vec<PlacedDrawing>) -> Result<()> {
        self.drawings = drawings;
        Ok(())
    }
}

/// One line of JSON-lines output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
enum Line<'a> {
    Sheet(&'a SheetHeader),
    Row(&'a RenderedRow),
    Drawings { drawings: &'a [PlacedDrawing] },
}

/// Writes each sheet header, row and drawing list as one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    out: W,
    lines: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub const fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    /// Number of lines written so far.
    pub const fn lines(&self) -> usize {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &Line<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, line)?;
        self.out.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }
}

impl<W: Write> RowSink for JsonLinesSink<W> {
    fn begin_sheet(&mut self, header: &SheetHeader) -> Result<()> {
        self.write_line(&Line::Sheet(header))
    }

    fn row(&mut self, row: RenderedRow) -> Result<()> {
        self.write_line(&Line::Row(&row))
    }

    fn drawings(&mut self, drawings: Vec<PlacedDrawing>) -> Result<()> {
        if drawings.is_empty() {
            return Ok(());
        }
        self.write_line(&Line::Drawings {
            drawings: &drawings,
        })?;
        self.out.flush()?;
        Ok(())
    }
}

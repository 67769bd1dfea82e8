use serde::{Deserialize, Serialize};

use super::*;
use crate::error::Result;

/// A decoded workbook, as handed over by an upstream XLSX parser.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
    #[serde(default)]
    pub styles: StyleSheet,
    /// Theme color scheme. `None` falls back to the stock Office scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeScheme>,
    /// Shared string table, addressed by shared-string cells.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared_strings: Vec<String>,
    /// Whether the workbook uses the 1904 date system (Mac default)
    /// If false, uses the 1900 date system (Windows default)
    #[serde(default, skip_serializing_if = "is_false")]
    pub date1904: bool,
}

/// Helper function for serde skip_serializing_if
pub(crate) fn is_false(b: &bool) -> bool {
    !b
}

impl Workbook {
    /// Decode a workbook model from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Text of a shared-string cell, or the raw value when the index is bad.
    pub fn shared_string(&self, value: &CellValue) -> Option<&str> {
        let idx = value.as_number()?;
        if idx < 0.0 || idx.fract() != 0.0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let idx = idx as usize;
        self.shared_strings.get(idx).map(String::as_str)
    }
}

/// A single worksheet
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub name: String,
    /// Used range such as "A1:D20".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    /// Default column width in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_col_width: Option<f64>,
    /// Default row height in points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_row_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<RowDef>,
    #[serde(default)]
    pub cells: Vec<Cell>,
    /// Merge references such as "B2:C3".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merges: Vec<String>,
    /// Conditional formatting rules applied to cell ranges
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional_formatting: Vec<ConditionalFormatting>,
    /// Drawings (images, shapes) in this sheet
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drawings: Vec<Drawing>,
}

/// Column definition (`<col>`), covering columns `first..=last` (0-indexed).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub first: u32,
    pub last: u32,
    /// Width in characters.
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub custom_width: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub collapsed: bool,
}

/// Row definition (`<row>`), 0-indexed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowDef {
    pub row: u32,
    /// Height in points.
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub custom_height: bool,
    #[serde(default)]
    pub hidden: bool,
}

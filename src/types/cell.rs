use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A single cell as delivered by the workbook model.
///
/// Positions are 0-indexed (`col` 0 is column A, `row` 0 is row 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub col: u32,
    pub row: u32,
    /// Raw stored value. Shared-string cells carry the string table index here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<CellValue>,
    #[serde(default, rename = "t")]
    pub cell_type: CellType,
    /// Index into the stylesheet's cell formats.
    #[serde(default, rename = "s")]
    pub style: u32,
}

/// Raw cell value: either a number or a string, exactly as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric interpretation of the raw value, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Raw value as text, used when formatting falls through.
    pub fn raw_text(&self) -> Cow<'_, str> {
        match self {
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Declared data type of a cell.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellType {
    #[serde(rename = "str")]
    String,
    #[default]
    #[serde(rename = "n")]
    Number,
    #[serde(rename = "b")]
    Boolean,
    #[serde(rename = "e")]
    Error,
    #[serde(rename = "d")]
    Date,
    #[serde(rename = "s")]
    SharedString,
}

impl CellType {
    /// True for types whose raw value is rendered through the numeric path.
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Date)
    }
}

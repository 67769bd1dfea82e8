//! Conversion settings.
//!
//! Every field has a default, so an empty JSON object (or no options at all)
//! gives the stock behavior.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Knobs for one workbook conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Force the 1904 date system regardless of the workbook flag.
    pub date1904: bool,
    /// Pixels per character of column width.
    pub px_per_char: f64,
    /// Pixels per point of row height.
    pub px_per_point: f64,
    /// Column width (characters) when neither the column nor the sheet declares one.
    pub default_col_width: f64,
    /// Row height (points) when neither the row nor the sheet declares one.
    pub default_row_height: f64,
    /// EMUs per device pixel (914400 per inch at 96 dpi).
    pub emu_per_px: f64,
    /// Render columns as percentages of the total width. `false` forces px.
    pub percent_columns: bool,
    /// Report hidden drawings as visible.
    pub show_hidden_drawings: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            date1904: false,
            px_per_char: 7.0,
            px_per_point: 4.0 / 3.0,
            default_col_width: 8.43,
            default_row_height: 15.0,
            emu_per_px: 9525.0,
            percent_columns: true,
            show_hidden_drawings: false,
        }
    }
}

impl RenderOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub(crate) fn emu_to_px(&self, emu: i64) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let emu = emu as f64;
        emu / self.emu_per_px
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let opts = RenderOptions::from_json("{}").unwrap();
        assert_eq!(opts, RenderOptions::default());
        assert_eq!(opts.emu_to_px(914_400), 96.0);
    }

    #[test]
    fn partial_json_overrides_one_field() {
        let opts = RenderOptions::from_json(r#"{"percentColumns":false,"pxPerChar":8}"#).unwrap();
        assert!(!opts.percent_columns);
        assert_eq!(opts.px_per_char, 8.0);
        assert_eq!(opts.default_row_height, 15.0);
    }
}

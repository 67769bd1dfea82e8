//! xlhtml - spreadsheet style and layout engine for HTML output
//!
//! Takes a decoded workbook model and produces everything an HTML writer
//! needs, row by row:
//! - Number format codes applied to raw values (dates, fractions, scientific)
//! - Theme, indexed and RGB colors resolved to CSS, tints included
//! - Cell formats and conditional formats cascaded into one CSS map per cell
//! - Column widths, row heights, merged spans and drawing positions
//!
//! # Usage (Rust)
//!
//! ```no_run
//! use xlhtml::{Conversion, RenderOptions, Workbook};
//!
//! # fn main() -> xlhtml::Result<()> {
//! let workbook = Workbook::from_json(&std::fs::read_to_string("model.json")?)?;
//! let mut conversion = Conversion::new(&workbook, RenderOptions::default());
//! for sheet in conversion.render_all()? {
//!     println!("{}: {} rows", sheet.header.name, sheet.rows.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cell_ref;
pub mod color;
pub mod conditional;
pub mod error;
pub mod layout;
pub mod numfmt;
pub mod options;
pub mod render;
pub mod styles;
pub mod types;

use wasm_bindgen::prelude::*;

pub use error::{Result, XlhtmlError};
pub use options::RenderOptions;
pub use render::{
    Conversion, JsonLinesSink, PlacedDrawing, RenderedCell, RenderedRow, RowProgress, RowSink,
    SheetHeader, SheetOutput,
};
pub use types::*;

/// Render every sheet of a JSON workbook model.
///
/// # Errors
/// Returns an error if the model or options JSON cannot be decoded.
pub fn render_json(model_json: &str, options: RenderOptions) -> Result<Vec<SheetOutput>> {
    let workbook = Workbook::from_json(model_json)?;
    Conversion::new(&workbook, options).render_all()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Render a JSON workbook model and return the rendered sheets as JSON.
///
/// # Errors
/// Returns an error if the model or options JSON is invalid.
#[wasm_bindgen]
pub fn render_workbook_json(model_json: &str, options_json: Option<String>) -> std::result::Result<String, JsValue> {
    let options = match options_json.as_deref() {
        Some(json) => RenderOptions::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => RenderOptions::default(),
    };
    let sheets = render_json(model_json, options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&sheets)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Render a workbook model given as a JS object.
///
/// This skips the JSON round trip when the model already lives in JavaScript.
///
/// # Errors
/// Returns an error if the value is not a valid workbook model.
#[wasm_bindgen]
pub fn render_workbook(model: JsValue) -> std::result::Result<JsValue, JsValue> {
    let workbook: Workbook = serde_wasm_bindgen::from_value(model)
        .map_err(|e| JsValue::from_str(&format!("Invalid workbook model: {e}")))?;
    let sheets = Conversion::new(&workbook, RenderOptions::default())
        .render_all()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&sheets)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

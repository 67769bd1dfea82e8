//! Structured error types for xlhtml.
//!
//! Resolver operations degrade instead of failing; these errors surface only
//! from model loading and the few helpers that have a real failure mode.

/// All errors that can occur while loading a model or parsing references.
#[derive(Debug, thiserror::Error)]
pub enum XlhtmlError {
    /// Model JSON could not be decoded.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid cell reference.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// Color value that cannot be resolved.
    #[error("Invalid color: {0}")]
    Color(String),

    /// Number format code that cannot be interpreted.
    #[error("Invalid number format: {0}")]
    Format(String),

    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlhtmlError>;

impl From<String> for XlhtmlError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for XlhtmlError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<XlhtmlError> for wasm_bindgen::JsValue {
    fn from(e: XlhtmlError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

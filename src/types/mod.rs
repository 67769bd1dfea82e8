//! Workbook model consumed by the style engine.
//!
//! These types are produced by an upstream XLSX parser (or deserialized from
//! JSON) and are read-only for the duration of a conversion.

mod cell;
mod color;
mod drawing;
mod formatting;
mod style;
mod workbook;

pub use cell::*;
pub use color::*;
pub use drawing::*;
pub use formatting::*;
pub use style::*;
pub use workbook::*;

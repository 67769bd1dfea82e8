//! Grid geometry for one sheet.
//!
//! This module handles:
//! - Column widths (percent of the total or fixed px) and row heights
//! - Cumulative column and row offsets for locating any cell
//! - Merge regions and which cells they suppress
//! - Drawing anchor placement

mod anchor;
mod grid;
mod merge;

use std::fmt;

use serde::{Serialize, Serializer};

pub use anchor::{place_drawing, Placement};
pub use grid::SheetGrid;
pub use merge::{MergeMap, MergeRole};

/// A CSS length produced by the layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
    /// `calc(percent% + px px)`, for positions on percentage columns.
    Calc { percent: f64, px: f64 },
}

impl Length {
    /// Shift by a pixel amount.
    pub fn add_px(self, delta: f64) -> Self {
        match self {
            Self::Px(px) => Self::Px(px + delta),
            Self::Percent(percent) if delta == 0.0 => Self::Percent(percent),
            Self::Percent(percent) => Self::Calc { percent, px: delta },
            Self::Calc { percent, px } => Self::Calc {
                percent,
                px: px + delta,
            },
        }
    }

    /// Pixel value, when the length has no percentage part.
    pub const fn as_px(self) -> Option<f64> {
        match self {
            Self::Px(px) => Some(px),
            Self::Percent(_) | Self::Calc { .. } => None,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Px(px) => write!(f, "{}px", trim_number(px)),
            Self::Percent(percent) => write!(f, "{}%", trim_number(percent)),
            Self::Calc { percent, px } => {
                let sign = if px < 0.0 { '-' } else { '+' };
                write!(
                    f,
                    "calc({}% {sign} {}px)",
                    trim_number(percent),
                    trim_number(px.abs())
                )
            }
        }
    }
}

impl Serialize for Length {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Round to four decimals and drop trailing zeros.
fn trim_number(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

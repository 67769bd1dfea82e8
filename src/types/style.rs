use serde::{Deserialize, Serialize};

use super::ColorSpec;

/// Complete stylesheet of a workbook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSheet {
    #[serde(default)]
    pub fonts: Vec<Font>,
    #[serde(default)]
    pub fills: Vec<Fill>,
    #[serde(default)]
    pub borders: Vec<Border>,
    /// Cell formats (`cellXfs`), addressed by a cell's style index.
    #[serde(default)]
    pub cell_formats: Vec<CellFormat>,
    /// Differential formats (`dxfs`), addressed by conditional rules.
    #[serde(default)]
    pub dxfs: Vec<DifferentialFormat>,
    /// Custom numbering formats (`numFmts`).
    #[serde(default)]
    pub num_fmts: Vec<NumFmt>,
}

/// A numbering format record: id plus format code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumFmt {
    pub id: u32,
    pub code: String,
}

/// Cell format record (`xf`).
///
/// `apply_*` flags default to "apply" when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    #[serde(default)]
    pub font_id: Option<u32>,
    #[serde(default)]
    pub fill_id: Option<u32>,
    #[serde(default)]
    pub border_id: Option<u32>,
    #[serde(default)]
    pub num_fmt_id: Option<u32>,
    #[serde(default)]
    pub alignment: Option<Alignment>,
    #[serde(default)]
    pub apply_font: Option<bool>,
    #[serde(default)]
    pub apply_fill: Option<bool>,
    #[serde(default)]
    pub apply_border: Option<bool>,
    #[serde(default)]
    pub apply_alignment: Option<bool>,
    #[serde(default)]
    pub apply_number_format: Option<bool>,
}

/// Differential format record (`dxf`): a partial style layered on top of a base.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferentialFormat {
    #[serde(default)]
    pub font: Option<Font>,
    #[serde(default)]
    pub fill: Option<Fill>,
    #[serde(default)]
    pub border: Option<Border>,
    #[serde(default)]
    pub alignment: Option<Alignment>,
    #[serde(default)]
    pub num_fmt: Option<NumFmt>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Font {
    #[serde(default)]
    pub name: Option<String>,
    /// Size in points.
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub color: Option<ColorSpec>,
    /// `Some(false)` switches bold off, so a differential font can undo a bold base.
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
    #[serde(default)]
    pub underline: Option<UnderlineStyle>,
    #[serde(default)]
    pub strike: Option<bool>,
    #[serde(default)]
    pub vert_align: Option<VertAlign>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum UnderlineStyle {
    Single,
    Double,
    SingleAccounting,
    DoubleAccounting,
    None,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum VertAlign {
    Baseline,
    Subscript,
    Superscript,
}

/// Fill record: either a pattern fill or a gradient fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Fill {
    Pattern {
        #[serde(default)]
        pattern: PatternType,
        #[serde(default)]
        fg_color: Option<ColorSpec>,
        #[serde(default)]
        bg_color: Option<ColorSpec>,
    },
    Gradient {
        /// Angle in degrees; 0 runs left to right.
        #[serde(default)]
        degree: f64,
        stops: Vec<GradientStop>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientStop {
    /// Position of the stop, 0.0 to 1.0.
    pub position: f64,
    pub color: ColorSpec,
}

/// Pattern fill types from ECMA-376 Part 1, Section 18.18.55
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PatternType {
    #[default]
    None,
    Solid,
    Gray125,
    Gray0625,
    DarkGray,
    MediumGray,
    LightGray,
    DarkHorizontal,
    DarkVertical,
    DarkDown,
    DarkUp,
    DarkGrid,
    DarkTrellis,
    LightHorizontal,
    LightVertical,
    LightDown,
    LightUp,
    LightGrid,
    LightTrellis,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    #[serde(default)]
    pub left: Option<BorderSide>,
    #[serde(default)]
    pub right: Option<BorderSide>,
    #[serde(default)]
    pub top: Option<BorderSide>,
    #[serde(default)]
    pub bottom: Option<BorderSide>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderSide {
    pub style: BorderStyle,
    #[serde(default)]
    pub color: Option<ColorSpec>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alignment {
    #[serde(default)]
    pub horizontal: Option<HAlign>,
    #[serde(default)]
    pub vertical: Option<VAlign>,
    #[serde(default)]
    pub wrap_text: bool,
    #[serde(default)]
    pub indent: Option<u32>,
    /// 0..=90 counter-clockwise, 91..=180 clockwise (minus 90), 255 stacked.
    #[serde(default)]
    pub text_rotation: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HAlign {
    General,
    Left,
    Center,
    Right,
    Fill,
    Justify,
    CenterContinuous,
    Distributed,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum VAlign {
    Top,
    Center, // Note: Excel uses "center" not "middle"
    Bottom,
    Justify,
    Distributed,
}

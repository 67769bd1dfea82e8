//! Style cascade
//!
//! A cell's look is assembled from layers: fill, font, border and alignment
//! of its cell format, then the same four from the winning differential
//! format. Each layer is an ordered CSS property map plus a list of wrapper
//! containers (rotation, vertical text, double underline). Later layers
//! override earlier ones key by key.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::color::ColorResolver;
use crate::conditional::{CellSubject, ConditionalEvaluator};
use crate::numfmt::{resolve_format_code, NumberFormatSpec};
use crate::types::{
    Alignment, Border, BorderSide, BorderStyle, Cell, CellFormat, CellType,
    DifferentialFormat, Fill, Font, HAlign, PatternType, StyleSheet, ThemeScheme, UnderlineStyle,
    VAlign, VertAlign,
};

/// Pixels of left padding per indent level.
pub const INDENT_PX: u32 = 9;

/// CSS properties in insertion order. Setting a present key replaces its
/// value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssMap {
    entries: Vec<(String, String)>,
}

impl CssMap {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Set a color property; empty (unresolved) colors are left out.
    fn set_color(&mut self, key: &str, css: String) {
        if !css.is_empty() {
            self.set(key, css);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay `other` on top of `self`.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.entries {
            self.set(key, value.clone());
        }
    }

    /// `key:value;key:value`, ready for a `style` attribute.
    pub fn to_inline(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl Serialize for CssMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerKind {
    Rotation,
    VerticalText,
    DoubleUnderline,
}

/// A wrapper element around the cell text.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Container {
    pub kind: ContainerKind,
    pub style: CssMap,
}

impl Container {
    fn new(kind: ContainerKind, props: &[(&str, &str)]) -> Self {
        let mut style = CssMap::new();
        for (key, value) in props {
            style.set(key, *value);
        }
        Self { kind, style }
    }
}

/// CSS properties plus wrapper containers, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleLayer {
    pub css: CssMap,
    pub containers: Vec<Container>,
}

impl StyleLayer {
    /// Overlay `other`. A container replaces one of the same kind in place.
    pub fn merge(&mut self, other: &Self) {
        self.css.merge(&other.css);
        for container in &other.containers {
            match self
                .containers
                .iter_mut()
                .find(|c| c.kind == container.kind)
            {
                Some(existing) => existing.clone_from(container),
                None => self.containers.push(container.clone()),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.css.is_empty() && self.containers.is_empty()
    }
}

/// The fully cascaded style of one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellStyle {
    pub css: CssMap,
    /// Wrapper containers, outermost first.
    pub containers: Vec<Container>,
    pub number_format: NumberFormatSpec,
}

impl CellStyle {
    /// Wrap `inner` in the containers, innermost first.
    pub fn fold_containers<T>(&self, inner: T, mut wrap: impl FnMut(T, &Container) -> T) -> T {
        self.containers.iter().rev().fold(inner, |acc, c| wrap(acc, c))
    }
}

/// Cached layers for one cell format.
#[derive(Debug, Clone)]
struct BaseStyle {
    layer: StyleLayer,
    number_format: NumberFormatSpec,
}

/// Cached layers for one differential format.
#[derive(Debug, Clone)]
struct DiffStyle {
    layer: StyleLayer,
    number_format: Option<NumberFormatSpec>,
}

/// Resolves cell styles for one conversion, caching per style and dxf index.
#[derive(Debug)]
pub struct StyleResolver<'a> {
    styles: &'a StyleSheet,
    colors: ColorResolver<'a>,
    base_cache: HashMap<u32, BaseStyle>,
    dxf_cache: HashMap<u32, Option<DiffStyle>>,
}

impl<'a> StyleResolver<'a> {
    pub fn new(styles: &'a StyleSheet, theme: Option<&'a ThemeScheme>) -> Self {
        Self {
            styles,
            colors: ColorResolver::new(theme),
            base_cache: HashMap::new(),
            dxf_cache: HashMap::new(),
        }
    }

    /// Cascade the style of `cell`, consulting `rules` for a differential format.
    pub fn resolve(
        &mut self,
        cell: &Cell,
        subject: &CellSubject<'_>,
        rules: &ConditionalEvaluator<'_>,
    ) -> CellStyle {
        let dxf_id = rules.select(cell.col, cell.row, subject);
        self.compose(cell.style, dxf_id, cell.cell_type)
    }

    /// Cascade a cell format with an optional differential format.
    pub fn compose(&mut self, style_index: u32, dxf_id: Option<u32>, cell_type: CellType) -> CellStyle {
        let base = self.base(style_index);
        let mut layer = base.layer;
        let mut number_format = base.number_format;

        if let Some(diff) = dxf_id.and_then(|id| self.differential(id)) {
            layer.merge(&diff.layer);
            if let Some(nf) = diff.number_format {
                number_format = nf;
            }
        }

        if !layer.css.contains_key("text-align") {
            layer.css.set("text-align", implicit_alignment(cell_type));
        }

        CellStyle {
            css: layer.css,
            containers: layer.containers,
            number_format,
        }
    }

    fn base(&mut self, style_index: u32) -> BaseStyle {
        if let Some(cached) = self.base_cache.get(&style_index) {
            return cached.clone();
        }
        let styles = self.styles;
        let built = index(&styles.cell_formats, style_index).map_or_else(
            || BaseStyle {
                layer: StyleLayer::default(),
                number_format: NumberFormatSpec::general(),
            },
            |xf| self.build_base(xf),
        );
        self.base_cache.insert(style_index, built.clone());
        built
    }

    fn build_base(&mut self, xf: &CellFormat) -> BaseStyle {
        let styles = self.styles;
        let mut layer = StyleLayer::default();

        if applies(xf.apply_fill) {
            if let Some(fill) = xf.fill_id.and_then(|id| index(&styles.fills, id)) {
                layer.merge(&fill_layer(fill, &mut self.colors, false));
            }
        }
        if applies(xf.apply_font) {
            if let Some(font) = xf.font_id.and_then(|id| index(&styles.fonts, id)) {
                layer.merge(&font_layer(font, &mut self.colors));
            }
        }
        if applies(xf.apply_border) {
            if let Some(border) = xf.border_id.and_then(|id| index(&styles.borders, id)) {
                layer.merge(&border_layer(border, &mut self.colors));
            }
        }
        if applies(xf.apply_alignment) {
            if let Some(alignment) = &xf.alignment {
                layer.merge(&alignment_layer(alignment));
            }
        }

        let number_format = xf
            .num_fmt_id
            .filter(|_| applies(xf.apply_number_format))
            .and_then(|id| resolve_format_code(id, &styles.num_fmts))
            .map_or_else(NumberFormatSpec::general, NumberFormatSpec::parse);

        BaseStyle {
            layer,
            number_format,
        }
    }

    fn differential(&mut self, dxf_id: u32) -> Option<DiffStyle> {
        if let Some(cached) = self.dxf_cache.get(&dxf_id) {
            return cached.clone();
        }
        let styles = self.styles;
        let built = index(&styles.dxfs, dxf_id).map(|dxf| self.build_differential(dxf));
        if built.is_none() {
            log::debug!("dxf {dxf_id} out of range");
        }
        self.dxf_cache.insert(dxf_id, built.clone());
        built
    }

    fn build_differential(&mut self, dxf: &DifferentialFormat) -> DiffStyle {
        let mut layer = StyleLayer::default();
        if let Some(fill) = &dxf.fill {
            layer.merge(&fill_layer(fill, &mut self.colors, true));
        }
        if let Some(font) = &dxf.font {
            layer.merge(&font_layer(font, &mut self.colors));
        }
        if let Some(border) = &dxf.border {
            layer.merge(&border_layer(border, &mut self.colors));
        }
        if let Some(alignment) = &dxf.alignment {
            layer.merge(&alignment_layer(alignment));
        }
        DiffStyle {
            layer,
            number_format: dxf
                .num_fmt
                .as_ref()
                .map(|nf| NumberFormatSpec::parse(&nf.code)),
        }
    }
}

const fn applies(flag: Option<bool>) -> bool {
    !matches!(flag, Some(false))
}

fn index<T>(items: &[T], idx: u32) -> Option<&T> {
    usize::try_from(idx).ok().and_then(|i| items.get(i))
}

/// Default horizontal alignment when the style gives none.
pub const fn implicit_alignment(cell_type: CellType) -> &'static str {
    match cell_type {
        CellType::Error | CellType::Boolean => "center",
        CellType::Number | CellType::Date => "right",
        CellType::String | CellType::SharedString => "left",
    }
}

/// Background from a fill record.
///
/// Differential fills keep their color in `bgColor`, cell fills in `fgColor`.
pub fn fill_layer(fill: &Fill, colors: &mut ColorResolver<'_>, differential: bool) -> StyleLayer {
    let mut layer = StyleLayer::default();
    match fill {
        Fill::Pattern {
            pattern,
            fg_color,
            bg_color,
        } => {
            let color = if differential {
                bg_color.as_ref().or(fg_color.as_ref())
            } else if *pattern == PatternType::None {
                None
            } else {
                fg_color.as_ref().or(bg_color.as_ref())
            };
            if let Some(color) = color {
                layer.css.set_color("background-color", colors.resolve(color));
            }
        }
        Fill::Gradient { degree, stops } => {
            let stops: Vec<String> = stops
                .iter()
                .filter_map(|stop| {
                    let css = colors.resolve(&stop.color);
                    (!css.is_empty()).then(|| format!("{css} {}%", stop.position * 100.0))
                })
                .collect();
            if !stops.is_empty() {
                layer.css.set(
                    "background-image",
                    format!("linear-gradient({}deg, {})", degree + 90.0, stops.join(", ")),
                );
            }
        }
    }
    layer
}

pub fn font_layer(font: &Font, colors: &mut ColorResolver<'_>) -> StyleLayer {
    let mut layer = StyleLayer::default();
    let css = &mut layer.css;

    if let Some(name) = &font.name {
        css.set("font-family", format!("\"{}\"", name.replace('"', "'")));
    }
    if let Some(size) = font.size {
        css.set("font-size", format!("{size}pt"));
    }
    match font.bold {
        Some(true) => css.set("font-weight", "bold"),
        Some(false) => css.set("font-weight", "normal"),
        None => {}
    }
    match font.italic {
        Some(true) => css.set("font-style", "italic"),
        Some(false) => css.set("font-style", "normal"),
        None => {}
    }
    if let Some(color) = &font.color {
        css.set_color("color", colors.resolve(color));
    }

    let mut decorations = Vec::new();
    match font.underline {
        Some(UnderlineStyle::Single | UnderlineStyle::SingleAccounting) => {
            decorations.push("underline");
        }
        Some(UnderlineStyle::Double | UnderlineStyle::DoubleAccounting) => {
            layer.containers.push(Container::new(
                ContainerKind::DoubleUnderline,
                &[
                    ("text-decoration-line", "underline"),
                    ("text-decoration-style", "double"),
                ],
            ));
        }
        Some(UnderlineStyle::None) | None => {}
    }
    if font.strike == Some(true) {
        decorations.push("line-through");
    }
    if !decorations.is_empty() {
        layer.css.set("text-decoration", decorations.join(" "));
    } else if font.strike == Some(false) || font.underline == Some(UnderlineStyle::None) {
        layer.css.set("text-decoration", "none");
    }

    match font.vert_align {
        Some(VertAlign::Superscript) => layer.css.set("vertical-align", "super"),
        Some(VertAlign::Subscript) => layer.css.set("vertical-align", "sub"),
        Some(VertAlign::Baseline) | None => {}
    }
    layer
}

pub fn border_layer(border: &Border, colors: &mut ColorResolver<'_>) -> StyleLayer {
    let mut layer = StyleLayer::default();
    let sides = [
        ("border-top", &border.top),
        ("border-right", &border.right),
        ("border-bottom", &border.bottom),
        ("border-left", &border.left),
    ];
    for (key, side) in sides {
        if let Some(value) = side.as_ref().and_then(|s| border_side_css(s, colors)) {
            layer.css.set(key, value);
        }
    }
    layer
}

fn border_side_css(side: &BorderSide, colors: &mut ColorResolver<'_>) -> Option<String> {
    let (width, line) = border_line(side.style)?;
    let color = side
        .color
        .as_ref()
        .map_or_else(|| "black".to_string(), |c| colors.resolve(c));
    if color.is_empty() {
        Some(format!("{width} {line}"))
    } else {
        Some(format!("{width} {line} {color}"))
    }
}

/// CSS width and line style for a border style; `None` draws nothing.
pub const fn border_line(style: BorderStyle) -> Option<(&'static str, &'static str)> {
    match style {
        BorderStyle::None => None,
        BorderStyle::Thin | BorderStyle::Hair => Some(("1px", "solid")),
        BorderStyle::Medium => Some(("2px", "solid")),
        BorderStyle::Thick => Some(("3px", "solid")),
        BorderStyle::Dashed | BorderStyle::DashDot => Some(("1px", "dashed")),
        BorderStyle::Dotted | BorderStyle::DashDotDot => Some(("1px", "dotted")),
        BorderStyle::Double => Some(("3px", "double")),
        BorderStyle::MediumDashed | BorderStyle::MediumDashDot | BorderStyle::SlantDashDot => {
            Some(("2px", "dashed"))
        }
        BorderStyle::MediumDashDotDot => Some(("2px", "dotted")),
    }
}

pub fn alignment_layer(alignment: &Alignment) -> StyleLayer {
    let mut layer = StyleLayer::default();
    let css = &mut layer.css;

    let horizontal = match alignment.horizontal {
        Some(HAlign::Left | HAlign::Fill) => Some("left"),
        Some(HAlign::Center | HAlign::CenterContinuous) => Some("center"),
        Some(HAlign::Right) => Some("right"),
        Some(HAlign::Justify | HAlign::Distributed) => Some("justify"),
        Some(HAlign::General) | None => None,
    };
    if let Some(h) = horizontal {
        css.set("text-align", h);
    }

    let vertical = alignment.vertical.map(|v| match v {
        VAlign::Top => "top",
        VAlign::Bottom => "bottom",
        VAlign::Center | VAlign::Justify | VAlign::Distributed => "middle",
    });
    if let Some(v) = vertical {
        css.set("vertical-align", v);
    }

    if alignment.wrap_text {
        css.set("white-space", "pre-wrap");
    }
    if let Some(indent) = alignment.indent.filter(|&i| i > 0) {
        css.set("padding-left", format!("{}px", indent.saturating_mul(INDENT_PX)));
    }

    if let Some(container) = alignment.text_rotation.and_then(rotation_container) {
        layer.containers.push(container);
    }
    layer
}

/// 1..=90 rotate counter-clockwise, 91..=180 clockwise, 255 stacks vertically.
fn rotation_container(rotation: u32) -> Option<Container> {
    let transform = match rotation {
        1..=90 => format!("rotate(-{rotation}deg)"),
        91..=180 => format!("rotate({}deg)", rotation - 90),
        255 => {
            return Some(Container::new(
                ContainerKind::VerticalText,
                &[("writing-mode", "vertical-rl"), ("text-orientation", "upright")],
            ))
        }
        _ => return None,
    };
    Some(Container::new(
        ContainerKind::Rotation,
        &[("display", "inline-block"), ("transform", &transform)],
    ))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::{ColorSpec, NumFmt};

    fn sheet_with(xf: CellFormat) -> StyleSheet {
        StyleSheet {
            fonts: vec![Font {
                name: Some("Calibri".to_string()),
                size: Some(11.0),
                bold: Some(true),
                color: Some(ColorSpec::rgb("FF0000")),
                ..Font::default()
            }],
            fills: vec![Fill::Pattern {
                pattern: PatternType::Solid,
                fg_color: Some(ColorSpec::theme(4, 0.0)),
                bg_color: None,
            }],
            borders: vec![Border {
                bottom: Some(BorderSide {
                    style: BorderStyle::Thin,
                    color: None,
                }),
                ..Border::default()
            }],
            cell_formats: vec![xf],
            dxfs: vec![DifferentialFormat {
                font: Some(Font {
                    color: Some(ColorSpec::rgb("00FF00")),
                    ..Font::default()
                }),
                num_fmt: Some(NumFmt {
                    id: 200,
                    code: "0.0".to_string(),
                }),
                ..DifferentialFormat::default()
            }],
            num_fmts: Vec::new(),
        }
    }

    fn full_xf() -> CellFormat {
        CellFormat {
            font_id: Some(0),
            fill_id: Some(0),
            border_id: Some(0),
            num_fmt_id: Some(4),
            ..CellFormat::default()
        }
    }

    #[test]
    fn test_css_map_keeps_insertion_order() {
        let mut css = CssMap::new();
        css.set("a", "1");
        css.set("b", "2");
        css.set("a", "3");
        assert_eq!(css.to_inline(), "a:3;b:2");
    }

    #[test]
    fn test_layer_merge_idempotent() {
        let mut once = StyleLayer::default();
        let layer = alignment_layer(&Alignment {
            horizontal: Some(HAlign::Center),
            text_rotation: Some(45),
            ..Alignment::default()
        });
        once.merge(&layer);
        let mut twice = once.clone();
        twice.merge(&layer);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_base_cascade() {
        let styles = sheet_with(full_xf());
        let mut resolver = StyleResolver::new(&styles, None);
        let style = resolver.compose(0, None, CellType::Number);
        assert_eq!(style.css.get("background-color"), Some("rgb(68,114,196)"));
        assert_eq!(style.css.get("font-family"), Some("\"Calibri\""));
        assert_eq!(style.css.get("font-size"), Some("11pt"));
        assert_eq!(style.css.get("color"), Some("rgb(255,0,0)"));
        assert_eq!(style.css.get("border-bottom"), Some("1px solid black"));
        assert_eq!(style.css.get("text-align"), Some("right"));
        assert_eq!(style.number_format.positive.code, "#,##0.00");
    }

    #[test]
    fn test_apply_flags_false_skip_records() {
        let styles = sheet_with(CellFormat {
            apply_fill: Some(false),
            apply_number_format: Some(false),
            ..full_xf()
        });
        let mut resolver = StyleResolver::new(&styles, None);
        let style = resolver.compose(0, None, CellType::String);
        assert!(!style.css.contains_key("background-color"));
        assert_eq!(style.number_format, NumberFormatSpec::general());
        assert_eq!(style.css.get("text-align"), Some("left"));
    }

    #[test]
    fn test_differential_overrides() {
        let styles = sheet_with(full_xf());
        let mut resolver = StyleResolver::new(&styles, None);
        let style = resolver.compose(0, Some(0), CellType::Number);
        assert_eq!(style.css.get("color"), Some("rgb(0,255,0)"));
        assert_eq!(style.css.get("font-weight"), Some("bold"));
        assert_eq!(style.number_format.positive.code, "0.0");
        // out-of-range dxf leaves the base untouched
        let plain = resolver.compose(0, Some(9), CellType::Number);
        assert_eq!(plain.css.get("color"), Some("rgb(255,0,0)"));
    }

    #[test]
    fn test_differential_font_switches_flags_off() {
        let mut styles = sheet_with(full_xf());
        styles.dxfs.push(DifferentialFormat {
            font: Some(Font {
                bold: Some(false),
                italic: Some(false),
                strike: Some(false),
                ..Font::default()
            }),
            ..DifferentialFormat::default()
        });
        let mut resolver = StyleResolver::new(&styles, None);
        let style = resolver.compose(0, Some(1), CellType::Number);
        assert_eq!(style.css.get("font-weight"), Some("normal"));
        assert_eq!(style.css.get("font-style"), Some("normal"));
        assert_eq!(style.css.get("text-decoration"), Some("none"));
        // unset flags leave the base alone
        let base = resolver.compose(0, None, CellType::Number);
        assert!(!base.css.contains_key("font-style"));
    }

    #[test]
    fn test_out_of_range_style_index() {
        let styles = sheet_with(CellFormat {
            font_id: Some(7),
            ..CellFormat::default()
        });
        let mut resolver = StyleResolver::new(&styles, None);
        let style = resolver.compose(0, None, CellType::Boolean);
        assert_eq!(style.css.to_inline(), "text-align:center");
        let missing = resolver.compose(42, None, CellType::Error);
        assert_eq!(missing.css.to_inline(), "text-align:center");
    }

    #[test]
    fn test_double_underline_is_container() {
        let mut colors = ColorResolver::new(None);
        let layer = font_layer(
            &Font {
                underline: Some(UnderlineStyle::Double),
                strike: Some(true),
                ..Font::default()
            },
            &mut colors,
        );
        assert_eq!(layer.css.get("text-decoration"), Some("line-through"));
        assert_eq!(layer.containers.len(), 1);
        assert_eq!(layer.containers[0].kind, ContainerKind::DoubleUnderline);
    }

    #[test]
    fn test_rotation_and_indent() {
        let layer = alignment_layer(&Alignment {
            indent: Some(2),
            text_rotation: Some(135),
            vertical: Some(VAlign::Center),
            ..Alignment::default()
        });
        assert_eq!(layer.css.get("padding-left"), Some("18px"));
        assert_eq!(layer.css.get("vertical-align"), Some("middle"));
        assert_eq!(layer.containers[0].style.get("transform"), Some("rotate(45deg)"));

        let stacked = alignment_layer(&Alignment {
            text_rotation: Some(255),
            ..Alignment::default()
        });
        assert_eq!(stacked.containers[0].kind, ContainerKind::VerticalText);
    }

    #[test]
    fn test_fold_containers_outermost_first() {
        let style = CellStyle {
            css: CssMap::new(),
            containers: vec![
                rotation_container(30).unwrap(),
                Container::new(ContainerKind::DoubleUnderline, &[]),
            ],
            number_format: NumberFormatSpec::general(),
        };
        let html = style.fold_containers("x".to_string(), |inner, c| match c.kind {
            ContainerKind::Rotation => format!("<r>{inner}</r>"),
            _ => format!("<u>{inner}</u>"),
        });
        assert_eq!(html, "<r><u>x</u></r>");
    }

    #[test]
    fn test_dxf_fill_prefers_bg_color() {
        let mut colors = ColorResolver::new(None);
        let layer = fill_layer(
            &Fill::Pattern {
                pattern: PatternType::None,
                fg_color: Some(ColorSpec::rgb("000000")),
                bg_color: Some(ColorSpec::rgb("FFC7CE")),
            },
            &mut colors,
            true,
        );
        assert_eq!(layer.css.get("background-color"), Some("rgb(255,199,206)"));
    }

    #[test]
    fn test_gradient_fill() {
        let mut colors = ColorResolver::new(None);
        let layer = fill_layer(
            &Fill::Gradient {
                degree: 0.0,
                stops: vec![
                    crate::types::GradientStop {
                        position: 0.0,
                        color: ColorSpec::rgb("FFFFFF"),
                    },
                    crate::types::GradientStop {
                        position: 1.0,
                        color: ColorSpec::rgb("000000"),
                    },
                ],
            },
            &mut colors,
            false,
        );
        assert_eq!(
            layer.css.get("background-image"),
            Some("linear-gradient(90deg, rgb(255,255,255) 0%, rgb(0,0,0) 100%)")
        );
    }
}

//! Color resolution
//!
//! Turns a [`ColorSpec`] (auto, RGB hex, indexed palette entry or theme slot
//! with tint) into a CSS color string. Failures resolve to an empty string so
//! callers can simply omit the property.

mod hsl;
mod palette;

use std::borrow::Cow;
use std::collections::HashMap;

pub use hsl::{apply_tint, hsl_to_rgb, rgb_to_hsl, Hsl};
pub use palette::{
    indexed_color, preset_color, system_color, INDEXED_COLORS, PRESET_COLORS, SYSTEM_COLORS,
};

use crate::error::{Result, XlhtmlError};
use crate::types::{ColorSpec, ThemeColor, ThemeRole, ThemeScheme};

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a `0xRRGGBB` value.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_u32(value: u32) -> Self {
        Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }

    /// Parse six hex digits, with or without a leading `#`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    /// CSS `rgb(r,g,b)`.
    pub fn to_css(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// An RGB color plus an alpha byte (255 = opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: u8,
}

impl Rgba {
    pub const fn opaque(rgb: Rgb) -> Self {
        Self { rgb, alpha: 255 }
    }

    /// `rgb(...)` when opaque, otherwise `rgba(r,g,b,a)` with `a = alpha / 255`.
    pub fn to_css(self) -> String {
        if self.alpha == u8::MAX {
            return self.rgb.to_css();
        }
        let a = f64::from(self.alpha) / 255.0;
        format!("rgba({},{},{},{a})", self.rgb.r, self.rgb.g, self.rgb.b)
    }
}

impl From<Rgb> for Rgba {
    fn from(rgb: Rgb) -> Self {
        Self::opaque(rgb)
    }
}

/// Parse `RRGGBB` or `AARRGGBB` (alpha first, as in ARGB attributes).
pub fn parse_hex(hex: &str) -> Result<Rgba> {
    let invalid = || XlhtmlError::Color(hex.to_string());
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    match digits.len() {
        6 => Rgb::from_hex(digits).map(Rgba::opaque).ok_or_else(invalid),
        8 => {
            let alpha = digits
                .get(0..2)
                .and_then(|a| u8::from_str_radix(a, 16).ok())
                .ok_or_else(invalid)?;
            let rgb = digits
                .get(2..)
                .and_then(Rgb::from_hex)
                .ok_or_else(invalid)?;
            Ok(Rgba { rgb, alpha })
        }
        _ => Err(invalid()),
    }
}

/// Resolve a color spec to CSS in one shot.
///
/// Returns `initial` for auto colors and an empty string when the color
/// cannot be resolved.
pub fn resolve_color(spec: &ColorSpec, theme: Option<&ThemeScheme>) -> String {
    ColorResolver::new(theme).resolve(spec)
}

/// Resolved theme slots, keyed by slot number. `None` marks a slot that
/// failed to resolve so the failure is not retried.
pub type ThemeCache = HashMap<u32, Option<Rgb>>;

/// Color resolver for one conversion. Caches resolved theme slots.
#[derive(Debug)]
pub struct ColorResolver<'a> {
    theme: Cow<'a, ThemeScheme>,
    slots: ThemeCache,
}

impl<'a> ColorResolver<'a> {
    /// A resolver over `theme`, or the stock Office scheme when absent.
    pub fn new(theme: Option<&'a ThemeScheme>) -> Self {
        let theme = theme.map_or_else(|| Cow::Owned(ThemeScheme::office()), Cow::Borrowed);
        Self {
            theme,
            slots: HashMap::new(),
        }
    }

    pub fn theme(&self) -> &ThemeScheme {
        &self.theme
    }

    /// CSS color for `spec`; `initial` for auto, empty when unresolvable.
    pub fn resolve(&mut self, spec: &ColorSpec) -> String {
        match self.try_resolve(spec) {
            Ok(Some(rgba)) => rgba.to_css(),
            Ok(None) => "initial".to_string(),
            Err(err) => {
                log::debug!("unresolved color {spec:?}: {err}");
                String::new()
            }
        }
    }

    /// Resolve to a concrete color. `Ok(None)` means auto.
    pub fn try_resolve(&mut self, spec: &ColorSpec) -> Result<Option<Rgba>> {
        match spec {
            ColorSpec::Auto => Ok(None),
            ColorSpec::Rgb { hex } => parse_hex(hex).map(Some),
            ColorSpec::Indexed { index } => indexed_color(*index)
                .map(|v| Some(Rgba::opaque(Rgb::from_u32(v))))
                .ok_or_else(|| XlhtmlError::Color(format!("indexed color {index} out of range"))),
            ColorSpec::Theme { slot, tint } => {
                let base = self.theme_slot(*slot)?;
                Ok(Some(Rgba::opaque(apply_tint(base, *tint))))
            }
        }
    }

    /// Untinted color of a theme slot, resolved once per conversion.
    pub fn theme_slot(&mut self, slot: u32) -> Result<Rgb> {
        let cached = match self.slots.get(&slot) {
            Some(cached) => *cached,
            None => {
                let resolved = ThemeRole::from_slot(slot)
                    .and_then(|role| self.theme.color(role))
                    .and_then(|color| match resolve_theme_color(color) {
                        Ok(rgb) => Some(rgb),
                        Err(err) => {
                            log::debug!("theme slot {slot}: {err}");
                            None
                        }
                    });
                self.slots.insert(slot, resolved);
                resolved
            }
        };
        cached.ok_or_else(|| XlhtmlError::Color(format!("theme slot {slot} is not defined")))
    }
}

/// Resolve a theme role definition to RGB.
pub fn resolve_theme_color(color: &ThemeColor) -> Result<Rgb> {
    let unknown = |what: &str| XlhtmlError::Color(what.to_string());
    match color {
        ThemeColor::RgbHex { hex } => Rgb::from_hex(hex).ok_or_else(|| unknown(hex)),
        ThemeColor::RgbPercentage { r, g, b } => {
            Ok(Rgb::new(percent_channel(*r), percent_channel(*g), percent_channel(*b)))
        }
        ThemeColor::Hsl { hue, sat, lum } => Ok(hsl_to_rgb(Hsl {
            h: *hue,
            s: sat / 100.0,
            l: lum / 100.0,
        })),
        ThemeColor::System { name, last_color } => last_color
            .as_deref()
            .and_then(Rgb::from_hex)
            .or_else(|| system_color(name).map(Rgb::from_u32))
            .ok_or_else(|| unknown(name)),
        ThemeColor::Preset { name } => preset_color(name)
            .map(Rgb::from_u32)
            .ok_or_else(|| unknown(name)),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent_channel(percent: f64) -> u8 {
    (percent / 100.0 * 255.0).round().clamp(0.0, 255.0) as u8
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

    #[test]
    fn test_rgb_and_argb() {
        assert_eq!(resolve_color(&ColorSpec::rgb("00FF00"), None), "rgb(0,255,0)");
        assert_eq!(resolve_color(&ColorSpec::rgb("FFFF0000"), None), "rgb(255,0,0)");
        assert_eq!(
            resolve_color(&ColorSpec::rgb("80FF0000"), None),
            "rgba(255,0,0,0.5019607843137255)"
        );
        assert_eq!(resolve_color(&ColorSpec::rgb("#123"), None), "");
        assert_eq!(resolve_color(&ColorSpec::rgb("GG0000"), None), "");
    }

    #[test]
    fn test_auto_and_indexed() {
        assert_eq!(resolve_color(&ColorSpec::Auto, None), "initial");
        assert_eq!(
            resolve_color(&ColorSpec::Indexed { index: 10 }, None),
            "rgb(255,0,0)"
        );
        assert_eq!(
            resolve_color(&ColorSpec::Indexed { index: 65 }, None),
            "rgb(255,255,255)"
        );
        assert_eq!(resolve_color(&ColorSpec::Indexed { index: 66 }, None), "");
    }

    #[test]
    fn test_theme_defaults_to_office() {
        assert_eq!(resolve_color(&ColorSpec::theme(4, 0.0), None), "rgb(68,114,196)");
        assert_eq!(resolve_color(&ColorSpec::theme(0, 0.0), None), "rgb(255,255,255)");
        assert_eq!(resolve_color(&ColorSpec::theme(1, 0.0), None), "rgb(0,0,0)");
        assert_eq!(resolve_color(&ColorSpec::theme(12, 0.0), None), "");
    }

    #[test]
    fn test_theme_variants() {
        let theme = ThemeScheme {
            accent1: Some(ThemeColor::RgbPercentage {
                r: 100.0,
                g: 50.0,
                b: 0.0,
            }),
            accent2: Some(ThemeColor::Hsl {
                hue: 240.0,
                sat: 100.0,
                lum: 50.0,
            }),
            accent3: Some(ThemeColor::System {
                name: "highlight".to_string(),
                last_color: None,
            }),
            accent4: Some(ThemeColor::Preset {
                name: "Tomato".to_string(),
            }),
            accent5: Some(ThemeColor::Preset {
                name: "mauve".to_string(),
            }),
            ..ThemeScheme::default()
        };
        let mut resolver = ColorResolver::new(Some(&theme));
        assert_eq!(resolver.resolve(&ColorSpec::theme(4, 0.0)), "rgb(255,128,0)");
        assert_eq!(resolver.resolve(&ColorSpec::theme(5, 0.0)), "rgb(0,0,255)");
        assert_eq!(resolver.resolve(&ColorSpec::theme(6, 0.0)), "rgb(51,153,255)");
        assert_eq!(resolver.resolve(&ColorSpec::theme(7, 0.0)), "rgb(255,99,71)");
        assert_eq!(resolver.resolve(&ColorSpec::theme(8, 0.0)), "");
        // undefined role in a supplied theme does not fall back to Office
        assert_eq!(resolver.resolve(&ColorSpec::theme(9, 0.0)), "");
    }

    #[test]
    fn test_system_prefers_last_color() {
        let color = ThemeColor::System {
            name: "windowText".to_string(),
            last_color: Some("112233".to_string()),
        };
        assert_eq!(resolve_theme_color(&color).unwrap(), Rgb::new(0x11, 0x22, 0x33));
    }

    #[test]
    fn test_theme_slot_cached() {
        let mut resolver = ColorResolver::new(None);
        let first = resolver.theme_slot(5).unwrap();
        assert_eq!(resolver.slots.get(&5), Some(&Some(first)));
        assert!(resolver.theme_slot(40).is_err());
        assert_eq!(resolver.slots.get(&40), Some(&None));
    }

    #[test]
    fn test_tinted_theme_color() {
        // accent1 (4472C4) lightened by 40%
        let css = resolve_color(&ColorSpec::theme(4, 0.3999), None);
        assert_eq!(css, "rgb(143,170,220)");
    }
}

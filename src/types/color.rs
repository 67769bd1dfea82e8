use serde::{Deserialize, Serialize};

/// A color reference as it appears on fonts, fills and borders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ColorSpec {
    /// Let the renderer pick (`initial` in CSS).
    Auto,
    /// `RRGGBB` or `AARRGGBB` hex digits.
    Rgb { hex: String },
    /// Legacy palette entry, 0..=65.
    Indexed { index: u32 },
    /// Theme slot 0..=11 with an optional lightness tint in [-1, 1].
    Theme {
        slot: u32,
        #[serde(default)]
        tint: f64,
    },
}

impl ColorSpec {
    pub fn rgb(hex: impl Into<String>) -> Self {
        Self::Rgb { hex: hex.into() }
    }

    pub const fn theme(slot: u32, tint: f64) -> Self {
        Self::Theme { slot, tint }
    }
}

/// How a theme role defines its color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ThemeColor {
    /// `srgbClr`: six hex digits.
    RgbHex { hex: String },
    /// `scrgbClr`: channel percentages, 0..=100.
    RgbPercentage { r: f64, g: f64, b: f64 },
    /// `hslClr`: hue in degrees, saturation and luminance as percentages.
    Hsl { hue: f64, sat: f64, lum: f64 },
    /// `sysClr`: a named system color with the last color the producer saw.
    System {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        last_color: Option<String>,
    },
    /// `prstClr`: a named preset color.
    Preset { name: String },
}

impl ThemeColor {
    pub fn hex(hex: impl Into<String>) -> Self {
        Self::RgbHex { hex: hex.into() }
    }
}

/// The twelve roles of a theme color scheme, in theme slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeRole {
    Light1,
    Dark1,
    Light2,
    Dark2,
    Accent1,
    Accent2,
    Accent3,
    Accent4,
    Accent5,
    Accent6,
    Hyperlink,
    FollowedHyperlink,
}

impl ThemeRole {
    pub const ALL: [Self; 12] = [
        Self::Light1,
        Self::Dark1,
        Self::Light2,
        Self::Dark2,
        Self::Accent1,
        Self::Accent2,
        Self::Accent3,
        Self::Accent4,
        Self::Accent5,
        Self::Accent6,
        Self::Hyperlink,
        Self::FollowedHyperlink,
    ];

    /// Map a theme slot number (0..=11) to its role.
    ///
    /// Slots 0-3 follow the spreadsheet convention of listing the light
    /// background before the dark text color.
    pub fn from_slot(slot: u32) -> Option<Self> {
        usize::try_from(slot)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }
}

/// A document theme color scheme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeScheme {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub light1: Option<ThemeColor>,
    #[serde(default)]
    pub dark1: Option<ThemeColor>,
    #[serde(default)]
    pub light2: Option<ThemeColor>,
    #[serde(default)]
    pub dark2: Option<ThemeColor>,
    #[serde(default)]
    pub accent1: Option<ThemeColor>,
    #[serde(default)]
    pub accent2: Option<ThemeColor>,
    #[serde(default)]
    pub accent3: Option<ThemeColor>,
    #[serde(default)]
    pub accent4: Option<ThemeColor>,
    #[serde(default)]
    pub accent5: Option<ThemeColor>,
    #[serde(default)]
    pub accent6: Option<ThemeColor>,
    #[serde(default)]
    pub hyperlink: Option<ThemeColor>,
    #[serde(default)]
    pub followed_hyperlink: Option<ThemeColor>,
}

impl ThemeScheme {
    /// The stock Office scheme, used when a workbook carries no theme part.
    pub fn office() -> Self {
        Self {
            name: Some("Office".to_string()),
            light1: Some(ThemeColor::System {
                name: "window".to_string(),
                last_color: Some("FFFFFF".to_string()),
            }),
            dark1: Some(ThemeColor::System {
                name: "windowText".to_string(),
                last_color: Some("000000".to_string()),
            }),
            light2: Some(ThemeColor::hex("E7E6E6")),
            dark2: Some(ThemeColor::hex("44546A")),
            accent1: Some(ThemeColor::hex("4472C4")),
            accent2: Some(ThemeColor::hex("ED7D31")),
            accent3: Some(ThemeColor::hex("A5A5A5")),
            accent4: Some(ThemeColor::hex("FFC000")),
            accent5: Some(ThemeColor::hex("5B9BD5")),
            accent6: Some(ThemeColor::hex("70AD47")),
            hyperlink: Some(ThemeColor::hex("0563C1")),
            followed_hyperlink: Some(ThemeColor::hex("954F72")),
        }
    }

    pub fn color(&self, role: ThemeRole) -> Option<&ThemeColor> {
        match role {
            ThemeRole::Light1 => self.light1.as_ref(),
            ThemeRole::Dark1 => self.dark1.as_ref(),
            ThemeRole::Light2 => self.light2.as_ref(),
            ThemeRole::Dark2 => self.dark2.as_ref(),
            ThemeRole::Accent1 => self.accent1.as_ref(),
            ThemeRole::Accent2 => self.accent2.as_ref(),
            ThemeRole::Accent3 => self.accent3.as_ref(),
            ThemeRole::Accent4 => self.accent4.as_ref(),
            ThemeRole::Accent5 => self.accent5.as_ref(),
            ThemeRole::Accent6 => self.accent6.as_ref(),
            ThemeRole::Hyperlink => self.hyperlink.as_ref(),
            ThemeRole::FollowedHyperlink => self.followed_hyperlink.as_ref(),
        }
    }
}

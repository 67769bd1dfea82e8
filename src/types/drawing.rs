use serde::{Deserialize, Serialize};

/// A drawing object anchored on a sheet (image, shape or text box).
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    pub anchor: DrawingAnchor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Hidden drawings are still placed, but flagged invisible.
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub payload: DrawingPayload,
}

/// How a drawing is pinned to the grid. Offsets and extents are in EMUs.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DrawingAnchor {
    /// Fixed position relative to the sheet origin.
    Absolute { x: i64, y: i64, cx: i64, cy: i64 },
    /// Top-left pinned to a cell, explicit extent.
    OneCell {
        from: AnchorPoint,
        cx: i64,
        cy: i64,
    },
    /// Both corners pinned to cells.
    TwoCell { from: AnchorPoint, to: AnchorPoint },
}

/// A 0-indexed cell position plus an EMU offset inside that cell.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnchorPoint {
    pub col: u32,
    pub row: u32,
    #[serde(default)]
    pub col_off: i64,
    #[serde(default)]
    pub row_off: i64,
}

impl AnchorPoint {
    pub const fn cell(col: u32, row: u32) -> Self {
        Self {
            col,
            row,
            col_off: 0,
            row_off: 0,
        }
    }
}

/// What the drawing shows. The engine only carries it through to the writer.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DrawingPayload {
    Image {
        /// MIME type, sniffed from the data when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        /// Base64-encoded image bytes.
        data: String,
    },
    Shape {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shape_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    #[default]
    None,
}

/// Image format/MIME type detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Webp,
    Unknown,
}

impl ImageFormat {
    /// Detect image format from magic bytes
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Self::Png
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Self::Jpeg
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Self::Gif
        } else if data.starts_with(b"BM") {
            Self::Bmp
        } else if data.starts_with(b"RIFF") && data.get(8..12) == Some(b"WEBP") {
            Self::Webp
        } else {
            Self::Unknown
        }
    }

    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Webp => "image/webp",
            Self::Unknown => "application/octet-stream",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_png_and_unknown() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D]),
            ImageFormat::Png
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"??"), ImageFormat::Unknown);
        assert_eq!(ImageFormat::Unknown.mime_type(), "application/octet-stream");
    }

    #[test]
    fn anchor_deserializes_from_tagged_json() {
        let json = r#"{"kind":"twoCell","from":{"col":1,"row":1},"to":{"col":3,"row":1,"colOff":9525}}"#;
        let anchor: DrawingAnchor = serde_json::from_str(json).unwrap();
        assert_eq!(
            anchor,
            DrawingAnchor::TwoCell {
                from: AnchorPoint::cell(1, 1),
                to: AnchorPoint {
                    col: 3,
                    row: 1,
                    col_off: 9525,
                    row_off: 0
                },
            }
        );
    }
}

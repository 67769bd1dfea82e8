//! RGB <-> HSL conversion and tint.
//!
//! Hue is in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.

use super::Rgb;

/// A color in hue/saturation/lightness space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Convert RGB to HSL using the chroma/hue-sector formulas.
#[allow(clippy::many_single_char_names)]
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = max - min;
    let l = (max + min) / 2.0;

    if rgb.r == rgb.g && rgb.g == rgb.b {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let s = chroma / (1.0 - (2.0 * l - 1.0).abs());

    // Pick the sector from the byte values, not float equality.
    let sector = if rgb.r >= rgb.g && rgb.r >= rgb.b {
        ((g - b) / chroma).rem_euclid(6.0)
    } else if rgb.g >= rgb.b {
        (b - r) / chroma + 2.0
    } else {
        (r - g) / chroma + 4.0
    };

    Hsl {
        h: (sector * 60.0).rem_euclid(360.0),
        s,
        l,
    }
}

/// Convert HSL back to RGB.
#[allow(
    clippy::many_single_char_names,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let s = hsl.s.clamp(0.0, 1.0);
    let l = hsl.l.clamp(0.0, 1.0);
    let h = hsl.h.rem_euclid(360.0) / 60.0;

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = chroma * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
    let m = l - chroma / 2.0;

    let (r, g, b) = match h.floor() as u8 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(r), channel(g), channel(b))
}

/// Apply a tint value to a color
/// tint < 0: shade (darken), lightness scaled by `1 + tint`
/// tint > 0: tint (lighten), lightness moved toward 1 by `tint`
pub fn apply_tint(rgb: Rgb, tint: f64) -> Rgb {
    if tint == 0.0 {
        return rgb;
    }
    let tint = tint.clamp(-1.0, 1.0);
    let mut hsl = rgb_to_hsl(rgb);
    hsl.l = if tint < 0.0 {
        hsl.l * (1.0 + tint)
    } else {
        hsl.l.mul_add(1.0 - tint, tint)
    };
    hsl_to_rgb(hsl)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_hues() {
        assert_eq!(rgb_to_hsl(Rgb::new(255, 0, 0)).h, 0.0);
        assert_eq!(rgb_to_hsl(Rgb::new(0, 255, 0)).h, 120.0);
        assert_eq!(rgb_to_hsl(Rgb::new(0, 0, 255)).h, 240.0);
        let magenta = rgb_to_hsl(Rgb::new(255, 0, 255));
        assert_eq!(magenta.h, 300.0);
        assert_eq!(magenta.s, 1.0);
        assert_eq!(magenta.l, 0.5);
    }

    #[test]
    fn test_gray_has_no_saturation() {
        let hsl = rgb_to_hsl(Rgb::new(128, 128, 128));
        assert_eq!(hsl.s, 0.0);
        assert_eq!(hsl_to_rgb(hsl), Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_tint_lighten() {
        // 50% tint on black should give gray
        assert_eq!(apply_tint(Rgb::new(0, 0, 0), 0.5), Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_tint_darken() {
        // 50% shade on white should give gray
        assert_eq!(apply_tint(Rgb::new(255, 255, 255), -0.5), Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_zero_tint_is_identity() {
        let odd = Rgb::new(0x12, 0xAB, 0xEF);
        assert_eq!(apply_tint(odd, 0.0), odd);
    }

    #[test]
    fn test_round_trip_samples() {
        for rgb in [
            Rgb::new(0x44, 0x72, 0xC4),
            Rgb::new(0xED, 0x7D, 0x31),
            Rgb::new(1, 2, 3),
            Rgb::new(254, 255, 253),
        ] {
            let back = hsl_to_rgb(rgb_to_hsl(rgb));
            assert!(back.r.abs_diff(rgb.r) <= 1, "{rgb:?} -> {back:?}");
            assert!(back.g.abs_diff(rgb.g) <= 1, "{rgb:?} -> {back:?}");
            assert!(back.b.abs_diff(rgb.b) <= 1, "{rgb:?} -> {back:?}");
        }
    }
}

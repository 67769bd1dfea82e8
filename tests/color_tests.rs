//! Color resolution tests: hex, palette, theme slots and tints.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::approx_constant,
    clippy::cast_possible_truncation,
    clippy::absurd_extreme_comparisons,
    clippy::cast_lossless
)]

use proptest::prelude::*;
use test_case::test_case;
use xlhtml::color::{
    apply_tint, hsl_to_rgb, parse_hex, resolve_color, rgb_to_hsl, ColorResolver, Rgb,
};
use xlhtml::{ColorSpec, ThemeColor, ThemeScheme};

// ============================================================================
// HEX AND PALETTE
// ============================================================================

#[test_case("FF0000" => "rgb(255,0,0)" ; "six digits")]
#[test_case("#00ff00" => "rgb(0,255,0)" ; "lowercase with hash")]
#[test_case("FF0000FF" => "rgb(0,0,255)" ; "opaque argb")]
#[test_case("00000000" => "rgba(0,0,0,0)" ; "fully transparent")]
#[test_case("XYZ" => "" ; "garbage")]
fn resolves_hex(hex: &str) -> String {
    resolve_color(&ColorSpec::rgb(hex), None)
}

#[test]
fn test_argb_alpha_is_leading_byte() {
    let rgba = parse_hex("80112233").unwrap();
    assert_eq!(rgba.alpha, 0x80);
    assert_eq!(rgba.rgb, Rgb::new(0x11, 0x22, 0x33));
    assert!(parse_hex("1122334").is_err());
}

#[test_case(8 => "rgb(0,0,0)" ; "first palette entry")]
#[test_case(12 => "rgb(0,0,255)" ; "blue")]
#[test_case(64 => "rgb(0,0,0)" ; "system foreground")]
#[test_case(200 => "" ; "out of range")]
fn resolves_indexed(index: u32) -> String {
    resolve_color(&ColorSpec::Indexed { index }, None)
}

// ============================================================================
// THEME SLOTS
// ============================================================================

mod theme {
    use super::*;

    fn custom_theme() -> ThemeScheme {
        ThemeScheme {
            name: Some("Custom".to_string()),
            light1: Some(ThemeColor::hex("FAFAFA")),
            dark1: Some(ThemeColor::hex("101010")),
            accent1: Some(ThemeColor::hex("336699")),
            ..ThemeScheme::default()
        }
    }

    #[test]
    fn test_untinted_slot_matches_role() {
        let theme = custom_theme();
        let mut colors = ColorResolver::new(Some(&theme));
        assert_eq!(colors.resolve(&ColorSpec::theme(0, 0.0)), "rgb(250,250,250)");
        assert_eq!(colors.resolve(&ColorSpec::theme(1, 0.0)), "rgb(16,16,16)");
        assert_eq!(colors.resolve(&ColorSpec::theme(4, 0.0)), "rgb(51,102,153)");
    }

    #[test]
    fn test_missing_role_in_supplied_theme_is_empty() {
        let theme = custom_theme();
        let mut colors = ColorResolver::new(Some(&theme));
        assert_eq!(colors.resolve(&ColorSpec::theme(5, 0.0)), "");
        assert_eq!(colors.resolve(&ColorSpec::theme(99, 0.0)), "");
    }

    #[test]
    fn test_office_scheme_without_theme() {
        assert_eq!(resolve_color(&ColorSpec::theme(4, 0.0), None), "rgb(68,114,196)");
        assert_eq!(resolve_color(&ColorSpec::theme(10, 0.0), None), "rgb(5,99,193)");
    }

    #[test]
    fn test_tint_extremes() {
        assert_eq!(resolve_color(&ColorSpec::theme(4, 1.0), None), "rgb(255,255,255)");
        assert_eq!(resolve_color(&ColorSpec::theme(4, -1.0), None), "rgb(0,0,0)");
    }

    #[test]
    fn test_auto_is_initial() {
        assert_eq!(resolve_color(&ColorSpec::Auto, None), "initial");
    }
}

// ============================================================================
// HSL PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        rng_seed: proptest::test_runner::RngSeed::Fixed(0),
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn hsl_round_trip_stays_within_one(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let rgb = Rgb::new(r, g, b);
        let back = hsl_to_rgb(rgb_to_hsl(rgb));
        prop_assert!((i16::from(back.r) - i16::from(r)).abs() <= 1, "{rgb:?} -> {back:?}");
        prop_assert!((i16::from(back.g) - i16::from(g)).abs() <= 1, "{rgb:?} -> {back:?}");
        prop_assert!((i16::from(back.b) - i16::from(b)).abs() <= 1, "{rgb:?} -> {back:?}");
    }

    #[test]
    fn zero_tint_is_identity(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let rgb = Rgb::new(r, g, b);
        prop_assert_eq!(apply_tint(rgb, 0.0), rgb);
    }

    #[test]
    fn tint_moves_lightness_monotonically(
        r in any::<u8>(),
        g in any::<u8>(),
        b in any::<u8>(),
        tint in 0.05f64..1.0,
    ) {
        let rgb = Rgb::new(r, g, b);
        let base = rgb_to_hsl(rgb).l;
        let lighter = rgb_to_hsl(apply_tint(rgb, tint)).l;
        let darker = rgb_to_hsl(apply_tint(rgb, -tint)).l;
        prop_assert!(lighter >= base - 0.01, "{rgb:?} lightened to {lighter} from {base}");
        prop_assert!(darker <= base + 0.01, "{rgb:?} darkened to {darker} from {base}");
    }
}

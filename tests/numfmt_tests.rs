//! Number format tests against the public formatting API.
//!
//! Each table row is a value, a format code and the text a spreadsheet
//! application shows for it.
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

mod common;

use common::{cell, number_format_xf, render, SheetBuilder, WorkbookBuilder};
use test_case::test_case;
use xlhtml::numfmt::{builtin_format_code, format_number, format_text, NumberFormatSpec};
use xlhtml::{CellType, CellValue, NumFmt, StyleSheet};

// ============================================================================
// NUMERIC SECTIONS
// ============================================================================

#[test_case(1234.5, "#,##0.00" => "1,234.50" ; "grouping with two decimals")]
#[test_case(1234.5, "0" => "1235" ; "integer rounds half away")]
#[test_case(0.5, "0%" => "50%" ; "percent")]
#[test_case(-5.0, "0;-0" => "-5" ; "negative section with literal minus")]
#[test_case(-5.0, "0;(0)" => "(5)" ; "negative section in parentheses")]
#[test_case(-5.0, "#,##0.00" => "-5.00" ; "single section gets a minus")]
#[test_case(0.0, "0;-0;\"zero\"" => "zero" ; "zero section literal")]
#[test_case(42.0, "General" => "42" ; "general integer")]
#[test_case(0.125, "General" => "0.125" ; "general fraction")]
#[test_case(12345.0, "0.00E+00" => "1.23E+04" ; "scientific")]
#[test_case(1.5, "# ?/?" => "1 1/2" ; "mixed fraction")]
#[test_case(1e19, "?/8" => "1E+19" ; "fraction beyond exact integers")]
#[test_case(3e18, "# ?/8" => "3E+18" ; "mixed fraction beyond exact integers")]
#[test_case(1_234_567.0, "#,##0,\"K\"" => "1,235K" ; "thousands scaling with suffix")]
#[test_case(7.0, "000" => "007" ; "zero padding")]
#[test_case(5.0, "[Red]0.0" => "5.0" ; "color block ignored")]
fn formats_number(value: f64, code: &str) -> String {
    format_number(value, code, false)
}

// ============================================================================
// DATES AND TIMES
// ============================================================================

#[test_case(45_000.0, "yyyy-mm-dd" => "2023-03-15" ; "iso date")]
#[test_case(45_000.0, "m/d/yyyy" => "3/15/2023" ; "us date")]
#[test_case(45_000.0, "mmm d, yyyy" => "Mar 15, 2023" ; "short month name")]
#[test_case(45_000.75, "h:mm AM/PM" => "6:00 PM" ; "twelve hour clock")]
#[test_case(0.5, "hh:mm:ss" => "12:00:00" ; "time only")]
#[test_case(2.25, "[h]:mm" => "54:00" ; "elapsed hours")]
#[test_case(60.0, "yyyy-mm-dd" => "1900-02-28" ; "day before the leap bug")]
fn formats_date(value: f64, code: &str) -> String {
    format_number(value, code, false)
}

#[test]
fn test_date1904_shifts_epoch() {
    assert_eq!(format_number(0.0, "yyyy-mm-dd", true), "1904-01-01");
    assert_eq!(format_number(1462.0, "yyyy-mm-dd", false), "1904-01-01");
}

#[test]
fn test_out_of_range_serial_uses_general() {
    assert_eq!(format_number(-3.0, "yyyy-mm-dd", false), "-3");
}

// ============================================================================
// TEXT AND MALFORMED CODES
// ============================================================================

#[test_case("abc", "@" => "abc" ; "text placeholder")]
#[test_case("abc", "0;0;0;\"<\"@\">\"" => "<abc>" ; "fourth section wraps text")]
#[test_case("abc", "0.00" => "abc" ; "numeric only code passes text through")]
fn formats_text(text: &str, code: &str) -> String {
    format_text(text, code)
}

#[test]
fn test_malformed_code_returns_raw_value() {
    let spec = NumberFormatSpec::parse("0.0\"open");
    assert_eq!(spec.format(&CellValue::Number(2.5), false), "2.5");
}

#[test]
fn test_numeric_text_takes_numeric_path() {
    let spec = NumberFormatSpec::parse("#,##0.00");
    assert_eq!(spec.format(&CellValue::from("1234.5"), false), "1,234.50");
}

#[test]
fn test_builtin_ids() {
    assert_eq!(builtin_format_code(0), Some("General"));
    assert_eq!(builtin_format_code(10), Some("0.00%"));
    assert_eq!(builtin_format_code(14), Some("mm-dd-yy"));
    assert_eq!(builtin_format_code(49), Some("@"));
    assert_eq!(builtin_format_code(163), None);
}

// ============================================================================
// FORMATS THROUGH THE RENDER PIPELINE
// ============================================================================

mod pipeline {
    use super::*;

    fn styles() -> StyleSheet {
        StyleSheet {
            cell_formats: vec![
                xlhtml::CellFormat::default(),
                number_format_xf(4),
                number_format_xf(164),
                number_format_xf(14),
            ],
            num_fmts: vec![NumFmt {
                id: 164,
                code: "0.0%".to_string(),
            }],
            ..StyleSheet::default()
        }
    }

    #[test]
    fn test_builtin_and_custom_formats_reach_cells() {
        let workbook = WorkbookBuilder::new()
            .styles(styles())
            .sheet(
                SheetBuilder::new("Sheet1")
                    .styled_cell("A1", 1234.5, 1)
                    .styled_cell("B1", 0.256, 2)
                    .typed_cell("C1", 45_000.0, CellType::Number, 3)
                    .cell("D1", 3.0),
            )
            .build();

        let out = render(&workbook);
        let rows = &out[0].rows;
        assert_eq!(cell(rows, "A1").text, "1,234.50");
        assert_eq!(cell(rows, "B1").text, "25.6%");
        assert_eq!(cell(rows, "C1").text, "03-15-23");
        assert_eq!(cell(rows, "D1").text, "3");
    }

    #[test]
    fn test_workbook_date1904_flag_applies() {
        let workbook = WorkbookBuilder::new()
            .styles(styles())
            .date1904()
            .sheet(SheetBuilder::new("Mac").typed_cell("A1", 0.0, CellType::Date, 3))
            .build();

        let out = render(&workbook);
        assert_eq!(cell(&out[0].rows, "A1").text, "01-01-04");
    }

    #[test]
    fn test_shared_string_and_boolean_text() {
        let workbook = WorkbookBuilder::new()
            .shared_strings(&["first", "second"])
            .sheet(
                SheetBuilder::new("Sheet1")
                    .typed_cell("A1", 1.0, CellType::SharedString, 0)
                    .typed_cell("B1", 1.0, CellType::Boolean, 0)
                    .typed_cell("C1", 0.0, CellType::Boolean, 0)
                    .typed_cell("D1", "#DIV/0!", CellType::Error, 0),
            )
            .build();

        let out = render(&workbook);
        let rows = &out[0].rows;
        assert_eq!(cell(rows, "A1").text, "second");
        assert_eq!(cell(rows, "B1").text, "TRUE");
        assert_eq!(cell(rows, "C1").text, "FALSE");
        assert_eq!(cell(rows, "D1").text, "#DIV/0!");
    }
}

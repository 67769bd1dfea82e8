//! Benchmarks for number formatting, color resolution and full sheet rendering.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xlhtml::color::ColorResolver;
use xlhtml::numfmt::{format_number, NumberFormatSpec};
use xlhtml::{
    Cell, CellFormat, CellType, CellValue, CfCondition, CfOperator, CfRule, ColorSpec,
    ConditionalFormatting, Conversion, DifferentialFormat, Fill, Font, PatternType,
    RenderOptions, Sheet, StyleSheet, Workbook,
};

const CODES: [&str; 6] = [
    "General",
    "#,##0.00",
    "0.00%",
    "0.00E+00",
    "yyyy-mm-dd hh:mm:ss",
    "# ?/?",
];

/// Parse-and-format each code from scratch.
fn bench_format_codes(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_number");
    for code in CODES {
        group.bench_with_input(BenchmarkId::from_parameter(code), code, |b, code| {
            b.iter(|| format_number(black_box(45_123.456), black_box(code), false));
        });
    }
    group.finish();
}

/// Format with a spec parsed once, as the renderer does.
fn bench_cached_spec(c: &mut Criterion) {
    let spec = NumberFormatSpec::parse("#,##0.00;[Red](#,##0.00)");
    let values: Vec<CellValue> = (0..1000).map(|i| CellValue::Number(f64::from(i) * -3.7)).collect();

    let mut group = c.benchmark_group("cached_spec");
    group.throughput(Throughput::Elements(values.len() as u64));
    group.bench_function("format_1000", |b| {
        b.iter(|| {
            for value in &values {
                black_box(spec.format(value, false));
            }
        });
    });
    group.finish();
}

fn bench_theme_tints(c: &mut Criterion) {
    let specs: Vec<ColorSpec> = (0..12)
        .flat_map(|slot| [-0.5, -0.25, 0.0, 0.4, 0.8].map(|tint| ColorSpec::theme(slot, tint)))
        .collect();

    c.bench_function("resolve_theme_tints", |b| {
        b.iter(|| {
            let mut colors = ColorResolver::new(None);
            for spec in &specs {
                black_box(colors.resolve(spec));
            }
        });
    });
}

/// A styled sheet with a conditional rule over every cell.
fn synthetic_workbook(rows: u32, cols: u32) -> Workbook {
    let styles = StyleSheet {
        fonts: vec![Font {
            name: Some("Calibri".to_string()),
            size: Some(11.0),
            ..Font::default()
        }],
        fills: vec![Fill::Pattern {
            pattern: PatternType::Solid,
            fg_color: Some(ColorSpec::theme(4, 0.6)),
            bg_color: None,
        }],
        cell_formats: vec![
            CellFormat::default(),
            CellFormat {
                font_id: Some(0),
                fill_id: Some(0),
                num_fmt_id: Some(4),
                ..CellFormat::default()
            },
        ],
        dxfs: vec![DifferentialFormat {
            font: Some(Font {
                bold: Some(true),
                color: Some(ColorSpec::rgb("9C0006")),
                ..Font::default()
            }),
            ..DifferentialFormat::default()
        }],
        ..StyleSheet::default()
    };

    let cells = (0..rows)
        .flat_map(|row| {
            (0..cols).map(move |col| Cell {
                col,
                row,
                value: Some(CellValue::Number(f64::from(row * cols + col) * 1.5)),
                cell_type: CellType::Number,
                style: (row + col) % 2,
            })
        })
        .collect();

    Workbook {
        sheets: vec![Sheet {
            name: "Bench".to_string(),
            cells,
            conditional_formatting: vec![ConditionalFormatting {
                sqref: None,
                rules: vec![CfRule {
                    priority: 1,
                    dxf_id: Some(0),
                    condition: CfCondition::CellIs {
                        operator: CfOperator::GreaterThan,
                        formulas: vec!["500".to_string()],
                    },
                }],
            }],
            ..Sheet::default()
        }],
        styles,
        ..Workbook::default()
    }
}

fn bench_render_sheet(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_sheet");
    for rows in [100u32, 1000] {
        let workbook = synthetic_workbook(rows, 20);
        group.throughput(Throughput::Elements(u64::from(rows) * 20));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &workbook, |b, workbook| {
            b.iter(|| {
                Conversion::new(workbook, RenderOptions::default())
                    .render_all()
                    .expect("render failed")
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_format_codes,
    bench_cached_spec,
    bench_theme_tints,
    bench_render_sheet
);
criterion_main!(benches);

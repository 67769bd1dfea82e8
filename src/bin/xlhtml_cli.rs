//! CLI tool for xlhtml - renders a JSON workbook model to JSON lines
//!
//! Usage:
//!   xlhtml_cli <model.json>                     # Output JSON lines to stdout
//!   xlhtml_cli <model.json> -o out.jsonl        # Output JSON lines to file
//!   xlhtml_cli <model.json> --options opts.json # Override render options

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use xlhtml::{Conversion, JsonLinesSink, RenderOptions, Workbook};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: xlhtml_cli <model.json> [-o output.jsonl] [--options options.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let mut output_path = None;
    let mut options_path = None;
    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        match flag.as_str() {
            "-o" => output_path = rest.next(),
            "--options" => options_path = rest.next(),
            other => {
                eprintln!("Unknown argument: {other}");
                std::process::exit(1);
            }
        }
    }

    let json = match fs::read_to_string(input_path) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error reading {input_path}: {e}");
            std::process::exit(1);
        }
    };

    let workbook = match Workbook::from_json(&json) {
        Ok(wb) => wb,
        Err(e) => {
            eprintln!("Error decoding workbook model: {e}");
            std::process::exit(1);
        }
    };

    let options = match options_path {
        Some(path) => match fs::read_to_string(path)
            .map_err(xlhtml::XlhtmlError::from)
            .and_then(|o| RenderOptions::from_json(&o))
        {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Error reading options {path}: {e}");
                std::process::exit(1);
            }
        },
        None => RenderOptions::default(),
    };

    let out: Box<dyn Write> = match output_path {
        Some(path) => match File::create(path) {
            Ok(f) => Box::new(BufWriter::new(f)),
            Err(e) => {
                eprintln!("Error writing {path}: {e}");
                std::process::exit(1);
            }
        },
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut sink = JsonLinesSink::new(out);
    let mut conversion = Conversion::new(&workbook, options);
    for (index, sheet) in workbook.sheets.iter().enumerate() {
        let result = conversion.render_sheet(index, &mut sink, |p| {
            if p.rows_done % 1000 == 0 || p.rows_done == p.rows_total {
                eprint!("\r{}: {}/{} rows", sheet.name, p.rows_done, p.rows_total);
            }
        });
        if let Err(e) = result {
            eprintln!("\nError rendering {}: {e}", sheet.name);
            std::process::exit(1);
        }
        eprintln!();
    }

    let lines = sink.lines();
    if let Err(e) = sink.into_inner().flush() {
        eprintln!("Error flushing output: {e}");
        std::process::exit(1);
    }
    if let Some(path) = output_path {
        eprintln!("Written: {path} ({lines} lines)");
    }
}

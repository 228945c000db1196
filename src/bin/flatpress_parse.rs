//! flatpress-parse: convert CSV text to JSON or XML
//!
//! Usage:
//!   # CSV with a header row, JSON to stdout
//!   flatpress-parse data.csv
//!
//!   # Typed columns and a comma decimal separator
//!   flatpress-parse --columns id:int,price:decimal --decimal-separator , data.csv
//!
//!   # XML output with custom element names
//!   flatpress-parse --to xml --root-element People --row-element Person data.csv

// Use MiMalloc allocator for better performance
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use flatpress::{
    csv_to_json_string, csv_to_xml, CancellationToken, ColumnSpec, ColumnType,
    IllegalNodeNameAction, Locale, ParseOptions, XmlOptions,
};
use std::io::Read;

#[derive(Parser, Debug)]
#[command(name = "flatpress-parse")]
#[command(about = "Convert CSV text to JSON or XML", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Output format: json or xml
    #[arg(long, default_value = "json")]
    to: String,

    /// Field delimiter (single character, or \t)
    #[arg(long, short = 'd', default_value = ";")]
    delimiter: String,

    /// The input has no header row
    #[arg(long)]
    no_header: bool,

    /// Keep surrounding whitespace in fields
    #[arg(long)]
    no_trim: bool,

    /// Rows to drop from the top before reading
    #[arg(long, default_value_t = 0)]
    skip_rows: usize,

    /// Keep records whose fields are all empty
    #[arg(long)]
    keep_empty_rows: bool,

    /// Replacement for whitespace inside header names
    #[arg(long, default_value = " ")]
    replace_header_whitespace_with: String,

    /// Read missing fields of short records as nulls
    #[arg(long)]
    missing_as_null: bool,

    /// Comma-separated name:type column specs
    /// (types: string, int, long, decimal, double, boolean, datetime, char)
    #[arg(long)]
    columns: Option<String>,

    /// Decimal separator for numeric coercion
    #[arg(long, default_value_t = '.')]
    decimal_separator: char,

    /// XML document element name
    #[arg(long, default_value = "Root")]
    root_element: String,

    /// XML per-record element name
    #[arg(long, default_value = "Row")]
    row_element: String,

    /// Rewrite illegal XML node names instead of failing
    #[arg(long)]
    sanitize_node_names: bool,

    /// Prefix for sanitized names with an illegal first character
    #[arg(long, default_value = "")]
    node_name_prefix: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let text = read_input(args.input.as_deref())?;

    let options = ParseOptions {
        delimiter: parse_delimiter(&args.delimiter)?,
        contains_header_row: !args.no_header,
        trim_fields: !args.no_trim,
        skip_rows_from_top: args.skip_rows,
        skip_empty_rows: !args.keep_empty_rows,
        replace_header_whitespace_with: args.replace_header_whitespace_with,
        treat_missing_fields_as_nulls: args.missing_as_null,
        column_specs: parse_column_specs(args.columns.as_deref())?,
        locale: Locale::with_decimal_separator(args.decimal_separator),
    };

    let cancel = CancellationToken::new();
    match args.to.as_str() {
        "json" => {
            let json = csv_to_json_string(&text, &options, &cancel)?;
            println!("{json}");
        }
        "xml" => {
            let xml_options = XmlOptions {
                root_element: args.root_element,
                row_element: args.row_element,
                illegal_name_action: if args.sanitize_node_names {
                    IllegalNodeNameAction::Sanitize
                } else {
                    IllegalNodeNameAction::Reject
                },
                illegal_name_prefix: args.node_name_prefix,
            };
            let xml = csv_to_xml(&text, &options, &xml_options, &cancel)?;
            println!("{xml}");
        }
        other => bail!("unknown output format: {other}"),
    }

    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    let mut text = String::new();
    match path {
        Some(file) => {
            std::fs::File::open(file)
                .with_context(|| format!("Failed to open {file}"))?
                .read_to_string(&mut text)
                .with_context(|| format!("Failed to read {file}"))?;
        }
        None => {
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
        }
    }
    Ok(text)
}

fn parse_delimiter(raw: &str) -> Result<u8> {
    if raw == "\\t" {
        return Ok(b'\t');
    }
    match raw.as_bytes() {
        [b] => Ok(*b),
        _ => bail!("delimiter must be a single character, got {raw:?}"),
    }
}

fn parse_column_specs(raw: Option<&str>) -> Result<Vec<ColumnSpec>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(|entry| {
            let (name, ty) = entry
                .split_once(':')
                .with_context(|| format!("column spec {entry:?} is not name:type"))?;
            let ty = match ty.trim().to_ascii_lowercase().as_str() {
                "string" => ColumnType::String,
                "int" => ColumnType::Int,
                "long" => ColumnType::Long,
                "decimal" => ColumnType::Decimal,
                "double" => ColumnType::Double,
                "boolean" | "bool" => ColumnType::Boolean,
                "datetime" => ColumnType::DateTime,
                "char" => ColumnType::Char,
                other => bail!("unknown column type: {other}"),
            };
            Ok(ColumnSpec::new(name.trim(), ty))
        })
        .collect()
}

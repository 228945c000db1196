//! flatpress-create: build CSV text from JSON or XML input
//!
//! Usage:
//!   # Read JSON from file, CSV to stdout
//!   flatpress-create data.json
//!
//!   # Read from stdin
//!   echo '[{"a": 1}, {"a": 2}]' | flatpress-create
//!
//!   # XML input, selecting the repeating element
//!   flatpress-create --xml --row-element item feed.xml
//!
//!   # Manual columns instead of automatic discovery
//!   flatpress-create --columns 'user.login,user.mails[0]' data.json

// Use MiMalloc allocator for better performance
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use flatpress::{create, BooleanFormat, CancellationToken, ColumnPath, CreateInput, CsvOptions};
use std::io::Read;

#[derive(Parser, Debug)]
#[command(name = "flatpress-create")]
#[command(about = "Create CSV text from JSON or XML input", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Treat the input as XML instead of JSON
    #[arg(long)]
    xml: bool,

    /// Field delimiter (single character, or \t)
    #[arg(long, short = 'd', default_value = ";")]
    delimiter: String,

    /// Omit the header row
    #[arg(long)]
    no_header: bool,

    /// Never put fields in quotes
    #[arg(long)]
    never_quote: bool,

    /// Cell text for values a record does not contain
    #[arg(long, default_value = "")]
    replace_nulls_with: String,

    /// Boolean rendering: lowercase, pascal or numeric
    #[arg(long, default_value = "lowercase")]
    boolean_format: String,

    /// Comma-separated column paths; skips automatic discovery
    #[arg(long)]
    columns: Option<String>,

    /// XML element treated as one row (defaults to the root's children)
    #[arg(long, requires = "xml")]
    row_element: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let text = read_input(args.input.as_deref())?;

    let manual_columns = args
        .columns
        .as_deref()
        .map(|list| {
            list.split(',')
                .map(|c| c.trim().parse::<ColumnPath>())
                .collect::<flatpress::Result<Vec<_>>>()
        })
        .transpose()
        .context("Failed to parse manual columns")?;

    let options = CsvOptions {
        delimiter: parse_delimiter(&args.delimiter)?,
        include_header_row: !args.no_header,
        never_quote: args.never_quote,
        replace_nulls_with: args.replace_nulls_with,
        boolean_format: parse_boolean_format(&args.boolean_format)?,
        manual_columns,
    };

    let input = if args.xml {
        CreateInput::Xml {
            xml: text,
            row_element: args.row_element,
        }
    } else {
        CreateInput::Json { json: text }
    };

    let csv = create(&input, &options, &CancellationToken::new())?;
    print!("{csv}");
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

fn parse_boolean_format(raw: &str) -> Result<BooleanFormat> {
    match raw {
        "lowercase" => Ok(BooleanFormat::Lowercase),
        "pascal" => Ok(BooleanFormat::PascalCase),
        "numeric" => Ok(BooleanFormat::Numeric),
        other => bail!("unknown boolean format: {other}"),
    }
}

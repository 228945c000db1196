//! CSV parsing into typed tables, with JSON and XML converters.

pub mod coerce;
pub mod to_json;
pub mod to_xml;

pub use coerce::{CellValue, ColumnSpec, ColumnType};
pub use to_xml::{IllegalNodeNameAction, XmlOptions};

use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::locale::Locale;
use csv::{ReaderBuilder, StringRecord, Trim};

/// Configuration for reading CSV text.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Field delimiter byte.
    pub delimiter: u8,

    /// Whether the first (non-skipped) row is a header row.
    pub contains_header_row: bool,

    /// Trim whitespace around every field and header.
    pub trim_fields: bool,

    /// Rows to drop from the top of the text before reading, for inputs with
    /// leading metadata.
    pub skip_rows_from_top: usize,

    /// Drop records whose fields are all empty.
    pub skip_empty_rows: bool,

    /// Replacement for whitespace inside header names. A single space leaves
    /// headers untouched.
    pub replace_header_whitespace_with: String,

    /// Read fields absent from a short record as `Null` instead of failing.
    pub treat_missing_fields_as_nulls: bool,

    /// Optional typed column declarations, in field order. When present they
    /// define the headers and every cell is coerced.
    pub column_specs: Vec<ColumnSpec>,

    /// Locale for numeric coercion.
    pub locale: Locale,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            delimiter: b';',
            contains_header_row: true,
            trim_fields: true,
            skip_rows_from_top: 0,
            skip_empty_rows: true,
            replace_header_whitespace_with: " ".to_string(),
            treat_missing_fields_as_nulls: false,
            column_specs: Vec::new(),
            locale: Locale::INVARIANT,
        }
    }
}

/// A parsed CSV document: header names and typed rows, every row as wide as
/// the header list.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Read CSV text into a [`ParsedCsv`].
pub fn parse(
    csv_text: &str,
    options: &ParseOptions,
    cancel: &CancellationToken,
) -> Result<ParsedCsv> {
    let text = skip_rows(csv_text, options.skip_rows_from_top);

    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.contains_header_row)
        .trim(if options.trim_fields {
            Trim::All
        } else {
            Trim::None
        })
        .flexible(options.treat_missing_fields_as_nulls)
        .from_reader(text.as_bytes());

    if !options.column_specs.is_empty() {
        let headers: Vec<String> = options
            .column_specs
            .iter()
            .map(|spec| spec.name.clone())
            .collect();
        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            cancel.check()?;
            let record = result?;
            if skippable(&record, options) {
                continue;
            }
            let mut cells = Vec::with_capacity(options.column_specs.len());
            for (i, spec) in options.column_specs.iter().enumerate() {
                match record.get(i) {
                    Some(field) => cells.push(coerce::coerce(
                        field,
                        spec,
                        &options.locale,
                        options.treat_missing_fields_as_nulls,
                    )?),
                    None if options.treat_missing_fields_as_nulls => {
                        cells.push(CellValue::Null)
                    }
                    None => return Err(Error::MissingField { record: index, index: i }),
                }
            }
            rows.push(cells);
        }
        return Ok(ParsedCsv { headers, rows });
    }

    if options.contains_header_row {
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| rename_header(h, options))
            .collect();
        let rows = read_text_rows(&mut reader, headers.len(), options, cancel)?;
        return Ok(ParsedCsv { headers, rows });
    }

    // No header row and no specs: the first record names the column count
    // and is itself data.
    let mut records = reader.records();
    let first = match records.next() {
        Some(result) => result?,
        None => return Err(Error::EmptyInput),
    };
    let headers: Vec<String> = (0..first.len()).map(|i| i.to_string()).collect();
    let mut rows = Vec::new();
    if !skippable(&first, options) {
        rows.push(text_cells(&first, headers.len(), options)?);
    }
    for result in records {
        cancel.check()?;
        let record = result?;
        if skippable(&record, options) {
            continue;
        }
        rows.push(text_cells(&record, headers.len(), options)?);
    }
    Ok(ParsedCsv { headers, rows })
}

fn read_text_rows(
    reader: &mut csv::Reader<&[u8]>,
    width: usize,
    options: &ParseOptions,
    cancel: &CancellationToken,
) -> Result<Vec<Vec<CellValue>>> {
    let mut rows = Vec::new();
    for result in reader.records() {
        cancel.check()?;
        let record = result?;
        if skippable(&record, options) {
            continue;
        }
        rows.push(text_cells(&record, width, options)?);
    }
    Ok(rows)
}

fn text_cells(
    record: &StringRecord,
    width: usize,
    options: &ParseOptions,
) -> Result<Vec<CellValue>> {
    let mut cells = Vec::with_capacity(width);
    for i in 0..width {
        match record.get(i) {
            Some(field) => cells.push(CellValue::Text(field.to_string())),
            None if options.treat_missing_fields_as_nulls => cells.push(CellValue::Null),
            None => {
                return Err(Error::MissingField {
                    record: record.position().map(|p| p.record() as usize).unwrap_or(0),
                    index: i,
                })
            }
        }
    }
    Ok(cells)
}

fn skippable(record: &StringRecord, options: &ParseOptions) -> bool {
    options.skip_empty_rows && record.iter().all(str::is_empty)
}

fn rename_header(header: &str, options: &ParseOptions) -> String {
    if options.replace_header_whitespace_with == " " {
        header.to_string()
    } else {
        header.replace(' ', &options.replace_header_whitespace_with)
    }
}

fn skip_rows(text: &str, count: usize) -> &str {
    let mut rest = text;
    for _ in 0..count {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}

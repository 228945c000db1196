//! CSV creation from tabular rows, JSON text or XML text.

pub mod xml;

use crate::cancel::CancellationToken;
use crate::error::Result;
use crate::flatten;
use crate::options::CsvOptions;
use csv::{QuoteStyle, WriterBuilder};
use serde_json::Value;

/// Source data for one CSV creation call.
#[derive(Debug, Clone)]
pub enum CreateInput {
    /// Pre-tabulated data: headers plus rows of loosely-typed cells, in
    /// matching order.
    Rows {
        headers: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    /// JSON text; an array of objects, or a single object treated as a
    /// one-record array. Runs the flattening pipeline.
    Json { json: String },
    /// XML text. `row_element` selects the repeating element by local name;
    /// when absent, the root's children are the rows.
    Xml {
        xml: String,
        row_element: Option<String>,
    },
}

/// Produce CSV text from any [`CreateInput`].
pub fn create(
    input: &CreateInput,
    options: &CsvOptions,
    cancel: &CancellationToken,
) -> Result<String> {
    match input {
        CreateInput::Rows { headers, rows } => rows_to_csv(headers, rows, options, cancel),
        CreateInput::Json { json } => json_to_csv(json, options, cancel),
        CreateInput::Xml { xml, row_element } => {
            xml::xml_to_csv(xml, row_element.as_deref(), options, cancel)
        }
    }
}

/// The flattening pipeline: read records, discover (or accept) the column
/// list, project every record, emit.
fn json_to_csv(json: &str, options: &CsvOptions, cancel: &CancellationToken) -> Result<String> {
    let records = flatten::read_records(json)?;
    let columns = flatten::discover(&records, options, cancel)?;
    let rows = flatten::project_rows(&records, &columns, options, cancel)?;
    flatten::emit(&columns, rows, options, cancel)
}

fn rows_to_csv(
    headers: &[String],
    rows: &[Vec<Value>],
    options: &CsvOptions,
    cancel: &CancellationToken,
) -> Result<String> {
    let mut buf = Vec::new();
    {
        let mut writer = WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote_style(if options.never_quote {
                QuoteStyle::Never
            } else {
                QuoteStyle::Necessary
            })
            .flexible(true)
            .from_writer(&mut buf);

        if options.include_header_row && !headers.is_empty() {
            writer.write_record(headers)?;
        }

        for row in rows {
            cancel.check()?;
            writer.write_record(row.iter().map(|cell| render_cell(cell, options)))?;
        }
        writer.flush().map_err(csv::Error::from)?;
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Render one loosely-typed cell. Unlike projection, a null cell here means
/// "no value was supplied" and takes the configured replacement.
fn render_cell(cell: &Value, options: &CsvOptions) -> String {
    match cell {
        Value::Null => options.replace_nulls_with.clone(),
        Value::Bool(b) => options.boolean_format.render(*b).to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

//! Delimited-text emission.
//!
//! This layer supplies field values and record boundaries; the delimiter,
//! quoting and line endings belong to the underlying writer. The
//! `never_quote` switch bypasses the writer's quoting decision entirely.

use crate::cancel::CancellationToken;
use crate::error::Result;
use crate::flatten::path::ColumnPath;
use crate::options::CsvOptions;
use csv::{QuoteStyle, WriterBuilder};

/// Render the final delimited text for a column list and its value rows.
pub fn emit<I>(
    columns: &[ColumnPath],
    rows: I,
    options: &CsvOptions,
    cancel: &CancellationToken,
) -> Result<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut buf = Vec::new();
    {
        let mut writer = WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote_style(if options.never_quote {
                QuoteStyle::Never
            } else {
                QuoteStyle::Necessary
            })
            .from_writer(&mut buf);

        if options.include_header_row && !columns.is_empty() {
            writer.write_record(columns.iter().map(ColumnPath::to_string))?;
        }

        for row in rows {
            cancel.check()?;
            writer.write_record(&row)?;
        }
        writer.flush().map_err(csv::Error::from)?;
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn columns(names: &[&str]) -> Vec<ColumnPath> {
        names.iter().map(|n| n.parse().unwrap()).collect()
    }

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_header_and_rows() {
        let out = emit(
            &columns(&["cool", "what"]),
            rows(&[&["nice", "no"], &["not", "yes"]]),
            &CsvOptions::default(),
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(out, "cool;what\nnice;no\nnot;yes\n");
    }

    #[test]
    fn test_header_suppressed() {
        let options = CsvOptions {
            include_header_row: false,
            ..CsvOptions::default()
        };
        let out = emit(
            &columns(&["a", "b"]),
            rows(&[&["1", "2"]]),
            &options,
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(out, "1;2\n");
    }

    #[test]
    fn test_delimiter_inside_field_is_quoted() {
        let out = emit(
            &columns(&["a", "b"]),
            rows(&[&["x;y", "z"]]),
            &CsvOptions::default(),
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(out, "a;b\n\"x;y\";z\n");
    }

    #[test]
    fn test_never_quote_bypasses_quoting() {
        let options = CsvOptions {
            never_quote: true,
            ..CsvOptions::default()
        };
        let out = emit(
            &columns(&["a", "b"]),
            rows(&[&["x;y", "z"]]),
            &options,
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(out, "a;b\nx;y;z\n");
    }

    #[test]
    fn test_custom_delimiter() {
        let options = CsvOptions {
            delimiter: b',',
            ..CsvOptions::default()
        };
        let out = emit(
            &columns(&["a", "b"]),
            rows(&[&["1", "2"]]),
            &options,
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(out, "a,b\n1,2\n");
    }

    #[test]
    fn test_cancellation_between_rows() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = emit(
            &columns(&["a"]),
            rows(&[&["1"]]),
            &CsvOptions::default(),
            &cancel,
        );
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}

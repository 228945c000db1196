//! Configuration for CSV output.

use crate::flatten::ColumnPath;

/// String representation used for boolean leaves in CSV cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanFormat {
    /// `true` / `false`
    #[default]
    Lowercase,
    /// `True` / `False`
    PascalCase,
    /// `1` / `0`
    Numeric,
}

impl BooleanFormat {
    pub fn render(&self, value: bool) -> &'static str {
        match (self, value) {
            (BooleanFormat::Lowercase, true) => "true",
            (BooleanFormat::Lowercase, false) => "false",
            (BooleanFormat::PascalCase, true) => "True",
            (BooleanFormat::PascalCase, false) => "False",
            (BooleanFormat::Numeric, true) => "1",
            (BooleanFormat::Numeric, false) => "0",
        }
    }
}

/// Configuration for producing CSV text.
///
/// One instance is threaded through discovery, projection and emission so
/// the three stages cannot disagree on rendering rules.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter byte.
    pub delimiter: u8,

    /// Whether the header line is written.
    pub include_header_row: bool,

    /// When set, no field is ever quoted, regardless of its content.
    pub never_quote: bool,

    /// Cell text substituted when a column's path does not exist in a record.
    pub replace_nulls_with: String,

    /// Rendering of boolean leaves.
    pub boolean_format: BooleanFormat,

    /// Caller-supplied column list. When present, discovery is skipped and
    /// the list is used verbatim; an empty list is an error.
    pub manual_columns: Option<Vec<ColumnPath>>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b';',
            include_header_row: true,
            never_quote: false,
            replace_nulls_with: String::new(),
            boolean_format: BooleanFormat::default(),
            manual_columns: None,
        }
    }
}

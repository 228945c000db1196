//! # Flatpress - delimited-text conversion toolkit
//!
//! A unified library for flattening nested JSON into CSV tables and for
//! converting CSV to typed tables, JSON and XML.
//!
//! ## Modules
//!
//! - **flatten**: discover columns across nested records, project value rows,
//!   emit delimited text
//! - **create**: build CSV text from tabular rows, JSON or XML input
//! - **parse**: read CSV text into typed cells, with JSON and XML output
//!
//! ## Quick Start
//!
//! ### JSON to CSV
//!
//! ```rust
//! use flatpress::{create, CancellationToken, CreateInput, CsvOptions};
//!
//! # fn main() -> flatpress::Result<()> {
//! let input = CreateInput::Json {
//!     json: r#"[{"cool":"nice","what":"no"},{"cool":"not","what":"yes"}]"#.to_string(),
//! };
//!
//! let csv = create(&input, &CsvOptions::default(), &CancellationToken::new())?;
//! assert_eq!(csv, "cool;what\nnice;no\nnot;yes\n");
//! # Ok(())
//! # }
//! ```
//!
//! ### CSV to JSON
//!
//! ```rust
//! use flatpress::{csv_to_json, CancellationToken, ParseOptions};
//!
//! # fn main() -> flatpress::Result<()> {
//! let json = csv_to_json("a;b\n1;2\n", &ParseOptions::default(), &CancellationToken::new())?;
//! assert_eq!(json[0]["a"], "1");
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod create;
pub mod error;
pub mod flatten;
pub mod locale;
pub mod options;
pub mod parse;

// Re-export commonly used types for convenience
pub use cancel::CancellationToken;
pub use create::{create, CreateInput};
pub use error::{Error, Result};
pub use flatten::{ColumnPath, Segment};
pub use locale::Locale;
pub use options::{BooleanFormat, CsvOptions};
pub use parse::{
    parse, CellValue, ColumnSpec, ColumnType, IllegalNodeNameAction, ParseOptions, ParsedCsv,
    XmlOptions,
};

use serde_json::Value;

/// Parse CSV text and render it as a JSON array of objects.
pub fn csv_to_json(
    csv_text: &str,
    options: &ParseOptions,
    cancel: &CancellationToken,
) -> Result<Value> {
    Ok(parse::parse(csv_text, options, cancel)?.to_json())
}

/// Parse CSV text and render it as pretty-printed JSON text.
pub fn csv_to_json_string(
    csv_text: &str,
    options: &ParseOptions,
    cancel: &CancellationToken,
) -> Result<String> {
    parse::parse(csv_text, options, cancel)?.to_json_string()
}

/// Parse CSV text and render it as an XML document.
pub fn csv_to_xml(
    csv_text: &str,
    options: &ParseOptions,
    xml_options: &XmlOptions,
    cancel: &CancellationToken,
) -> Result<String> {
    parse::parse(csv_text, options, cancel)?.to_xml(xml_options)
}

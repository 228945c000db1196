//! JSON flattening - turn nested records into flat, tabular rows.
//!
//! The pipeline has three independent stages sharing one contract, the
//! ordered column list:
//!
//! 1. [`discover`] walks every record and computes the column list,
//!    harmonizing arrays of different lengths across records.
//! 2. [`project`] re-walks one record and extracts exactly one cell per
//!    column, marking paths the record does not populate.
//! 3. [`emit`] renders the header and value rows as delimited text.
//!
//! Discovery and projection traverse records with the same path rules, so a
//! column discovered from one record resolves identically in every other.

pub mod discover;
pub mod emit;
pub mod path;
pub mod project;
pub mod source;

pub use discover::discover;
pub use emit::emit;
pub use path::{ColumnPath, Segment};
pub use project::{project, project_rows};
pub use source::read_records;

//! Error types shared by every conversion in the crate.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the boundary of a conversion call.
///
/// The library itself never logs and never retries; a conversion either
/// produces its full output or returns one of these.
#[derive(Debug, Error)]
pub enum Error {
    /// Input text is not parseable, or its root has an unusable shape.
    #[error("malformed input: {message}")]
    MalformedInput {
        /// Parser diagnostic, including position when the parser provides one.
        message: String,
    },

    /// Manual column mode was requested with no columns supplied.
    #[error("manual columns are specified but no columns are provided")]
    MissingColumnSpec,

    /// Cooperative cancellation was observed; no partial output exists.
    #[error("operation cancelled")]
    Cancelled,

    /// A CSV document with no header row must still contain at least one record.
    #[error("CSV input can not be empty")]
    EmptyInput,

    /// A record is shorter than the column set and missing fields are not
    /// configured to read as nulls.
    #[error("record {record} has no field at index {index}")]
    MissingField {
        /// Zero-based data record number.
        record: usize,
        /// Zero-based field index that was absent.
        index: usize,
    },

    /// A field value could not be coerced to its column's declared type.
    #[error("cannot read {value:?} as {ty} (column {column:?})")]
    Coerce {
        /// Offending field text.
        value: String,
        /// Target type name, e.g. "Decimal".
        ty: &'static str,
        /// Column name from the specification.
        column: String,
    },

    /// A header produced an XML node name the configured policy rejects.
    #[error("illegal node name {name:?}: {reason}")]
    IllegalNodeName {
        /// The node name as derived from the header.
        name: String,
        /// What made it illegal.
        reason: String,
    },

    /// JSON serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Delimited-text reader or writer failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// XML reader or writer failure.
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedInput {
            message: message.into(),
        }
    }
}

//! Field coercion to typed cells.

use crate::error::{Error, Result};
use crate::locale::Locale;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Target type for one declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Int,
    Long,
    Decimal,
    Double,
    Boolean,
    DateTime,
    Char,
}

impl ColumnType {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::String => "String",
            ColumnType::Int => "Int",
            ColumnType::Long => "Long",
            ColumnType::Decimal => "Decimal",
            ColumnType::Double => "Double",
            ColumnType::Boolean => "Boolean",
            ColumnType::DateTime => "DateTime",
            ColumnType::Char => "Char",
        }
    }
}

/// A column declaration: output name plus target type, in field order.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: String,
    pub ty: ColumnType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        ColumnSpec {
            name: name.into(),
            ty,
        }
    }
}

/// One parsed CSV cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Text(String),
    Int(i32),
    Long(i64),
    Decimal(Decimal),
    Double(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Char(char),
}

impl CellValue {
    /// Plain-text rendering, used for XML element content.
    pub fn render_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Int(v) => v.to_string(),
            CellValue::Long(v) => v.to_string(),
            CellValue::Decimal(v) => v.to_string(),
            CellValue::Double(v) => v.to_string(),
            CellValue::Bool(v) => v.to_string(),
            CellValue::DateTime(v) => v.format("%Y-%m-%dT%H:%M:%S").to_string(),
            CellValue::Char(v) => v.to_string(),
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d.%m.%Y %H:%M:%S",
];

/// Coerce one field to its column's declared type.
///
/// An empty field for a non-String column reads as `Null` when
/// `empty_as_null` is set; String columns keep the empty text either way.
pub fn coerce(
    field: &str,
    spec: &ColumnSpec,
    locale: &Locale,
    empty_as_null: bool,
) -> Result<CellValue> {
    if field.is_empty() && spec.ty != ColumnType::String {
        if empty_as_null {
            return Ok(CellValue::Null);
        }
        return Err(coerce_error(field, spec));
    }

    match spec.ty {
        ColumnType::String => Ok(CellValue::Text(field.to_string())),
        ColumnType::Int => field
            .parse::<i32>()
            .map(CellValue::Int)
            .map_err(|_| coerce_error(field, spec)),
        ColumnType::Long => field
            .parse::<i64>()
            .map(CellValue::Long)
            .map_err(|_| coerce_error(field, spec)),
        ColumnType::Decimal => locale
            .normalize_number(field)
            .and_then(|n| Decimal::from_str(&n).ok())
            .map(CellValue::Decimal)
            .ok_or_else(|| coerce_error(field, spec)),
        ColumnType::Double => locale
            .normalize_number(field)
            .and_then(|n| n.parse::<f64>().ok())
            .map(CellValue::Double)
            .ok_or_else(|| coerce_error(field, spec)),
        ColumnType::Boolean => {
            if field.eq_ignore_ascii_case("true") {
                Ok(CellValue::Bool(true))
            } else if field.eq_ignore_ascii_case("false") {
                Ok(CellValue::Bool(false))
            } else {
                Err(coerce_error(field, spec))
            }
        }
        ColumnType::DateTime => parse_datetime(field).ok_or_else(|| coerce_error(field, spec)),
        ColumnType::Char => {
            let mut chars = field.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(CellValue::Char(c)),
                _ => Err(coerce_error(field, spec)),
            }
        }
    }
}

fn parse_datetime(field: &str) -> Option<CellValue> {
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(field, format) {
            return Some(CellValue::DateTime(dt));
        }
    }
    // Bare dates read as midnight.
    NaiveDate::parse_from_str(field, "%Y-%m-%d")
        .ok()
        .map(|d| CellValue::DateTime(d.and_hms_opt(0, 0, 0).unwrap_or_default()))
}

fn coerce_error(field: &str, spec: &ColumnSpec) -> Error {
    Error::Coerce {
        value: field.to_string(),
        ty: spec.ty.name(),
        column: spec.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(ty: ColumnType) -> ColumnSpec {
        ColumnSpec::new("col", ty)
    }

    fn coerce_invariant(field: &str, ty: ColumnType) -> Result<CellValue> {
        coerce(field, &spec(ty), &Locale::INVARIANT, false)
    }

    #[test]
    fn test_int_and_long() {
        assert_eq!(
            coerce_invariant("42", ColumnType::Int).unwrap(),
            CellValue::Int(42)
        );
        assert_eq!(
            coerce_invariant("-9000000000", ColumnType::Long).unwrap(),
            CellValue::Long(-9000000000)
        );
        assert!(coerce_invariant("4.2", ColumnType::Int).is_err());
    }

    #[test]
    fn test_decimal_keeps_digits() {
        let CellValue::Decimal(d) =
            coerce_invariant("1.00000000000001", ColumnType::Decimal).unwrap()
        else {
            panic!("expected decimal");
        };
        assert_eq!(d.to_string(), "1.00000000000001");
    }

    #[test]
    fn test_decimal_with_comma_locale() {
        let fi = Locale::with_decimal_separator(',');
        let result = coerce("12,5", &spec(ColumnType::Decimal), &fi, false).unwrap();
        assert_eq!(result, CellValue::Decimal(Decimal::from_str("12.5").unwrap()));

        // An invariant-formatted value is not silently accepted by a comma locale.
        assert!(coerce("12.5", &spec(ColumnType::Decimal), &fi, false).is_err());
    }

    #[test]
    fn test_boolean_case_insensitive() {
        assert_eq!(
            coerce_invariant("TRUE", ColumnType::Boolean).unwrap(),
            CellValue::Bool(true)
        );
        assert!(coerce_invariant("1", ColumnType::Boolean).is_err());
    }

    #[test]
    fn test_datetime_formats() {
        for field in [
            "2023-02-08T12:30:00",
            "2023-02-08 12:30:00",
            "2023-02-08",
        ] {
            assert!(
                matches!(
                    coerce_invariant(field, ColumnType::DateTime),
                    Ok(CellValue::DateTime(_))
                ),
                "failed on {field}"
            );
        }
        assert!(coerce_invariant("yesterday", ColumnType::DateTime).is_err());
    }

    #[test]
    fn test_char_requires_single_char() {
        assert_eq!(
            coerce_invariant("x", ColumnType::Char).unwrap(),
            CellValue::Char('x')
        );
        assert!(coerce_invariant("xy", ColumnType::Char).is_err());
    }

    #[test]
    fn test_empty_field_policy() {
        assert_eq!(
            coerce("", &spec(ColumnType::Int), &Locale::INVARIANT, true).unwrap(),
            CellValue::Null
        );
        assert!(coerce("", &spec(ColumnType::Int), &Locale::INVARIANT, false).is_err());

        // String columns keep the empty text regardless of the flag.
        assert_eq!(
            coerce("", &spec(ColumnType::String), &Locale::INVARIANT, true).unwrap(),
            CellValue::Text(String::new())
        );
    }

    #[test]
    fn test_coerce_error_names_column() {
        let err = coerce("abc", &ColumnSpec::new("age", ColumnType::Int), &Locale::INVARIANT, false)
            .unwrap_err();
        assert!(err.to_string().contains("age"));
    }
}

//! Permissive JSON record reading.
//!
//! Input text is accepted with trailing commas before `]` / `}`, numbers are
//! kept as their exact source text, and object member order is preserved.
//! A root object is treated as a one-record sequence; a root array
//! contributes its object elements.

use crate::error::{Error, Result};
use serde_json::Value;

/// Parse input text into the record sequence the flattening core consumes.
///
/// Non-object elements of a root array are skipped. A root that is neither
/// an object nor an array is malformed.
pub fn read_records(json: &str) -> Result<Vec<Value>> {
    let cleaned = strip_trailing_commas(json);
    let root: Value =
        serde_json::from_str(&cleaned).map_err(|e| Error::malformed(e.to_string()))?;

    match root {
        Value::Object(_) => Ok(vec![root]),
        Value::Array(items) => Ok(items.into_iter().filter(Value::is_object).collect()),
        _ => Err(Error::malformed(
            "expected a JSON array or JSON object at the root",
        )),
    }
}

/// Drop commas that directly precede a closing bracket or brace, outside of
/// string literals.
fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in input.char_indices() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            ',' => {
                let rest = input[i + ch.len_utf8()..].trim_start();
                if !(rest.starts_with(']') || rest.starts_with('}')) {
                    out.push(ch);
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_root() {
        let records = read_records(r#"[{"a": 1}, {"a": 2}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], json!({"a": 2}));
    }

    #[test]
    fn test_object_root_becomes_single_record() {
        let records = read_records(r#"{"a": 1}"#).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_scalar_root_rejected() {
        assert!(matches!(
            read_records("42"),
            Err(Error::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_invalid_syntax_reports_position() {
        let err = read_records(r#"[{"a": }]"#).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("column"), "got: {message}");
    }

    #[test]
    fn test_non_object_array_elements_skipped() {
        let records = read_records(r#"[{"a": 1}, 5, "x", {"a": 2}]"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_trailing_commas_tolerated() {
        let records = read_records("[{\"a\": 1,}, {\"a\": 2},\n]").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_trailing_comma_strip_is_string_aware() {
        let records = read_records(r#"[{"a": "x,}"}]"#).unwrap();
        assert_eq!(records[0], json!({"a": "x,}"}));
    }

    #[test]
    fn test_numbers_keep_source_text() {
        let records =
            read_records(r#"[{"v": 0.000000000000000000000000000000001}]"#).unwrap();
        let Value::Number(n) = &records[0]["v"] else {
            panic!("expected number");
        };
        assert_eq!(n.to_string(), "0.000000000000000000000000000000001");
    }

    #[test]
    fn test_field_order_preserved() {
        let records = read_records(r#"[{"z": 1, "a": 2, "m": 3}]"#).unwrap();
        let Value::Object(map) = &records[0] else {
            panic!("expected object");
        };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}

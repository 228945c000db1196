//! Row projection against a fixed column list.
//!
//! Projection is a pure function of one record and the finalized column
//! list; it never consults discovery state, so records project independently
//! of each other.

use crate::cancel::CancellationToken;
use crate::error::Result;
use crate::flatten::path::{ColumnPath, Segment};
use crate::options::CsvOptions;
use serde_json::Value;

/// Extract one value row for a record.
///
/// The result always has exactly `columns.len()` cells. A path that does not
/// resolve to a leaf in this record — absent key, out-of-range index, or a
/// container where a leaf was expected — renders the configured
/// missing-value marker. An explicit JSON null renders as the empty string,
/// which is deliberately distinct from missing.
pub fn project(record: &Value, columns: &[ColumnPath], options: &CsvOptions) -> Vec<String> {
    columns
        .iter()
        .map(|column| match resolve(record, column) {
            Some(Value::Null) => String::new(),
            Some(Value::Bool(b)) => options.boolean_format.render(*b).to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Object(_)) | Some(Value::Array(_)) | None => {
                options.replace_nulls_with.clone()
            }
        })
        .collect()
}

/// Project every record, checking for cancellation before each one.
pub fn project_rows(
    records: &[Value],
    columns: &[ColumnPath],
    options: &CsvOptions,
    cancel: &CancellationToken,
) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        cancel.check()?;
        rows.push(project(record, columns, options));
    }
    Ok(rows)
}

fn resolve<'a>(record: &'a Value, path: &ColumnPath) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.segments() {
        current = match (segment, current) {
            (Segment::Field(name), Value::Object(map)) => map.get(name)?,
            (Segment::Index(i), Value::Array(items)) => items.get(*i)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::options::BooleanFormat;
    use serde_json::json;

    fn columns(names: &[&str]) -> Vec<ColumnPath> {
        names.iter().map(|n| n.parse().unwrap()).collect()
    }

    #[test]
    fn test_row_width_matches_column_count() {
        let cols = columns(&["a", "b.c", "d[3]"]);
        let row = project(&json!({"a": 1}), &cols, &CsvOptions::default());
        assert_eq!(row.len(), cols.len());
    }

    #[test]
    fn test_null_renders_empty_missing_renders_marker() {
        let options = CsvOptions {
            replace_nulls_with: "N/A".to_string(),
            ..CsvOptions::default()
        };
        let cols = columns(&["a"]);

        let with_null = project(&json!({"a": null}), &cols, &options);
        assert_eq!(with_null, [""]);

        let without_key = project(&json!({}), &cols, &options);
        assert_eq!(without_key, ["N/A"]);
    }

    #[test]
    fn test_numbers_render_verbatim() {
        let record: Value =
            serde_json::from_str(r#"{"v": 0.000000000000000000000000000000001}"#).unwrap();
        let row = project(&record, &columns(&["v"]), &CsvOptions::default());
        assert_eq!(row, ["0.000000000000000000000000000000001"]);
    }

    #[test]
    fn test_boolean_formats() {
        let record = json!({"ok": true, "bad": false});
        let cols = columns(&["ok", "bad"]);

        let lower = project(&record, &cols, &CsvOptions::default());
        assert_eq!(lower, ["true", "false"]);

        let pascal = CsvOptions {
            boolean_format: BooleanFormat::PascalCase,
            ..CsvOptions::default()
        };
        assert_eq!(project(&record, &cols, &pascal), ["True", "False"]);

        let numeric = CsvOptions {
            boolean_format: BooleanFormat::Numeric,
            ..CsvOptions::default()
        };
        assert_eq!(project(&record, &cols, &numeric), ["1", "0"]);
    }

    #[test]
    fn test_array_and_nested_resolution() {
        let record = json!({"user": {"mails": ["a@x", "b@x"]}});
        let cols = columns(&["user.mails[0]", "user.mails[1]", "user.mails[2]"]);
        let options = CsvOptions {
            replace_nulls_with: "-".to_string(),
            ..CsvOptions::default()
        };
        assert_eq!(project(&record, &cols, &options), ["a@x", "b@x", "-"]);
    }

    #[test]
    fn test_container_resolution_renders_marker() {
        let record = json!({"user": {"name": "u"}});
        let options = CsvOptions {
            replace_nulls_with: "?".to_string(),
            ..CsvOptions::default()
        };
        assert_eq!(project(&record, &columns(&["user"]), &options), ["?"]);
    }

    #[test]
    fn test_widened_projection() {
        let options = CsvOptions {
            replace_nulls_with: "<missing>".to_string(),
            ..CsvOptions::default()
        };
        let cols = columns(&["r[0]", "r[1]"]);
        let row = project(&json!({"r": ["x"]}), &cols, &options);
        assert_eq!(row, ["x", "<missing>"]);
    }

    #[test]
    fn test_project_rows_checks_cancellation() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = project_rows(
            &[json!({"a": 1})],
            &columns(&["a"]),
            &CsvOptions::default(),
            &cancel,
        );
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}

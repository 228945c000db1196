//! Parsed-CSV to JSON conversion.

use crate::error::Result;
use crate::parse::coerce::CellValue;
use crate::parse::ParsedCsv;
use serde_json::{Map, Number, Value};
use std::str::FromStr;

impl ParsedCsv {
    /// Render the table as a JSON array of objects, one member per header.
    pub fn to_json(&self) -> Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut object = Map::new();
                for (i, header) in self.headers.iter().enumerate() {
                    let cell = row.get(i).unwrap_or(&CellValue::Null);
                    object.insert(header.clone(), cell_to_value(cell));
                }
                Value::Object(object)
            })
            .collect();
        Value::Array(rows)
    }

    /// Pretty-printed form of [`ParsedCsv::to_json`].
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }
}

fn cell_to_value(cell: &CellValue) -> Value {
    match cell {
        CellValue::Null => Value::Null,
        CellValue::Text(s) => Value::String(s.clone()),
        CellValue::Int(v) => Value::Number((*v).into()),
        CellValue::Long(v) => Value::Number((*v).into()),
        // The decimal's own text keeps every digit; reparsing it as an
        // arbitrary-precision JSON number cannot fail, but fall back to a
        // string rather than panic.
        CellValue::Decimal(d) => {
            let text = d.to_string();
            Number::from_str(&text)
                .map(Value::Number)
                .unwrap_or(Value::String(text))
        }
        CellValue::Double(v) => Number::from_f64(*v)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        CellValue::Bool(v) => Value::Bool(*v),
        CellValue::DateTime(v) => Value::String(v.format("%Y-%m-%dT%H:%M:%S").to_string()),
        CellValue::Char(v) => Value::String(v.to_string()),
    }
}

//! Column discovery across a record sequence.
//!
//! Discovery walks every record and produces the ordered, duplicate-free
//! column list a header row must contain. Arrays of differing lengths at the
//! same logical position are harmonized: the list covers the widest array
//! seen anywhere, and the columns of one logical array stay contiguous no
//! matter which record contributed which index.

use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::flatten::path::ColumnPath;
use crate::options::CsvOptions;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Maximum element count observed per array container path, across all
/// records of one discovery pass.
type ArrayWidthTable = HashMap<ColumnPath, usize>;

/// Compute the ordered column list for a record sequence.
///
/// When `options.manual_columns` is set the supplied list is returned
/// verbatim without looking at the data; an empty manual list is an error.
/// Runs two traversals: one to size every array, one to collect and merge
/// each record's candidate columns. Deterministic for a given input.
pub fn discover(
    records: &[Value],
    options: &CsvOptions,
    cancel: &CancellationToken,
) -> Result<Vec<ColumnPath>> {
    if let Some(manual) = &options.manual_columns {
        if manual.is_empty() {
            return Err(Error::MissingColumnSpec);
        }
        return Ok(manual.clone());
    }

    let widths = measure_array_widths(records, cancel)?;

    let mut columns: Vec<ColumnPath> = Vec::new();
    let mut seen: HashSet<ColumnPath> = HashSet::new();
    let mut candidates = Vec::new();

    for record in records {
        cancel.check()?;
        if let Value::Object(map) = record {
            collect_object(map, &ColumnPath::root(), &widths, &mut candidates);
        }
        merge(&mut columns, &mut seen, candidates.drain(..));
    }

    Ok(columns)
}

fn measure_array_widths(
    records: &[Value],
    cancel: &CancellationToken,
) -> Result<ArrayWidthTable> {
    let mut widths = ArrayWidthTable::new();
    for record in records {
        cancel.check()?;
        if let Value::Object(map) = record {
            measure_object(map, &ColumnPath::root(), &mut widths);
        }
    }
    Ok(widths)
}

fn measure_object(map: &Map<String, Value>, path: &ColumnPath, widths: &mut ArrayWidthTable) {
    for (key, value) in map {
        let child = path.field(key);
        match value {
            Value::Object(inner) => measure_object(inner, &child, widths),
            Value::Array(items) => measure_array(items, &child, widths),
            _ => {}
        }
    }
}

fn measure_array(items: &[Value], path: &ColumnPath, widths: &mut ArrayWidthTable) {
    let entry = widths.entry(path.clone()).or_insert(0);
    if items.len() > *entry {
        *entry = items.len();
    }
    for (i, item) in items.iter().enumerate() {
        let element = path.index(i);
        match item {
            Value::Object(inner) => measure_object(inner, &element, widths),
            Value::Array(inner) => measure_array(inner, &element, widths),
            _ => {}
        }
    }
}

/// Collect one record's candidate columns in first-seen order.
fn collect_object(
    map: &Map<String, Value>,
    path: &ColumnPath,
    widths: &ArrayWidthTable,
    out: &mut Vec<ColumnPath>,
) {
    for (key, value) in map {
        let child = path.field(key);
        match value {
            Value::Object(inner) => collect_object(inner, &child, widths, out),
            Value::Array(items) => collect_array(items, &child, widths, out),
            // A null standing where another record has an array claims index
            // 0 of that array; it never widens it.
            Value::Null if widths.contains_key(&child) => out.push(child.with_index_zero()),
            _ => out.push(child),
        }
    }
}

fn collect_array(
    items: &[Value],
    path: &ColumnPath,
    widths: &ArrayWidthTable,
    out: &mut Vec<ColumnPath>,
) {
    for (i, item) in items.iter().enumerate() {
        let element = path.index(i);
        match item {
            Value::Object(inner) => collect_object(inner, &element, widths, out),
            Value::Array(inner) => collect_array(inner, &element, widths, out),
            _ => out.push(element),
        }
    }
    // Placeholders up to the widest sibling array keep one logical array's
    // columns contiguous in the merged list.
    if let Some(&limit) = widths.get(path) {
        for i in items.len()..limit {
            out.push(path.index(i));
        }
    }
}

/// Merge one record's candidates into the global ordered list.
///
/// A candidate already present, or whose `[0]`-widened form is present, is
/// dropped. A new scalar-array column is inserted directly after its
/// previous sibling when that sibling is already placed; everything else
/// appends.
fn merge(
    columns: &mut Vec<ColumnPath>,
    seen: &mut HashSet<ColumnPath>,
    candidates: impl Iterator<Item = ColumnPath>,
) {
    for candidate in candidates {
        if seen.contains(&candidate) || seen.contains(&candidate.with_index_zero()) {
            continue;
        }
        let position = candidate
            .previous_sibling()
            .filter(|prev| seen.contains(prev))
            .and_then(|prev| columns.iter().position(|c| *c == prev));
        seen.insert(candidate.clone());
        match position {
            Some(pos) => columns.insert(pos + 1, candidate),
            None => columns.push(candidate),
        }
    }
}

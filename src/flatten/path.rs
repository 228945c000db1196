//! Structured addresses for flattened columns.
//!
//! A [`ColumnPath`] names one leaf position inside a nested JSON record as a
//! sequence of typed segments instead of a dotted string, so discovery can
//! compute sibling positions without string surgery.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// One step of a column path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object member lookup by key.
    Field(String),
    /// Array element lookup by position.
    Index(usize),
}

/// Address of a leaf position within a record.
///
/// The canonical text form joins field segments with `.` and renders index
/// segments as `[i]` appended to their parent, e.g. `roles[0].name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ColumnPath {
    segments: Vec<Segment>,
}

impl ColumnPath {
    /// The empty path, addressing the record root.
    pub fn root() -> Self {
        ColumnPath::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extend with an object-field segment.
    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Field(name.into()));
        ColumnPath { segments }
    }

    /// Extend with an array-index segment.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        ColumnPath { segments }
    }

    /// The `[0]`-widened form of this path, used when a null stands in for an
    /// array another record populates.
    pub fn with_index_zero(&self) -> Self {
        self.index(0)
    }

    /// The previous sibling column of a scalar-array element: the same path
    /// with its final index decremented. `None` when the path does not end in
    /// an index, or ends in `[0]`.
    pub fn previous_sibling(&self) -> Option<Self> {
        match self.segments.last() {
            Some(Segment::Index(i)) if *i > 0 => {
                let mut segments = self.segments.clone();
                if let Some(last) = segments.last_mut() {
                    *last = Segment::Index(i - 1);
                }
                Some(ColumnPath { segments })
            }
            _ => None,
        }
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) => {
                    if pos > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{name}")?;
                }
                Segment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for ColumnPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut chars = s.char_indices().peekable();
        let mut field = String::new();
        let mut expect_field = true;

        while let Some((pos, ch)) = chars.next() {
            match ch {
                '.' => {
                    if field.is_empty() && expect_field {
                        return Err(Error::malformed(format!(
                            "empty field name in column path {s:?} at offset {pos}"
                        )));
                    }
                    if !field.is_empty() {
                        segments.push(Segment::Field(std::mem::take(&mut field)));
                    }
                    expect_field = true;
                }
                '[' => {
                    if !field.is_empty() {
                        segments.push(Segment::Field(std::mem::take(&mut field)));
                    }
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some((_, ']')) => break,
                            Some((_, d)) if d.is_ascii_digit() => digits.push(d),
                            _ => {
                                return Err(Error::malformed(format!(
                                    "unterminated or non-numeric index in column path {s:?}"
                                )))
                            }
                        }
                    }
                    let index = digits.parse::<usize>().map_err(|_| {
                        Error::malformed(format!("invalid index in column path {s:?}"))
                    })?;
                    segments.push(Segment::Index(index));
                    expect_field = false;
                }
                _ => {
                    field.push(ch);
                    expect_field = false;
                }
            }
        }
        if !field.is_empty() {
            segments.push(Segment::Field(field));
        }
        if segments.is_empty() {
            return Err(Error::malformed("empty column path"));
        }
        Ok(ColumnPath { segments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_canonical_form() {
        let path = ColumnPath::root().field("roles").index(0).field("name");
        assert_eq!(path.to_string(), "roles[0].name");

        let nested = ColumnPath::root().field("a").index(1).index(2);
        assert_eq!(nested.to_string(), "a[1][2]");
    }

    #[test]
    fn test_parse_round_trip() {
        for text in ["user.roles[1].name", "a", "a[0][3].b.c", "x[10]"] {
            let path: ColumnPath = text.parse().unwrap();
            assert_eq!(path.to_string(), text);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<ColumnPath>().is_err());
        assert!("a[".parse::<ColumnPath>().is_err());
        assert!("a[x]".parse::<ColumnPath>().is_err());
        assert!("a..b".parse::<ColumnPath>().is_err());
    }

    #[test]
    fn test_equality_is_segment_equality() {
        let a: ColumnPath = "r[0]".parse().unwrap();
        let b = ColumnPath::root().field("r").index(0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_previous_sibling() {
        let path: ColumnPath = "r[2]".parse().unwrap();
        assert_eq!(path.previous_sibling().unwrap().to_string(), "r[1]");

        let zero: ColumnPath = "r[0]".parse().unwrap();
        assert!(zero.previous_sibling().is_none());

        let field_last: ColumnPath = "r[1].name".parse().unwrap();
        assert!(field_last.previous_sibling().is_none());
    }

    #[test]
    fn test_with_index_zero() {
        let path: ColumnPath = "a.b".parse().unwrap();
        assert_eq!(path.with_index_zero().to_string(), "a.b[0]");
    }
}

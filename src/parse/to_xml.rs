//! Parsed-CSV to XML conversion.
//!
//! Headers become element names, which CSV does not constrain but XML does.
//! The configured policy either rejects an illegal name or rewrites it:
//! each illegal character becomes `_{ASCII hex}_`, and a name that does not
//! start with a letter or underscore gains a prefix.

use crate::error::{Error, Result};
use crate::parse::coerce::CellValue;
use crate::parse::ParsedCsv;
use once_cell::sync::Lazy;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use regex::Regex;
use std::io::Cursor;

static LEGAL_NODE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9._\-]*$").unwrap());

/// What to do with a header that is not a legal XML node name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IllegalNodeNameAction {
    /// Fail the conversion on the first illegal name.
    #[default]
    Reject,
    /// Rewrite the name: hex-escape illegal characters, prefix a bad start.
    Sanitize,
}

/// Configuration for XML output.
#[derive(Debug, Clone)]
pub struct XmlOptions {
    /// Name of the document element.
    pub root_element: String,

    /// Name of the per-record element.
    pub row_element: String,

    pub illegal_name_action: IllegalNodeNameAction,

    /// Prefix applied to sanitized names with an illegal first character.
    /// An empty prefix means `_`.
    pub illegal_name_prefix: String,
}

impl Default for XmlOptions {
    fn default() -> Self {
        XmlOptions {
            root_element: "Root".to_string(),
            row_element: "Row".to_string(),
            illegal_name_action: IllegalNodeNameAction::default(),
            illegal_name_prefix: String::new(),
        }
    }
}

impl ParsedCsv {
    /// Render the table as an XML document: one row element per record, one
    /// child element per header.
    pub fn to_xml(&self, options: &XmlOptions) -> Result<String> {
        let root = fix_node_name(&options.root_element, options)?;
        let row_name = fix_node_name(&options.row_element, options)?;
        let names = self
            .headers
            .iter()
            .map(|h| fix_node_name(h, options))
            .collect::<Result<Vec<_>>>()?;

        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new(root.as_str())))?;

        for row in &self.rows {
            writer.write_event(Event::Start(BytesStart::new(row_name.as_str())))?;
            for (i, name) in names.iter().enumerate() {
                let text = row.get(i).map(CellValue::render_text).unwrap_or_default();
                writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;
                writer.write_event(Event::Text(BytesText::new(&text)))?;
                writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
            }
            writer.write_event(Event::End(BytesEnd::new(row_name.as_str())))?;
        }

        writer.write_event(Event::End(BytesEnd::new(root.as_str())))?;
        let bytes = writer.into_inner().into_inner();
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Apply the illegal-node-name policy to one name.
pub fn fix_node_name(name: &str, options: &XmlOptions) -> Result<String> {
    if LEGAL_NODE_NAME.is_match(name) {
        return Ok(name.to_string());
    }

    let reject = options.illegal_name_action == IllegalNodeNameAction::Reject;
    let mut fixed = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
            fixed.push(c);
        } else if reject {
            return Err(illegal(name, format!("character {c:?} at position {i}")));
        } else {
            fixed.push_str(&format!("_{:02X}_", c as u32));
        }
    }

    match fixed.chars().next() {
        Some(first) if first.is_alphabetic() || first == '_' => Ok(fixed),
        Some(first) if reject => Err(illegal(name, format!("first character {first:?}"))),
        Some(_) => {
            let prefix = if options.illegal_name_prefix.is_empty() {
                "_"
            } else {
                &options.illegal_name_prefix
            };
            Ok(format!("{prefix}{fixed}"))
        }
        None => Err(illegal(name, "empty name".to_string())),
    }
}

fn illegal(name: &str, reason: String) -> Error {
    Error::IllegalNodeName {
        name: name.to_string(),
        reason,
    }
}

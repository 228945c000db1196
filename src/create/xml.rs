//! XML to CSV conversion.
//!
//! Row nodes are the document root's children, or every element matching a
//! configured row-element name. The header collects each row's descendant
//! element names in first-seen order; cells are the text of a row's direct
//! children.

use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::options::CsvOptions;
use csv::{QuoteStyle, WriterBuilder};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;

#[derive(Debug, Default)]
struct XmlNode {
    name: String,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    /// Concatenated text of this node and its whole subtree.
    fn subtree_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.subtree_text(out);
        }
    }

    fn cell_text(&self) -> String {
        let mut out = String::new();
        self.subtree_text(&mut out);
        out
    }
}

pub fn xml_to_csv(
    xml: &str,
    row_element: Option<&str>,
    options: &CsvOptions,
    cancel: &CancellationToken,
) -> Result<String> {
    let document = parse_document(xml)?;
    let root = document
        .children
        .first()
        .ok_or_else(|| Error::malformed("XML document has no root element"))?;

    let rows: Vec<&XmlNode> = match row_element {
        Some(name) if !name.is_empty() => {
            let mut matches = Vec::new();
            collect_by_name(root, name, &mut matches);
            matches
        }
        _ => root.children.iter().collect(),
    };

    let mut buf = Vec::new();
    {
        let mut writer = WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote_style(if options.never_quote {
                QuoteStyle::Never
            } else {
                QuoteStyle::Necessary
            })
            .flexible(true)
            .from_writer(&mut buf);

        if options.include_header_row && !rows.is_empty() {
            let mut seen = HashSet::new();
            let mut headers = Vec::new();
            for row in &rows {
                cancel.check()?;
                collect_descendant_names(row, &mut seen, &mut headers);
            }
            writer.write_record(&headers)?;
        }

        for row in &rows {
            cancel.check()?;
            writer.write_record(row.children.iter().map(XmlNode::cell_text))?;
        }
        writer.flush().map_err(csv::Error::from)?;
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn parse_document(xml: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack = vec![XmlNode::default()];
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                stack.push(XmlNode {
                    name: local_name(e.local_name().as_ref()),
                    ..XmlNode::default()
                });
            }
            Event::Empty(e) => {
                let node = XmlNode {
                    name: local_name(e.local_name().as_ref()),
                    ..XmlNode::default()
                };
                push_child(&mut stack, node);
            }
            Event::End(_) => {
                let node = stack.pop().unwrap_or_default();
                push_child(&mut stack, node);
            }
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&t.unescape()?);
                }
            }
            Event::CData(t) => {
                if let Some(top) = stack.last_mut() {
                    top.text
                        .push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let mut document = stack.pop().unwrap_or_default();
    if !stack.is_empty() {
        // unclosed elements; keep whatever was balanced
        document = stack.swap_remove(0);
    }
    Ok(document)
}

fn push_child(stack: &mut Vec<XmlNode>, node: XmlNode) {
    if let Some(top) = stack.last_mut() {
        top.children.push(node);
    } else {
        stack.push(node);
    }
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn collect_by_name<'a>(node: &'a XmlNode, name: &str, out: &mut Vec<&'a XmlNode>) {
    if node.name == name {
        out.push(node);
    }
    for child in &node.children {
        collect_by_name(child, name, out);
    }
}

fn collect_descendant_names(
    node: &XmlNode,
    seen: &mut HashSet<String>,
    out: &mut Vec<String>,
) {
    for child in &node.children {
        if seen.insert(child.name.clone()) {
            out.push(child.name.clone());
        }
        collect_descendant_names(child, seen, out);
    }
}

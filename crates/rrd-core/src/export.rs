//! Tree of named text nodes produced by state exports.
//!
//! A node renders two ways. XML follows the RRDTool dump layout, with the
//! data-source label as a comment after the opening tag:
//!
//! ```text
//! <ds>
//!   <!-- cpu -->
//!   <value>NaN</value>
//!   <unknown_datapoints>0</unknown_datapoints>
//! </ds>
//! ```
//!
//! JSON nests the node one level under its label (or its tag when unlabelled):
//! `{"cpu":{"value":"NaN","unknown_datapoints":"0"}}`.

use rrd_common::DsName;
use serde_json::{Map, Value};
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    Text(String),
    Children(Vec<ExportNode>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportNode {
    tag: String,
    label: Option<DsName>,
    content: NodeContent,
}

impl ExportNode {
    pub fn text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            label: None,
            content: NodeContent::Text(text.into()),
        }
    }

    pub fn parent(tag: impl Into<String>, children: Vec<ExportNode>) -> Self {
        Self {
            tag: tag.into(),
            label: None,
            content: NodeContent::Children(children),
        }
    }

    pub fn with_label(mut self, label: DsName) -> Self {
        self.label = Some(label);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn label(&self) -> Option<&DsName> {
        self.label.as_ref()
    }

    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    /// Text content, `None` for parent nodes.
    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            NodeContent::Text(text) => Some(text),
            NodeContent::Children(_) => None,
        }
    }

    /// Child nodes; empty for text nodes.
    pub fn children(&self) -> &[ExportNode] {
        match &self.content {
            NodeContent::Text(_) => &[],
            NodeContent::Children(children) => children,
        }
    }

    /// First child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&ExportNode> {
        self.children().iter().find(|c| c.tag == tag)
    }

    /// Indented XML, two spaces per level, trailing newline.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out, 0);
        out
    }

    fn write_xml(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        match &self.content {
            NodeContent::Text(text) if self.label.is_none() => {
                let _ = writeln!(out, "{pad}<{0}>{1}</{0}>", self.tag, escape(text));
            }
            content => {
                let _ = writeln!(out, "{pad}<{}>", self.tag);
                if let Some(label) = &self.label {
                    let _ = writeln!(out, "{pad}  <!-- {} -->", label);
                }
                match content {
                    NodeContent::Text(text) => {
                        let _ = writeln!(out, "{pad}  {}", escape(text));
                    }
                    NodeContent::Children(children) => {
                        for child in children {
                            child.write_xml(out, depth + 1);
                        }
                    }
                }
                let _ = writeln!(out, "{pad}</{}>", self.tag);
            }
        }
    }

    /// JSON object keyed by label, or by tag when unlabelled.
    pub fn to_json(&self) -> Value {
        let key = self
            .label
            .as_ref()
            .map_or_else(|| self.tag.clone(), |l| l.to_string());
        let mut map = Map::new();
        map.insert(key, self.json_body());
        Value::Object(map)
    }

    fn json_body(&self) -> Value {
        match &self.content {
            NodeContent::Text(text) => Value::String(text.clone()),
            NodeContent::Children(children) => {
                let mut map = Map::new();
                for child in children {
                    let key = child
                        .label
                        .as_ref()
                        .map_or_else(|| child.tag.clone(), |l| l.to_string());
                    map.insert(key, child.json_body());
                }
                Value::Object(map)
            }
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

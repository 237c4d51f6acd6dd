use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Serializer, Value, ser::PrettyFormatter};

/// One node of a localization document.
///
/// Only `Text` leaves are ever translated; everything else is structure or a
/// scalar that passes through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Mapping(Vec<(String, Node)>),
    Sequence(Vec<Node>),
    Text(String),
    Scalar(Value),
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                Node::Mapping(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::String(s) => Node::Text(s),
            other => Node::Scalar(other),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        match node {
            Node::Mapping(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Map<String, Value>>(),
            ),
            Node::Sequence(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Node::Text(s) => Value::String(s),
            Node::Scalar(v) => v,
        }
    }
}

impl Node {
    /// True for strings with something besides whitespace in them.
    pub fn is_translatable(&self) -> bool {
        matches!(self, Node::Text(s) if !s.trim().is_empty())
    }

    /// Same keys in the same order, same sequence lengths, same nesting.
    pub fn same_shape(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Mapping(a), Node::Mapping(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.same_shape(vb))
            }
            (Node::Sequence(a), Node::Sequence(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_shape(y))
            }
            (Node::Text(_), Node::Text(_)) => true,
            (Node::Scalar(a), Node::Scalar(b)) => a == b,
            _ => false,
        }
    }

    /// Leaf strings in depth-first order.
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Node::Mapping(entries) => entries.iter().for_each(|(_, v)| v.collect_leaves(out)),
            Node::Sequence(items) => items.iter().for_each(|v| v.collect_leaves(out)),
            Node::Text(s) => out.push(s),
            Node::Scalar(_) => {}
        }
    }

    /// Pretty JSON with literal non-ASCII text and `indent` spaces per level.
    pub fn to_json_pretty(&self, indent: usize) -> Result<String> {
        let indent = " ".repeat(indent);
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = Serializer::with_formatter(&mut buf, formatter);
        Value::from(self.clone()).serialize(&mut ser)?;
        Ok(String::from_utf8(buf)?)
    }
}

pub trait Translatable {
    fn load_document(input_path: &Path) -> Result<Node>;

    fn write_document(
        document: &Node,
        target_lang: &str,
        output_dir: &Path,
        indent: usize,
    ) -> Result<PathBuf>;
}

pub struct JsonAdapter;

impl Translatable for JsonAdapter {
    fn load_document(input_path: &Path) -> Result<Node> {
        let content = fs::read_to_string(input_path)
            .with_context(|| format!("Failed to read source '{}'", input_path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Malformed JSON in '{}'", input_path.display()))?;
        Ok(Node::from(value))
    }

    fn write_document(
        document: &Node,
        target_lang: &str,
        output_dir: &Path,
        indent: usize,
    ) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create '{}'", output_dir.display()))?;

        let output_path = output_dir.join(format!("{}.json", target_lang));
        fs::write(&output_path, document.to_json_pretty(indent)?)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;

        Ok(output_path)
    }
}

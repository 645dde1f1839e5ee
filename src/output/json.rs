use std::io::Write;

use serde::Serialize;
use serde_json::{Map, Value as Json, ser::PrettyFormatter};

use super::ExportError;
use crate::{
    node::{ATTRIBUTE_MARKER, Entry, Node, NodeRef},
    value::Scalar,
};

/// JSON exporter settings.
#[derive(Debug, Clone, Copy)]
pub struct JsonOptions {
    /// Indent with tabs, one member per line
    pub pretty: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        JsonOptions { pretty: true }
    }
}

/// Converts a scalar; non-finite floats have no JSON form and become `null`.
pub fn scalar_to_json(scalar: &Scalar) -> Json {
    match scalar {
        Scalar::String(s) => Json::String(s.clone()),
        Scalar::Integer(n) => Json::Number((*n).into()),
        Scalar::Float(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Scalar::Boolean(b) => Json::Bool(*b),
    }
}

/// Converts a node into a JSON object.
///
/// Attributes come first, under `@`-prefixed keys. With
/// `unlist_singletons`, a child sequence holding exactly one node becomes
/// that node's object instead of a one-element array.
pub fn node_to_json(node: &Node, unlist_singletons: bool) -> Json {
    let mut map = Map::new();

    for (name, value) in node.attributes() {
        map.insert(format!("{ATTRIBUTE_MARKER}{name}"), scalar_to_json(value));
    }

    for (key, entry) in node.entries() {
        let value = match entry {
            Entry::Leaf(scalar) => scalar_to_json(scalar),
            Entry::Children(seq) => {
                let seq = seq.borrow();
                if unlist_singletons && seq.len() == 1 {
                    node_to_json(&seq[0].borrow(), unlist_singletons)
                } else {
                    Json::Array(
                        seq.iter()
                            .map(|child| node_to_json(&child.borrow(), unlist_singletons))
                            .collect(),
                    )
                }
            }
        };
        map.insert(key.to_string(), value);
    }

    Json::Object(map)
}

/// The whole tree as a structured document.
pub fn to_json_value(root: &NodeRef) -> Json {
    node_to_json(&root.borrow(), true)
}

pub fn write_json<W: Write>(root: &NodeRef, writer: W, options: &JsonOptions) -> Result<(), ExportError> {
    let value = to_json_value(root);
    if options.pretty {
        let mut serializer =
            serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"\t"));
        value.serialize(&mut serializer)?;
    } else {
        serde_json::to_writer(writer, &value)?;
    }
    Ok(())
}

pub fn to_json_string(root: &NodeRef, options: &JsonOptions) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_json(root, &mut buffer, options)?;
    Ok(String::from_utf8(buffer)?)
}

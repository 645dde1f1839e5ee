use std::io::Write;

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use super::ExportError;
use crate::node::{Entry, Node, NodeRef};

/// XML exporter settings.
#[derive(Debug, Clone)]
pub struct XmlOptions {
    /// Element wrapping the whole tree; required when the tree has several
    /// top-level tags
    pub root: Option<String>,
    /// Indent with tabs, one element per line
    pub pretty: bool,
    /// Emit the `<?xml ...?>` declaration
    pub declaration: bool,
}

impl Default for XmlOptions {
    fn default() -> Self {
        XmlOptions {
            root: None,
            pretty: true,
            declaration: true,
        }
    }
}

impl XmlOptions {
    /// Single-line output without declaration.
    pub fn compact() -> Self {
        XmlOptions {
            root: None,
            pretty: false,
            declaration: false,
        }
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }
}

pub fn write_xml<W: Write>(root: &NodeRef, writer: W, options: &XmlOptions) -> Result<(), ExportError> {
    let mut writer = if options.pretty {
        Writer::new_with_indent(writer, b'\t', 1)
    } else {
        Writer::new(writer)
    };

    let node = root.borrow();
    let top = match &options.root {
        Some(_) => None,
        None => Some(single_top_level(&node)?),
    };

    if options.declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }

    match (&options.root, top) {
        (_, Some((tag, child))) => write_element(&mut writer, tag, &child.borrow())?,
        (Some(name), None) => write_element(&mut writer, name, &node)?,
        (None, None) => {}
    }
    Ok(())
}

pub fn to_xml_string(root: &NodeRef, options: &XmlOptions) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_xml(root, &mut buffer, options)?;
    Ok(String::from_utf8(buffer)?)
}

/// The one top-level tag, and its single node, allowed when no explicit
/// root is given.
fn single_top_level(node: &Node) -> Result<(&str, NodeRef), ExportError> {
    let keys: Vec<&str> = node.entries().map(|(key, _)| key).collect();
    match keys.as_slice() {
        [] => Err(ExportError::EmptyTree),
        [key] => match node.get(key) {
            Some(Entry::Children(seq)) => {
                let seq = seq.borrow();
                match seq.as_slice() {
                    [only] => Ok((*key, NodeRef::clone(only))),
                    nodes => Err(ExportError::RepeatedRoot {
                        tag: key.to_string(),
                        count: nodes.len(),
                    }),
                }
            }
            _ => Err(ExportError::ScalarRoot(key.to_string())),
        },
        _ => Err(ExportError::AmbiguousRoot {
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }),
    }
}

fn write_element<W: Write>(writer: &mut Writer<W>, name: &str, node: &Node) -> Result<(), ExportError> {
    let mut start = BytesStart::new(name);
    for (key, value) in node.attributes() {
        let text = value.to_text();
        start.push_attribute((key.as_str(), text.as_str()));
    }

    if node.len() == 0 {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for (key, entry) in node.entries() {
        match entry {
            Entry::Leaf(scalar) => {
                let text = scalar.to_text();
                writer.write_event(Event::Start(BytesStart::new(key)))?;
                writer.write_event(Event::Text(BytesText::new(&text)))?;
                writer.write_event(Event::End(BytesEnd::new(key)))?;
            }
            Entry::Children(seq) => {
                for child in seq.borrow().iter() {
                    write_element(writer, key, &child.borrow())?;
                }
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

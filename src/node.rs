//! Tree nodes.
//!
//! A node maps tag names to either an ordered child sequence or a scalar
//! leaf, and carries a separate attribute map. Child sequences are always
//! sequences, even when they hold a single node.
//!
//! Nodes and sequences are reference counted so that the resolver can hand
//! out the exact nodes living in the tree, and so that reconciliation can
//! tell an in-place original from a fresh copy by identity.

use std::{cell::RefCell, rc::Rc};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::value::{Scalar, Value};

/// Leading symbol marking an entry key as an attribute (`@lang`).
pub const ATTRIBUTE_MARKER: char = '@';

/// Shared handle to a node living in the tree.
pub type NodeRef = Rc<RefCell<Node>>;

/// Shared handle to an ordered child sequence.
pub type SeqRef = Rc<RefCell<Vec<NodeRef>>>;

/// How combinators copy a node when they need an extra sibling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyMode {
    /// Fully independent copy of the whole subtree
    #[default]
    Deep,

    /// Copy of the node's own entries; nested child sequences are shared
    Shallow,
}

/// What a tag maps to inside a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Ordered child sequence
    Children(SeqRef),

    /// Scalar leaf value
    Leaf(Scalar),
}

impl Entry {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Entry::Leaf(s) => Some(s),
            Entry::Children(_) => None,
        }
    }

    pub fn as_children(&self) -> Option<&SeqRef> {
        match self {
            Entry::Children(seq) => Some(seq),
            Entry::Leaf(_) => None,
        }
    }
}

/// A single tree node.
///
/// Entries and attributes keep insertion order, which is the order the
/// exporters write them in.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Node {
    entries: IndexMap<String, Entry>,
    attributes: IndexMap<String, Scalar>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty node behind a fresh shared handle.
    pub fn new_ref() -> NodeRef {
        Rc::new(RefCell::new(Node::new()))
    }

    /// Wraps this node into a shared handle.
    pub fn into_ref(self) -> NodeRef {
        Rc::new(RefCell::new(self))
    }

    /// Creates a single-key record, as the combinators do for an empty source.
    ///
    /// # Examples
    ///
    /// ```
    /// use treebuilder::{Node, Scalar};
    ///
    /// let node = Node::record("Name", "foo");
    /// assert_eq!(node.borrow().scalar("Name"), Some(&Scalar::from("foo")));
    /// ```
    pub fn record(key: &str, value: impl Into<Value>) -> NodeRef {
        let mut node = Node::new();
        node.assign(key, &value.into());
        node.into_ref()
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Scalar stored under `key`, if `key` holds a leaf.
    pub fn scalar(&self, key: &str) -> Option<&Scalar> {
        self.entries.get(key).and_then(Entry::as_scalar)
    }

    /// Child sequence stored under `key`, if `key` holds children.
    pub fn children(&self, key: &str) -> Option<SeqRef> {
        self.entries.get(key).and_then(Entry::as_children).cloned()
    }

    pub fn attribute(&self, key: &str) -> Option<&Scalar> {
        self.attributes.get(key)
    }

    pub fn attributes(&self) -> &IndexMap<String, Scalar> {
        &self.attributes
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.attributes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Writes `value` under `key`, replacing whatever the key held.
    ///
    /// Subtree templates are deep-copied so each write owns its children.
    pub fn assign(&mut self, key: &str, value: &Value) {
        let entry = match value {
            Value::Scalar(s) => Entry::Leaf(s.clone()),
            Value::Nodes(templates) => Entry::Children(Rc::new(RefCell::new(
                templates.iter().map(|t| duplicate(t, CopyMode::Deep)).collect(),
            ))),
        };
        self.entries.insert(key.to_string(), entry);
    }

    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.shift_remove(key)
    }

    pub fn set_attribute(&mut self, key: &str, value: Scalar) {
        self.attributes.insert(key.to_string(), value);
    }

    /// Returns the child sequence under `tag`, creating a one-element
    /// sequence holding a fresh empty node when the tag is missing.
    ///
    /// Returns `None` when `tag` holds a scalar leaf.
    pub fn vivify(&mut self, tag: &str) -> Option<SeqRef> {
        match self.entries.get(tag) {
            Some(Entry::Children(seq)) => Some(Rc::clone(seq)),
            Some(Entry::Leaf(_)) => None,
            None => {
                let seq = Rc::new(RefCell::new(vec![Node::new_ref()]));
                self.entries
                    .insert(tag.to_string(), Entry::Children(Rc::clone(&seq)));
                Some(seq)
            }
        }
    }

    /// Copies this node according to `mode`.
    pub fn duplicate(&self, mode: CopyMode) -> Node {
        let entries = self
            .entries
            .iter()
            .map(|(key, entry)| {
                let entry = match (entry, mode) {
                    (Entry::Children(seq), CopyMode::Deep) => Entry::Children(Rc::new(
                        RefCell::new(seq.borrow().iter().map(|c| duplicate(c, mode)).collect()),
                    )),
                    (entry, _) => entry.clone(),
                };
                (key.clone(), entry)
            })
            .collect();

        Node {
            entries,
            attributes: self.attributes.clone(),
        }
    }
}

/// Copies the node behind `node` into a new shared handle.
pub fn duplicate(node: &NodeRef, mode: CopyMode) -> NodeRef {
    node.borrow().duplicate(mode).into_ref()
}

/// Strips the attribute marker from an entry key, if present.
pub fn attribute_name(key: &str) -> Option<&str> {
    key.strip_prefix(ATTRIBUTE_MARKER)
}

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path as FsPath,
    rc::Rc,
};

use log::{debug, warn};
use thiserror::Error;

use crate::{
    combinators::{Combinator, Origin, Pairing, realize},
    evaluator::Evaluator,
    node::{CopyMode, Entry, NodeRef, attribute_name},
    output::{self, ExportError, JsonOptions, XmlOptions},
    path::{Path, PathError},
    resolver::{Mode, Resolution, resolve},
    value::{Scalar, Value},
};

/// Errors raised by tree operations.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("attribute entry '{key}' can only hold scalar values")]
    AttributeValue { key: String },

    #[error("'{key}' sits at the top of the tree, which holds a single node; use a longer path to add siblings")]
    RootCopy { key: String },

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Per-call settings for the write operations.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Pair values against the instances of this ancestor tag instead of
    /// the entry's direct owners
    pub from_ancestor: Option<String>,
    /// How extra siblings are copied
    pub copy: CopyMode,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ancestor(mut self, tag: impl Into<String>) -> Self {
        self.from_ancestor = Some(tag.into());
        self
    }

    pub fn with_copy(mut self, copy: CopyMode) -> Self {
        self.copy = copy;
        self
    }
}

/// One item returned by [`TreeBuilder::get_items`].
#[derive(Debug, Clone, PartialEq)]
pub enum Selected {
    /// Leaf or attribute value
    Scalar(Scalar),
    /// Node living in the tree
    Node(NodeRef),
}

impl Selected {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Selected::Scalar(s) => Some(s),
            Selected::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            Selected::Node(n) => Some(n),
            Selected::Scalar(_) => None,
        }
    }
}

/// Builds a tree from path-addressed bulk assignments.
///
/// # Examples
///
/// ```
/// use treebuilder::{Scalar, TreeBuilder};
///
/// let mut builder = TreeBuilder::new();
/// builder
///     .expand("bookstore/book/title", ["Sapiens", "Harry Potter", "A Time of Mercy"])?
///     .set("bookstore/book/is_in_stock", true)?
///     .set("bookstore/book[title=\"Harry Potter\"]/price", 9.99)?;
///
/// let prices = builder.get_items("bookstore/book/price")?;
/// assert_eq!(prices.len(), 1);
/// assert_eq!(prices[0].as_scalar(), Some(&Scalar::from(9.99)));
/// # Ok::<(), treebuilder::TreeError>(())
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    root: NodeRef,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root node. It never holds anything but the top-level tags.
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Writes `value` to every node the path selects. Same as `expand`
    /// with a single value.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<&mut Self, TreeError> {
        self.set_with(path, value, &WriteOptions::default())
    }

    pub fn set_with(
        &mut self,
        path: &str,
        value: impl Into<Value>,
        options: &WriteOptions,
    ) -> Result<&mut Self, TreeError> {
        self.apply(Combinator::Expand, path, vec![value.into()], options)
    }

    /// Ring-pairs `values` onto the selected nodes, copying nodes when there
    /// are more values than nodes.
    pub fn expand<I>(&mut self, path: &str, values: I) -> Result<&mut Self, TreeError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.expand_with(path, values, &WriteOptions::default())
    }

    pub fn expand_with<I>(&mut self, path: &str, values: I, options: &WriteOptions) -> Result<&mut Self, TreeError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.apply(Combinator::Expand, path, collect_values(values), options)
    }

    /// Duplicates the selected nodes once per value.
    pub fn cross<I>(&mut self, path: &str, values: I) -> Result<&mut Self, TreeError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.cross_with(path, values, &WriteOptions::default())
    }

    pub fn cross_with<I>(&mut self, path: &str, values: I, options: &WriteOptions) -> Result<&mut Self, TreeError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.apply(Combinator::Cross, path, collect_values(values), options)
    }

    /// Pairs values one-to-one with the selected nodes; never adds nodes.
    pub fn nest<I>(&mut self, path: &str, values: I) -> Result<&mut Self, TreeError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.nest_with(path, values, &WriteOptions::default())
    }

    pub fn nest_with<I>(&mut self, path: &str, values: I, options: &WriteOptions) -> Result<&mut Self, TreeError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.apply(Combinator::Nest, path, collect_values(values), options)
    }

    /// Runs `combinator` for `path` and reconciles the result into the tree.
    pub fn apply(
        &mut self,
        combinator: Combinator,
        path: &str,
        values: Vec<Value>,
        options: &WriteOptions,
    ) -> Result<&mut Self, TreeError> {
        let path = Path::parse(path)?;
        check_attribute_values(&path, &values)?;

        debug!(
            "{} '{}' with {} value(s){}",
            combinator,
            path,
            values.len(),
            options
                .from_ancestor
                .as_deref()
                .map(|a| format!(" from ancestor '{a}'"))
                .unwrap_or_default()
        );

        match options.from_ancestor.as_deref() {
            None => {
                write_entry(&self.root, &path, combinator, &values, options.copy)?;
            }
            Some(ancestor) => {
                let index = path.ancestor_index(ancestor)?;
                path.validate()?;

                let resolution = resolve(&self.root, &path, index + 1, Mode::Write)?;
                let below = path.below(index);
                let source = resolution.nodes();
                let plan = combinator.plan(source.len(), values.len());
                check_attached(&plan, &resolution, &path)?;
                let items = realize(&source, &plan, options.copy);

                for (item, pairing) in items.iter().zip(&plan) {
                    if let Some(j) = pairing.value {
                        write_entry(item, &below, Combinator::Expand, &values[j..=j], options.copy)?;
                    }
                }
                attach(&items, &plan, &resolution, None)?;
            }
        }
        Ok(self)
    }

    /// Values or nodes selected by `path`, without modifying the tree.
    ///
    /// The final step decides what is returned: `@name` yields attribute
    /// values, a leaf key yields its values, and a node key yields the nodes
    /// (filtered by the step's predicate, if any).
    pub fn get_items(&self, path: &str) -> Result<Vec<Selected>, TreeError> {
        let path = Path::parse(path)?;
        let resolution = resolve(&self.root, &path, path.len() - 1, Mode::Read)?;
        let entry = path.entry();
        let predicate = entry.predicate()?;

        let mut selected = Vec::new();
        for target in &resolution.targets {
            let node = target.node.borrow();

            if let Some(name) = attribute_name(&entry.tag) {
                selected.extend(node.attribute(name).cloned().map(Selected::Scalar));
                continue;
            }

            match node.get(&entry.tag) {
                Some(Entry::Leaf(scalar)) => selected.push(Selected::Scalar(scalar.clone())),
                Some(Entry::Children(seq)) => {
                    let children = seq.borrow();
                    let mask = match &predicate {
                        Some(expr) => Evaluator::new(&children).eval(expr),
                        None => vec![true; children.len()],
                    };
                    selected.extend(
                        children
                            .iter()
                            .zip(mask)
                            .filter(|(_, keep)| *keep)
                            .map(|(child, _)| Selected::Node(NodeRef::clone(child))),
                    );
                }
                None => {}
            }
        }
        Ok(selected)
    }

    /// Same selection as [`get_items`](Self::get_items), rendered as a JSON
    /// array. Nodes render as objects; `unlist_singletons` collapses their
    /// one-element child sequences.
    pub fn get(&self, path: &str, unlist_singletons: bool) -> Result<serde_json::Value, TreeError> {
        let items = self.get_items(path)?;
        Ok(serde_json::Value::Array(
            items
                .iter()
                .map(|item| match item {
                    Selected::Scalar(s) => output::scalar_to_json(s),
                    Selected::Node(n) => output::node_to_json(&n.borrow(), unlist_singletons),
                })
                .collect(),
        ))
    }

    pub fn to_xml_string(&self, options: &XmlOptions) -> Result<String, TreeError> {
        Ok(output::to_xml_string(&self.root, options)?)
    }

    pub fn to_json_string(&self, options: &JsonOptions) -> Result<String, TreeError> {
        Ok(output::to_json_string(&self.root, options)?)
    }

    /// Writes the tree as XML to `file_path`.
    pub fn to_xml_file(&self, file_path: impl AsRef<FsPath>, options: &XmlOptions) -> Result<(), TreeError> {
        let file = File::create(file_path).map_err(ExportError::from)?;
        let mut writer = BufWriter::new(file);
        output::write_xml(&self.root, &mut writer, options)?;
        writer.flush().map_err(ExportError::from)?;
        Ok(())
    }

    /// Writes the tree as JSON to `file_path`.
    pub fn to_json_file(&self, file_path: impl AsRef<FsPath>, options: &JsonOptions) -> Result<(), TreeError> {
        let file = File::create(file_path).map_err(ExportError::from)?;
        let mut writer = BufWriter::new(file);
        output::write_json(&self.root, &mut writer, options)?;
        writer.flush().map_err(ExportError::from)?;
        Ok(())
    }
}

fn collect_values<I>(values: I) -> Vec<Value>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    values.into_iter().map(Into::into).collect()
}

/// Attribute entries only take scalars; checked before the tree is touched.
fn check_attribute_values(path: &Path, values: &[Value]) -> Result<(), TreeError> {
    if path.entry().is_attribute() && values.iter().any(|v| !v.is_scalar()) {
        return Err(TreeError::AttributeValue {
            key: path.entry_key().to_string(),
        });
    }
    Ok(())
}

/// Resolves `path` under `root`, applies `combinator` to the owners of the
/// entry key and reconciles the result.
fn write_entry(
    root: &NodeRef,
    path: &Path,
    combinator: Combinator,
    values: &[Value],
    copy: CopyMode,
) -> Result<(), TreeError> {
    if path.entry().filter.is_some() {
        warn!("filter on final step '{}' is ignored when writing", path.entry());
    }
    path.validate()?;

    let resolution = resolve(root, path, path.len() - 1, Mode::Write)?;
    let source = resolution.nodes();
    let plan = combinator.plan(source.len(), values.len());
    check_attached(&plan, &resolution, path)?;
    let items = realize(&source, &plan, copy);

    for (item, pairing) in items.iter().zip(&plan) {
        if let Some(j) = pairing.value {
            item.borrow_mut().assign(&resolution.entry_key, &values[j]);
        }
    }
    attach(&items, &plan, &resolution, Some(&resolution.entry_key))
}

/// Every item the plan adds must have a parent sequence to go to. Only the
/// root lacks one, so a plan that would copy it is rejected before any copy
/// is made.
fn check_attached(plan: &[Pairing], resolution: &Resolution, path: &Path) -> Result<(), TreeError> {
    let detached = plan.iter().any(|pairing| match pairing.origin {
        Origin::Source(_) => false,
        Origin::Copy(i) => resolution.targets[i].parent.is_none(),
        Origin::Fresh => true,
    });
    if detached {
        return Err(TreeError::RootCopy {
            key: path.entry_key().to_string(),
        });
    }
    Ok(())
}

/// Puts combinator output back into the tree.
///
/// Each item goes to the parent sequence of the target it derives from,
/// unless that sequence already holds it. When `entry` is an `@name` key
/// its value then moves into the item's attribute map.
fn attach(
    items: &[NodeRef],
    plan: &[Pairing],
    resolution: &Resolution,
    entry: Option<&str>,
) -> Result<(), TreeError> {
    for (item, pairing) in items.iter().zip(plan) {
        let parent = pairing
            .source_index()
            .and_then(|i| resolution.targets[i].parent)
            .map(|link| resolution.links.get(link));

        if let Some(seq) = parent {
            let present = seq.borrow().iter().any(|n| Rc::ptr_eq(n, item));
            if !present {
                seq.borrow_mut().push(NodeRef::clone(item));
            }
        }

        if let Some(key) = entry {
            demote_attribute(item, key)?;
        }
    }
    Ok(())
}

/// Moves the value under `@name` into the attribute map under `name`.
fn demote_attribute(item: &NodeRef, key: &str) -> Result<(), TreeError> {
    let Some(name) = attribute_name(key) else {
        return Ok(());
    };

    let mut node = item.borrow_mut();
    match node.remove(key) {
        Some(Entry::Leaf(scalar)) => node.set_attribute(name, scalar),
        Some(Entry::Children(_)) => {
            return Err(TreeError::AttributeValue {
                key: key.to_string(),
            });
        }
        None => {}
    }
    Ok(())
}

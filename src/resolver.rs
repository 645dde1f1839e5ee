//! Path resolution.
//!
//! Walks a path from the root breadth-first, applies step filters and
//! collects the leaf targets that a combinator will work on. Parent
//! sequences are recorded in a side table instead of inside the nodes, so
//! nothing transient is ever written into the tree.

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use log::trace;

use crate::{
    ast::Expr,
    evaluator::Evaluator,
    node::{Entry, Node, NodeRef, SeqRef},
    path::{Path, PathError, Step},
};

/// Whether resolution may grow the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Missing tags are created and empty filter results fall back to a
    /// fresh node appended to the filtered sequence.
    Write,

    /// Missing tags and empty filter results end the branch.
    Read,
}

/// Per-resolution id of a parent sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(usize);

/// Side table from [`LinkId`] to the parent sequence it names.
#[derive(Debug, Default)]
pub struct ParentLinks {
    seqs: Vec<SeqRef>,
    ids: HashMap<*const RefCell<Vec<NodeRef>>, LinkId>,
}

impl ParentLinks {
    /// Id for `seq`, reusing the existing one when the same sequence was
    /// already linked.
    fn link(&mut self, seq: &SeqRef) -> LinkId {
        let next = LinkId(self.seqs.len());
        let id = *self.ids.entry(Rc::as_ptr(seq)).or_insert(next);
        if id == next {
            self.seqs.push(Rc::clone(seq));
        }
        id
    }

    pub fn get(&self, id: LinkId) -> &SeqRef {
        &self.seqs[id.0]
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }
}

/// A node selected by resolution and the sequence that holds it.
///
/// `parent` is `None` only for the root.
#[derive(Debug, Clone)]
pub struct LeafTarget {
    pub node: NodeRef,
    pub parent: Option<LinkId>,
}

/// Output of [`resolve`].
#[derive(Debug)]
pub struct Resolution {
    /// Tag of the path's final step
    pub entry_key: String,
    /// Selected nodes in breadth-first, insertion order
    pub targets: Vec<LeafTarget>,
    pub links: ParentLinks,
}

impl Resolution {
    pub fn nodes(&self) -> Vec<NodeRef> {
        self.targets.iter().map(|t| NodeRef::clone(&t.node)).collect()
    }
}

/// Resolves `path` under `root`, collecting the nodes reached after
/// walking the first `depth` steps.
///
/// With `depth = path.len() - 1` the targets are the nodes that own the
/// entry key. A smaller depth stops at an ancestor level.
pub fn resolve(root: &NodeRef, path: &Path, depth: usize, mode: Mode) -> Result<Resolution, PathError> {
    let steps = path.steps();
    let predicates = steps[..depth]
        .iter()
        .map(Step::predicate)
        .collect::<Result<Vec<Option<Expr>>, PathError>>()?;

    let mut targets = Vec::new();
    let mut links = ParentLinks::default();
    let mut queue = VecDeque::from([(0usize, NodeRef::clone(root), None::<LinkId>)]);

    while let Some((index, node, parent)) = queue.pop_front() {
        if index == depth {
            targets.push(LeafTarget { node, parent });
            continue;
        }

        let step = &steps[index];
        trace!("resolving step '{}' ({} of {})", step, index + 1, depth);
        let Some((seq, existed)) = child_sequence(&node, step, path, mode)? else {
            continue;
        };

        let mut children: Vec<NodeRef> = seq.borrow().clone();
        if let (true, Some(expr)) = (existed, &predicates[index]) {
            let mask = Evaluator::new(&children).eval(expr);
            children = children
                .into_iter()
                .zip(mask)
                .filter_map(|(child, keep)| keep.then_some(child))
                .collect();

            if children.is_empty() && mode == Mode::Write {
                trace!("filter on '{}' matched nothing, appending a fresh node", step);
                let fresh = Node::new_ref();
                seq.borrow_mut().push(NodeRef::clone(&fresh));
                children.push(fresh);
            }
        }

        let link = links.link(&seq);
        for child in children {
            queue.push_back((index + 1, child, Some(link)));
        }
    }

    Ok(Resolution {
        entry_key: path.entry_key().to_string(),
        targets,
        links,
    })
}

/// Child sequence under `step.tag`, and whether it existed before this call.
fn child_sequence(
    node: &NodeRef,
    step: &Step,
    path: &Path,
    mode: Mode,
) -> Result<Option<(SeqRef, bool)>, PathError> {
    let existing = match node.borrow().get(&step.tag) {
        Some(Entry::Children(seq)) => Some(Rc::clone(seq)),
        Some(Entry::Leaf(_)) => {
            return match mode {
                Mode::Read => Ok(None),
                Mode::Write => Err(PathError::LeafInPath {
                    tag: step.tag.clone(),
                    path: path.to_string(),
                }),
            };
        }
        None => None,
    };

    match (existing, mode) {
        (Some(seq), _) => Ok(Some((seq, true))),
        (None, Mode::Read) => Ok(None),
        (None, Mode::Write) => {
            trace!("creating '{}'", step.tag);
            Ok(node.borrow_mut().vivify(&step.tag).map(|seq| (seq, false)))
        }
    }
}

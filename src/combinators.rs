//! List combinators.
//!
//! Each combinator pairs an item sequence of length `N` with a value
//! sequence of length `V` and has its own cardinality law:
//!
//! | combinator | result length                         |
//! |------------|---------------------------------------|
//! | `expand`   | `max(N, V)`, or `N` when `V = 0`      |
//! | `cross`    | `N × V`, or `V` when `N = 0`          |
//! | `nest`     | `N`                                   |
//!
//! The pairing itself is computed as a [`Pairing`] plan first, so the same
//! law drives both plain entry writes and writes relative to an ancestor.

use std::fmt;

use crate::{
    node::{CopyMode, Node, NodeRef, duplicate},
    value::Value,
};

/// Where a produced item comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The source item itself, reused in place
    Source(usize),

    /// A copy of the source item
    Copy(usize),

    /// A new single-key record (empty source only)
    Fresh,
}

/// One produced item: its origin and the index of the value it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub origin: Origin,
    pub value: Option<usize>,
}

impl Pairing {
    fn new(origin: Origin, value: Option<usize>) -> Self {
        Pairing { origin, value }
    }

    /// Index of the source item this pairing derives from.
    pub fn source_index(&self) -> Option<usize> {
        match self.origin {
            Origin::Source(i) | Origin::Copy(i) => Some(i),
            Origin::Fresh => None,
        }
    }
}

/// The three pairing strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Expand,
    Cross,
    Nest,
}

impl Combinator {
    /// Pairing plan for `n` source items and `v` values.
    pub fn plan(self, n: usize, v: usize) -> Vec<Pairing> {
        match self {
            Combinator::Expand => plan_expand(n, v),
            Combinator::Cross => plan_cross(n, v),
            Combinator::Nest => plan_nest(n, v),
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::Expand => f.write_str("expand"),
            Combinator::Cross => f.write_str("cross"),
            Combinator::Nest => f.write_str("nest"),
        }
    }
}

fn fresh(v: usize) -> Vec<Pairing> {
    (0..v).map(|j| Pairing::new(Origin::Fresh, Some(j))).collect()
}

/// Ring pairing: the shorter side wraps around until the longer one ends.
pub fn plan_expand(n: usize, v: usize) -> Vec<Pairing> {
    if v == 0 {
        return (0..n).map(|i| Pairing::new(Origin::Source(i), None)).collect();
    }
    if n == 0 {
        return fresh(v);
    }

    (0..n.max(v))
        .map(|i| {
            let origin = if i < n {
                Origin::Source(i)
            } else {
                Origin::Copy(i % n)
            };
            Pairing::new(origin, Some(i % v))
        })
        .collect()
}

/// Cartesian product, value-major. The first value's slice reuses the
/// source items in place.
///
/// An empty source yields one fresh record per value rather than nothing.
pub fn plan_cross(n: usize, v: usize) -> Vec<Pairing> {
    if n == 0 {
        return fresh(v);
    }

    (0..v)
        .flat_map(|j| {
            (0..n).map(move |i| {
                let origin = if j == 0 {
                    Origin::Source(i)
                } else {
                    Origin::Copy(i)
                };
                Pairing::new(origin, Some(j))
            })
        })
        .collect()
}

/// One-to-one pairing: values are clipped to the source length, then
/// expanded, so the source never grows.
pub fn plan_nest(n: usize, v: usize) -> Vec<Pairing> {
    plan_expand(n, v.min(n))
}

/// Materialises the items of `plan`.
///
/// Copies are taken from the source items before any value is written.
pub fn realize(source: &[NodeRef], plan: &[Pairing], mode: CopyMode) -> Vec<NodeRef> {
    plan.iter()
        .map(|pairing| match pairing.origin {
            Origin::Source(i) => NodeRef::clone(&source[i]),
            Origin::Copy(i) => duplicate(&source[i], mode),
            Origin::Fresh => Node::new_ref(),
        })
        .collect()
}

/// Applies `combinator` to `source`, writing `values` under `key`.
pub fn apply(
    combinator: Combinator,
    source: Vec<NodeRef>,
    key: &str,
    values: &[Value],
    mode: CopyMode,
) -> Vec<NodeRef> {
    let plan = combinator.plan(source.len(), values.len());
    let items = realize(&source, &plan, mode);

    for (item, pairing) in items.iter().zip(&plan) {
        if let Some(j) = pairing.value {
            item.borrow_mut().assign(key, &values[j]);
        }
    }
    items
}

/// Ring pairing of `values` onto `source`.
///
/// # Examples
///
/// ```
/// use treebuilder::{CopyMode, Value, combinators::expand};
///
/// let values: Vec<Value> = vec!["x".into(), "y".into(), "z".into()];
/// let records = expand(vec![], "Name", &values, CopyMode::Deep);
/// assert_eq!(records.len(), 3);
///
/// let ids: Vec<Value> = vec![1.into(), 2.into()];
/// let records = expand(records, "Id", &ids, CopyMode::Deep);
/// let ids: Vec<String> = records
///     .iter()
///     .map(|r| r.borrow().scalar("Id").unwrap().to_text())
///     .collect();
/// assert_eq!(ids, vec!["1", "2", "1"]);
/// ```
pub fn expand(source: Vec<NodeRef>, key: &str, values: &[Value], mode: CopyMode) -> Vec<NodeRef> {
    apply(Combinator::Expand, source, key, values, mode)
}

/// Cartesian product of `source` and `values`.
pub fn cross(source: Vec<NodeRef>, key: &str, values: &[Value], mode: CopyMode) -> Vec<NodeRef> {
    apply(Combinator::Cross, source, key, values, mode)
}

/// One-to-one pairing of `values` onto `source`; never changes its length.
pub fn nest(source: Vec<NodeRef>, key: &str, values: &[Value], mode: CopyMode) -> Vec<NodeRef> {
    apply(Combinator::Nest, source, key, values, mode)
}

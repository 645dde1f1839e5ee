use crate::{
    ast::{CompareOp, Expr, Scope},
    node::{Node, NodeRef},
    parser::{ParseError, parse_predicate},
};

/// Evaluates predicates over one sibling list.
///
/// The evaluator is bound to its item sequence for its whole lifetime, so
/// every mask it returns has exactly one entry per item and masks can be
/// combined element-wise.
///
/// # Examples
///
/// ```
/// use treebuilder::{Evaluator, Node, parser::parse_predicate};
///
/// let items = vec![Node::record("Name", "foo"), Node::record("Name", "bar")];
/// let expr = parse_predicate("Name=foo").unwrap();
///
/// let mask = Evaluator::new(&items).eval(&expr);
/// assert_eq!(mask, vec![true, false]);
/// ```
pub struct Evaluator<'a> {
    items: &'a [NodeRef],
}

impl<'a> Evaluator<'a> {
    pub fn new(items: &'a [NodeRef]) -> Self {
        Evaluator { items }
    }

    /// Number of items the evaluator is bound to.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn eval(&self, expr: &Expr) -> Vec<bool> {
        match expr {
            Expr::Compare {
                op,
                scope,
                key,
                value,
            } => self
                .items
                .iter()
                .map(|item| {
                    let text = field_text(&item.borrow(), *scope, key);
                    let equal = text.as_deref() == Some(value.as_str());
                    match op {
                        CompareOp::Equal => equal,
                        CompareOp::NotEqual => !equal,
                    }
                })
                .collect(),
            Expr::Logical { op, left, right } => {
                let left = self.eval(left);
                let right = self.eval(right);
                left.into_iter()
                    .zip(right)
                    .map(|(l, r)| op.apply(l, r))
                    .collect()
            }
        }
    }
}

/// Text of `key` in the map selected by `scope`.
///
/// Keys holding a child sequence have no text, so they never compare equal.
fn field_text(node: &Node, scope: Scope, key: &str) -> Option<String> {
    match scope {
        Scope::Plain => node.scalar(key).map(|s| s.to_text()),
        Scope::Attribute => node.attribute(key).map(|s| s.to_text()),
    }
}

/// Parses `source` and evaluates it against `items`.
pub fn filter_mask(source: &str, items: &[NodeRef]) -> Result<Vec<bool>, ParseError> {
    let expr = parse_predicate(source)?;
    Ok(Evaluator::new(items).eval(&expr))
}

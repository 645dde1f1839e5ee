use crate::ast::{CompareOp, LogicalOp};

/// Which map of a node a comparison reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    /// Plain node keys
    #[default]
    Plain,

    /// The node's attribute map (`@name`)
    Attribute,
}

/// Parsed filter predicate.
///
/// Every variant evaluates to one boolean per item of the sibling list the
/// predicate is bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Field comparison
    ///
    /// # Examples
    /// ```text
    /// title="Harry Potter"    // Compare { scope: Plain, key: "title", .. }
    /// @xsi:type != BarType    // Compare { scope: Attribute, key: "xsi:type", .. }
    /// ```
    Compare {
        op: CompareOp,
        scope: Scope,
        key: String,
        value: String,
    },

    /// Element-wise AND / OR of two masks
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn compare(op: CompareOp, scope: Scope, key: impl Into<String>, value: impl Into<String>) -> Self {
        Expr::Compare {
            op,
            scope,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn logical(op: LogicalOp, left: Expr, right: Expr) -> Self {
        Expr::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

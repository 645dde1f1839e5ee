use std::fmt;

use crate::node::NodeRef;

/// A leaf value stored in the tree.
///
/// Scalars live either under a plain entry key of a node or inside the
/// node's attribute map. Filters and exporters only ever see them as text,
/// see [`Scalar::to_text`].
///
/// # Examples
///
/// ```
/// use treebuilder::Scalar;
///
/// assert_eq!(Scalar::from("Sapiens").to_text(), "Sapiens");
/// assert_eq!(Scalar::from(3).to_text(), "3");
/// assert_eq!(Scalar::from(9.99).to_text(), "9.99");
/// assert_eq!(Scalar::from(39.0).to_text(), "39.0");
/// assert_eq!(Scalar::from(true).to_text(), "true");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// UTF-8 string
    String(String),

    /// Integer number (kept apart from floats so it renders without a fraction)
    Integer(i64),

    /// Floating-point number
    Float(f64),

    /// Boolean (true/false)
    Boolean(bool),
}

impl Scalar {
    /// Textual form used by filter comparisons and by the exporters.
    ///
    /// Floats keep their fraction even when it is zero, so `39.0` never
    /// reads as the integer `39`.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::String(s) => s.clone(),
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(n) => format!("{n:?}"),
            Scalar::Boolean(b) => b.to_string(),
        }
    }

    /// Get as string slice, only for string scalars
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Integer(n) => Some(*n as f64),
            Scalar::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Integer(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Integer(n.into())
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Float(n)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Boolean(b)
    }
}

/// A value handed to `set` / `expand` / `cross` / `nest`.
///
/// Most writes are scalars. A value can also be a list of subtree templates,
/// in which case the entry key becomes a child sequence and every write
/// receives its own deep copy of the templates.
///
/// # Examples
///
/// ```
/// use treebuilder::{Node, Value};
///
/// let title = Value::from("Harry Potter");
/// let price = Value::from(9.99);
/// let sub_node = Value::nodes(vec![Node::new_ref()]);
/// assert!(title.is_scalar());
/// assert!(price.is_scalar());
/// assert!(!sub_node.is_scalar());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Leaf value
    Scalar(Scalar),

    /// Subtree templates written as a child sequence
    Nodes(Vec<NodeRef>),
}

impl Value {
    /// Wraps subtree templates.
    pub fn nodes(templates: Vec<NodeRef>) -> Self {
        Value::Nodes(templates)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Nodes(_) => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

macro_rules! value_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Scalar(v.into())
                }
            }
        )*
    };
}

value_from_scalar!(&str, String, i64, i32, f64, bool);

//! Tree exporters.
//!
//! Two serializations of a built tree:
//!
//! - **[json]** - structured document; one-element child sequences collapse
//!   to a single object, longer ones stay arrays
//! - **[xml]** - markup; attribute maps become element attributes and
//!   scalar leaves become text elements
//!
//! # Examples
//!
//! ```
//! use treebuilder::TreeBuilder;
//! use treebuilder::output::{JsonOptions, XmlOptions, to_json_string, to_xml_string};
//!
//! let mut builder = TreeBuilder::new();
//! builder.expand("bookstore/book/title", ["Sapiens", "Harry Potter"]).unwrap();
//!
//! let json = to_json_string(builder.root(), &JsonOptions { pretty: false }).unwrap();
//! assert_eq!(json, r#"{"bookstore":{"book":[{"title":"Sapiens"},{"title":"Harry Potter"}]}}"#);
//!
//! let xml = to_xml_string(builder.root(), &XmlOptions::compact()).unwrap();
//! assert_eq!(
//!     xml,
//!     "<bookstore><book><title>Sapiens</title></book><book><title>Harry Potter</title></book></bookstore>"
//! );
//! ```

pub mod json;
pub mod xml;

use std::io;

use thiserror::Error;

pub use json::{JsonOptions, node_to_json, scalar_to_json, to_json_string, to_json_value, write_json};
pub use xml::{XmlOptions, to_xml_string, write_xml};

/// Errors raised by the exporters.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("xml root has to be unique, but was: {}", keys.join(", "))]
    AmbiguousRoot { keys: Vec<String> },

    #[error("xml root has to be unique, but '{tag}' holds {count} nodes")]
    RepeatedRoot { tag: String, count: usize },

    #[error("cannot export an empty tree as xml without an explicit root")]
    EmptyTree,

    #[error("top-level entry '{0}' is a value; xml needs an element at the top")]
    ScalarRoot(String),

    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("exporter produced invalid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

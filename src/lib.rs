pub mod ast;
pub mod builder;
pub mod combinators;
pub mod evaluator;
pub mod lexer;
pub mod node;
pub mod output;
pub mod parser;
pub mod path;
pub mod resolver;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::tokens::{Token, TokenKind};
pub use ast::{CompareOp, Expr, LogicalOp, Scope};
pub use builder::{Selected, TreeBuilder, TreeError, WriteOptions};
pub use combinators::{Combinator, cross, expand, nest};
pub use evaluator::{Evaluator, filter_mask};
pub use lexer::{LexError, Lexer};
pub use node::{CopyMode, Entry, Node, NodeRef, SeqRef};
pub use output::{ExportError, JsonOptions, XmlOptions};
pub use parser::{ParseError, Parser, parse_predicate};
pub use path::{Path, PathError, Step};
pub use value::{Scalar, Value};

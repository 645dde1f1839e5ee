//! # Filter Predicates - Abstract Syntax Tree
//!
//! Path steps may carry a bracketed predicate that selects a subset of the
//! sibling list they address:
//!
//! ```text
//! bookstore/book[title="Harry Potter"]/price
//! Root/Node[Name=foo and @xsi:type=BarType]/Details
//! ```
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Comparison and logical operators
//! - **[expressions]** - Predicate nodes and the comparison scope
//!
//! ## Grammar
//!
//! Precedence from low to high:
//!
//! ```text
//! expr   := expr AND term | expr OR term | term
//! term   := term '=' factor | term '!=' factor | '@' factor | factor
//! factor := NUMBER | TEXT | IDENTIFIER | '(' expr ')'
//! ```
//!
//! `and` and `or` share one level and associate left, so
//! `a=1 or b=2 and c=3` reads as `(a=1 or b=2) and c=3`.
//!
//! ## Evaluation
//!
//! A predicate is always bound to a sibling list and yields one boolean per
//! sibling. Comparisons are textual: `Count=1` matches a node whose `Count`
//! leaf renders as `1`, whatever its stored type.
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{Expr, Scope};
pub use operators::{CompareOp, LogicalOp};
pub use tokens::{Token, TokenKind};

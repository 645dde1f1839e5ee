use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

use crate::{
    ast::Expr,
    node::ATTRIBUTE_MARKER,
    parser::{ParseError, parse_predicate},
};

/// `tag[filter]`: the tag is everything before the first `[`, the filter
/// everything between it and the final `]`.
static STEP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?s)(?P<tag>[^\[]*)\[(?P<filter>.*)\]$").expect("step pattern is valid")
});

/// Errors raised while parsing or walking a path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("path '{0}' has no steps")]
    Empty(String),

    #[error("ancestor '{ancestor}' is not a step of '{path}'")]
    UnknownAncestor { ancestor: String, path: String },

    #[error("invalid filter in step '{step}': {source}")]
    Filter { step: String, source: ParseError },

    #[error("step '{tag}' of '{path}' holds a value, not child nodes")]
    LeafInPath { tag: String, path: String },
}

/// One `/`-separated step of a path.
///
/// # Examples
/// - `book` → `Step { tag: "book", filter: None }`
/// - `book[title="Sapiens"]` → `Step { tag: "book", filter: Some("title=\"Sapiens\"") }`
/// - `@lang` → `Step { tag: "@lang", filter: None }` (attribute entry key)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub tag: String,
    pub filter: Option<String>,
}

impl Step {
    pub fn parse(segment: &str) -> Step {
        match STEP.captures(segment) {
            Some(caps) => Step {
                tag: caps["tag"].to_string(),
                filter: Some(caps["filter"].to_string()),
            },
            None => Step {
                tag: segment.split('[').next().unwrap_or_default().to_string(),
                filter: None,
            },
        }
    }

    /// True when the tag targets the attribute map (`@name`).
    pub fn is_attribute(&self) -> bool {
        self.tag.starts_with(ATTRIBUTE_MARKER)
    }

    /// Parses the step's filter, if any.
    pub fn predicate(&self) -> Result<Option<Expr>, PathError> {
        self.filter
            .as_deref()
            .map(|source| {
                parse_predicate(source).map_err(|source| PathError::Filter {
                    step: self.to_string(),
                    source,
                })
            })
            .transpose()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filter {
            Some(filter) => write!(f, "{}[{}]", self.tag, filter),
            None => f.write_str(&self.tag),
        }
    }
}

/// A parsed path: ordered steps, the last one naming the entry key.
///
/// Empty segments are ignored, so leading, trailing and repeated slashes
/// are harmless. Slashes inside `[...]` or quotes belong to the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    steps: Vec<Step>,
}

impl Path {
    pub fn parse(path: &str) -> Result<Path, PathError> {
        let steps: Vec<Step> = split_segments(path).into_iter().map(Step::parse).collect();
        if steps.is_empty() {
            return Err(PathError::Empty(path.to_string()));
        }
        Ok(Path { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The final step.
    pub fn entry(&self) -> &Step {
        &self.steps[self.steps.len() - 1]
    }

    /// The tag of the final step, where values are written.
    pub fn entry_key(&self) -> &str {
        &self.entry().tag
    }

    /// Index of the first non-final step tagged `ancestor`.
    pub fn ancestor_index(&self, ancestor: &str) -> Result<usize, PathError> {
        self.steps[..self.steps.len() - 1]
            .iter()
            .position(|step| step.tag == ancestor)
            .ok_or_else(|| PathError::UnknownAncestor {
                ancestor: ancestor.to_string(),
                path: self.to_string(),
            })
    }

    /// The steps strictly below `index`.
    pub fn below(&self, index: usize) -> Path {
        Path {
            steps: self.steps[index + 1..].to_vec(),
        }
    }

    /// Parses every filter of the path without touching any tree.
    pub fn validate(&self) -> Result<(), PathError> {
        for step in &self.steps {
            step.predicate()?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

/// Splits on `/` outside of brackets and quotes, dropping empty segments.
fn split_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, ch) in path.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if depth > 0 => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, '/') if depth == 0 => {
                segments.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&path[start..]);

    segments.into_iter().filter(|s| !s.is_empty()).collect()
}

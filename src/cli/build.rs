//! Run a tree script and export the result

use serde::Deserialize;

use super::{CliError, json_to_value};
use crate::{
    JsonOptions, Path, TreeBuilder, WriteOptions, XmlOptions, combinators::Combinator, node::CopyMode,
    value::Value,
};

/// Output format of the build command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Xml,
    Json,
}

/// Options for the build command
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// The JSON script to run
    pub script: String,
    /// Export format
    pub format: Format,
    /// Wrapping element for XML output
    pub root: Option<String>,
    /// Single-line output
    pub compact: bool,
    /// Only validate paths and filters, don't build
    pub syntax_only: bool,
}

/// Result of a build operation
#[derive(Debug)]
pub enum BuildResult {
    /// Every path and filter of the script parsed
    SyntaxValid { operations: usize },
    /// Exported tree
    Output(String),
}

/// Write operation named by a script entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Set,
    Expand,
    Cross,
    Nest,
}

impl Op {
    pub fn name(self) -> &'static str {
        match self {
            Op::Set => "set",
            Op::Expand => "expand",
            Op::Cross => "cross",
            Op::Nest => "nest",
        }
    }
}

/// One entry of a tree script.
///
/// ```json
/// {"op": "cross", "path": "bookstore/book/@lang", "values": ["en", "fr"], "copy": "deep"}
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Operation {
    pub op: Op,
    pub path: String,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub values: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub from_ancestor: Option<String>,
    #[serde(default)]
    pub copy: CopyMode,
}

impl Operation {
    fn options(&self) -> WriteOptions {
        WriteOptions {
            from_ancestor: self.from_ancestor.clone(),
            copy: self.copy,
        }
    }

    /// `set` takes exactly one `value`; the combinators take `values`.
    fn values(&self, index: usize) -> Result<Vec<Value>, CliError> {
        let invalid = |message: String| CliError::Operation { index, message };

        let raw = match (self.op, &self.value, &self.values) {
            (Op::Set, Some(value), None) => vec![value],
            (Op::Set, _, _) => return Err(invalid("'set' takes a single 'value'".to_string())),
            (_, None, Some(values)) => values.iter().collect(),
            (op, _, _) => return Err(invalid(format!("'{}' takes a 'values' list", op.name()))),
        };

        raw.into_iter()
            .map(json_to_value)
            .collect::<Result<_, _>>()
            .map_err(invalid)
    }

    fn combinator(&self) -> Combinator {
        match self.op {
            Op::Set | Op::Expand => Combinator::Expand,
            Op::Cross => Combinator::Cross,
            Op::Nest => Combinator::Nest,
        }
    }

    /// Parses the path, every filter and the ancestor tag.
    fn validate(&self, index: usize) -> Result<(), CliError> {
        let path = Path::parse(&self.path).map_err(|source| CliError::Path { index, source })?;
        path.validate().map_err(|source| CliError::Path { index, source })?;
        if let Some(ancestor) = &self.from_ancestor {
            path.ancestor_index(ancestor)
                .map_err(|source| CliError::Path { index, source })?;
        }
        Ok(())
    }
}

/// Decodes a JSON script: an array of operations.
pub fn parse_script(script: &str) -> Result<Vec<Operation>, CliError> {
    Ok(serde_json::from_str(script)?)
}

/// Execute a build operation
pub fn execute_build(options: &BuildOptions) -> Result<BuildResult, CliError> {
    let operations = parse_script(&options.script)?;

    if options.syntax_only {
        for (index, operation) in operations.iter().enumerate() {
            operation.validate(index)?;
            operation.values(index)?;
        }
        return Ok(BuildResult::SyntaxValid {
            operations: operations.len(),
        });
    }

    let mut builder = TreeBuilder::new();
    for (index, operation) in operations.iter().enumerate() {
        let values = operation.values(index)?;
        builder
            .apply(operation.combinator(), &operation.path, values, &operation.options())
            .map_err(|source| CliError::Tree { index, source })?;
    }

    let output = match options.format {
        Format::Xml => {
            let mut xml = XmlOptions {
                root: options.root.clone(),
                ..XmlOptions::default()
            };
            if options.compact {
                xml.pretty = false;
                xml.declaration = false;
            }
            builder.to_xml_string(&xml)
        }
        Format::Json => builder.to_json_string(&JsonOptions {
            pretty: !options.compact,
        }),
    }
    .map_err(CliError::Export)?;

    Ok(BuildResult::Output(output))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(script: &str, format: Format) -> Result<BuildResult, CliError> {
        execute_build(&BuildOptions {
            script: script.to_string(),
            format,
            compact: true,
            ..BuildOptions::default()
        })
    }

    #[test]
    fn test_build_json() {
        let script = r#"[
            {"op": "expand", "path": "bookstore/book/title", "values": ["Sapiens", "Dune"]},
            {"op": "set", "path": "bookstore/book[title=Dune]/price", "value": 9}
        ]"#;
        let BuildResult::Output(output) = build(script, Format::Json).unwrap() else {
            panic!("expected output");
        };
        assert_eq!(
            output,
            r#"{"bookstore":{"book":[{"title":"Sapiens"},{"title":"Dune","price":9}]}}"#
        );
    }

    #[test]
    fn test_set_requires_value() {
        let script = r#"[{"op": "set", "path": "a/b", "values": [1]}]"#;
        let err = build(script, Format::Xml).unwrap_err();
        assert!(matches!(err, CliError::Operation { index: 0, .. }));
    }

    #[test]
    fn test_unknown_field() {
        let script = r#"[{"op": "set", "path": "a/b", "value": 1, "extra": true}]"#;
        assert!(matches!(build(script, Format::Xml), Err(CliError::Script(_))));
    }

    #[test]
    fn test_syntax_only_reports_bad_filter() {
        let options = BuildOptions {
            script: r#"[{"op": "set", "path": "a/b", "value": 1},
                        {"op": "set", "path": "a[x=]/b", "value": 1}]"#
                .to_string(),
            syntax_only: true,
            ..BuildOptions::default()
        };
        let err = execute_build(&options).unwrap_err();
        assert!(matches!(err, CliError::Path { index: 1, .. }));
    }
}

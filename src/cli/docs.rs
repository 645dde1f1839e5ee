//! Documentation content for the treebuilder CLI

use std::str::FromStr;

use super::CliError;

/// Available documentation topics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocTopic {
    Paths,
    Predicates,
    Operations,
}

impl FromStr for DocTopic {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paths" | "path" => Ok(Self::Paths),
            "predicates" | "predicate" | "filters" | "filter" => Ok(Self::Predicates),
            "operations" | "operation" | "ops" | "script" => Ok(Self::Operations),
            _ => Err(CliError::UnknownTopic(s.to_string())),
        }
    }
}

/// Get the docs overview (topic listing)
pub fn get_docs_overview() -> &'static str {
    r#"TREEBUILDER DOCUMENTATION

treebuilder builds nested element trees from path-addressed bulk
assignments. A script is a JSON array of write operations; the resulting
tree is printed as XML or JSON.

DOCUMENTATION TOPICS

  paths             Slash-separated paths, attribute keys, auto-creation
  predicates        Bracketed filters on path steps
  operations        set, expand, cross, nest and the script format

QUICK REFERENCE

  bookstore/book/title              Entry key 'title' under every book
  bookstore/book/@lang              Attribute 'lang' of every book
  book[title="Dune"]                Books whose title is Dune
  book[@lang=en and price=10]       Attribute and plain comparisons

Run 'treebuilder doc <topic>' for detailed documentation.
"#
}

/// Get documentation for a specific topic
pub fn get_doc_topic(name: &str) -> Result<&'static str, CliError> {
    Ok(match name.parse::<DocTopic>()? {
        DocTopic::Paths => PATHS_DOC,
        DocTopic::Predicates => PREDICATES_DOC,
        DocTopic::Operations => OPERATIONS_DOC,
    })
}

const PATHS_DOC: &str = r#"PATHS - Addressing Nodes and Entries

SYNTAX
  step/step/.../entry

  Every step but the last names a child sequence. The last step is the
  entry key that receives the written values.

    bookstore/book/title
      'bookstore' and 'book' are child sequences, 'title' is the entry key.

  A step may carry a filter in brackets, see 'treebuilder doc predicates':

    bookstore/book[title="Harry Potter"]/price

  Slashes inside brackets or quotes do not split the path. Empty segments
  (leading, trailing or doubled slashes) are ignored.

ATTRIBUTES
  An entry key starting with @ writes to the node's attribute map:

    bookstore/book/@lang

  Attributes only hold scalars. In XML they become element attributes,
  in JSON they appear as "@lang" keys.

AUTO-CREATION
  Writing to a path creates every missing step as a one-element sequence
  holding an empty node. When a filter matches no sibling, a fresh node is
  appended to that sequence and receives the write.

  Reading never creates anything; missing steps and empty filter results
  simply select nothing.

  A step naming a key that holds a value (not child nodes) is an error
  when writing and is skipped when reading.
"#;

const PREDICATES_DOC: &str = r#"PREDICATES - Filtering Sibling Lists

GRAMMAR
  expr   := expr AND term | expr OR term | term
  term   := term '=' factor | term '!=' factor | '@' factor | factor
  factor := NUMBER | TEXT | IDENTIFIER | '(' expr ')'

  'and' and 'or' are case-insensitive, share one precedence level and
  associate left:

    a=1 or b=2 and c=3      reads as      (a=1 or b=2) and c=3

  Use parentheses to group differently.

OPERANDS
  IDENTIFIER    Letters, digits, '_' and ':'          Name, xsi:type
  TEXT          Single or double quotes, no escapes   "Harry Potter"
  NUMBER        Digits with an optional fraction      10, 2.5

COMPARISONS
  key=value     The sibling's 'key' leaf equals value
  key!=value    The sibling's 'key' leaf differs from value
  @key=value    Compares the sibling's 'key' attribute instead

  Comparisons are textual: Count=1 matches a leaf holding the integer 1 as
  well as the text "1". A missing key, or one holding child nodes, never
  equals anything.

ERRORS
  Bare operands (book[Name]), '@' without a comparison, '@@' and chained
  comparisons (a=b=c) are rejected.
"#;

const OPERATIONS_DOC: &str = r#"OPERATIONS - Writing Values

Each operation selects the nodes that own the entry key (the 'owners')
and pairs them with a list of values.

  set       Writes one value to every owner.

  expand    Pairs owners and values in a ring. With more values than
            owners, owners are copied: 2 books, 3 titles -> 3 books.
            With more owners than values, values repeat.

  cross     Every owner is combined with every value, value-major:
            2 books x 2 languages -> 4 books.

  nest      Pairs values one-to-one with the existing owners. Never
            adds nodes: surplus values are dropped, and with fewer
            values than owners the values repeat.

FROM ANCESTOR
  With "from_ancestor": "book", pairing happens at the level of the named
  ancestor step instead of the owners. Each ancestor instance (or copy)
  receives its value under the rest of the path.

COPIES
  "copy": "deep" (default) copies whole subtrees. "copy": "shallow" copies
  a node's own entries but shares its child sequences.

SCRIPT FORMAT
  [
    {"op": "expand", "path": "bookstore/book/title",
     "values": ["Sapiens", "Harry Potter"]},
    {"op": "set", "path": "bookstore/book[title=Sapiens]/price",
     "value": 10},
    {"op": "cross", "path": "bookstore/book/@lang",
     "values": ["en", "fr"], "copy": "deep"}
  ]

  'set' takes "value", the others take "values". An object, or an array of
  objects, is written as child nodes:

    {"op": "set", "path": "Root/Node/Details", "value": [{"Id": 1}, {"Id": 2}]}

USAGE
  treebuilder build --script tree.json
  cat tree.json | treebuilder build --format json
  treebuilder build --script tree.json --syntax-only
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_aliases() {
        assert_eq!("Paths".parse::<DocTopic>().unwrap(), DocTopic::Paths);
        assert_eq!("filter".parse::<DocTopic>().unwrap(), DocTopic::Predicates);
        assert_eq!("ops".parse::<DocTopic>().unwrap(), DocTopic::Operations);
        assert!(matches!(get_doc_topic("nope"), Err(CliError::UnknownTopic(_))));
    }
}

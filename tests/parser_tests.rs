// tests/parser_tests.rs

use treebuilder::ast::{CompareOp, Expr, LogicalOp, Scope};
use treebuilder::parser::{ParseError, parse_predicate};
use treebuilder::{Evaluator, LexError, Node, NodeRef, Scalar, filter_mask};

fn items() -> Vec<NodeRef> {
    let rows = [
        vec![("Name", "foo"), ("Value", "10"), ("title", "foo")],
        vec![("Name", "bar"), ("Value", "20"), ("title", "bar")],
        vec![("Value", "20"), ("title", "bar")],
    ];
    rows.iter()
        .map(|row| {
            let mut node = Node::new();
            for (key, value) in row {
                node.assign(key, &(*value).into());
            }
            node.into_ref()
        })
        .collect()
}

fn attributed_items() -> Vec<NodeRef> {
    [("foo", "FooType"), ("bar", "BarType"), ("other", "BarType")]
        .into_iter()
        .map(|(name, ty)| {
            let mut node = Node::new();
            node.assign("Name", &name.into());
            node.set_attribute("xsi:type", Scalar::from(ty));
            node.set_attribute("title", Scalar::from(name));
            node.into_ref()
        })
        .collect()
}

fn mask(source: &str) -> Vec<bool> {
    filter_mask(source, &items()).unwrap()
}

fn eq(key: &str, value: &str) -> Expr {
    Expr::compare(CompareOp::Equal, Scope::Plain, key, value)
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_equal() {
    assert_eq!(mask("Name=foo"), vec![true, false, false]);
}

#[test]
fn test_not_equal() {
    assert_eq!(mask("Name != foo"), vec![false, true, true]);
}

#[test]
fn test_comparison_ast() {
    assert_eq!(parse_predicate("Name=foo").unwrap(), eq("Name", "foo"));
    assert_eq!(
        parse_predicate("@lang != 'en'").unwrap(),
        Expr::compare(CompareOp::NotEqual, Scope::Attribute, "lang", "en")
    );
}

#[test]
fn test_quoted_and_numeric_values() {
    assert_eq!(mask("Value='20'"), vec![false, true, true]);
    assert_eq!(mask("Value=\"10\""), vec![true, false, false]);
    assert_eq!(mask("Value=20"), vec![false, true, true]);
}

#[test]
fn test_comparisons_are_textual() {
    let items = vec![Node::record("Count", 1), Node::record("Count", "1"), Node::record("Count", 2.5)];
    assert_eq!(filter_mask("Count=1", &items).unwrap(), vec![true, true, false]);
    assert_eq!(filter_mask("Count=2.5", &items).unwrap(), vec![false, false, true]);
}

#[test]
fn test_child_sequence_never_equal() {
    let mut node = Node::new();
    node.vivify("Name");
    let items = vec![node.into_ref()];
    assert_eq!(filter_mask("Name=foo", &items).unwrap(), vec![false]);
    assert_eq!(filter_mask("Name!=foo", &items).unwrap(), vec![true]);
}

// ============================================================================
// Logical Operators
// ============================================================================

#[test]
fn test_and_operator() {
    assert_eq!(mask("Name=foo and title=foo"), vec![true, false, false]);
    assert_eq!(mask("Name=foo and title=bar"), vec![false, false, false]);
}

#[test]
fn test_or_operator() {
    assert_eq!(mask("Name=foo or title=foo"), vec![true, false, false]);
    assert_eq!(mask("Name=foo or title=bar"), vec![true, true, true]);
}

#[test]
fn test_or_and_and_operator() {
    assert_eq!(mask("Name=foo or Name=bar and Value=20"), vec![false, true, false]);
}

#[test]
fn test_and_and_or_operator() {
    assert_eq!(mask("Name=foo and Name=bar or Value=20"), vec![false, true, true]);
}

#[test]
fn test_logical_operators_associate_left() {
    let expr = parse_predicate("a=1 or b=2 and c=3").unwrap();
    assert_eq!(
        expr,
        Expr::logical(
            LogicalOp::And,
            Expr::logical(LogicalOp::Or, eq("a", "1"), eq("b", "2")),
            eq("c", "3"),
        )
    );
}

#[test]
fn test_parenthesis() {
    assert_eq!(mask("(Name=foo and Name=bar) or Value=20"), vec![false, true, true]);
    assert_eq!(mask("Name=foo and (Name=bar or Value=20)"), vec![false, false, false]);
    assert_eq!(mask("Name=bar and (title=foo or Value=20)"), vec![false, true, false]);
    assert_eq!(mask("((Name=bar))"), vec![false, true, false]);
}

// ============================================================================
// Mask Algebra
// ============================================================================

const OPERANDS: [&str; 4] = ["Name=foo", "Value=20", "title!=bar", "Name=other"];

#[test]
fn test_idempotence() {
    for a in OPERANDS {
        assert_eq!(mask(&format!("{a} and {a}")), mask(a), "{a}");
        assert_eq!(mask(&format!("{a} or {a}")), mask(a), "{a}");
    }
}

#[test]
fn test_commutativity() {
    for a in OPERANDS {
        for b in OPERANDS {
            assert_eq!(mask(&format!("{a} and {b}")), mask(&format!("{b} and {a}")), "{a} / {b}");
            assert_eq!(mask(&format!("{a} or {b}")), mask(&format!("{b} or {a}")), "{a} / {b}");
        }
    }
}

#[test]
fn test_associativity() {
    for a in OPERANDS {
        for b in OPERANDS {
            for c in OPERANDS {
                for op in ["and", "or"] {
                    assert_eq!(
                        mask(&format!("({a} {op} {b}) {op} {c}")),
                        mask(&format!("{a} {op} ({b} {op} {c})")),
                        "{a} {op} {b} {op} {c}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_mask_length_matches_items() {
    let items = items();
    for a in OPERANDS {
        let expr = parse_predicate(&format!("{a} or ({a} and Name=bar)")).unwrap();
        assert_eq!(Evaluator::new(&items).eval(&expr).len(), items.len());
    }
}

// ============================================================================
// Attributes
// ============================================================================

#[test]
fn test_attributes() {
    let items = attributed_items();
    let mask = |source: &str| Evaluator::new(&items).eval(&parse_predicate(source).unwrap());

    assert_eq!(mask("@title=foo"), vec![true, false, false]);
    assert_eq!(mask("@title != foo"), vec![false, true, true]);
    assert_eq!(mask("@xsi:type = BarType"), vec![false, true, true]);
    assert_eq!(mask("@xsi:type = BarType and Name=bar"), vec![false, true, false]);
    assert_eq!(mask("Name != bar or @xsi:type = BarType"), vec![true, true, true]);
    assert_eq!(mask("@title=other and @xsi:type = BarType"), vec![false, false, true]);
}

#[test]
fn test_attribute_scope_does_not_leak() {
    let items = attributed_items();
    // `Name` is a plain key, not an attribute
    let mask = Evaluator::new(&items).eval(&parse_predicate("@title=foo or Name=other").unwrap());
    assert_eq!(mask, vec![true, false, true]);

    let mask = Evaluator::new(&items).eval(&parse_predicate("@Name=foo").unwrap());
    assert_eq!(mask, vec![false, false, false]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_bare_operand() {
    assert_eq!(
        parse_predicate("Name").unwrap_err(),
        ParseError::NotAComparison { position: 0 }
    );
    assert_eq!(
        parse_predicate("Name=foo and bar").unwrap_err(),
        ParseError::NotAComparison { position: 13 }
    );
}

#[test]
fn test_dangling_attribute() {
    assert_eq!(
        parse_predicate("@lang").unwrap_err(),
        ParseError::DanglingAttribute { position: 0 }
    );
    assert_eq!(
        parse_predicate("@@lang=en").unwrap_err(),
        ParseError::DanglingAttribute { position: 0 }
    );
    assert_eq!(
        parse_predicate("a=1 and @(b=2)").unwrap_err(),
        ParseError::DanglingAttribute { position: 8 }
    );
}

#[test]
fn test_chained_comparison() {
    assert!(matches!(
        parse_predicate("a=b=c").unwrap_err(),
        ParseError::InvalidOperand { position: 0, .. }
    ));
}

#[test]
fn test_parenthesised_right_operand() {
    assert!(matches!(
        parse_predicate("a=(b=c)").unwrap_err(),
        ParseError::InvalidOperand { position: 2, .. }
    ));
}

#[test]
fn test_missing_operand() {
    assert_eq!(
        parse_predicate("Name=").unwrap_err(),
        ParseError::UnexpectedEnd {
            expected: "a name, a number, quoted text or `(`"
        }
    );
    assert!(matches!(
        parse_predicate("Name= and b=1").unwrap_err(),
        ParseError::UnexpectedToken { position: 6, .. }
    ));
}

#[test]
fn test_unbalanced_parenthesis() {
    assert_eq!(
        parse_predicate("(Name=foo").unwrap_err(),
        ParseError::UnexpectedEnd { expected: "`)`" }
    );
    assert!(matches!(
        parse_predicate("Name=foo)").unwrap_err(),
        ParseError::UnexpectedToken { position: 8, .. }
    ));
}

#[test]
fn test_empty_predicate() {
    assert!(matches!(
        parse_predicate("").unwrap_err(),
        ParseError::UnexpectedEnd { .. }
    ));
}

#[test]
fn test_lex_error_is_wrapped() {
    assert_eq!(
        parse_predicate("Name=#").unwrap_err(),
        ParseError::Lex(LexError::UnexpectedCharacter {
            character: '#',
            position: 5
        })
    );
}

#[test]
fn test_error_messages() {
    let err = parse_predicate("Name=foo)").unwrap_err();
    assert_eq!(err.to_string(), "expected end of predicate, found `)` at position 8");

    let err = parse_predicate("'open").unwrap_err();
    assert_eq!(err.to_string(), "unterminated text starting at position 0");
}

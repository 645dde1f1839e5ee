use std::mem;

use thiserror::Error;

use crate::{
    ast::{CompareOp, Expr, LogicalOp, Scope, Token, TokenKind},
    lexer::{LexError, Lexer},
};

/// Errors raised while parsing a filter predicate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found} at position {position}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: usize,
    },

    #[error("unexpected end of predicate, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("expected a comparison at position {position}")]
    NotAComparison { position: usize },

    #[error("{found} cannot be used as a comparison operand (position {position})")]
    InvalidOperand { found: String, position: usize },

    #[error("'@' at position {position} must be followed by an attribute name and a comparison")]
    DanglingAttribute { position: usize },
}

/// Intermediate value of the `term` and `factor` rules.
///
/// A factor is either a raw operand (a name or a literal) or an already
/// parenthesised predicate. Only comparisons turn operands into predicates.
#[derive(Debug)]
enum Term {
    Operand {
        scope: Scope,
        text: String,
        position: usize,
    },
    Predicate {
        expr: Expr,
        position: usize,
    },
}

impl Term {
    fn position(&self) -> usize {
        match self {
            Term::Operand { position, .. } | Term::Predicate { position, .. } => *position,
        }
    }

    fn into_predicate(self) -> Result<Expr, ParseError> {
        match self {
            Term::Predicate { expr, .. } => Ok(expr),
            Term::Operand {
                scope: Scope::Attribute,
                position,
                ..
            } => Err(ParseError::DanglingAttribute { position }),
            Term::Operand { position, .. } => Err(ParseError::NotAComparison { position }),
        }
    }
}

/// Precedence-climbing parser for filter predicates.
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
        })
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current_token, next))
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_token.is(kind)
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        if self.check(TokenKind::Eof) {
            ParseError::UnexpectedEnd { expected }
        } else {
            ParseError::UnexpectedToken {
                expected,
                found: self.current_token.to_string(),
                position: self.current_token.position,
            }
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        if !self.check(kind) {
            return Err(self.unexpected(expected));
        }
        self.advance()
    }

    /// factor := NUMBER | TEXT | IDENTIFIER | '(' expr ')'
    fn parse_factor(&mut self) -> Result<Term, ParseError> {
        match self.current_token.kind {
            TokenKind::Number | TokenKind::Text | TokenKind::Identifier => {
                let token = self.advance()?;
                Ok(Term::Operand {
                    scope: Scope::Plain,
                    text: token.lexeme,
                    position: token.position,
                })
            }
            TokenKind::LParen => {
                let open = self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(Term::Predicate {
                    expr,
                    position: open.position,
                })
            }
            _ => Err(self.unexpected("a name, a number, quoted text or `(`")),
        }
    }

    /// '@' factor
    fn parse_attribute(&mut self) -> Result<Term, ParseError> {
        let at = self.advance()?;
        if self.check(TokenKind::At) {
            return Err(ParseError::DanglingAttribute {
                position: at.position,
            });
        }

        match self.parse_factor()? {
            Term::Operand { text, .. } => Ok(Term::Operand {
                scope: Scope::Attribute,
                text,
                position: at.position,
            }),
            Term::Predicate { .. } => Err(ParseError::DanglingAttribute {
                position: at.position,
            }),
        }
    }

    /// term := term '=' factor | term '!=' factor | '@' factor | factor
    fn parse_term(&mut self) -> Result<Term, ParseError> {
        let mut left = if self.check(TokenKind::At) {
            self.parse_attribute()?
        } else {
            self.parse_factor()?
        };

        loop {
            let op = match self.current_token.kind {
                TokenKind::Eq => CompareOp::Equal,
                TokenKind::NotEq => CompareOp::NotEqual,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_factor()?;

            let position = left.position();
            let (scope, key) = match left {
                Term::Operand { scope, text, .. } => (scope, text),
                Term::Predicate { position, .. } => {
                    return Err(ParseError::InvalidOperand {
                        found: "a comparison".to_string(),
                        position,
                    });
                }
            };
            let value = match right {
                Term::Operand { text, .. } => text,
                Term::Predicate { position, .. } => {
                    return Err(ParseError::InvalidOperand {
                        found: "a parenthesised predicate".to_string(),
                        position,
                    });
                }
            };

            left = Term::Predicate {
                expr: Expr::compare(op, scope, key, value),
                position,
            };
        }
        Ok(left)
    }

    /// expr := expr AND term | expr OR term | term
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?.into_predicate()?;

        loop {
            let op = match self.current_token.kind {
                TokenKind::And => LogicalOp::And,
                TokenKind::Or => LogicalOp::Or,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_term()?.into_predicate()?;
            left = Expr::logical(op, left, right);
        }
        Ok(left)
    }

    /// Parses a complete predicate; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Eof, "end of predicate")?;
        Ok(expr)
    }
}

/// Lexes and parses `source` in one go.
pub fn parse_predicate(source: &str) -> Result<Expr, ParseError> {
    Parser::new(Lexer::new(source))?.parse()
}

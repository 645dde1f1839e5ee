use thiserror::Error;

use crate::ast::{Token, TokenKind};

/// Errors raised while tokenizing a filter predicate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("unterminated text starting at position {position}")]
    UnterminatedText { position: usize },
}

impl LexError {
    pub fn position(&self) -> usize {
        match self {
            LexError::UnexpectedCharacter { position, .. } => *position,
            LexError::UnterminatedText { position } => *position,
        }
    }
}

/// Tokenizer for filter predicates.
///
/// Tokens are produced lazily through [`Lexer::next_token`] or the
/// [`Iterator`] impl. Cloning a lexer, or calling [`Lexer::reset`], restarts
/// the sequence.
#[derive(Debug, Clone)]
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    failed: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            failed: false,
        }
    }

    /// Rewinds to the start of the input.
    pub fn reset(&mut self) {
        self.position = 0;
        self.failed = false;
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if accept(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        let ident = self.read_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':');

        let kind = if ident.eq_ignore_ascii_case("and") {
            TokenKind::And
        } else if ident.eq_ignore_ascii_case("or") {
            TokenKind::Or
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, ident, start)
    }

    fn read_text(&mut self, quote: char, start: usize) -> Result<Token, LexError> {
        self.advance(); // Consume opening quote

        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == quote {
                return Ok(Token::new(TokenKind::Text, result, start));
            }
            result.push(ch);
        }

        Err(LexError::UnterminatedText { position: start })
    }

    fn read_number(&mut self, start: usize) -> Token {
        let mut number = self.read_while(|c| c.is_ascii_digit());

        if self.current_char() == Some('.') && self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            number.push('.');
            number.push_str(&self.read_while(|c| c.is_ascii_digit()));
        }

        Token::new(TokenKind::Number, number, start)
    }

    fn single(&mut self, kind: TokenKind, lexeme: &str) -> Token {
        let token = Token::new(kind, lexeme, self.position);
        self.position += lexeme.chars().count();
        token
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let start = self.position;

        match self.current_char() {
            None => Ok(Token::new(TokenKind::Eof, "", start)),
            Some('=') => Ok(self.single(TokenKind::Eq, "=")),
            Some('!') if self.peek_char(1) == Some('=') => Ok(self.single(TokenKind::NotEq, "!=")),
            Some('(') => Ok(self.single(TokenKind::LParen, "(")),
            Some(')') => Ok(self.single(TokenKind::RParen, ")")),
            Some('@') => Ok(self.single(TokenKind::At, "@")),
            Some(quote @ ('"' | '\'')) => self.read_text(quote, start),
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' || ch == ':' => {
                Ok(self.read_identifier(start))
            }
            Some(ch) if ch.is_ascii_digit() => Ok(self.read_number(start)),
            Some(character) => Err(LexError::UnexpectedCharacter {
                character,
                position: start,
            }),
        }
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, LexError>;

    /// Yields tokens up to, but excluding, the end marker. Stops after the
    /// first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.is(TokenKind::Eof) => None,
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Collects every token of `input`, without the end marker.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).collect()
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and OR And");
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::And);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Or);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::And);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

#[test]
fn test_restart() {
    let mut lexer = Lexer::new("Name=foo");
    let first: Vec<_> = lexer.by_ref().collect();
    lexer.reset();
    let second: Vec<_> = lexer.collect();
    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

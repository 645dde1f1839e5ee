/// Kind of a filter token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Operands
    /// Field name
    ///
    /// Starts with a letter, underscore or colon, followed by letters,
    /// digits, underscores or colons. Colons allow namespaced names.
    ///
    /// # Examples
    /// ```text
    /// title
    /// is_in_stock
    /// xsi:type
    /// ```
    Identifier,

    /// Quoted text, single or double quotes. The lexeme is the interior.
    ///
    /// # Examples
    /// ```text
    /// 'Harry Potter'
    /// "A Time of Mercy"
    /// ```
    Text,

    /// Number, kept as raw text
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 9.99
    /// ```
    Number,

    // Logical
    /// Logical AND (word, any case)
    And,

    /// Logical OR (word, any case)
    Or,

    // Comparison
    /// Equality operator `=`
    Eq,

    /// Inequality operator `!=`
    NotEq,

    // Delimiters
    /// Left parenthesis for grouping
    LParen,

    /// Right parenthesis
    RParen,

    /// Attribute marker `@`
    ///
    /// The comparison that follows reads the attribute map instead of the
    /// plain node keys.
    ///
    /// # Examples
    /// ```text
    /// @lang=en
    /// @xsi:type != BarType
    /// ```
    At,

    /// End of input
    Eof,
}

/// A filter token with its raw lexeme and the character offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Text => write!(f, "'{}'", self.lexeme),
            _ => write!(f, "`{}`", self.lexeme),
        }
    }
}

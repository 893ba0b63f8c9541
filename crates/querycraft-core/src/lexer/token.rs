//! Token types for the SQL lexer.

use super::Span;

/// Keywords that shape statement structure.
///
/// Anything else (function names, `CASE`, `DISTINCT`, ...) lexes as an
/// identifier and is carried through verbatim as expression text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Statement structure
    With,
    As,
    Select,
    From,
    Where,
    Group,
    Order,
    By,
    Limit,
    Offset,

    // Joins
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    On,

    // Set operations
    Union,
    All,

    // Predicates
    And,
    Or,
    Not,
    In,
    Like,
    Between,
    Is,
    Null,

    // Ordering
    Asc,
    Desc,
}

impl Keyword {
    /// Attempts to parse a keyword from a word (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "WITH" => Some(Self::With),
            "AS" => Some(Self::As),
            "SELECT" => Some(Self::Select),
            "FROM" => Some(Self::From),
            "WHERE" => Some(Self::Where),
            "GROUP" => Some(Self::Group),
            "ORDER" => Some(Self::Order),
            "BY" => Some(Self::By),
            "LIMIT" => Some(Self::Limit),
            "OFFSET" => Some(Self::Offset),
            "JOIN" => Some(Self::Join),
            "INNER" => Some(Self::Inner),
            "LEFT" => Some(Self::Left),
            "RIGHT" => Some(Self::Right),
            "FULL" => Some(Self::Full),
            "OUTER" => Some(Self::Outer),
            "ON" => Some(Self::On),
            "UNION" => Some(Self::Union),
            "ALL" => Some(Self::All),
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NOT" => Some(Self::Not),
            "IN" => Some(Self::In),
            "LIKE" => Some(Self::Like),
            "BETWEEN" => Some(Self::Between),
            "IS" => Some(Self::Is),
            "NULL" => Some(Self::Null),
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            _ => None,
        }
    }

    /// Returns the keyword as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::With => "WITH",
            Self::As => "AS",
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Group => "GROUP",
            Self::Order => "ORDER",
            Self::By => "BY",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
            Self::Join => "JOIN",
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
            Self::Outer => "OUTER",
            Self::On => "ON",
            Self::Union => "UNION",
            Self::All => "ALL",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::In => "IN",
            Self::Like => "LIKE",
            Self::Between => "BETWEEN",
            Self::Is => "IS",
            Self::Null => "NULL",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    /// Unsigned numeric literal, kept as written (e.g. `42`, `3.5`).
    Number(String),
    /// Quoted literal including its quotes (e.g. `'it''s'`, `"x"`).
    String(String),

    // Identifiers and keywords
    /// Bare word that is not a structural keyword.
    Identifier(String),
    /// Structural keyword.
    Keyword(Keyword),

    // Comparison operators
    /// =
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// ,
    Comma,
    /// .
    Dot,
    /// *
    Star,
    /// ;
    Semicolon,

    /// Any other operator character or sequence (`+`, `||`, `::`, ...).
    Symbol(String),

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns true for the six comparison operators.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }

    /// Returns true if a word placed after this token would continue an
    /// expression rather than name an alias.
    #[must_use]
    pub const fn expects_operand(&self) -> bool {
        matches!(
            self,
            Self::Eq
                | Self::NotEq
                | Self::Lt
                | Self::LtEq
                | Self::Gt
                | Self::GtEq
                | Self::LeftParen
                | Self::Comma
                | Self::Dot
                | Self::Star
                | Self::Symbol(_)
                | Self::Keyword(_)
        )
    }
}

/// A token with its span in the normalized source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns true if this token is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.as_keyword() == Some(keyword)
    }

    /// Returns the word if this is a bare identifier.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Returns true if whitespace separates this token from `previous`.
    #[must_use]
    pub const fn is_spaced_from(&self, previous: &Self) -> bool {
        self.span.start > previous.span.end
    }
}

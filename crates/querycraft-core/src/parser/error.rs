//! Parser error and diagnostic types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::lexer::{Span, Token};

use super::scan::{span_of, text_of};

/// A hard parse failure. Only empty input produces one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {}..{}", span.start, span.end)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The offending input text.
    pub fragment: String,
    /// The location of the fragment in the raw input.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, fragment: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            fragment: fragment.into(),
            span,
        }
    }

    /// The error for input that holds no SQL at all.
    #[must_use]
    pub fn no_sql(input: &str) -> Self {
        Self::new("no SQL provided", input, Span::new(0, input.len()))
    }
}

/// The part of the statement a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    /// Text outside any recognized clause.
    Statement,
    /// The `WITH` region as a whole.
    With,
    /// One CTE definition.
    Cte,
    Select,
    From,
    Join,
    Where,
    GroupBy,
    OrderBy,
    Limit,
    Offset,
}

impl Clause {
    /// Returns the SQL spelling of the clause keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Statement => "statement",
            Self::With => "WITH",
            Self::Cte => "CTE",
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Join => "JOIN",
            Self::Where => "WHERE",
            Self::GroupBy => "GROUP BY",
            Self::OrderBy => "ORDER BY",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A piece of input the parser could not interpret and left out of the
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub clause: Clause,
    pub message: String,
    /// The text that was dropped or only partly used.
    pub fragment: String,
    /// Location in the normalized SQL text.
    pub span: Span,
}

impl Diagnostic {
    /// Creates a diagnostic pointing at a token slice of `source`.
    #[must_use]
    pub fn new(clause: Clause, message: impl Into<String>, source: &str, tokens: &[Token]) -> Self {
        Self {
            clause,
            message: message.into(),
            fragment: text_of(source, tokens).to_string(),
            span: span_of(tokens),
        }
    }

    /// Creates a diagnostic pointing at a single token.
    #[must_use]
    pub fn at(clause: Clause, message: impl Into<String>, source: &str, token: &Token) -> Self {
        Self::new(clause, message, source, std::slice::from_ref(token))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} `{}` at position {}..{}",
            self.clause, self.message, self.fragment, self.span.start, self.span.end
        )
    }
}

//! SQL Dialect support.
//!
//! The generator asks a dialect how to spell identifiers and literals. Only
//! the generic dialect ships today; the trait is the seam for others.

mod generic;

pub use generic::GenericDialect;

/// Trait for dialect-specific rendering.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the quote character used for string literals.
    fn string_quote(&self) -> char {
        '\''
    }

    /// Returns true if `c` may appear in an emitted identifier.
    fn is_identifier_char(&self, c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_' || c == '.'
    }

    /// Strips every character the dialect does not allow in identifiers.
    fn sanitize_identifier(&self, name: &str) -> String {
        name.chars().filter(|&c| self.is_identifier_char(c)).collect()
    }

    /// Quotes a raw value as a string literal, doubling embedded quotes.
    fn quote_string(&self, value: &str) -> String {
        let quote = self.string_quote();
        let escaped = value.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    /// Renders user-typed value text as a SQL literal.
    ///
    /// Absent values become `NULL`. Parenthesized lists, unsigned numbers
    /// and already-quoted text pass through unchanged; anything else is
    /// quoted.
    fn literal(&self, value: Option<&str>) -> String {
        let Some(value) = value else {
            return String::from("NULL");
        };
        let trimmed = value.trim();
        if is_parenthesized(trimmed) || is_unsigned_number(trimmed) || is_quoted(trimmed) {
            return trimmed.to_string();
        }
        self.quote_string(trimmed)
    }
}

/// `(...)`, e.g. an `IN` list.
fn is_parenthesized(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('(') && text.ends_with(')')
}

/// `\d+(\.\d+)?`
fn is_unsigned_number(text: &str) -> bool {
    let (int, frac) = match text.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (text, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && frac.is_none_or(all_digits)
}

/// `'...'` or `"..."`.
fn is_quoted(text: &str) -> bool {
    text.len() >= 2
        && ((text.starts_with('\'') && text.ends_with('\''))
            || (text.starts_with('"') && text.ends_with('"')))
}

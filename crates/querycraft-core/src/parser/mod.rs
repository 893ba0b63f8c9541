//! SQL Parser
//!
//! A lenient, clause-oriented parser. Input is normalized and lexed, then
//! split at depth-0 keywords: `WITH` definitions, `UNION` boundaries and the
//! clauses of each statement. Clause bodies are interpreted piece by piece;
//! pieces that do not fit the editable model are left out and reported as
//! [`Diagnostic`]s instead of failing the parse.

mod clauses;
mod error;
mod interpret;
#[allow(clippy::module_inception)]
mod parser;
mod scan;

pub use error::{Clause, Diagnostic, ParseError};
pub use parser::{Parsed, Parser};

use crate::model::Document;

/// Parses SQL text into a document, discarding diagnostics.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is empty or whitespace only.
pub fn parse(sql: &str) -> Result<Document, ParseError> {
    parse_with_diagnostics(sql).map(|parsed| parsed.document)
}

/// Parses SQL text into a document along with the diagnostics for every
/// piece that was left out.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is empty or whitespace only.
pub fn parse_with_diagnostics(sql: &str) -> Result<Parsed, ParseError> {
    Parser::new(sql).parse_document()
}

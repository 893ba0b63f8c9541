//! # querycraft-core
//!
//! The model behind a visual SQL query editor, and the two translations
//! that connect it to SQL text.
//!
//! This crate provides:
//! - An editable [`Document`]: main queries chained with `UNION [ALL]`,
//!   plus named CTEs that are themselves `UNION` chains
//! - A lenient parser that reverse-engineers hand-written `SELECT`
//!   statements into the model, reporting what it could not use
//! - A generator that renders the model back to canonical SQL
//! - Editor state: a [`Selection`] cursor and the editing operations
//! - A read-only table [`Catalog`]
//!
//! ## Round trip
//!
//! ```rust
//! use querycraft_core::{generate, parse};
//!
//! let document = parse("select u.name, count(*) as n from users u group by u.name")?;
//! assert_eq!(document.queries[0].selected_tables, vec!["users"]);
//!
//! let sql = generate(&document);
//! assert_eq!(
//!     sql,
//!     "SELECT\n  u.name,\n  COUNT(*) AS n\nFROM users\nGROUP BY u.name"
//! );
//!
//! // Generated SQL parses back to the same text.
//! assert_eq!(generate(&parse(&sql)?), sql);
//! # Ok::<(), querycraft_core::ParseError>(())
//! ```
//!
//! ## Diagnostics
//!
//! Parsing only fails on empty input. Anything the model cannot hold is
//! left out and reported:
//!
//! ```rust
//! use querycraft_core::parse_with_diagnostics;
//!
//! let parsed = parse_with_diagnostics("SELECT id FROM users WHERE name NOT LIKE 'a%'")?;
//! assert!(parsed.document.queries[0].filters.is_empty());
//! assert_eq!(parsed.diagnostics.len(), 1);
//! # Ok::<(), querycraft_core::ParseError>(())
//! ```

pub mod dialect;
pub mod editor;
pub mod generator;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod schema;

pub use dialect::{Dialect, GenericDialect};
pub use editor::{EditError, Selection};
pub use generator::{generate, generate_cte, generate_query, Generator};
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use model::{
    Aggregate, Cte, Direction, Document, Field, Filter, Join, JoinCondition, JoinKind, Logic,
    Operator, OrderSpec, Query,
};
pub use parser::{parse, parse_with_diagnostics, Clause, Diagnostic, ParseError, Parsed, Parser};
pub use schema::{Catalog, TableSchema};

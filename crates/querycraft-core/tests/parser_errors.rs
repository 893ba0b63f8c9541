mod common;

use common::*;
use querycraft_core::{parse_with_diagnostics, Clause, Span};

#[test]
fn empty_input_is_an_error() {
    let err = parse_err("");
    assert_eq!(err.message, "no SQL provided");
    assert_eq!(err.span, Span::new(0, 0));
}

#[test]
fn whitespace_input_is_an_error() {
    let err = parse_err(" \n\t ");
    assert_eq!(err.message, "no SQL provided");
    assert_eq!(err.fragment, " \n\t ");
    assert!(err.to_string().starts_with("no SQL provided"));
}

#[test]
fn comment_only_input_parses_to_empty_document() {
    let parsed = parse_with_diagnostics("-- nothing here\n/* at all */").unwrap();
    assert!(parsed.document.queries.is_empty());
    assert!(parsed.document.ctes().is_empty());
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.normalized, "");
}

#[test]
fn garbage_degrades_without_failing() {
    let parsed = parse_with_diagnostics("this is not sql at all").unwrap();
    assert_eq!(parsed.document.queries.len(), 1);
    assert!(parsed.document.queries[0].is_empty());
    let clauses: Vec<_> = parsed.diagnostics.iter().map(|d| d.clause).collect();
    assert_eq!(clauses, vec![Clause::Statement, Clause::Select]);
}

#[test]
fn unbalanced_parentheses_do_not_panic() {
    for sql in [
        "SELECT (a FROM t",
        "SELECT a) FROM t",
        "WITH x AS (SELECT 1 SELECT 2",
        "SELECT a FROM t WHERE (b = 1",
        "SELECT 'unterminated FROM t",
        "))) UNION ALL (((",
        "SELECT a FROM t JOIN ON",
        "SELECT a FROM t ORDER BY",
        "UNION",
    ] {
        let _ = parse(sql);
    }
}

#[test]
fn repeated_clause_first_wins() {
    let parsed = parse_with_diagnostics("SELECT a FROM t WHERE a = 1 WHERE b = 2").unwrap();
    let query = &parsed.document.queries[0];
    assert_eq!(query.filters.len(), 1);
    assert_eq!(query.filters[0].field, "a");
    assert_eq!(parsed.diagnostics[0].clause, Clause::Where);
    assert_eq!(parsed.diagnostics[0].fragment, "WHERE b = 2");
}

#[test]
fn diagnostic_spans_point_into_normalized_text() {
    let parsed = parse_with_diagnostics("SELECT a\nFROM   t\nWHERE x NOT LIKE 'y'").unwrap();
    let diag = &parsed.diagnostics[0];
    let start = diag.span.start;
    let end = diag.span.end;
    assert_eq!(&parsed.normalized[start..end], "x NOT LIKE 'y'");
}

#[test]
fn trailing_semicolon_is_ignored() {
    let parsed = parse_with_diagnostics("SELECT a FROM t;").unwrap();
    assert!(parsed.diagnostics.is_empty());
    assert_eq!(parsed.document.queries[0].selected_tables, vec!["t"]);
}

#[test]
fn non_ascii_cte_name_is_dropped() {
    let parsed = parse_with_diagnostics("WITH café AS (SELECT 1 FROM t) SELECT * FROM t").unwrap();
    assert!(parsed.document.ctes().is_empty());
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].clause, Clause::Cte);
}

#![allow(dead_code)]

use querycraft_core::{generate, parse_with_diagnostics, Diagnostic, Document, ParseError, Query};

pub fn parse(sql: &str) -> Document {
    querycraft_core::parse(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    querycraft_core::parse(sql).expect_err(&format!("Expected parse error for: {sql:?}"))
}

/// Parses a single main query.
pub fn parse_query(sql: &str) -> Query {
    let mut document = parse(sql);
    assert_eq!(
        document.queries.len(),
        1,
        "Expected one main query for: {sql}"
    );
    document.queries.remove(0)
}

/// Parses and returns only the diagnostics.
pub fn diagnostics(sql: &str) -> Vec<Diagnostic> {
    parse_with_diagnostics(sql)
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
        .diagnostics
}

/// Verifies that generation is a fixed point: generate(parse(sql)) can be
/// re-parsed and yields the same text again. Returns the generated SQL.
pub fn round_trip(sql: &str) -> String {
    let first = generate(&parse(sql));
    let second = generate(&parse(&first));
    assert_eq!(
        first, second,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {first}\n  Second:   {second}"
    );
    first
}

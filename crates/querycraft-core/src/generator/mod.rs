//! SQL Generator
//!
//! Renders a [`Document`] back to SQL text. Generation never fails: a query
//! without a table turns into a SQL comment placeholder. Inside a `UNION`
//! chain or a CTE body the parser reads that placeholder back as an empty
//! query, so generated text is stable under a parse round trip.

mod statement;

use tracing::debug;

use crate::dialect::{Dialect, GenericDialect};
use crate::model::{Cte, Document, Query};

/// Emitted in place of a query that has no `FROM` table, for a CTE without
/// members and for a document without main queries.
pub const NO_TABLE_PLACEHOLDER: &str = "-- Add at least one field or select a table";

/// SQL generator, parameterized by the dialect that spells identifiers and
/// literals.
#[derive(Debug, Default, Clone, Copy)]
pub struct Generator<D = GenericDialect> {
    dialect: D,
}

impl<D: Dialect> Generator<D> {
    /// Creates a generator for the given dialect.
    #[must_use]
    pub const fn new(dialect: D) -> Self {
        Self { dialect }
    }

    /// Returns the dialect in use.
    #[must_use]
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Renders the whole document: the `WITH` block (if any CTEs exist)
    /// followed by the main `UNION` chain.
    #[must_use]
    pub fn document(&self, document: &Document) -> String {
        debug!(
            dialect = self.dialect.name(),
            queries = document.queries.len(),
            ctes = document.ctes().len(),
            "generating SQL"
        );
        let mut sql = String::new();
        if !document.ctes().is_empty() {
            let ctes: Vec<String> = document.ctes().iter().map(|cte| self.cte(cte)).collect();
            sql.push_str("WITH ");
            sql.push_str(&ctes.join(",\n"));
            sql.push('\n');
        }
        if document.queries.is_empty() {
            sql.push_str(NO_TABLE_PLACEHOLDER);
        } else {
            sql.push_str(&self.union_chain(&document.queries));
        }
        sql
    }

    /// Renders one CTE definition: `name AS (` + indented body + `)`.
    #[must_use]
    pub fn cte(&self, cte: &Cte) -> String {
        let body = if cte.queries.is_empty() {
            String::from(NO_TABLE_PLACEHOLDER)
        } else {
            self.union_chain(&cte.queries)
        };
        let indented: Vec<String> = body.lines().map(|line| format!("  {line}")).collect();
        format!(
            "{} AS (\n{}\n)",
            self.dialect.sanitize_identifier(&cte.name),
            indented.join("\n")
        )
    }

    /// Renders queries joined by `UNION` / `UNION ALL`. The connective
    /// between two queries comes from the earlier one's `union_all_next`.
    #[must_use]
    pub fn union_chain(&self, queries: &[Query]) -> String {
        let mut sql = String::new();
        for (i, query) in queries.iter().enumerate() {
            if i > 0 {
                let all = queries[i - 1].union_all_next;
                sql.push_str(if all { "\nUNION ALL\n" } else { "\nUNION\n" });
            }
            sql.push_str(&self.query(query));
        }
        sql
    }
}

/// Renders a document with the generic dialect.
#[must_use]
pub fn generate(document: &Document) -> String {
    Generator::new(GenericDialect::new()).document(document)
}

/// Renders a single query with the generic dialect.
#[must_use]
pub fn generate_query(query: &Query) -> String {
    Generator::new(GenericDialect::new()).query(query)
}

/// Renders a single CTE definition with the generic dialect.
#[must_use]
pub fn generate_cte(cte: &Cte) -> String {
    Generator::new(GenericDialect::new()).cte(cte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    fn table_query(table: &str) -> Query {
        let mut query = Query::named("q");
        query.selected_tables.push(table.to_string());
        query
    }

    #[test]
    fn test_union_connective_comes_from_earlier_query() {
        let mut first = table_query("a");
        first.union_all_next = true;
        let second = table_query("b");
        let third = table_query("c");
        assert_eq!(
            Generator::<GenericDialect>::default().union_chain(&[first, second, third]),
            "SELECT\n  *\nFROM a\nUNION ALL\nSELECT\n  *\nFROM b\nUNION\nSELECT\n  *\nFROM c"
        );
    }

    #[test]
    fn test_cte_body_is_indented() {
        let mut query = table_query("orders");
        query.fields.push(Field::column("orders", "id"));
        let cte = Cte::new("recent", vec![query]);
        assert_eq!(
            generate_cte(&cte),
            "recent AS (\n  SELECT\n    orders.id\n  FROM orders\n)"
        );
    }

    #[test]
    fn test_empty_cte_and_document_placeholders() {
        assert_eq!(
            generate_cte(&Cte::new("x", vec![])),
            format!("x AS (\n  {NO_TABLE_PLACEHOLDER}\n)")
        );
        assert_eq!(generate(&Document::default()), NO_TABLE_PLACEHOLDER);
    }

    #[test]
    fn test_cte_name_is_sanitized() {
        let cte = Cte::new("my cte!", vec![table_query("t")]);
        assert!(generate_cte(&cte).starts_with("mycte AS (\n"));
    }
}

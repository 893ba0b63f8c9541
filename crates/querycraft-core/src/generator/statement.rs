//! Rendering of a single `SELECT` statement.

use tracing::trace;

use super::{Generator, NO_TABLE_PLACEHOLDER};
use crate::dialect::Dialect;
use crate::model::{Aggregate, Field, Filter, Join, Operator, Query};

impl<D: Dialect> Generator<D> {
    /// Renders one query, or the placeholder comment when it has no table.
    #[must_use]
    pub fn query(&self, query: &Query) -> String {
        let Some(base_table) = query.base_table() else {
            trace!(query = %query.name, "no base table");
            return String::from(NO_TABLE_PLACEHOLDER);
        };

        let fields: Vec<String> = if query.fields.is_empty() {
            vec![String::from("*")]
        } else {
            query.fields.iter().map(|f| self.field(f)).collect()
        };

        let mut sql = String::from("SELECT\n  ");
        sql.push_str(&fields.join(",\n  "));
        sql.push_str("\nFROM ");
        sql.push_str(&self.dialect.sanitize_identifier(base_table));

        for join in query.joins.iter().filter(|j| !j.right_table.is_empty()) {
            sql.push('\n');
            sql.push_str(&self.join(join));
        }

        let predicate = self.predicate(&query.filters);
        if !predicate.is_empty() {
            sql.push_str("\nWHERE ");
            sql.push_str(&predicate);
        }

        if !query.group_by.is_empty() {
            let columns: Vec<String> = query
                .group_by
                .iter()
                .map(|c| self.dialect.sanitize_identifier(c))
                .collect();
            sql.push_str("\nGROUP BY ");
            sql.push_str(&columns.join(", "));
        }

        if !query.order_by.is_empty() {
            let items: Vec<String> = query
                .order_by
                .iter()
                .map(|o| {
                    format!(
                        "{} {}",
                        self.dialect.sanitize_identifier(&o.field),
                        o.dir.as_str()
                    )
                })
                .collect();
            sql.push_str("\nORDER BY ");
            sql.push_str(&items.join(", "));
        }

        if let Some(n) = query.limit {
            sql.push_str(&format!("\nLIMIT {n}"));
        }

        if let Some(n) = query.offset {
            sql.push_str(&format!("\nOFFSET {n}"));
        }

        sql
    }

    /// Renders one select-list entry.
    ///
    /// The stored expression wins over the `table.column` reference. An
    /// aggregate wraps the expression unless it already starts with an
    /// aggregate call.
    #[must_use]
    pub fn field(&self, field: &Field) -> String {
        let mut expr = match field.expression.as_deref().filter(|e| !e.trim().is_empty()) {
            Some(expression) => expression.trim().to_string(),
            None => self.column_reference(field),
        };
        if let Some(agg) = field.agg {
            if !Aggregate::starts_call(&expr) {
                expr = format!("{}({expr})", agg.as_str());
            }
        }
        match field.alias.as_deref().filter(|a| !a.is_empty()) {
            Some(alias) => format!("{expr} AS {}", self.dialect.sanitize_identifier(alias)),
            None => expr,
        }
    }

    /// `table.column`, sanitized; a `*` column survives as a wildcard.
    fn column_reference(&self, field: &Field) -> String {
        let column = if field.name == "*" {
            String::from("*")
        } else {
            self.dialect.sanitize_identifier(&field.name)
        };
        match field.table.as_deref().filter(|t| !t.is_empty()) {
            Some(table) => format!("{}.{column}", self.dialect.sanitize_identifier(table)),
            None => column,
        }
    }

    /// `KIND JOIN table[ ON a = b AND ...]`, skipping incomplete conditions.
    #[must_use]
    pub fn join(&self, join: &Join) -> String {
        let conditions: Vec<String> = join
            .on
            .iter()
            .filter(|c| c.is_complete())
            .map(|c| {
                format!(
                    "{} {} {}",
                    self.dialect.sanitize_identifier(&c.left),
                    c.op.as_str(),
                    self.dialect.sanitize_identifier(&c.right)
                )
            })
            .collect();
        let mut sql = format!(
            "{} JOIN {}",
            join.kind.as_str(),
            self.dialect.sanitize_identifier(&join.right_table)
        );
        if !conditions.is_empty() {
            sql.push_str(" ON ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql
    }

    /// The `WHERE` predicate without the keyword; empty when no filter has
    /// a field. Each connective is the `logic` of the filter before it.
    #[must_use]
    pub fn predicate(&self, filters: &[Filter]) -> String {
        let mut sql = String::new();
        let mut previous: Option<&Filter> = None;
        for filter in filters.iter().filter(|f| !f.field.trim().is_empty()) {
            if let Some(previous) = previous {
                sql.push(' ');
                sql.push_str(previous.logic.as_str());
                sql.push(' ');
            }
            sql.push_str(&self.condition(filter));
            previous = Some(filter);
        }
        sql
    }

    /// Renders one filter.
    fn condition(&self, filter: &Filter) -> String {
        let field = self.dialect.sanitize_identifier(&filter.field);
        match filter.op {
            Operator::IsNull | Operator::IsNotNull => format!("{field} {}", filter.op.as_str()),
            Operator::Between => {
                let mut bounds = filter.value.split(',');
                let low = self.dialect.literal(bounds.next());
                let high = self.dialect.literal(bounds.next());
                format!("{field} BETWEEN {low} AND {high}")
            }
            op => format!(
                "{field} {} {}",
                op.as_str(),
                self.dialect.literal(Some(&filter.value))
            ),
        }
    }
}

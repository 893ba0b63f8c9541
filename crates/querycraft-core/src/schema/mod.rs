//! Table catalog.
//!
//! The catalog lists the tables an editor offers for selection. It is pure
//! data: the parser and generator never consult it.

use serde::{Deserialize, Serialize};

use crate::model::Document;

/// One table and its column names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<String>,
}

impl TableSchema {
    /// Creates a table description.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    /// Returns true if the table has a column with this name.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Read-only list of tables, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub tables: Vec<TableSchema>,
}

impl Catalog {
    /// Creates a catalog from table descriptions.
    #[must_use]
    pub const fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }

    /// A small shop schema for demos and tests.
    #[must_use]
    pub fn demo() -> Self {
        Self::new(vec![
            TableSchema::new(
                "users",
                &["id", "name", "email", "age", "country", "created_at"],
            ),
            TableSchema::new(
                "orders",
                &["id", "user_id", "total", "status", "created_at"],
            ),
            TableSchema::new("products", &["id", "name", "price", "category"]),
            TableSchema::new(
                "order_items",
                &["id", "order_id", "product_id", "qty", "price"],
            ),
        ])
    }

    /// Looks up a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Names of the catalog tables.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// Everything a query in `document` can select from: catalog tables
    /// first, then the document's CTE names.
    #[must_use]
    pub fn available_tables(&self, document: &Document) -> Vec<String> {
        self.table_names()
            .chain(document.ctes().iter().map(|cte| cte.name.as_str()))
            .map(str::to_string)
            .collect()
    }

    /// Column names of a table or CTE.
    ///
    /// A CTE's columns are the output names of its first member's fields;
    /// catalog tables shadow CTEs of the same name.
    #[must_use]
    pub fn columns_of(&self, name: &str, document: &Document) -> Option<Vec<String>> {
        if let Some(table) = self.table(name) {
            return Some(table.columns.clone());
        }
        let cte = document.cte(name)?;
        let columns = cte
            .queries
            .first()
            .map(|q| q.fields.iter().map(|f| f.output_name().to_string()).collect())
            .unwrap_or_default();
        Some(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cte, Field, Query};

    #[test]
    fn test_demo_catalog() {
        let catalog = Catalog::demo();
        assert_eq!(
            catalog.table_names().collect::<Vec<_>>(),
            vec!["users", "orders", "products", "order_items"]
        );
        assert!(catalog.table("orders").is_some_and(|t| t.has_column("user_id")));
        assert!(catalog.table("missing").is_none());
    }

    #[test]
    fn test_available_tables_include_ctes() {
        let mut document = Document::new();
        document.insert_cte(Cte::new("recent", vec![Query::named("q")]));
        let tables = Catalog::demo().available_tables(&document);
        assert_eq!(tables.len(), 5);
        assert_eq!(tables.last().map(String::as_str), Some("recent"));
    }

    #[test]
    fn test_columns_of_cte_uses_output_names() {
        let mut member = Query::named("q");
        member.fields.push(Field::column("orders", "id"));
        member
            .fields
            .push(Field::column("orders", "total").with_alias("amount"));
        let mut document = Document::new();
        document.insert_cte(Cte::new("recent", vec![member]));

        let catalog = Catalog::demo();
        assert_eq!(
            catalog.columns_of("recent", &document),
            Some(vec![String::from("id"), String::from("amount")])
        );
        assert_eq!(catalog.columns_of("users", &document).map(|c| c.len()), Some(6));
        assert_eq!(catalog.columns_of("nope", &document), None);
    }
}

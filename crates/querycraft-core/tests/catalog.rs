mod common;

use common::*;
use querycraft_core::{Catalog, TableSchema};

#[test]
fn catalog_loads_from_json() {
    let catalog: Catalog = serde_json::from_str(
        r#"{"tables":[{"name":"events","columns":["id","kind"]},{"name":"empty"}]}"#,
    )
    .unwrap();
    assert_eq!(catalog.tables.len(), 2);
    assert_eq!(catalog.table("events").unwrap().columns, vec!["id", "kind"]);
    assert!(catalog.table("empty").unwrap().columns.is_empty());
}

#[test]
fn available_tables_follow_parsed_ctes() {
    let document = parse(
        "WITH buyers AS (SELECT user_id, SUM(total) AS spent FROM orders GROUP BY user_id) \
         SELECT * FROM buyers",
    );
    let catalog = Catalog::demo();
    let tables = catalog.available_tables(&document);
    assert_eq!(
        tables,
        vec!["users", "orders", "products", "order_items", "buyers"]
    );
    assert_eq!(
        catalog.columns_of("buyers", &document),
        Some(vec![String::from("user_id"), String::from("spent")])
    );
}

#[test]
fn catalog_is_independent_of_parsing() {
    let catalog = Catalog::new(vec![TableSchema::new("t", &["a"])]);
    let query = parse_query("SELECT zzz FROM not_in_catalog");
    assert_eq!(query.selected_tables, vec!["not_in_catalog"]);
    assert!(catalog.table("not_in_catalog").is_none());
}

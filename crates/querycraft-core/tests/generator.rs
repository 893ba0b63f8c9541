mod common;

use querycraft_core::generator::NO_TABLE_PLACEHOLDER;
use querycraft_core::{
    generate, generate_query, Aggregate, Cte, Dialect, Direction, Document, Field, Filter,
    Generator, Join, JoinKind, Logic, Operator, OrderSpec, Query,
};

fn users_query() -> Query {
    let mut query = Query::named("Query");
    query.selected_tables.push(String::from("users"));
    query
}

#[test]
fn empty_field_list_selects_star() {
    assert_eq!(generate_query(&users_query()), "SELECT\n  *\nFROM users");
}

#[test]
fn query_without_table_is_placeholder() {
    assert_eq!(generate_query(&Query::named("q")), NO_TABLE_PLACEHOLDER);
    assert_eq!(
        NO_TABLE_PLACEHOLDER,
        "-- Add at least one field or select a table"
    );
}

#[test]
fn full_statement_layout() {
    let mut query = users_query();
    query.fields.push(Field::column("users", "name"));
    query.fields.push(
        Field::column("orders", "total")
            .with_agg(Aggregate::Sum)
            .with_alias("spent"),
    );
    query.joins.push(
        Join::new(JoinKind::Left, "orders").on("users.id", Operator::Eq, "orders.user_id"),
    );
    query.filters.push(Filter::new("users.country", Operator::Eq, "DE").then(Logic::Or));
    query.filters.push(Filter::new("users.age", Operator::Between, "18,30"));
    query.group_by.push(String::from("users.name"));
    query.order_by.push(OrderSpec::new("spent", Direction::Desc));
    query.limit = Some(3);

    assert_eq!(
        generate_query(&query),
        "SELECT\n  users.name,\n  SUM(orders.total) AS spent\nFROM users\n\
         LEFT JOIN orders ON users.id = orders.user_id\n\
         WHERE users.country = 'DE' OR users.age BETWEEN 18 AND 30\n\
         GROUP BY users.name\nORDER BY spent DESC\nLIMIT 3"
    );
}

#[test]
fn identifiers_are_sanitized() {
    let mut query = Query::named("q");
    query.selected_tables.push(String::from("users; DROP TABLE x"));
    query.group_by.push(String::from("name--"));
    query.filters.push(Filter::new("na me", Operator::Eq, "1"));
    assert_eq!(
        generate_query(&query),
        "SELECT\n  *\nFROM usersDROPTABLEx\nWHERE name = 1\nGROUP BY name"
    );
}

#[test]
fn string_values_are_quoted_and_escaped() {
    let mut query = users_query();
    query
        .filters
        .push(Filter::new("name", Operator::Eq, "O'Brien"));
    assert!(generate_query(&query).ends_with("WHERE name = 'O''Brien'"));
}

#[test]
fn document_with_ctes_and_union() {
    let mut member = Query::named("Query");
    member.selected_tables.push(String::from("orders"));
    member.fields.push(Field::column("orders", "user_id"));

    let mut document = Document::default();
    document.insert_cte(Cte::new("buyers", vec![member]));

    let mut first = users_query();
    first.union_all_next = true;
    let mut second = Query::named("Query 2");
    second.selected_tables.push(String::from("buyers"));
    document.queries = vec![first, second];

    assert_eq!(
        generate(&document),
        "WITH buyers AS (\n  SELECT\n    orders.user_id\n  FROM orders\n)\n\
         SELECT\n  *\nFROM users\nUNION ALL\nSELECT\n  *\nFROM buyers"
    );
}

#[test]
fn document_without_queries() {
    let mut document = Document::default();
    assert_eq!(generate(&document), NO_TABLE_PLACEHOLDER);

    document.insert_cte(Cte::new("c", vec![users_query()]));
    assert!(generate(&document).ends_with(&format!(")\n{NO_TABLE_PLACEHOLDER}")));
}

/// Uses double quotes for strings.
struct DoubleQuoted;

impl Dialect for DoubleQuoted {
    fn name(&self) -> &'static str {
        "double-quoted"
    }

    fn string_quote(&self) -> char {
        '"'
    }
}

#[test]
fn custom_dialect_controls_literals() {
    let mut query = users_query();
    query.filters.push(Filter::new("name", Operator::Eq, "a\"b"));
    let generator = Generator::new(DoubleQuoted);
    assert_eq!(generator.dialect().name(), "double-quoted");
    assert!(generator.query(&query).ends_with("WHERE name = \"a\"\"b\""));
}

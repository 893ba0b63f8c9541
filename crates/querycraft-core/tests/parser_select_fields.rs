mod common;

use common::*;
use querycraft_core::model::CUSTOM_FIELD;
use querycraft_core::Aggregate;

#[test]
fn simple_columns() {
    let query = parse_query("SELECT a, b FROM t");
    assert_eq!(query.selected_tables, vec!["t"]);
    let names: Vec<_> = query.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(query.name, "Query 1");
}

#[test]
fn count_star_with_alias() {
    let query = parse_query("SELECT COUNT(*) AS cnt FROM orders");
    let field = &query.fields[0];
    assert_eq!(field.agg, Some(Aggregate::Count));
    assert_eq!(field.name, "*");
    assert_eq!(field.alias.as_deref(), Some("cnt"));
    assert_eq!(query.selected_tables, vec!["orders"]);
}

#[test]
fn qualified_columns_and_implicit_alias() {
    let query = parse_query("SELECT u.name username, o.total FROM users u");
    assert_eq!(query.fields[0].table.as_deref(), Some("u"));
    assert_eq!(query.fields[0].name, "name");
    assert_eq!(query.fields[0].alias.as_deref(), Some("username"));
    assert_eq!(query.fields[1].table.as_deref(), Some("o"));
    assert_eq!(query.fields[1].alias, None);
    assert_eq!(query.selected_tables, vec!["users"]);
}

#[test]
fn star_and_table_star() {
    let query = parse_query("SELECT *, o.* FROM orders o");
    assert_eq!(query.fields[0].name, "*");
    assert_eq!(query.fields[0].table, None);
    assert_eq!(query.fields[1].name, "*");
    assert_eq!(query.fields[1].table.as_deref(), Some("o"));
}

#[test]
fn aggregate_keywords_are_case_insensitive() {
    let query = parse_query("select max(o.total) top from orders o");
    let field = &query.fields[0];
    assert_eq!(field.agg, Some(Aggregate::Max));
    assert_eq!(field.table.as_deref(), Some("o"));
    assert_eq!(field.name, "total");
    assert_eq!(field.alias.as_deref(), Some("top"));
}

#[test]
fn commas_inside_calls_and_literals_do_not_split() {
    let query = parse_query("SELECT COALESCE(a, b) AS c, 'x, y' AS lit, d FROM t");
    assert_eq!(query.fields.len(), 3);
    assert_eq!(query.fields[0].name, CUSTOM_FIELD);
    assert_eq!(query.fields[0].expression.as_deref(), Some("COALESCE(a, b)"));
    assert_eq!(query.fields[1].expression.as_deref(), Some("'x, y'"));
    assert_eq!(query.fields[2].name, "d");
}

#[test]
fn aggregate_inside_larger_expression_is_raw() {
    let query = parse_query("SELECT SUM(a) / COUNT(*) AS ratio FROM t");
    let field = &query.fields[0];
    assert_eq!(field.agg, None);
    assert_eq!(field.expression.as_deref(), Some("SUM(a) / COUNT(*)"));
    assert_eq!(field.alias.as_deref(), Some("ratio"));
}

#[test]
fn aggregate_over_expression_keeps_argument() {
    let query = parse_query("SELECT SUM(price * qty) AS revenue FROM order_items");
    let field = &query.fields[0];
    assert_eq!(field.agg, Some(Aggregate::Sum));
    assert_eq!(field.expression.as_deref(), Some("price * qty"));
    assert_eq!(field.name, "price * qty");
}

#[test]
fn comments_and_whitespace_are_normalized() {
    let query = parse_query(
        "SELECT  id, -- the key\n  name /* display */\nFROM\n\tusers",
    );
    let names: Vec<_> = query.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name"]);
    assert_eq!(query.selected_tables, vec!["users"]);
}

#[test]
fn keyword_inside_string_literal_is_not_a_clause() {
    let query = parse_query("SELECT 'FROM nowhere' AS label FROM t");
    assert_eq!(query.fields.len(), 1);
    assert_eq!(query.fields[0].expression.as_deref(), Some("'FROM nowhere'"));
    assert_eq!(query.selected_tables, vec!["t"]);
}

#[test]
fn subquery_in_select_list_stays_raw() {
    let query = parse_query("SELECT (SELECT MAX(total) FROM orders) AS top FROM users");
    assert_eq!(query.fields.len(), 1);
    assert_eq!(query.fields[0].name, CUSTOM_FIELD);
    assert_eq!(query.selected_tables, vec!["users"]);
}

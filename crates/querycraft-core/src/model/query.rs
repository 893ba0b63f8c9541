//! One editable `SELECT` statement and its parts.

use serde::{Deserialize, Serialize};

use super::types::{Aggregate, Direction, JoinKind, Logic, Operator};

/// Column name given to fields that are free-form expressions.
pub const CUSTOM_FIELD: &str = "custom_field";

/// One selected output column or expression.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    /// Owning table, when the field is a `table.column` reference.
    pub table: Option<String>,
    /// Column name, `*`, or [`CUSTOM_FIELD`].
    pub name: String,
    /// Output alias.
    pub alias: Option<String>,
    /// Aggregate wrapped around the expression.
    pub agg: Option<Aggregate>,
    /// Source text of the expression (for aggregates, the argument only).
    pub expression: Option<String>,
}

impl Field {
    /// A plain `table.column` field.
    #[must_use]
    pub fn column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
            ..Self::default()
        }
    }

    /// A free-form expression field.
    #[must_use]
    pub fn expression(text: impl Into<String>) -> Self {
        Self {
            name: String::from(CUSTOM_FIELD),
            expression: Some(text.into()),
            ..Self::default()
        }
    }

    /// Sets the output alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Sets the aggregate.
    #[must_use]
    pub const fn with_agg(mut self, agg: Aggregate) -> Self {
        self.agg = Some(agg);
        self
    }

    /// Name under which the field appears in the result set.
    #[must_use]
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// One `left op right` condition of a join's `ON` clause.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinCondition {
    pub left: String,
    pub op: Operator,
    pub right: String,
}

impl JoinCondition {
    #[must_use]
    pub fn new(left: impl Into<String>, op: Operator, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            op,
            right: right.into(),
        }
    }

    /// Both operands are filled in and the operator is a comparison.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.op.is_comparison() && !self.left.is_empty() && !self.right.is_empty()
    }
}

/// A JOIN clause. Its conditions are implicitly `AND`-ed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Join {
    #[serde(rename = "type")]
    pub kind: JoinKind,
    pub right_table: String,
    pub on: Vec<JoinCondition>,
}

impl Join {
    #[must_use]
    pub fn new(kind: JoinKind, right_table: impl Into<String>) -> Self {
        Self {
            kind,
            right_table: right_table.into(),
            on: Vec::new(),
        }
    }

    /// Appends an `ON` condition.
    #[must_use]
    pub fn on(mut self, left: impl Into<String>, op: Operator, right: impl Into<String>) -> Self {
        self.on.push(JoinCondition::new(left, op, right));
        self
    }
}

/// One predicate of the `WHERE` chain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    pub field: String,
    pub op: Operator,
    /// Literal text; empty for null checks, `lo,hi` for `BETWEEN`.
    pub value: String,
    /// Connective to the next filter; ignored on the last one.
    pub logic: Logic,
}

impl Filter {
    #[must_use]
    pub fn new(field: impl Into<String>, op: Operator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
            logic: Logic::And,
        }
    }

    /// Sets the connective to the next filter.
    #[must_use]
    pub const fn then(mut self, logic: Logic) -> Self {
        self.logic = logic;
        self
    }
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderSpec {
    pub field: String,
    pub dir: Direction,
}

impl OrderSpec {
    #[must_use]
    pub fn new(field: impl Into<String>, dir: Direction) -> Self {
        Self {
            field: field.into(),
            dir,
        }
    }
}

/// One `SELECT` statement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Query {
    /// Display name shown by the editor.
    pub name: String,
    /// Source tables; only the first one becomes the `FROM` table.
    pub selected_tables: Vec<String>,
    pub fields: Vec<Field>,
    pub joins: Vec<Join>,
    pub filters: Vec<Filter>,
    pub group_by: Vec<String>,
    pub order_by: Vec<OrderSpec>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// The query after this one is attached with `UNION ALL`, not `UNION`.
    pub union_all_next: bool,
}

impl Query {
    /// Creates an empty query with a display name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Table used in `FROM`: the first selected table, else the table of
    /// the first field.
    #[must_use]
    pub fn base_table(&self) -> Option<&str> {
        self.selected_tables
            .first()
            .map(String::as_str)
            .filter(|t| !t.is_empty())
            .or_else(|| {
                self.fields
                    .first()
                    .and_then(|f| f.table.as_deref())
                    .filter(|t| !t.is_empty())
            })
    }

    /// Returns true if nothing has been filled in.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected_tables.is_empty()
            && self.fields.is_empty()
            && self.joins.is_empty()
            && self.filters.is_empty()
            && self.group_by.is_empty()
            && self.order_by.is_empty()
            && self.limit.is_none()
            && self.offset.is_none()
    }
}

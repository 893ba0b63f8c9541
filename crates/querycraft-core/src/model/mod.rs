//! The editable query model.
//!
//! A [`Document`] owns its main [`Query`] list and its [`Cte`]s; a query
//! owns its fields, joins, filters and ordering exclusively. Nothing is
//! shared and there are no back references.

mod document;
mod query;
mod types;

pub use document::{Cte, Document};
pub use query::{Field, Filter, Join, JoinCondition, OrderSpec, Query, CUSTOM_FIELD};
pub use types::{Aggregate, Direction, JoinKind, Logic, Operator};

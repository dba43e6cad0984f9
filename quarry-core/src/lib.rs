//! Quarry Core - a composable SQL statement builder
//!
//! Statements are assembled through a fluent API, rendered to SQL text with
//! positional `?` placeholders and an ordered list of values to bind.
//! Builders can be merged into one another or embedded as subqueries.
//! Nothing in this crate performs I/O.

pub mod builder;
pub mod clause;
pub mod config;
pub mod criteria;
pub mod error;
pub mod join;
pub mod operator;
pub mod quote;
pub mod statement;
pub mod value;

// Re-export main types
pub use builder::Query;
pub use clause::{
    DeleteTarget, FromClause, FromSource, GroupBySpec, IntoColumns, LimitSpec, OrderBySpec,
    SelectExpr, SelectItem, SetAssignment, SetValue, SortDirection,
};
pub use config::{BuilderConfig, LimitStyle};
pub use criteria::{Condition, Criteria, Criterion, CriterionValue, IntoCondition};
pub use error::{Error, Result};
pub use join::{IntoJoinCriteria, JoinSpec, JoinType, Joins};
pub use operator::{op, Connector, IntoOperator, Operator};
pub use quote::{DefaultQuoter, Quoter};
pub use statement::{RenderMode, Statement, StatementKind};
pub use value::Value;

/// Start a SELECT with the given columns
pub fn select<T: IntoColumns>(columns: T) -> Query {
    Query::new().select(columns)
}

/// Start an INSERT into the given table
pub fn insert(table: &str) -> Query {
    Query::new().insert(table)
}

/// Start a REPLACE into the given table
pub fn replace(table: &str) -> Query {
    Query::new().replace(table)
}

/// Start an UPDATE of the given table
pub fn update(table: &str) -> Query {
    Query::new().update(table)
}

/// Start a DELETE from the given table
///
/// # Examples
///
/// ```
/// let sql = quarry_core::delete_from("sessions")
///     .where_(("user_id", 7))
///     .to_sql()
///     .unwrap();
/// assert_eq!(sql, "DELETE FROM sessions WHERE user_id = ?");
/// ```
pub fn delete_from(table: &str) -> Query {
    Query::new().delete().from(table)
}

//! Quarry - a composable SQL statement builder with async execution
//!
//! Statements are built with [`quarry_core`] and run through any
//! [`Executor`]. With the `sqlite` feature a SQLx-backed executor is
//! available in [`executor::sqlite`].

pub mod error;
pub mod executor;

// Re-export the builder
pub use quarry_core::{
    clause, config, criteria, join, quote, statement, BuilderConfig, Condition, Connector,
    Criteria, Criterion, CriterionValue, DefaultQuoter, IntoColumns, IntoCondition,
    IntoJoinCriteria, IntoOperator, JoinSpec, JoinType, LimitStyle, Operator, Query, Quoter,
    RenderMode, SortDirection, Statement, StatementKind, Value,
};
pub use quarry_core::{delete_from, insert, op, replace, select, update};
pub use quarry_core::Error as BuildError;

pub use error::{Error, Result};
pub use executor::{ExecutableModification, ExecutableQuery, Executor};

#[cfg(feature = "sqlite")]
pub use executor::sqlite::SqliteExecutor;

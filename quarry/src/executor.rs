//! Statement execution
//!
//! The builder never touches a database. An [`Executor`] takes rendered SQL
//! and its ordered params; [`ExecutableQuery`] and [`ExecutableModification`]
//! render a [`Query`] and hand it over.

use std::future::Future;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{Error, Query, Result, Statement, Value};

/// Runs rendered statements against a database
pub trait Executor: Send + Sync {
    /// Execute a statement that returns no rows, yielding the affected row count
    fn execute(&self, sql: &str, params: &[Value]) -> impl Future<Output = Result<u64>> + Send;

    /// Execute a statement that returns multiple rows
    fn fetch_all<T>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        T: DeserializeOwned + Send + Unpin;

    /// Execute a statement that returns an optional row
    fn fetch_optional<T>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned + Send + Unpin;
}

/// Extension trait for running row-returning statements
pub trait ExecutableQuery<T> {
    /// Execute the query and return all results
    fn fetch_all<E>(&self, executor: &E) -> impl Future<Output = Result<Vec<T>>> + Send
    where
        E: Executor;

    /// Execute the query and return the first result
    ///
    /// Fails with [`sqlx::Error::RowNotFound`] when there is no row.
    fn fetch_one<E>(&self, executor: &E) -> impl Future<Output = Result<T>> + Send
    where
        E: Executor;

    /// Execute the query and return an optional result
    fn fetch_optional<E>(&self, executor: &E) -> impl Future<Output = Result<Option<T>>> + Send
    where
        E: Executor;
}

/// Extension trait for INSERT, REPLACE, UPDATE and DELETE
pub trait ExecutableModification {
    /// Execute the statement and return the number of affected rows
    fn execute<E>(&self, executor: &E) -> impl Future<Output = Result<u64>> + Send
    where
        E: Executor;
}

fn prepare(query: &Query, action: &'static str) -> Result<Statement> {
    let stmt = query.to_statement()?;
    debug!(
        action,
        kind = ?query.kind(),
        sql = %stmt.sql,
        params = stmt.params.len(),
        "executing statement"
    );
    Ok(stmt)
}

impl<T> ExecutableQuery<T> for Query
where
    T: DeserializeOwned + Send + Unpin,
{
    async fn fetch_all<E>(&self, executor: &E) -> Result<Vec<T>>
    where
        E: Executor,
    {
        let stmt = prepare(self, "fetch_all")?;
        executor.fetch_all(&stmt.sql, &stmt.params).await
    }

    async fn fetch_one<E>(&self, executor: &E) -> Result<T>
    where
        E: Executor,
    {
        let stmt = prepare(self, "fetch_one")?;
        executor
            .fetch_optional(&stmt.sql, &stmt.params)
            .await?
            .ok_or(Error::Database(sqlx::Error::RowNotFound))
    }

    async fn fetch_optional<E>(&self, executor: &E) -> Result<Option<T>>
    where
        E: Executor,
    {
        let stmt = prepare(self, "fetch_optional")?;
        executor.fetch_optional(&stmt.sql, &stmt.params).await
    }
}

impl ExecutableModification for Query {
    async fn execute<E>(&self, executor: &E) -> Result<u64>
    where
        E: Executor,
    {
        let stmt = prepare(self, "execute")?;
        executor.execute(&stmt.sql, &stmt.params).await
    }
}

/// SQLx-backed SQLite executor
#[cfg(feature = "sqlite")]
pub mod sqlite {
    use super::*;
    use sqlx::sqlite::{SqliteArguments, SqlitePool, SqlitePoolOptions, SqliteRow};
    use sqlx::{Column, Row, Sqlite, TypeInfo, ValueRef};

    /// SQLite connection pool wrapper
    #[derive(Clone)]
    pub struct SqliteExecutor {
        inner: SqlitePool,
    }

    impl SqliteExecutor {
        /// Connect to the database at `database_url`
        pub async fn connect(database_url: &str) -> Result<Self> {
            let pool = SqlitePool::connect(database_url).await?;
            Ok(Self { inner: pool })
        }

        /// A private in-memory database
        ///
        /// Held on a single connection, since every SQLite connection to
        /// `:memory:` opens its own empty database.
        pub async fn in_memory() -> Result<Self> {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await?;
            Ok(Self { inner: pool })
        }

        /// Create from an existing SqlitePool
        pub fn from_pool(pool: SqlitePool) -> Self {
            Self { inner: pool }
        }

        pub fn pool(&self) -> &SqlitePool {
            &self.inner
        }
    }

    impl Executor for SqliteExecutor {
        async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
            let query = bind_values(sqlx::query(sql), params);
            let result = query.execute(&self.inner).await?;
            Ok(result.rows_affected())
        }

        async fn fetch_all<T>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            let query = bind_values(sqlx::query(sql), params);
            let rows = query.fetch_all(&self.inner).await?;

            let mut results = Vec::with_capacity(rows.len());
            for row in rows {
                results.push(serde_json::from_value(row_to_json(&row)?)?);
            }
            Ok(results)
        }

        async fn fetch_optional<T>(&self, sql: &str, params: &[Value]) -> Result<Option<T>>
        where
            T: DeserializeOwned + Send + Unpin,
        {
            let query = bind_values(sqlx::query(sql), params);
            match query.fetch_optional(&self.inner).await? {
                Some(row) => Ok(Some(serde_json::from_value(row_to_json(&row)?)?)),
                None => Ok(None),
            }
        }
    }

    /// Bind params in order to SQLite's positional `?` slots
    fn bind_values<'q>(
        mut query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
        params: &'q [Value],
    ) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
        for param in params {
            query = match param {
                Value::Null => query.bind(None::<i64>),
                Value::Bool(b) => query.bind(*b),
                Value::I32(i) => query.bind(*i),
                Value::I64(i) => query.bind(*i),
                Value::F32(f) => query.bind(f64::from(*f)),
                Value::F64(f) => query.bind(*f),
                Value::String(s) => query.bind(s.as_str()),
                Value::Bytes(b) => query.bind(b.as_slice()),
                Value::Json(j) => query.bind(j.to_string()),
            };
        }
        query
    }

    /// Convert a row into a JSON object keyed by column name
    fn row_to_json(row: &SqliteRow) -> Result<serde_json::Value> {
        let mut object = serde_json::Map::new();
        for column in row.columns() {
            let index = column.ordinal();
            let raw = row.try_get_raw(index)?;
            let value = if raw.is_null() {
                serde_json::Value::Null
            } else {
                match raw.type_info().name() {
                    "INTEGER" | "INT" | "INT4" | "INT8" | "BIGINT" | "BOOLEAN" => {
                        serde_json::Value::from(row.try_get_unchecked::<i64, _>(index)?)
                    }
                    "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => {
                        serde_json::Number::from_f64(row.try_get_unchecked::<f64, _>(index)?)
                            .map(serde_json::Value::Number)
                            .unwrap_or(serde_json::Value::Null)
                    }
                    "BLOB" => serde_json::Value::from(row.try_get_unchecked::<Vec<u8>, _>(index)?),
                    _ => serde_json::Value::String(row.try_get_unchecked::<String, _>(index)?),
                }
            };
            object.insert(column.name().to_string(), value);
        }
        Ok(serde_json::Value::Object(object))
    }

}

//! INSERT and REPLACE, plus the SET list they share with UPDATE

use super::Query;
use crate::clause::{render_assignments, SetAssignment, SetValue};
use crate::statement::{Parts, RenderContext, Statement};
use crate::{Result, Value};

impl Query {
    /// Target table of an `INSERT ... SET` statement
    pub fn insert(mut self, table: impl Into<String>) -> Self {
        self.insert = Some(table.into());
        self
    }

    pub fn replace(mut self, table: impl Into<String>) -> Self {
        self.replace = Some(table.into());
        self
    }

    /// Add a `column = value` assignment
    pub fn set(self, column: &str, value: impl Into<Value>) -> Self {
        self.push_set(column, SetValue::Value(value.into()), None)
    }

    /// Add an assignment, overriding the builder's auto-quote setting
    ///
    /// `set_quoted("updated_at", "NOW()", false)` writes `updated_at = NOW()`.
    pub fn set_quoted(self, column: &str, value: impl Into<Value>, quote: bool) -> Self {
        self.push_set(column, SetValue::Value(value.into()), Some(quote))
    }

    /// Assign the result of a nested builder: `column = (subquery)`
    pub fn set_subquery(self, column: &str, query: Query) -> Self {
        self.push_set(column, SetValue::Subquery(Box::new(query)), None)
    }

    fn push_set(mut self, column: &str, value: SetValue, quote: Option<bool>) -> Self {
        self.set.push(SetAssignment {
            column: column.to_string(),
            value,
            quote,
        });
        self
    }

    pub(crate) fn push_assignment(mut self, assignment: SetAssignment) -> Self {
        self.set.push(assignment);
        self
    }

    pub fn assignments(&self) -> &[SetAssignment] {
        &self.set
    }

    /// Attach the SET list of `update` as `ON DUPLICATE KEY UPDATE`
    ///
    /// ```
    /// use quarry_core::Query;
    ///
    /// let stmt = Query::new()
    ///     .insert("counters")
    ///     .set("name", "hits")
    ///     .set("total", 1)
    ///     .on_duplicate_key(Query::new().set_quoted("total", "total + 1", false))
    ///     .to_statement()
    ///     .unwrap();
    /// assert_eq!(
    ///     stmt.sql,
    ///     "INSERT counters SET name = ?, total = ? ON DUPLICATE KEY UPDATE total = total + 1"
    /// );
    /// ```
    pub fn on_duplicate_key(mut self, update: Query) -> Self {
        self.on_duplicate = Some(Box::new(update));
        self
    }

    pub(crate) fn render_insert(&self, ctx: &RenderContext<'_>) -> Result<Statement> {
        let mut parts = Parts::new();
        parts.push(format!(
            "{} {}",
            self.keyword_with_options("INSERT"),
            self.insert.as_deref().unwrap_or_default()
        ));
        parts.push_clause(
            "SET",
            render_assignments(&self.set, ctx, self.config.auto_quote)?,
        );
        if let Some(update) = &self.on_duplicate {
            parts.push_clause(
                "ON DUPLICATE KEY UPDATE",
                render_assignments(&update.set, ctx, update.config.auto_quote)?,
            );
        }
        parts.push(self.end_options_fragment());
        Ok(parts.finish())
    }

    pub(crate) fn render_replace(&self, ctx: &RenderContext<'_>) -> Result<Statement> {
        let mut parts = Parts::new();
        parts.push(format!(
            "{} {}",
            self.keyword_with_options("REPLACE"),
            self.replace.as_deref().unwrap_or_default()
        ));
        parts.push_clause(
            "SET",
            render_assignments(&self.set, ctx, self.config.auto_quote)?,
        );
        parts.push(self.end_options_fragment());
        Ok(parts.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BuilderConfig;

    #[test]
    fn test_insert_set() {
        let stmt = Query::new()
            .insert("users")
            .set("name", "Bob")
            .set("age", 42)
            .to_statement()
            .unwrap();
        assert_eq!(stmt.sql, "INSERT users SET name = ?, age = ?");
        assert_eq!(stmt.params, vec![Value::from("Bob"), Value::I32(42)]);
    }

    #[test]
    fn test_insert_options() {
        let sql = Query::new()
            .option("IGNORE")
            .insert("users")
            .set("name", "Bob")
            .to_sql()
            .unwrap();
        assert_eq!(sql, "INSERT IGNORE users SET name = ?");
    }

    #[test]
    fn test_on_duplicate_params_come_last() {
        let stmt = Query::new()
            .insert("stock")
            .set("sku", "A-1")
            .set("qty", 5)
            .on_duplicate_key(Query::new().set("qty", 7))
            .to_statement()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "INSERT stock SET sku = ?, qty = ? ON DUPLICATE KEY UPDATE qty = ?"
        );
        assert_eq!(
            stmt.params,
            vec![Value::from("A-1"), Value::I32(5), Value::I32(7)]
        );
    }

    #[test]
    fn test_on_duplicate_uses_its_own_quoting() {
        let raw = Query::with_config(BuilderConfig::default().auto_quote(false)).set("qty", "qty + 1");
        let sql = Query::new()
            .insert("stock")
            .set("sku", "A-1")
            .on_duplicate_key(raw)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "INSERT stock SET sku = ? ON DUPLICATE KEY UPDATE qty = qty + 1"
        );
    }

    #[test]
    fn test_replace() {
        let stmt = Query::new()
            .replace("settings")
            .set("key", "theme")
            .set("value", "dark")
            .to_statement()
            .unwrap();
        assert_eq!(stmt.sql, "REPLACE settings SET key = ?, value = ?");
        assert_eq!(stmt.params.len(), 2);
    }

    #[test]
    fn test_set_subquery() {
        let total = Query::new()
            .select("SUM(amount)")
            .from("payments")
            .where_(("user_id", 9));
        let stmt = Query::new()
            .insert("summaries")
            .set("user_id", 9)
            .set_subquery("total", total)
            .to_statement()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "INSERT summaries SET user_id = ?, total = (SELECT SUM(amount) FROM payments WHERE user_id = ?)"
        );
        assert_eq!(stmt.params, vec![Value::I32(9), Value::I32(9)]);
    }

    #[test]
    fn test_insert_inline() {
        let sql = Query::new()
            .insert("users")
            .set("name", "Bob")
            .set_quoted("created_at", "NOW()", false)
            .to_inline_sql()
            .unwrap();
        assert_eq!(sql, "INSERT users SET name = 'Bob', created_at = NOW()");
    }
}

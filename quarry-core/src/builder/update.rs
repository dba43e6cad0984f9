//! UPDATE statements

use super::Query;
use crate::clause::render_assignments;
use crate::statement::{Parts, RenderContext, Statement};
use crate::Result;

impl Query {
    /// Target table of an UPDATE; also the anchor for bare join columns
    pub fn update(mut self, table: impl Into<String>) -> Self {
        self.update = Some(table.into());
        self
    }

    pub(crate) fn render_update(&self, ctx: &RenderContext<'_>) -> Result<Statement> {
        let table = self.update.as_deref().unwrap_or_default();
        let mut target = format!("{} {}", self.keyword_with_options("UPDATE"), table);
        if !self.joins.is_empty() {
            target.push(' ');
            target.push_str(&self.joins.render(Some(table)));
        }

        let mut parts = Parts::new();
        parts.push(target);
        parts.push_clause(
            "SET",
            render_assignments(&self.set, ctx, self.config.auto_quote)?,
        );
        parts.push_clause("WHERE", self.render_where(ctx)?);
        // Multi-table UPDATE takes neither ORDER BY nor LIMIT
        if self.joins.is_empty() {
            parts.push(self.order_by_fragment());
            parts.push(self.limit_fragment());
        }
        parts.push(self.end_options_fragment());
        Ok(parts.finish())
    }
}

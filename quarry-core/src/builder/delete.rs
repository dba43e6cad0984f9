//! DELETE statements

use super::Query;
use crate::clause::DeleteTarget;
use crate::statement::{Parts, RenderContext, Statement};
use crate::Result;

impl Query {
    /// Delete rows from the FROM table
    pub fn delete(mut self) -> Self {
        self.delete = DeleteTarget::FromTable;
        self
    }

    /// Add a table to a multi-table delete: `DELETE t1, t2 FROM ...`
    pub fn delete_table(mut self, table: impl Into<String>) -> Self {
        match &mut self.delete {
            DeleteTarget::Tables(tables) => tables.push(table.into()),
            target => *target = DeleteTarget::Tables(vec![table.into()]),
        }
        self
    }

    pub fn delete_target(&self) -> &DeleteTarget {
        &self.delete
    }

    pub(crate) fn render_delete(&self, ctx: &RenderContext<'_>) -> Result<Statement> {
        let mut head = self.keyword_with_options("DELETE");
        if let DeleteTarget::Tables(tables) = &self.delete {
            head.push(' ');
            head.push_str(&tables.join(", "));
        }

        let mut parts = Parts::new();
        parts.push(head);
        parts.push_statement(self.render_from(ctx)?);
        parts.push_clause("WHERE", self.render_where(ctx)?);
        if self.delete == DeleteTarget::FromTable {
            parts.push(self.order_by_fragment());
            parts.push(self.limit_fragment());
        }
        parts.push(self.end_options_fragment());
        Ok(parts.finish())
    }
}

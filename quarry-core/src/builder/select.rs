//! SELECT list, FROM, JOIN, GROUP BY, ORDER BY and LIMIT

use super::{prefixed, Query};
use crate::clause::{
    render_group_by, render_select_list, FromClause, FromSource, GroupBySpec, IntoColumns,
    LimitSpec, OrderBySpec, SelectExpr, SelectItem, SortDirection,
};
use crate::join::{IntoJoinCriteria, JoinSpec, JoinType};
use crate::statement::{Parts, RenderContext, Statement};
use crate::Result;

impl Query {
    /// Add columns to the SELECT list
    pub fn select<T>(mut self, columns: T) -> Self
    where
        T: IntoColumns,
    {
        self.select
            .extend(columns.into_columns().into_iter().map(SelectItem::column));
        self
    }

    /// Add one column or expression under an alias
    pub fn select_as(mut self, column: impl Into<String>, alias: impl Into<String>) -> Self {
        self.select.push(SelectItem {
            expr: SelectExpr::Column(column.into()),
            alias: Some(alias.into()),
        });
        self
    }

    /// Add a nested builder as a select item: `(subquery) AS alias`
    pub fn select_subquery(mut self, query: Query, alias: impl Into<String>) -> Self {
        self.select.push(SelectItem {
            expr: SelectExpr::Subquery(Box::new(query)),
            alias: Some(alias.into()),
        });
        self
    }

    pub(crate) fn push_select_item(mut self, item: SelectItem) -> Self {
        self.select.push(item);
        self
    }

    pub fn select_items(&self) -> &[SelectItem] {
        &self.select
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = Some(FromClause {
            source: FromSource::Table(table.into()),
            alias: None,
        });
        self
    }

    pub fn from_as(mut self, table: impl Into<String>, alias: impl Into<String>) -> Self {
        self.from = Some(FromClause {
            source: FromSource::Table(table.into()),
            alias: Some(alias.into()),
        });
        self
    }

    /// Select from a nested builder: `FROM (subquery) AS alias`
    pub fn from_subquery(mut self, query: Query, alias: impl Into<String>) -> Self {
        self.from = Some(FromClause {
            source: FromSource::Subquery(Box::new(query)),
            alias: Some(alias.into()),
        });
        self
    }

    pub(crate) fn set_from(mut self, from: FromClause) -> Self {
        self.from = Some(from);
        self
    }

    pub fn from_clause(&self) -> Option<&FromClause> {
        self.from.as_ref()
    }

    /// Add a JOIN; an identical join already present is ignored
    ///
    /// A bare column criterion such as `"user_id"` expands to
    /// `<previous table>.user_id = <table>.user_id`.
    pub fn join(mut self, spec: JoinSpec) -> Self {
        self.joins.add(spec);
        self
    }

    pub fn inner_join(self, table: &str, criteria: impl IntoJoinCriteria) -> Self {
        self.join(JoinSpec::new(table, criteria, JoinType::Inner))
    }

    pub fn left_join(self, table: &str, criteria: impl IntoJoinCriteria) -> Self {
        self.join(JoinSpec::new(table, criteria, JoinType::Left))
    }

    pub fn right_join(self, table: &str, criteria: impl IntoJoinCriteria) -> Self {
        self.join(JoinSpec::new(table, criteria, JoinType::Right))
    }

    pub fn group_by<T>(mut self, columns: T) -> Self
    where
        T: IntoColumns,
    {
        self.group_by
            .extend(columns.into_columns().into_iter().map(|column| GroupBySpec {
                column,
                direction: None,
            }));
        self
    }

    /// GROUP BY with an explicit direction (MySQL)
    pub fn group_by_dir(mut self, column: &str, direction: SortDirection) -> Self {
        self.group_by.push(GroupBySpec {
            column: column.to_string(),
            direction: Some(direction),
        });
        self
    }

    pub fn order_by(mut self, column: &str, direction: SortDirection) -> Self {
        self.order_by.push(OrderBySpec {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn order_by_asc(self, column: &str) -> Self {
        self.order_by(column, SortDirection::Asc)
    }

    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by(column, SortDirection::Desc)
    }

    pub fn limit(mut self, count: u64) -> Self {
        self.limit = Some(LimitSpec { count, offset: 0 });
        self
    }

    pub fn limit_offset(mut self, count: u64, offset: u64) -> Self {
        self.limit = Some(LimitSpec { count, offset });
        self
    }

    /// Set the offset of an existing LIMIT
    ///
    /// Call after [`limit`](Self::limit). Without a LIMIT there is nothing
    /// to offset and the call is ignored.
    pub fn offset(mut self, offset: u64) -> Self {
        if let Some(limit) = self.limit.as_mut() {
            limit.offset = offset;
        }
        self
    }

    pub(crate) fn render_select(&self, ctx: &RenderContext<'_>) -> Result<Statement> {
        let mut parts = Parts::new();
        parts.push_clause(
            &self.keyword_with_options("SELECT"),
            render_select_list(&self.select, ctx)?,
        );
        parts.push_statement(self.render_from(ctx)?);
        parts.push_clause("WHERE", self.render_where(ctx)?);
        parts.push(prefixed("GROUP BY", render_group_by(&self.group_by)));
        parts.push_clause("HAVING", self.render_having(ctx)?);
        parts.push(self.order_by_fragment());
        parts.push(self.limit_fragment());
        parts.push(self.end_options_fragment());
        Ok(parts.finish())
    }
}

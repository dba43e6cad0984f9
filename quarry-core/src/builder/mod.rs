//! The statement builder
//!
//! A [`Query`] accumulates clause blocks through consuming fluent calls. The
//! statement kind is inferred from which kind block is populated (SELECT
//! list, INSERT/REPLACE/UPDATE target, DELETE target) and the matching
//! per-kind renderer assembles the final text and its ordered params.

pub mod delete;
pub mod filter;
pub mod insert;
pub mod merge;
pub mod select;
pub mod update;

use tracing::trace;

use crate::clause::{
    render_order_by, DeleteTarget, FromClause, GroupBySpec, LimitSpec, OrderBySpec,
    SelectItem, SetAssignment,
};
use crate::criteria::Criteria;
use crate::join::Joins;
use crate::quote::{DefaultQuoter, Quoter};
use crate::statement::{RenderContext, RenderMode, Statement, StatementKind};
use crate::{BuilderConfig, Error, Result};

/// A composable SQL statement
///
/// ```
/// use quarry_core::{op, Query};
///
/// let stmt = Query::new()
///     .select("id")
///     .from("users")
///     .where_(("age", op::GT, 18))
///     .to_statement()
///     .unwrap();
///
/// assert_eq!(stmt.sql, "SELECT id FROM users WHERE age > ?");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub(crate) config: BuilderConfig,
    pub(crate) options: Vec<String>,
    pub(crate) end_options: Vec<String>,
    pub(crate) select: Vec<SelectItem>,
    pub(crate) insert: Option<String>,
    pub(crate) replace: Option<String>,
    pub(crate) update: Option<String>,
    pub(crate) delete: DeleteTarget,
    pub(crate) set: Vec<SetAssignment>,
    pub(crate) on_duplicate: Option<Box<Query>>,
    pub(crate) from: Option<FromClause>,
    pub(crate) joins: Joins,
    pub(crate) where_criteria: Criteria,
    pub(crate) group_by: Vec<GroupBySpec>,
    pub(crate) having: Criteria,
    pub(crate) order_by: Vec<OrderBySpec>,
    pub(crate) limit: Option<LimitSpec>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Add an execution option emitted right after the statement keyword
    pub fn option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Add an execution option emitted at the very end of the statement
    pub fn end_option(mut self, option: impl Into<String>) -> Self {
        self.end_options.push(option.into());
        self
    }

    pub fn distinct(self) -> Self {
        self.option("DISTINCT")
    }

    pub fn calc_found_rows(self) -> Self {
        self.option("SQL_CALC_FOUND_ROWS")
    }

    pub fn lock_in_share_mode(self) -> Self {
        self.end_option("LOCK IN SHARE MODE")
    }

    pub fn lock_for_update(self) -> Self {
        self.end_option("FOR UPDATE")
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn end_options(&self) -> &[String] {
        &self.end_options
    }

    /// Kinds whose blocks are populated, in precedence order
    pub fn populated_kinds(&self) -> Vec<StatementKind> {
        let mut kinds = Vec::new();
        if !self.select.is_empty() {
            kinds.push(StatementKind::Select);
        }
        if self.insert.is_some() {
            kinds.push(StatementKind::Insert);
        }
        if self.replace.is_some() {
            kinds.push(StatementKind::Replace);
        }
        if self.update.is_some() {
            kinds.push(StatementKind::Update);
        }
        if self.delete.is_set() {
            kinds.push(StatementKind::Delete);
        }
        kinds
    }

    /// The kind this builder renders as, by precedence
    pub fn kind(&self) -> Option<StatementKind> {
        self.populated_kinds().into_iter().next()
    }

    /// Render with `?` placeholders
    pub fn to_statement(&self) -> Result<Statement> {
        self.render(RenderMode::Placeholders, &DefaultQuoter)
    }

    /// Rendered SQL text with `?` placeholders
    pub fn to_sql(&self) -> Result<String> {
        Ok(self.to_statement()?.sql)
    }

    /// Render with values inlined by the default quoter
    ///
    /// Meant for logging and debugging; bind parameters for execution.
    pub fn to_inline_sql(&self) -> Result<String> {
        self.to_inline_sql_with(&DefaultQuoter)
    }

    pub fn to_inline_sql_with(&self, quoter: &dyn Quoter) -> Result<String> {
        Ok(self.render(RenderMode::Inline, quoter)?.sql)
    }

    pub fn render(&self, mode: RenderMode, quoter: &dyn Quoter) -> Result<Statement> {
        self.render_with(&RenderContext::new(mode, quoter))
    }

    pub(crate) fn render_with(&self, ctx: &RenderContext<'_>) -> Result<Statement> {
        let kind = match self.resolve_kind()? {
            Some(kind) => kind,
            None => return Ok(Statement::default()),
        };

        let stmt = match kind {
            StatementKind::Select => self.render_select(ctx)?,
            StatementKind::Insert => self.render_insert(ctx)?,
            StatementKind::Replace => self.render_replace(ctx)?,
            StatementKind::Update => self.render_update(ctx)?,
            StatementKind::Delete => self.render_delete(ctx)?,
        };

        trace!(
            kind = %kind,
            mode = ?ctx.mode,
            params = stmt.params.len(),
            "rendered statement"
        );
        Ok(stmt)
    }

    fn resolve_kind(&self) -> Result<Option<StatementKind>> {
        let kinds = self.populated_kinds();
        if !self.config.strict {
            return Ok(kinds.first().copied());
        }

        match kinds.len() {
            0 => return Err(Error::EmptyStatement),
            1 => {}
            _ => return Err(Error::AmbiguousKind { kinds }),
        }
        self.where_criteria.validate()?;
        self.having.validate()?;
        Ok(kinds.first().copied())
    }

    /// `KEYWORD[ options]`
    pub(crate) fn keyword_with_options(&self, keyword: &str) -> String {
        if self.options.is_empty() {
            keyword.to_string()
        } else {
            format!("{} {}", keyword, self.options.join(" "))
        }
    }

    /// `FROM <target>[ joins]`, joins anchored on the FROM table
    pub(crate) fn render_from(&self, ctx: &RenderContext<'_>) -> Result<Statement> {
        let from = match &self.from {
            Some(from) => from,
            None => return Ok(Statement::default()),
        };
        let target = from.render(ctx)?;
        let mut sql = format!("FROM {}", target.sql);
        if !self.joins.is_empty() {
            sql.push(' ');
            sql.push_str(&self.joins.render(from.anchor()));
        }
        Ok(Statement::new(sql, target.params))
    }

    pub(crate) fn render_where(&self, ctx: &RenderContext<'_>) -> Result<Statement> {
        self.where_criteria.render(ctx, self.config.auto_quote)
    }

    pub(crate) fn render_having(&self, ctx: &RenderContext<'_>) -> Result<Statement> {
        self.having.render(ctx, self.config.auto_quote)
    }

    pub(crate) fn order_by_fragment(&self) -> String {
        prefixed("ORDER BY", render_order_by(&self.order_by))
    }

    pub(crate) fn limit_fragment(&self) -> String {
        self.limit
            .map(|limit| limit.render(self.config.limit_style))
            .unwrap_or_default()
    }

    pub(crate) fn end_options_fragment(&self) -> String {
        self.end_options.join(" ")
    }
}

/// `KEYWORD body`, or nothing when the body is empty
pub(crate) fn prefixed(keyword: &str, body: String) -> String {
    if body.is_empty() {
        body
    } else {
        format!("{} {}", keyword, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{op, Value};

    #[test]
    fn test_kind_precedence() {
        let query = Query::with_config(BuilderConfig::legacy())
            .update("users")
            .select("id")
            .from("users");
        assert_eq!(
            query.populated_kinds(),
            vec![StatementKind::Select, StatementKind::Update]
        );
        assert_eq!(query.kind(), Some(StatementKind::Select));
        assert_eq!(query.to_sql().unwrap(), "SELECT id FROM users");
    }

    #[test]
    fn test_strict_rejects_ambiguous_kind() {
        let err = Query::new()
            .select("id")
            .update("users")
            .to_statement()
            .unwrap_err();
        match err {
            Error::AmbiguousKind { kinds } => {
                assert_eq!(kinds, vec![StatementKind::Select, StatementKind::Update])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_statement() {
        assert!(matches!(
            Query::new().from("users").to_statement(),
            Err(Error::EmptyStatement)
        ));

        let legacy = Query::with_config(BuilderConfig::legacy()).from("users");
        assert_eq!(legacy.to_statement().unwrap(), Statement::default());
    }

    #[test]
    fn test_strict_rejects_unbalanced_where() {
        let query = Query::new()
            .select("*")
            .from("users")
            .open_where()
            .where_(("a", 1));
        assert!(matches!(
            query.to_statement(),
            Err(Error::MalformedCriteria { .. })
        ));

        let legacy = Query::with_config(BuilderConfig::legacy())
            .select("*")
            .from("users")
            .open_where()
            .where_(("a", 1));
        assert_eq!(legacy.to_sql().unwrap(), "SELECT * FROM users WHERE (a = ?");
    }

    #[test]
    fn test_strict_rejects_unbalanced_having() {
        let query = Query::new()
            .select("country")
            .from("users")
            .group_by("country")
            .close_having();
        assert!(matches!(
            query.to_statement(),
            Err(Error::MalformedCriteria { .. })
        ));
    }

    #[test]
    fn test_options_follow_keyword() {
        let sql = Query::new()
            .calc_found_rows()
            .distinct()
            .select("id")
            .from("users")
            .lock_for_update()
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT SQL_CALC_FOUND_ROWS DISTINCT id FROM users FOR UPDATE"
        );
    }

    #[test]
    fn test_inline_rendering() {
        let query = Query::new()
            .select("id")
            .from("users")
            .where_(("name", "O'Brien"))
            .where_(("age", op::GTE, 21));
        assert_eq!(
            query.to_inline_sql().unwrap(),
            "SELECT id FROM users WHERE name = 'O\\'Brien' AND age >= 21"
        );

        let quoter = |value: &Value| format!("[{}]", value.to_raw_sql());
        assert_eq!(
            query.to_inline_sql_with(&quoter).unwrap(),
            "SELECT id FROM users WHERE name = [O'Brien] AND age >= [21]"
        );
    }

    #[test]
    fn test_placeholder_round_trip() {
        let query = Query::new()
            .select("u.id")
            .from_as("users", "u")
            .left_join("orders", "user_id")
            .open_where()
            .where_(("u.name", op::LIKE, "B%"))
            .or_where_in("u.id", [1, 2])
            .close_where()
            .where_between("u.age", 18, 30)
            .group_by("u.id")
            .having(("COUNT(orders.id)", op::GT, 2))
            .order_by_desc("u.id")
            .limit(10);

        let stmt = query.to_statement().unwrap();
        assert_eq!(
            stmt.interpolate(&DefaultQuoter),
            query.to_inline_sql().unwrap()
        );
        assert_eq!(stmt.params.len(), stmt.sql.matches('?').count());
    }

    #[test]
    fn test_interpolate_counts_unquoted_question_marks() {
        let query = Query::new()
            .select("id")
            .from("notes")
            .where_quoted(("note", op::EQ, "'why?'"), false)
            .where_(("id", 1));

        assert_eq!(
            query.to_inline_sql().unwrap(),
            "SELECT id FROM notes WHERE note = 'why?' AND id = 1"
        );
        let stmt = query.to_statement().unwrap();
        assert_eq!(stmt.params, vec![Value::I32(1)]);
        assert_eq!(
            stmt.interpolate(&DefaultQuoter),
            "SELECT id FROM notes WHERE note = 'why1' AND id = ?"
        );
    }
}

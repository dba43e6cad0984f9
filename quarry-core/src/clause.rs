//! Clause blocks: select list, FROM target, ordering, limits and SET assignments

use crate::config::LimitStyle;
use crate::statement::{RenderContext, Statement};
use crate::{Query, Result, Value};

/// Trait for types that can be converted to column lists
pub trait IntoColumns {
    fn into_columns(self) -> Vec<String>;
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> Vec<String> {
        self.into_iter().map(|s| s.to_string()).collect()
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> Vec<String> {
        self
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl IntoColumns for (&str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string()]
    }
}

impl IntoColumns for (&str, &str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string(), self.2.to_string()]
    }
}

impl IntoColumns for (&str, &str, &str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![
            self.0.to_string(),
            self.1.to_string(),
            self.2.to_string(),
            self.3.to_string(),
        ]
    }
}

/// Sort direction for ORDER BY and GROUP BY
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectExpr {
    /// Column name or any expression text
    Column(String),
    Subquery(Box<Query>),
}

/// One entry of the SELECT list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: SelectExpr,
    pub alias: Option<String>,
}

impl SelectItem {
    pub fn column(column: impl Into<String>) -> Self {
        Self {
            expr: SelectExpr::Column(column.into()),
            alias: None,
        }
    }
}

pub(crate) fn render_select_list(items: &[SelectItem], ctx: &RenderContext<'_>) -> Result<Statement> {
    let mut rendered = Vec::with_capacity(items.len());
    let mut params = Vec::new();
    for item in items {
        let mut sql = match &item.expr {
            SelectExpr::Column(column) => column.clone(),
            SelectExpr::Subquery(query) => {
                let nested = query.render_with(ctx)?;
                params.extend(nested.params);
                format!("({})", nested.sql)
            }
        };
        if let Some(alias) = &item.alias {
            sql.push_str(" AS ");
            sql.push_str(alias);
        }
        rendered.push(sql);
    }
    Ok(Statement::new(rendered.join(", "), params))
}

#[derive(Debug, Clone, PartialEq)]
pub enum FromSource {
    Table(String),
    Subquery(Box<Query>),
}

/// FROM target with optional alias
#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    pub source: FromSource,
    pub alias: Option<String>,
}

impl FromClause {
    /// Table that bare join columns are matched against
    ///
    /// A FROM subquery is only addressable through its alias.
    pub fn anchor(&self) -> Option<&str> {
        match &self.source {
            FromSource::Table(table) => Some(table),
            FromSource::Subquery(_) => self.alias.as_deref(),
        }
    }

    pub(crate) fn render(&self, ctx: &RenderContext<'_>) -> Result<Statement> {
        let (mut sql, params) = match &self.source {
            FromSource::Table(table) => (table.clone(), Vec::new()),
            FromSource::Subquery(query) => {
                let nested = query.render_with(ctx)?;
                (format!("({})", nested.sql), nested.params)
            }
        };
        if let Some(alias) = &self.alias {
            sql.push_str(" AS ");
            sql.push_str(alias);
        }
        Ok(Statement::new(sql, params))
    }
}

/// A GROUP BY column; the direction is optional
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBySpec {
    pub column: String,
    pub direction: Option<SortDirection>,
}

/// An ORDER BY column
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBySpec {
    pub column: String,
    pub direction: SortDirection,
}

pub(crate) fn render_group_by(specs: &[GroupBySpec]) -> String {
    specs
        .iter()
        .map(|spec| match spec.direction {
            Some(direction) => format!("{} {}", spec.column, direction),
            None => spec.column.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn render_order_by(specs: &[OrderBySpec]) -> String {
    specs
        .iter()
        .map(|spec| format!("{} {}", spec.column, spec.direction))
        .collect::<Vec<_>>()
        .join(", ")
}

/// LIMIT count and offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitSpec {
    pub count: u64,
    pub offset: u64,
}

impl LimitSpec {
    pub fn render(&self, style: LimitStyle) -> String {
        match style {
            LimitStyle::Offset if self.offset == 0 => format!("LIMIT {}", self.count),
            LimitStyle::Offset => format!("LIMIT {} OFFSET {}", self.count, self.offset),
            LimitStyle::Legacy => format!("LIMIT {}, {}", self.offset, self.count),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetValue {
    Value(Value),
    Subquery(Box<Query>),
}

/// `column = value` in a SET or ON DUPLICATE KEY UPDATE list
#[derive(Debug, Clone, PartialEq)]
pub struct SetAssignment {
    pub column: String,
    pub value: SetValue,
    pub quote: Option<bool>,
}

pub(crate) fn render_assignments(
    assignments: &[SetAssignment],
    ctx: &RenderContext<'_>,
    auto_quote: bool,
) -> Result<Statement> {
    let mut params = Vec::new();
    let mut rendered = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let value = match &assignment.value {
            SetValue::Value(value) => {
                ctx.bind(value, assignment.quote.unwrap_or(auto_quote), &mut params)
            }
            SetValue::Subquery(query) => {
                let nested = query.render_with(ctx)?;
                params.extend(nested.params);
                format!("({})", nested.sql)
            }
        };
        rendered.push(format!("{} = {}", assignment.column, value));
    }
    Ok(Statement::new(rendered.join(", "), params))
}

/// What a DELETE statement removes rows from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteTarget {
    #[default]
    None,
    /// Bare `DELETE`, rows come from the FROM table
    FromTable,
    /// `DELETE t1, t2` for multi-table deletes
    Tables(Vec<String>),
}

impl DeleteTarget {
    pub fn is_set(&self) -> bool {
        !matches!(self, DeleteTarget::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::DefaultQuoter;
    use crate::statement::RenderMode;

    fn ctx() -> RenderContext<'static> {
        RenderContext::new(RenderMode::Placeholders, &DefaultQuoter)
    }

    #[test]
    fn test_into_columns() {
        assert_eq!(("id", "name").into_columns(), vec!["id", "name"]);
        assert_eq!(["a", "b", "c"].into_columns().len(), 3);
        assert_eq!("id".into_columns(), vec!["id"]);
    }

    #[test]
    fn test_select_list_with_alias_and_subquery() {
        let sub = Query::new()
            .select("COUNT(*)")
            .from("orders")
            .where_(("orders.status", "paid"));
        let items = vec![
            SelectItem::column("id"),
            SelectItem {
                expr: SelectExpr::Column("name".to_string()),
                alias: Some("n".to_string()),
            },
            SelectItem {
                expr: SelectExpr::Subquery(Box::new(sub)),
                alias: Some("paid".to_string()),
            },
        ];
        let stmt = render_select_list(&items, &ctx()).unwrap();
        assert_eq!(
            stmt.sql,
            "id, name AS n, (SELECT COUNT(*) FROM orders WHERE orders.status = ?) AS paid"
        );
        assert_eq!(stmt.params, vec![Value::from("paid")]);
    }

    #[test]
    fn test_from_anchor() {
        let table = FromClause {
            source: FromSource::Table("users".to_string()),
            alias: Some("u".to_string()),
        };
        assert_eq!(table.anchor(), Some("users"));
        assert_eq!(table.render(&ctx()).unwrap().sql, "users AS u");

        let nested = FromClause {
            source: FromSource::Subquery(Box::new(Query::new().select("id").from("users"))),
            alias: Some("t".to_string()),
        };
        assert_eq!(nested.anchor(), Some("t"));
        assert_eq!(
            nested.render(&ctx()).unwrap().sql,
            "(SELECT id FROM users) AS t"
        );
    }

    #[test]
    fn test_limit_styles() {
        let first = LimitSpec { count: 10, offset: 0 };
        let paged = LimitSpec { count: 10, offset: 20 };
        assert_eq!(first.render(LimitStyle::Offset), "LIMIT 10");
        assert_eq!(paged.render(LimitStyle::Offset), "LIMIT 10 OFFSET 20");
        assert_eq!(first.render(LimitStyle::Legacy), "LIMIT 0, 10");
        assert_eq!(paged.render(LimitStyle::Legacy), "LIMIT 20, 10");
    }

    #[test]
    fn test_group_and_order() {
        let groups = vec![
            GroupBySpec {
                column: "country".to_string(),
                direction: None,
            },
            GroupBySpec {
                column: "city".to_string(),
                direction: Some(SortDirection::Desc),
            },
        ];
        assert_eq!(render_group_by(&groups), "country, city DESC");

        let orders = vec![OrderBySpec {
            column: "name".to_string(),
            direction: SortDirection::Asc,
        }];
        assert_eq!(render_order_by(&orders), "name ASC");
    }

    #[test]
    fn test_assignments() {
        let assignments = vec![
            SetAssignment {
                column: "name".to_string(),
                value: SetValue::Value("Bob".into()),
                quote: None,
            },
            SetAssignment {
                column: "updated_at".to_string(),
                value: SetValue::Value("NOW()".into()),
                quote: Some(false),
            },
        ];
        let stmt = render_assignments(&assignments, &ctx(), true).unwrap();
        assert_eq!(stmt.sql, "name = ?, updated_at = NOW()");
        assert_eq!(stmt.params, vec![Value::from("Bob")]);
    }
}

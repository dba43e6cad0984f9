//! WHERE/HAVING criteria: the bracket-nested condition sequence and its renderer

use crate::operator::{Connector, IntoOperator, Operator};
use crate::statement::{RenderContext, Statement};
use crate::{Error, Query, Result, Value};

/// Right-hand side of a condition
#[derive(Debug, Clone, PartialEq)]
pub enum CriterionValue {
    Scalar(Value),
    /// `BETWEEN` bounds
    Pair(Value, Value),
    /// `IN` members
    List(Vec<Value>),
    /// A builder rendered as a parenthesized subquery
    Nested(Box<Query>),
    /// Literal SQL text, emitted verbatim
    Raw(String),
}

impl From<Value> for CriterionValue {
    fn from(value: Value) -> Self {
        CriterionValue::Scalar(value)
    }
}

impl From<Query> for CriterionValue {
    fn from(query: Query) -> Self {
        CriterionValue::Nested(Box::new(query))
    }
}

/// Trait for tuples accepted by the `where_`/`having` families
pub trait IntoCondition {
    fn into_condition(self) -> (String, Operator, Value);
}

// Shorthand equality: where_(("age", 18))
impl<T> IntoCondition for (&str, T)
where
    T: Into<Value>,
{
    fn into_condition(self) -> (String, Operator, Value) {
        (self.0.to_string(), Operator::Eq, self.1.into())
    }
}

impl<T> IntoCondition for (String, T)
where
    T: Into<Value>,
{
    fn into_condition(self) -> (String, Operator, Value) {
        (self.0, Operator::Eq, self.1.into())
    }
}

// Explicit operators: where_(("age", op::GT, 18)) or where_(("age", ">", 18))
impl<T, O> IntoCondition for (&str, O, T)
where
    T: Into<Value>,
    O: IntoOperator,
{
    fn into_condition(self) -> (String, Operator, Value) {
        (self.0.to_string(), self.1.into_operator(), self.2.into())
    }
}

impl<T, O> IntoCondition for (String, O, T)
where
    T: Into<Value>,
    O: IntoOperator,
{
    fn into_condition(self) -> (String, Operator, Value) {
        (self.0, self.1.into_operator(), self.2.into())
    }
}

/// A leaf condition: `<column> <operator> <value>`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub value: CriterionValue,
    pub connector: Connector,
    /// Overrides the builder's `auto_quote` for this value
    pub quote: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Open { connector: Connector },
    Close,
    Leaf(Condition),
}

/// Ordered criterion sequence of one WHERE or HAVING clause
///
/// Entries are never reordered. Bracket balance is not checked while
/// appending; see [`Criteria::validate`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Criteria {
    entries: Vec<Criterion>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Criterion] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.entries.iter()
    }

    pub fn push(&mut self, criterion: Criterion) {
        self.entries.push(criterion);
    }

    pub fn open_group(&mut self, connector: Connector) {
        self.entries.push(Criterion::Open { connector });
    }

    pub fn close_group(&mut self) {
        self.entries.push(Criterion::Close);
    }

    pub fn add_condition(
        &mut self,
        column: impl Into<String>,
        value: CriterionValue,
        operator: Operator,
        connector: Connector,
        quote: Option<bool>,
    ) {
        self.entries.push(Criterion::Leaf(Condition {
            column: column.into(),
            operator,
            value,
            connector,
            quote,
        }));
    }

    pub fn or(&mut self, column: impl Into<String>, value: impl Into<Value>, operator: Operator) {
        self.add_condition(
            column,
            CriterionValue::Scalar(value.into()),
            operator,
            Connector::Or,
            None,
        );
    }

    pub fn in_list<I, V>(&mut self, column: impl Into<String>, values: I, connector: Connector)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.add_condition(column, CriterionValue::List(values), Operator::In, connector, None);
    }

    pub fn not_in<I, V>(&mut self, column: impl Into<String>, values: I, connector: Connector)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.add_condition(column, CriterionValue::List(values), Operator::NotIn, connector, None);
    }

    pub fn between(
        &mut self,
        column: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
        connector: Connector,
    ) {
        let value = CriterionValue::Pair(min.into(), max.into());
        self.add_condition(column, value, Operator::Between, connector, None);
    }

    pub fn not_between(
        &mut self,
        column: impl Into<String>,
        min: impl Into<Value>,
        max: impl Into<Value>,
        connector: Connector,
    ) {
        let value = CriterionValue::Pair(min.into(), max.into());
        self.add_condition(column, value, Operator::NotBetween, connector, None);
    }

    /// Check bracket balance, IN lists and RAW fragments
    pub fn validate(&self) -> Result<()> {
        let mut depth = 0usize;
        let mut just_opened = false;
        for entry in &self.entries {
            match entry {
                Criterion::Open { .. } => {
                    depth += 1;
                    just_opened = true;
                    continue;
                }
                Criterion::Close => {
                    if depth == 0 {
                        return Err(Error::malformed_criteria(
                            "closing bracket without a matching opening bracket",
                        ));
                    }
                    if just_opened {
                        return Err(Error::malformed_criteria("empty bracket group"));
                    }
                    depth -= 1;
                }
                Criterion::Leaf(condition) => validate_condition(condition)?,
            }
            just_opened = false;
        }
        if depth > 0 {
            return Err(Error::malformed_criteria(format!(
                "{} unclosed bracket(s)",
                depth
            )));
        }
        Ok(())
    }

    /// Render to text and the values bound by its `?` markers
    pub(crate) fn render(&self, ctx: &RenderContext<'_>, auto_quote: bool) -> Result<Statement> {
        let mut sql = String::new();
        let mut params = Vec::new();
        let mut pending_connector = false;

        for entry in &self.entries {
            match entry {
                Criterion::Open { connector } => {
                    if pending_connector {
                        push_connector(&mut sql, *connector);
                    }
                    sql.push('(');
                    pending_connector = false;
                }
                Criterion::Close => {
                    sql.push(')');
                    pending_connector = true;
                }
                Criterion::Leaf(condition) => {
                    if pending_connector {
                        push_connector(&mut sql, condition.connector);
                    }
                    pending_connector = true;
                    sql.push_str(&render_condition(condition, ctx, auto_quote, &mut params)?);
                }
            }
        }

        Ok(Statement::new(sql, params))
    }
}

fn push_connector(sql: &mut String, connector: Connector) {
    sql.push(' ');
    sql.push_str(connector.as_str());
    sql.push(' ');
}

fn validate_condition(condition: &Condition) -> Result<()> {
    match (condition.operator, &condition.value) {
        (Operator::In | Operator::NotIn, CriterionValue::List(values)) if values.is_empty() => {
            Err(Error::malformed_criteria(format!(
                "empty {} list for column `{}`",
                condition.operator, condition.column
            )))
        }
        (Operator::Raw, _) if condition.column.matches('?').count() != 1 => {
            Err(Error::malformed_criteria(format!(
                "raw fragment `{}` must contain exactly one `?`",
                condition.column
            )))
        }
        _ => Ok(()),
    }
}

fn shape_error(condition: &Condition, expected: &str) -> Error {
    Error::invalid_query(format!(
        "{} on `{}` requires {}",
        condition.operator, condition.column, expected
    ))
}

fn render_nested(query: &Query, ctx: &RenderContext<'_>, params: &mut Vec<Value>) -> Result<String> {
    let nested = query.render_with(ctx)?;
    params.extend(nested.params);
    Ok(format!("({})", nested.sql))
}

fn render_condition(
    condition: &Condition,
    ctx: &RenderContext<'_>,
    auto_quote: bool,
    params: &mut Vec<Value>,
) -> Result<String> {
    let quote = condition.quote.unwrap_or(auto_quote);

    let rhs = match condition.operator {
        Operator::Between | Operator::NotBetween => match &condition.value {
            CriterionValue::Pair(min, max) => format!(
                "{} AND {}",
                ctx.bind(min, quote, params),
                ctx.bind(max, quote, params)
            ),
            _ => return Err(shape_error(condition, "a pair of values")),
        },
        Operator::In | Operator::NotIn => match &condition.value {
            CriterionValue::List(values) => {
                let items: Vec<String> = values
                    .iter()
                    .map(|value| ctx.bind(value, quote, params))
                    .collect();
                format!("({})", items.join(", "))
            }
            CriterionValue::Nested(query) => render_nested(query, ctx, params)?,
            _ => return Err(shape_error(condition, "a list of values")),
        },
        Operator::Is | Operator::IsNot => match &condition.value {
            CriterionValue::Scalar(value) => value.to_raw_sql(),
            CriterionValue::Raw(text) => text.clone(),
            _ => return Err(shape_error(condition, "a single value")),
        },
        Operator::SubqueryIn => match &condition.value {
            CriterionValue::Nested(query) => render_nested(query, ctx, params)?,
            CriterionValue::Raw(text) => format!("({})", text),
            _ => return Err(shape_error(condition, "a subquery")),
        },
        Operator::Raw => {
            let value = match &condition.value {
                CriterionValue::Scalar(value) => value,
                _ => return Err(shape_error(condition, "a single bound value")),
            };
            if ctx.placeholders() {
                params.push(value.clone());
                return Ok(condition.column.clone());
            }
            return Ok(condition.column.replace('?', &ctx.quoter.quote(value)));
        }
        _ => match &condition.value {
            CriterionValue::Scalar(value) => ctx.bind(value, quote, params),
            CriterionValue::Nested(query) => render_nested(query, ctx, params)?,
            CriterionValue::Raw(text) => text.clone(),
            _ => return Err(shape_error(condition, "a single value")),
        },
    };

    Ok(format!(
        "{} {} {}",
        condition.column,
        condition.operator.as_str(),
        rhs
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::DefaultQuoter;
    use crate::statement::RenderMode;

    fn render(criteria: &Criteria) -> Statement {
        let ctx = RenderContext::new(RenderMode::Placeholders, &DefaultQuoter);
        criteria.render(&ctx, true).unwrap()
    }

    fn render_inline(criteria: &Criteria) -> String {
        let ctx = RenderContext::new(RenderMode::Inline, &DefaultQuoter);
        criteria.render(&ctx, true).unwrap().sql
    }

    fn eq(criteria: &mut Criteria, column: &str, value: impl Into<Value>, connector: Connector) {
        criteria.add_condition(
            column,
            CriterionValue::Scalar(value.into()),
            Operator::Eq,
            connector,
            None,
        );
    }

    #[test]
    fn test_connectors_between_siblings() {
        let mut criteria = Criteria::new();
        eq(&mut criteria, "age", 30, Connector::And);
        criteria.or("status", "active", Operator::Eq);
        eq(&mut criteria, "name", "Bob", Connector::And);

        let stmt = render(&criteria);
        assert_eq!(stmt.sql, "age = ? OR status = ? AND name = ?");
        assert_eq!(
            stmt.params,
            vec![Value::I32(30), Value::from("active"), Value::from("Bob")]
        );
    }

    #[test]
    fn test_bracket_group_then_leaf() {
        let mut criteria = Criteria::new();
        criteria.open_group(Connector::And);
        eq(&mut criteria, "a", 1, Connector::And);
        criteria.or("b", 2, Operator::Eq);
        criteria.close_group();
        eq(&mut criteria, "c", 3, Connector::And);

        let stmt = render(&criteria);
        assert_eq!(stmt.sql, "(a = ? OR b = ?) AND c = ?");
        assert_eq!(stmt.params, vec![Value::I32(1), Value::I32(2), Value::I32(3)]);
    }

    #[test]
    fn test_group_connector_after_leaf() {
        let mut criteria = Criteria::new();
        eq(&mut criteria, "a", 1, Connector::And);
        criteria.open_group(Connector::Or);
        eq(&mut criteria, "b", 2, Connector::And);
        eq(&mut criteria, "c", 3, Connector::And);
        criteria.close_group();

        assert_eq!(render(&criteria).sql, "a = ? OR (b = ? AND c = ?)");
    }

    #[test]
    fn test_nested_groups() {
        let mut criteria = Criteria::new();
        criteria.open_group(Connector::And);
        criteria.open_group(Connector::And);
        eq(&mut criteria, "a", 1, Connector::And);
        criteria.close_group();
        criteria.open_group(Connector::Or);
        eq(&mut criteria, "b", 2, Connector::And);
        criteria.close_group();
        criteria.close_group();

        assert_eq!(render(&criteria).sql, "((a = ?) OR (b = ?))");
    }

    #[test]
    fn test_in_list() {
        let mut criteria = Criteria::new();
        criteria.in_list("id", [1, 2, 3], Connector::And);
        let stmt = render(&criteria);
        assert_eq!(stmt.sql, "id IN (?, ?, ?)");
        assert_eq!(stmt.params.len(), 3);

        assert_eq!(render_inline(&criteria), "id IN (1, 2, 3)");
    }

    #[test]
    fn test_not_in_strings_inline() {
        let mut criteria = Criteria::new();
        criteria.not_in("status", ["banned", "deleted"], Connector::And);
        assert_eq!(
            render_inline(&criteria),
            "status NOT IN ('banned', 'deleted')"
        );
    }

    #[test]
    fn test_between() {
        let mut criteria = Criteria::new();
        criteria.between("age", 18, 65, Connector::And);
        criteria.not_between("score", 0, 10, Connector::Or);

        let stmt = render(&criteria);
        assert_eq!(stmt.sql, "age BETWEEN ? AND ? OR score NOT BETWEEN ? AND ?");
        assert_eq!(
            stmt.params,
            vec![Value::I32(18), Value::I32(65), Value::I32(0), Value::I32(10)]
        );
    }

    #[test]
    fn test_is_null_is_verbatim() {
        let mut criteria = Criteria::new();
        criteria.add_condition(
            "deleted_at",
            CriterionValue::Scalar(Value::Null),
            Operator::Is,
            Connector::And,
            None,
        );
        criteria.add_condition(
            "email",
            CriterionValue::Raw("NOT NULL".to_string()),
            Operator::Is,
            Connector::And,
            None,
        );

        let stmt = render(&criteria);
        assert_eq!(stmt.sql, "deleted_at IS NULL AND email IS NOT NULL");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_raw_fragment_placeholder_and_inline() {
        let mut criteria = Criteria::new();
        criteria.add_condition(
            "password = PASSWORD(?)",
            CriterionValue::Scalar("secret".into()),
            Operator::Raw,
            Connector::And,
            None,
        );

        let stmt = render(&criteria);
        assert_eq!(stmt.sql, "password = PASSWORD(?)");
        assert_eq!(stmt.params, vec![Value::from("secret")]);

        assert_eq!(render_inline(&criteria), "password = PASSWORD('secret')");
    }

    #[test]
    fn test_subquery_in_literal_text() {
        let mut criteria = Criteria::new();
        criteria.add_condition(
            "user_id",
            CriterionValue::Raw("SELECT id FROM admins".to_string()),
            Operator::SubqueryIn,
            Connector::And,
            None,
        );
        let stmt = render(&criteria);
        assert_eq!(stmt.sql, "user_id IN (SELECT id FROM admins)");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_subquery_in_splices_params() {
        let sub = Query::new()
            .select("user_id")
            .from("orders")
            .where_(("total", ">", 100));

        let mut criteria = Criteria::new();
        eq(&mut criteria, "active", 1, Connector::And);
        criteria.add_condition("id", sub.into(), Operator::SubqueryIn, Connector::And, None);
        eq(&mut criteria, "role", "admin", Connector::And);

        let stmt = render(&criteria);
        assert_eq!(
            stmt.sql,
            "active = ? AND id IN (SELECT user_id FROM orders WHERE total > ?) AND role = ?"
        );
        assert_eq!(
            stmt.params,
            vec![Value::I32(1), Value::I32(100), Value::from("admin")]
        );
    }

    #[test]
    fn test_unquoted_value_is_inlined_in_placeholder_mode() {
        let mut criteria = Criteria::new();
        criteria.add_condition(
            "created_at",
            CriterionValue::Scalar("NOW()".into()),
            Operator::Lt,
            Connector::And,
            Some(false),
        );
        let stmt = render(&criteria);
        assert_eq!(stmt.sql, "created_at < NOW()");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_auto_quote_off_applies_when_no_override() {
        let mut criteria = Criteria::new();
        eq(&mut criteria, "a", "b.col", Connector::And);
        criteria.add_condition(
            "c",
            CriterionValue::Scalar(5.into()),
            Operator::Eq,
            Connector::And,
            Some(true),
        );
        let ctx = RenderContext::new(RenderMode::Placeholders, &DefaultQuoter);
        let stmt = criteria.render(&ctx, false).unwrap();
        assert_eq!(stmt.sql, "a = b.col AND c = ?");
        assert_eq!(stmt.params, vec![Value::I32(5)]);
    }

    #[test]
    fn test_shape_mismatch_is_invalid_query() {
        let mut criteria = Criteria::new();
        criteria.add_condition(
            "age",
            CriterionValue::Scalar(5.into()),
            Operator::Between,
            Connector::And,
            None,
        );
        let ctx = RenderContext::new(RenderMode::Placeholders, &DefaultQuoter);
        let err = criteria.render(&ctx, true).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));
    }

    #[test]
    fn test_validate_balance() {
        let mut criteria = Criteria::new();
        criteria.open_group(Connector::And);
        eq(&mut criteria, "a", 1, Connector::And);
        assert!(matches!(
            criteria.validate(),
            Err(Error::MalformedCriteria { .. })
        ));

        criteria.close_group();
        assert!(criteria.validate().is_ok());

        criteria.close_group();
        let err = criteria.validate().unwrap_err();
        assert!(err.to_string().contains("without a matching opening bracket"));
    }

    #[test]
    fn test_validate_empty_group_and_list() {
        let mut empty_group = Criteria::new();
        empty_group.open_group(Connector::And);
        empty_group.close_group();
        assert!(empty_group.validate().is_err());

        let mut empty_list = Criteria::new();
        empty_list.in_list("id", Vec::<i32>::new(), Connector::And);
        let err = empty_list.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed criteria: empty IN list for column `id`"
        );
    }

    #[test]
    fn test_validate_raw_placeholder_count() {
        let mut criteria = Criteria::new();
        criteria.add_condition(
            "a = ? OR b = ?",
            CriterionValue::Scalar(1.into()),
            Operator::Raw,
            Connector::And,
            None,
        );
        assert!(matches!(
            criteria.validate(),
            Err(Error::MalformedCriteria { .. })
        ));
    }

    #[test]
    fn test_unbalanced_renders_without_validation() {
        let mut criteria = Criteria::new();
        criteria.open_group(Connector::And);
        eq(&mut criteria, "a", 1, Connector::And);
        assert_eq!(render(&criteria).sql, "(a = ?");
    }

    #[test]
    fn test_round_trip_matches_inline() {
        let mut criteria = Criteria::new();
        criteria.open_group(Connector::And);
        eq(&mut criteria, "name", "O'Brien", Connector::And);
        criteria.in_list("id", [4, 5], Connector::Or);
        criteria.close_group();
        criteria.between("age", 18.5, 30.0, Connector::And);

        let stmt = render(&criteria);
        assert_eq!(stmt.interpolate(&DefaultQuoter), render_inline(&criteria));
    }
}

//! WHERE and HAVING criteria
//!
//! Both clauses share one criterion model. Bracket groups are opened and
//! closed explicitly; balance is checked at render time in strict mode.

use super::Query;
use crate::criteria::{Criteria, CriterionValue, IntoCondition};
use crate::operator::{Connector, Operator};
use crate::Value;

fn push_condition<C>(criteria: &mut Criteria, condition: C, connector: Connector, quote: Option<bool>)
where
    C: IntoCondition,
{
    let (column, operator, value) = condition.into_condition();
    criteria.add_condition(column, CriterionValue::Scalar(value), operator, connector, quote);
}

impl Query {
    pub fn where_criteria(&self) -> &Criteria {
        &self.where_criteria
    }

    /// Open a bracket group joined to the previous criterion with AND
    pub fn open_where(mut self) -> Self {
        self.where_criteria.open_group(Connector::And);
        self
    }

    /// Open a bracket group joined to the previous criterion with OR
    pub fn or_open_where(mut self) -> Self {
        self.where_criteria.open_group(Connector::Or);
        self
    }

    pub fn close_where(mut self) -> Self {
        self.where_criteria.close_group();
        self
    }

    /// Append a condition with every field spelled out
    pub fn add_where(
        mut self,
        column: impl Into<String>,
        value: CriterionValue,
        operator: Operator,
        connector: Connector,
        quote: Option<bool>,
    ) -> Self {
        self.where_criteria
            .add_condition(column, value, operator, connector, quote);
        self
    }

    /// Add a WHERE condition: `where_(("age", 18))` or `where_(("age", op::GT, 18))`
    pub fn where_<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        push_condition(&mut self.where_criteria, condition, Connector::And, None);
        self
    }

    /// Add an AND WHERE condition (same as where_)
    pub fn and_where<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.where_(condition)
    }

    pub fn or_where<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        let (column, operator, value) = condition.into_condition();
        self.where_criteria.or(column, value, operator);
        self
    }

    /// Add a WHERE condition, overriding the builder's auto-quote setting
    ///
    /// With `quote = false` the value is written into the SQL as is, which
    /// is how column references and SQL functions are compared against.
    pub fn where_quoted<C>(mut self, condition: C, quote: bool) -> Self
    where
        C: IntoCondition,
    {
        push_condition(&mut self.where_criteria, condition, Connector::And, Some(quote));
        self
    }

    pub fn where_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_criteria.in_list(column, values, Connector::And);
        self
    }

    pub fn or_where_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_criteria.in_list(column, values, Connector::Or);
        self
    }

    pub fn where_not_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_criteria.not_in(column, values, Connector::And);
        self
    }

    pub fn or_where_not_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_criteria.not_in(column, values, Connector::Or);
        self
    }

    pub fn where_between(mut self, column: &str, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.where_criteria.between(column, min, max, Connector::And);
        self
    }

    pub fn or_where_between(mut self, column: &str, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.where_criteria.between(column, min, max, Connector::Or);
        self
    }

    pub fn where_not_between(mut self, column: &str, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.where_criteria.not_between(column, min, max, Connector::And);
        self
    }

    pub fn or_where_not_between(
        mut self,
        column: &str,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Self {
        self.where_criteria.not_between(column, min, max, Connector::Or);
        self
    }

    /// `column IN (subquery)`; the subquery's params are spliced in place
    pub fn where_subquery_in(mut self, column: &str, subquery: Query) -> Self {
        self.where_criteria.add_condition(
            column,
            CriterionValue::Nested(Box::new(subquery)),
            Operator::SubqueryIn,
            Connector::And,
            None,
        );
        self
    }

    /// A handcrafted expression with exactly one `?`, bound to `value`
    ///
    /// ```
    /// use quarry_core::Query;
    ///
    /// let stmt = Query::new()
    ///     .select("id")
    ///     .from("users")
    ///     .where_raw("password = PASSWORD(?)", "secret")
    ///     .to_statement()
    ///     .unwrap();
    /// assert_eq!(stmt.sql, "SELECT id FROM users WHERE password = PASSWORD(?)");
    /// ```
    pub fn where_raw(mut self, expression: &str, value: impl Into<Value>) -> Self {
        self.where_criteria.add_condition(
            expression,
            CriterionValue::Scalar(value.into()),
            Operator::Raw,
            Connector::And,
            None,
        );
        self
    }

    pub fn or_where_raw(mut self, expression: &str, value: impl Into<Value>) -> Self {
        self.where_criteria.add_condition(
            expression,
            CriterionValue::Scalar(value.into()),
            Operator::Raw,
            Connector::Or,
            None,
        );
        self
    }

    pub fn where_null(mut self, column: &str) -> Self {
        self.where_criteria.add_condition(
            column,
            CriterionValue::Raw("NULL".to_string()),
            Operator::Is,
            Connector::And,
            None,
        );
        self
    }

    pub fn or_where_null(mut self, column: &str) -> Self {
        self.where_criteria.add_condition(
            column,
            CriterionValue::Raw("NULL".to_string()),
            Operator::Is,
            Connector::Or,
            None,
        );
        self
    }

    pub fn where_not_null(mut self, column: &str) -> Self {
        self.where_criteria.add_condition(
            column,
            CriterionValue::Raw("NULL".to_string()),
            Operator::IsNot,
            Connector::And,
            None,
        );
        self
    }

    pub fn having_criteria(&self) -> &Criteria {
        &self.having
    }

    pub fn open_having(mut self) -> Self {
        self.having.open_group(Connector::And);
        self
    }

    pub fn or_open_having(mut self) -> Self {
        self.having.open_group(Connector::Or);
        self
    }

    pub fn close_having(mut self) -> Self {
        self.having.close_group();
        self
    }

    pub fn add_having(
        mut self,
        column: impl Into<String>,
        value: CriterionValue,
        operator: Operator,
        connector: Connector,
        quote: Option<bool>,
    ) -> Self {
        self.having.add_condition(column, value, operator, connector, quote);
        self
    }

    pub fn having<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        push_condition(&mut self.having, condition, Connector::And, None);
        self
    }

    pub fn and_having<C>(self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.having(condition)
    }

    pub fn or_having<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        let (column, operator, value) = condition.into_condition();
        self.having.or(column, value, operator);
        self
    }

    pub fn having_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.having.in_list(column, values, Connector::And);
        self
    }

    pub fn or_having_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.having.in_list(column, values, Connector::Or);
        self
    }

    pub fn having_not_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.having.not_in(column, values, Connector::And);
        self
    }

    pub fn or_having_not_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.having.not_in(column, values, Connector::Or);
        self
    }

    pub fn having_between(mut self, column: &str, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.having.between(column, min, max, Connector::And);
        self
    }

    pub fn or_having_between(mut self, column: &str, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.having.between(column, min, max, Connector::Or);
        self
    }

    pub fn having_not_between(mut self, column: &str, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        self.having.not_between(column, min, max, Connector::And);
        self
    }

    pub fn or_having_not_between(
        mut self,
        column: &str,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Self {
        self.having.not_between(column, min, max, Connector::Or);
        self
    }

    pub fn having_raw(mut self, expression: &str, value: impl Into<Value>) -> Self {
        self.having.add_condition(
            expression,
            CriterionValue::Scalar(value.into()),
            Operator::Raw,
            Connector::And,
            None,
        );
        self
    }
}

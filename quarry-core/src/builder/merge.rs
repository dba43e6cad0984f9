//! Replaying one builder's clauses into another
//!
//! Every helper goes through the target's fluent API, so target-side rules
//! such as join deduplication still apply. The target keeps its own
//! [`BuilderConfig`](crate::BuilderConfig).

use super::Query;
use crate::clause::DeleteTarget;
use crate::criteria::{Condition, Criteria, Criterion};
use crate::operator::Connector;
use crate::statement::StatementKind;

impl Query {
    /// Replay this builder into `target`
    ///
    /// Only the blocks relevant to this builder's kind are copied. With
    /// `override_limit = false` the LIMIT and trailing options are left
    /// out so the target keeps its own.
    ///
    /// ```
    /// use quarry_core::Query;
    ///
    /// let base = Query::new().select("id").from("users").where_(("active", 1));
    /// let merged = base.merge_into(Query::new().where_(("role", "admin")), true);
    ///
    /// assert_eq!(
    ///     merged.to_sql().unwrap(),
    ///     "SELECT id FROM users WHERE role = ? AND active = ?"
    /// );
    /// ```
    pub fn merge_into(&self, target: Query, override_limit: bool) -> Query {
        let kind = match self.kind() {
            Some(kind) => kind,
            None => return target,
        };

        match kind {
            StatementKind::Select => {
                let mut target = self.merge_select_into(target);
                target = self.merge_from_into(target);
                target = self.merge_join_into(target);
                target = self.merge_where_into(target);
                target = self.merge_group_by_into(target);
                target = self.merge_having_into(target);
                target = self.merge_order_by_into(target);
                if override_limit {
                    target = self.merge_limit_into(target);
                }
                target
            }
            StatementKind::Insert | StatementKind::Replace => {
                let mut target = self.merge_options_into(target);
                if let (StatementKind::Insert, Some(table)) = (kind, &self.insert) {
                    target = target.insert(table.clone());
                }
                if let (StatementKind::Replace, Some(table)) = (kind, &self.replace) {
                    target = target.replace(table.clone());
                }
                target = self.merge_set_into(target);
                if let Some(update) = &self.on_duplicate {
                    target = target.on_duplicate_key(update.as_ref().clone());
                }
                if override_limit {
                    target = self.merge_end_options_into(target);
                }
                target
            }
            StatementKind::Update => {
                let mut target = self.merge_options_into(target);
                if let Some(table) = &self.update {
                    target = target.update(table.clone());
                }
                target = self.merge_join_into(target);
                target = self.merge_set_into(target);
                target = self.merge_where_into(target);
                if self.joins.is_empty() {
                    target = self.merge_order_by_into(target);
                    if override_limit {
                        target = self.merge_limit_into(target);
                    }
                } else if override_limit {
                    target = self.merge_end_options_into(target);
                }
                target
            }
            StatementKind::Delete => {
                let mut target = self.merge_options_into(target);
                target = match &self.delete {
                    DeleteTarget::FromTable => target.delete(),
                    DeleteTarget::Tables(tables) => tables
                        .iter()
                        .fold(target, |target, table| target.delete_table(table.clone())),
                    DeleteTarget::None => target,
                };
                target = self.merge_from_into(target);
                target = self.merge_join_into(target);
                target = self.merge_where_into(target);
                if self.delete == DeleteTarget::FromTable {
                    target = self.merge_order_by_into(target);
                    if override_limit {
                        target = self.merge_limit_into(target);
                    }
                } else if override_limit {
                    target = self.merge_end_options_into(target);
                }
                target
            }
        }
    }

    pub fn merge_options_into(&self, target: Query) -> Query {
        self.options
            .iter()
            .fold(target, |target, option| target.option(option.clone()))
    }

    pub fn merge_end_options_into(&self, target: Query) -> Query {
        self.end_options
            .iter()
            .fold(target, |target, option| target.end_option(option.clone()))
    }

    /// Options and the SELECT list
    pub fn merge_select_into(&self, target: Query) -> Query {
        let target = self.merge_options_into(target);
        self.select
            .iter()
            .fold(target, |target, item| target.push_select_item(item.clone()))
    }

    pub fn merge_from_into(&self, target: Query) -> Query {
        match &self.from {
            Some(from) => target.set_from(from.clone()),
            None => target,
        }
    }

    pub fn merge_join_into(&self, target: Query) -> Query {
        self.joins
            .iter()
            .fold(target, |target, spec| target.join(spec.clone()))
    }

    pub fn merge_set_into(&self, target: Query) -> Query {
        self.set
            .iter()
            .fold(target, |target, assignment| target.push_assignment(assignment.clone()))
    }

    pub fn merge_where_into(&self, target: Query) -> Query {
        let replay = CriteriaReplay {
            open_and: Query::open_where,
            open_or: Query::or_open_where,
            close: Query::close_where,
            leaf: |target: Query, c: Condition| {
                target.add_where(c.column, c.value, c.operator, c.connector, c.quote)
            },
        };
        replay.run(&self.where_criteria, target)
    }

    pub fn merge_having_into(&self, target: Query) -> Query {
        let replay = CriteriaReplay {
            open_and: Query::open_having,
            open_or: Query::or_open_having,
            close: Query::close_having,
            leaf: |target: Query, c: Condition| {
                target.add_having(c.column, c.value, c.operator, c.connector, c.quote)
            },
        };
        replay.run(&self.having, target)
    }

    pub fn merge_group_by_into(&self, target: Query) -> Query {
        self.group_by.iter().fold(target, |target, spec| match spec.direction {
            Some(direction) => target.group_by_dir(&spec.column, direction),
            None => target.group_by(spec.column.as_str()),
        })
    }

    pub fn merge_order_by_into(&self, target: Query) -> Query {
        self.order_by
            .iter()
            .fold(target, |target, spec| target.order_by(&spec.column, spec.direction))
    }

    /// LIMIT and trailing options
    pub fn merge_limit_into(&self, target: Query) -> Query {
        let target = match self.limit {
            Some(limit) => target.limit_offset(limit.count, limit.offset),
            None => target,
        };
        self.merge_end_options_into(target)
    }
}

/// The fluent calls that rebuild one criterion sequence on a target
struct CriteriaReplay<F> {
    open_and: fn(Query) -> Query,
    open_or: fn(Query) -> Query,
    close: fn(Query) -> Query,
    leaf: F,
}

impl<F> CriteriaReplay<F>
where
    F: Fn(Query, Condition) -> Query,
{
    fn run(&self, criteria: &Criteria, target: Query) -> Query {
        criteria.iter().fold(target, |target, entry| match entry {
            Criterion::Open {
                connector: Connector::And,
            } => (self.open_and)(target),
            Criterion::Open {
                connector: Connector::Or,
            } => (self.open_or)(target),
            Criterion::Close => (self.close)(target),
            Criterion::Leaf(condition) => (self.leaf)(target, condition.clone()),
        })
    }
}

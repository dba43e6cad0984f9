//! JOIN specifications and ON-criteria inference

use serde::{Deserialize, Serialize};

/// JOIN types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER JOIN"),
            JoinType::Left => write!(f, "LEFT JOIN"),
            JoinType::Right => write!(f, "RIGHT JOIN"),
        }
    }
}

/// One JOIN: target table, optional alias and its ON criteria
///
/// Each criterion is either a full boolean expression (`a.id = b.a_id`) or
/// a bare column name, expanded against the previous table at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    pub table: String,
    pub alias: Option<String>,
    pub join_type: JoinType,
    pub criteria: Vec<String>,
}

impl JoinSpec {
    pub fn new(table: impl Into<String>, criteria: impl IntoJoinCriteria, join_type: JoinType) -> Self {
        Self {
            table: table.into(),
            alias: None,
            join_type,
            criteria: criteria.into_join_criteria(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Trait for the forms accepted as ON criteria
pub trait IntoJoinCriteria {
    fn into_join_criteria(self) -> Vec<String>;
}

/// No ON clause
impl IntoJoinCriteria for () {
    fn into_join_criteria(self) -> Vec<String> {
        Vec::new()
    }
}

impl IntoJoinCriteria for &str {
    fn into_join_criteria(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoJoinCriteria for String {
    fn into_join_criteria(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoJoinCriteria for Vec<&str> {
    fn into_join_criteria(self) -> Vec<String> {
        self.into_iter().map(|s| s.to_string()).collect()
    }
}

impl IntoJoinCriteria for Vec<String> {
    fn into_join_criteria(self) -> Vec<String> {
        self
    }
}

impl IntoJoinCriteria for &[&str] {
    fn into_join_criteria(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoJoinCriteria for [&str; N] {
    fn into_join_criteria(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

/// Ordered joins of one statement; identical specs are kept once
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Joins {
    specs: Vec<JoinSpec>,
}

impl Joins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a join, returning `false` when an identical one is already present
    pub fn add(&mut self, spec: JoinSpec) -> bool {
        if self.specs.contains(&spec) {
            return false;
        }
        self.specs.push(spec);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JoinSpec> {
        self.specs.iter()
    }

    /// Render all joins, space separated
    ///
    /// `anchor` is the table bare columns of the first join are matched
    /// against: the FROM table, or the UPDATE target.
    pub fn render(&self, anchor: Option<&str>) -> String {
        self.specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let previous = match i {
                    0 => anchor,
                    _ => Some(self.specs[i - 1].table.as_str()),
                };
                render_join(spec, previous)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn render_join(spec: &JoinSpec, previous: Option<&str>) -> String {
    let mut sql = format!("{} {}", spec.join_type, spec.table);
    if let Some(alias) = &spec.alias {
        sql.push_str(" AS ");
        sql.push_str(alias);
    }
    if spec.criteria.is_empty() {
        return sql;
    }

    let criteria: Vec<String> = spec
        .criteria
        .iter()
        .map(|criterion| {
            if !is_bare_column(criterion) {
                return criterion.clone();
            }
            match previous {
                Some(prev) => format!("{prev}.{criterion} = {}.{criterion}", spec.table),
                None => format!("{criterion} = {}.{criterion}", spec.table),
            }
        })
        .collect();

    sql.push_str(" ON ");
    sql.push_str(&criteria.join(" AND "));
    sql
}

/// A criterion with no whitespace and no comparison token names a column
fn is_bare_column(criterion: &str) -> bool {
    !criterion
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '=' | '<' | '>' | '!'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_column_against_anchor() {
        let mut joins = Joins::new();
        joins.add(JoinSpec::new("orders", "user_id", JoinType::Inner));
        assert_eq!(
            joins.render(Some("users")),
            "INNER JOIN orders ON users.user_id = orders.user_id"
        );
    }

    #[test]
    fn test_bare_column_against_previous_join() {
        let mut joins = Joins::new();
        joins.add(JoinSpec::new("orders", "user_id", JoinType::Inner));
        joins.add(JoinSpec::new("items", "order_id", JoinType::Left));
        assert_eq!(
            joins.render(Some("users")),
            "INNER JOIN orders ON users.user_id = orders.user_id \
             LEFT JOIN items ON orders.order_id = items.order_id"
        );
    }

    #[test]
    fn test_bare_column_without_anchor() {
        let mut joins = Joins::new();
        joins.add(JoinSpec::new("orders", "user_id", JoinType::Right));
        assert_eq!(
            joins.render(None),
            "RIGHT JOIN orders ON user_id = orders.user_id"
        );
    }

    #[test]
    fn test_full_expressions_and_alias() {
        let mut joins = Joins::new();
        joins.add(
            JoinSpec::new(
                "profiles",
                ["p.user_id = u.id", "p.active = 1"],
                JoinType::Left,
            )
            .alias("p"),
        );
        assert_eq!(
            joins.render(Some("users")),
            "LEFT JOIN profiles AS p ON p.user_id = u.id AND p.active = 1"
        );
    }

    #[test]
    fn test_mixed_criteria() {
        let mut joins = Joins::new();
        joins.add(JoinSpec::new(
            "orders",
            vec!["user_id", "orders.total > 10"],
            JoinType::Inner,
        ));
        assert_eq!(
            joins.render(Some("users")),
            "INNER JOIN orders ON users.user_id = orders.user_id AND orders.total > 10"
        );
    }

    #[test]
    fn test_join_without_criteria() {
        let mut joins = Joins::new();
        joins.add(JoinSpec::new("regions", (), JoinType::Inner));
        assert_eq!(joins.render(Some("users")), "INNER JOIN regions");
    }

    #[test]
    fn test_duplicate_join_is_ignored() {
        let mut joins = Joins::new();
        assert!(joins.add(JoinSpec::new("orders", "user_id", JoinType::Inner)));
        assert!(!joins.add(JoinSpec::new("orders", "user_id", JoinType::Inner)));
        assert!(joins.add(JoinSpec::new("orders", "user_id", JoinType::Left)));
        assert_eq!(joins.len(), 2);
    }

    #[test]
    fn test_bare_column_detection() {
        assert!(is_bare_column("user_id"));
        assert!(is_bare_column("orders.user_id"));
        assert!(!is_bare_column("a.id=b.id"));
        assert!(!is_bare_column("a.deleted_at IS NULL"));
        assert!(!is_bare_column("a.x != b.x"));
    }
}

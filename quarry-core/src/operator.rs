//! SQL comparison operators and logical connectors

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Comparison operator of a single criterion
///
/// The set is closed: the renderer switches on it to decide how the
/// right-hand side is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
    Like,
    NotLike,
    ILike,
    Regexp,
    NotRegexp,
    Between,
    NotBetween,
    Is,
    IsNot,
    /// `IN (subquery)`; the value is a nested builder or literal subquery text
    SubqueryIn,
    /// The column slot holds a handcrafted expression with one `?`
    Raw,
}

impl Operator {
    /// Get the SQL token for this operator
    ///
    /// `SubqueryIn` renders as `IN` and `Raw` renders as nothing.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::In | Operator::SubqueryIn => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::ILike => "ILIKE",
            Operator::Regexp => "REGEXP",
            Operator::NotRegexp => "NOT REGEXP",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
            Operator::Raw => "",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let op = match s.trim().to_uppercase().as_str() {
            "=" => Operator::Eq,
            "!=" | "<>" => Operator::NotEq,
            "<" => Operator::Lt,
            "<=" => Operator::Lte,
            ">" => Operator::Gt,
            ">=" => Operator::Gte,
            "IN" => Operator::In,
            "NOT IN" => Operator::NotIn,
            "LIKE" => Operator::Like,
            "NOT LIKE" => Operator::NotLike,
            "ILIKE" => Operator::ILike,
            "REGEXP" => Operator::Regexp,
            "NOT REGEXP" => Operator::NotRegexp,
            "BETWEEN" => Operator::Between,
            "NOT BETWEEN" => Operator::NotBetween,
            "IS" => Operator::Is,
            "IS NOT" => Operator::IsNot,
            other => {
                return Err(Error::invalid_query(format!("Unknown operator '{}'", other)))
            }
        };
        Ok(op)
    }
}

/// Trait for types that can be converted to SQL operators
pub trait IntoOperator {
    fn into_operator(self) -> Operator;
}

impl IntoOperator for Operator {
    fn into_operator(self) -> Operator {
        self
    }
}

/// Allow string literals for the comparison operators
///
/// # Panics
/// Panics on a string that names no known operator. Use [`Operator::from_str`]
/// for untrusted input.
impl IntoOperator for &str {
    fn into_operator(self) -> Operator {
        match self.parse() {
            Ok(op) => op,
            Err(_) => panic!(
                "Unknown operator '{}'. Use the Operator variants or op:: constants.",
                self
            ),
        }
    }
}

/// Logical connector joining a criterion to its previous sibling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

impl Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Convenience module for operator constants
pub mod op {
    use super::Operator;

    pub const EQ: Operator = Operator::Eq;
    pub const NEQ: Operator = Operator::NotEq;
    pub const LT: Operator = Operator::Lt;
    pub const LTE: Operator = Operator::Lte;
    pub const GT: Operator = Operator::Gt;
    pub const GTE: Operator = Operator::Gte;
    pub const IN: Operator = Operator::In;
    pub const NOT_IN: Operator = Operator::NotIn;
    pub const LIKE: Operator = Operator::Like;
    pub const NOT_LIKE: Operator = Operator::NotLike;
    pub const ILIKE: Operator = Operator::ILike;
    pub const REGEXP: Operator = Operator::Regexp;
    pub const NOT_REGEXP: Operator = Operator::NotRegexp;
    pub const BETWEEN: Operator = Operator::Between;
    pub const NOT_BETWEEN: Operator = Operator::NotBetween;
    pub const IS: Operator = Operator::Is;
    pub const IS_NOT: Operator = Operator::IsNot;
}

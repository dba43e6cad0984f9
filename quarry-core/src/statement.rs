//! Rendered statements and render-time plumbing

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::quote::Quoter;
use crate::Value;

/// Rendered SQL text with its ordered placeholder values
///
/// Every `?` in `sql` has exactly one entry in `params`, in the same
/// left-to-right order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    /// Substitute the params into the `?` slots, in order
    ///
    /// Slots without a matching param are left as `?`. Every `?` in the
    /// text counts as a slot, including one inside an unquoted value or a
    /// literal subquery, so this only matches [`Query::to_inline_sql`] for
    /// statements whose inline fragments carry no `?` of their own. Use the
    /// inline render for logging.
    ///
    /// [`Query::to_inline_sql`]: crate::Query::to_inline_sql
    pub fn interpolate(&self, quoter: &dyn Quoter) -> String {
        let mut params = self.params.iter().peekable();
        let mut out = String::with_capacity(self.sql.len());
        for ch in self.sql.chars() {
            match (ch, params.next_if(|_| ch == '?')) {
                (_, Some(value)) => out.push_str(&quoter.quote(value)),
                (ch, None) => out.push(ch),
            }
        }
        out
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}

/// Which statement a builder produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    Select,
    Insert,
    Replace,
    Update,
    Delete,
}

impl StatementKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Replace => "REPLACE",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Whether values are bound to `?` placeholders or inlined as literals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Placeholders,
    Inline,
}

pub(crate) struct RenderContext<'a> {
    pub mode: RenderMode,
    pub quoter: &'a dyn Quoter,
}

impl<'a> RenderContext<'a> {
    pub fn new(mode: RenderMode, quoter: &'a dyn Quoter) -> Self {
        Self { mode, quoter }
    }

    pub fn placeholders(&self) -> bool {
        self.mode == RenderMode::Placeholders
    }

    /// Emit one value: a bound `?`, a quoted literal, or its raw text when
    /// quoting is switched off
    pub fn bind(&self, value: &Value, quote: bool, params: &mut Vec<Value>) -> String {
        if !quote {
            value.to_raw_sql()
        } else if self.placeholders() {
            params.push(value.clone());
            "?".to_string()
        } else {
            self.quoter.quote(value)
        }
    }
}

/// Space-joined statement fragments; empty fragments are skipped
#[derive(Debug, Default)]
pub(crate) struct Parts {
    fragments: Vec<String>,
    params: Vec<Value>,
}

impl Parts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        if !fragment.is_empty() {
            self.fragments.push(fragment);
        }
    }

    /// Push a rendered fragment under a keyword, skipping it when empty
    pub fn push_clause(&mut self, keyword: &str, body: Statement) {
        if body.sql.is_empty() {
            return;
        }
        self.fragments.push(format!("{} {}", keyword, body.sql));
        self.params.extend(body.params);
    }

    pub fn push_statement(&mut self, body: Statement) {
        if body.sql.is_empty() {
            return;
        }
        self.fragments.push(body.sql);
        self.params.extend(body.params);
    }

    pub fn finish(self) -> Statement {
        Statement::new(self.fragments.join(" "), self.params)
    }
}

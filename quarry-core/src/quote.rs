//! Inline value quoting
//!
//! Only used when a statement is rendered with values inlined instead of
//! bound to placeholders. A driver-backed quoter can be plugged in through
//! the [`Quoter`] trait.

use crate::Value;

/// Turns a value into SQL literal text
pub trait Quoter {
    fn quote(&self, value: &Value) -> String;
}

/// Fallback quoting used when no driver is available
///
/// Numbers pass through unquoted, null becomes `NULL`, everything else is
/// backslash-escaped and wrapped in single quotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultQuoter;

impl Quoter for DefaultQuoter {
    fn quote(&self, value: &Value) -> String {
        if value.is_null() || value.is_numeric() {
            return value.to_raw_sql();
        }
        format!("'{}'", escape(&value.to_raw_sql()))
    }
}

impl<F> Quoter for F
where
    F: Fn(&Value) -> String,
{
    fn quote(&self, value: &Value) -> String {
        self(value)
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\'' | '"' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '\0' => escaped.push_str("\\0"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

//! Builder configuration

use serde::{Deserialize, Serialize};

use crate::Result;

/// How LIMIT and its offset are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitStyle {
    /// `LIMIT <count>[ OFFSET <offset>]`, a zero offset is omitted
    #[default]
    Offset,
    /// `LIMIT <offset>, <count>`, the offset is always written
    Legacy,
}

/// Settings carried by every [`Query`](crate::Query)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Default for values without an explicit quote override
    pub auto_quote: bool,
    /// Reject unbalanced brackets and ambiguous or empty statements at render time
    pub strict: bool,
    pub limit_style: LimitStyle,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            auto_quote: true,
            strict: true,
            limit_style: LimitStyle::Offset,
        }
    }
}

impl BuilderConfig {
    /// Permissive rendering: malformed input produces malformed text, and
    /// the first populated statement kind wins.
    pub fn legacy() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }

    /// Load a configuration from JSON text; missing fields take their defaults
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{BuilderConfig, LimitStyle};
    ///
    /// let config = BuilderConfig::from_json(r#"{"limit_style": "legacy"}"#).unwrap();
    /// assert_eq!(config.limit_style, LimitStyle::Legacy);
    /// assert!(config.strict);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn auto_quote(mut self, auto_quote: bool) -> Self {
        self.auto_quote = auto_quote;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn limit_style(mut self, style: LimitStyle) -> Self {
        self.limit_style = style;
        self
    }
}

//! Dialect configuration.
//!
//! A [`Dialect`] is the static configuration every builder carries: the
//! parameter placeholder form, the identifier quote pair, the paging syntax and
//! a few rendering switches. Presets exist for the common databases and a
//! dialect can also be loaded from TOML:
//!
//! ```toml
//! name = "custom"
//! parameter_prefix = ":"
//! placeholder = "named"
//! identifier_quote = ["`", "`"]
//! supports_offset_fetch = false
//! ```

use crate::error::{SqlError, SqlResult};
use serde::Deserialize;

/// How a parameter reference is printed in the rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// Prefix followed by the parameter name: `@p0`, `:p1`.
    Named,
    /// Prefix followed by the 1-based position in the text: `$1`, `$2`.
    Numbered,
    /// The prefix alone, repeated: `?`.
    Anonymous,
}

/// Static rendering configuration shared by every builder of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Dialect {
    /// Display name, used in error messages.
    pub name: String,
    /// Text placed in front of every placeholder.
    pub parameter_prefix: String,
    pub placeholder: PlaceholderStyle,
    /// Opening and closing identifier quote characters.
    pub identifier_quote: (char, char),
    /// Render paging as `OFFSET .. ROWS FETCH NEXT .. ROWS ONLY` instead of `LIMIT .. OFFSET ..`.
    pub supports_offset_fetch: bool,
    /// Print `RECURSIVE` after `WITH` when a recursive CTE is registered.
    pub recursive_keyword: bool,
    /// Reject set operations whose members select a different number of columns.
    pub check_set_operation_columns: bool,
    /// Plain identifiers matching one of these (case-insensitive) are quoted.
    pub reserved_words: Vec<String>,
}

const COMMON_RESERVED: &[&str] = &[
    "all", "and", "as", "asc", "between", "by", "case", "check", "column", "create", "desc",
    "distinct", "else", "end", "except", "exists", "from", "group", "having", "in", "intersect",
    "into", "is", "join", "like", "limit", "not", "null", "offset", "on", "or", "order", "select",
    "table", "then", "to", "union", "user", "values", "when", "where", "with",
];

fn common_reserved() -> Vec<String> {
    COMMON_RESERVED.iter().map(|w| (*w).to_string()).collect()
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            name: "ansi".to_string(),
            parameter_prefix: "@".to_string(),
            placeholder: PlaceholderStyle::Named,
            identifier_quote: ('"', '"'),
            supports_offset_fetch: false,
            recursive_keyword: true,
            check_set_operation_columns: false,
            reserved_words: common_reserved(),
        }
    }
}

impl Dialect {
    /// Create the default (ANSI-flavoured) dialect.
    pub fn new() -> Self {
        Self::default()
    }

    /// PostgreSQL: `$1` placeholders, `"` quotes, `LIMIT/OFFSET`.
    pub fn postgres() -> Self {
        Self {
            name: "postgres".to_string(),
            parameter_prefix: "$".to_string(),
            placeholder: PlaceholderStyle::Numbered,
            ..Self::default()
        }
    }

    /// SQL Server: `@p0` placeholders, `[ ]` quotes, `OFFSET/FETCH`, no `RECURSIVE` keyword.
    pub fn sql_server() -> Self {
        Self {
            name: "sql_server".to_string(),
            identifier_quote: ('[', ']'),
            supports_offset_fetch: true,
            recursive_keyword: false,
            ..Self::default()
        }
    }

    /// SQLite: `@p0` placeholders, `"` quotes, `LIMIT/OFFSET`.
    pub fn sqlite() -> Self {
        Self {
            name: "sqlite".to_string(),
            ..Self::default()
        }
    }

    /// MySQL: `?` placeholders, backtick quotes, `LIMIT/OFFSET`.
    pub fn mysql() -> Self {
        Self {
            name: "mysql".to_string(),
            parameter_prefix: "?".to_string(),
            placeholder: PlaceholderStyle::Anonymous,
            identifier_quote: ('`', '`'),
            ..Self::default()
        }
    }

    /// Parse a dialect from TOML text. Missing keys take the default dialect's values.
    pub fn from_toml_str(text: &str) -> SqlResult<Self> {
        let dialect: Dialect = toml::from_str(text)
            .map_err(|e| SqlError::config(format!("invalid dialect configuration: {e}")))?;
        dialect.validate()?;
        Ok(dialect)
    }

    /// Check the configuration for values that cannot render a statement.
    pub fn validate(&self) -> SqlResult<()> {
        if self.parameter_prefix.trim().is_empty() {
            return Err(SqlError::config("parameter_prefix must not be empty"));
        }
        let (open, close) = self.identifier_quote;
        if open.is_whitespace() || close.is_whitespace() {
            return Err(SqlError::config("identifier_quote must not be whitespace"));
        }
        Ok(())
    }

    /// Set the placeholder prefix and style.
    pub fn with_placeholder(mut self, prefix: impl Into<String>, style: PlaceholderStyle) -> Self {
        self.parameter_prefix = prefix.into();
        self.placeholder = style;
        self
    }

    /// Set the identifier quote pair.
    pub fn with_identifier_quote(mut self, open: char, close: char) -> Self {
        self.identifier_quote = (open, close);
        self
    }

    /// Choose between `OFFSET/FETCH` and `LIMIT/OFFSET` paging.
    pub fn with_offset_fetch(mut self, enabled: bool) -> Self {
        self.supports_offset_fetch = enabled;
        self
    }

    pub fn with_recursive_keyword(mut self, enabled: bool) -> Self {
        self.recursive_keyword = enabled;
        self
    }

    /// Enable or disable the column-count check on set operations.
    pub fn with_set_operation_column_check(mut self, enabled: bool) -> Self {
        self.check_set_operation_columns = enabled;
        self
    }

    /// Add reserved words (in addition to the current list).
    pub fn with_reserved_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_words.extend(words.into_iter().map(Into::into));
        self
    }

    /// Whether a plain identifier needs quoting because it is a keyword.
    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved_words
            .iter()
            .any(|w| w.eq_ignore_ascii_case(word))
    }

    /// Whether rendered parameters are bound by position (driver-style `$n`).
    pub fn is_positional(&self) -> bool {
        self.placeholder == PlaceholderStyle::Numbered
    }
}

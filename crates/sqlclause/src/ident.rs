//! SQL identifier handling.
//!
//! [`Ident`] represents a dotted identifier (schema/table/column) whose parts
//! are either plain or caller-quoted. Rendering re-quotes with the dialect's
//! quote pair, so `"Order".id` becomes `[Order].id` on SQL Server.
//!
//! - Plain parts are validated against: `[A-Za-z_][A-Za-z0-9_$]*`
//! - Quoted parts (`"x"`, `[x]` or `` `x` ``) allow any characters except NUL
//! - A trailing `*` part selects all columns: `u.*`
//!
//! Clause text that is not a bare identifier (functions, aliases, sort
//! directions) is left alone by [`write_normalized`].

use crate::config::Dialect;
use crate::error::{SqlError, SqlResult};

/// A part of a SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// Plain identifier: must match `[A-Za-z_][A-Za-z0-9_$]*`.
    Unquoted(String),
    /// Quoted identifier: allows any characters except NUL.
    Quoted(String),
    /// `*`, only valid as the last part.
    Wildcard,
}

/// A SQL identifier (column, table, or schema name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

fn closing_quote(open: char) -> Option<char> {
    match open {
        '"' => Some('"'),
        '`' => Some('`'),
        '[' => Some(']'),
        _ => None,
    }
}

impl Ident {
    /// Create a single quoted identifier.
    pub fn quoted(name: &str) -> SqlResult<Self> {
        if name.is_empty() {
            return Err(SqlError::invalid_argument("Empty quoted identifier"));
        }
        if name.contains('\0') {
            return Err(SqlError::invalid_argument(
                "Identifier cannot contain NUL character",
            ));
        }
        Ok(Self {
            parts: vec![IdentPart::Quoted(name.to_string())],
        })
    }

    /// Parse an identifier string, supporting dotted and quoted forms.
    ///
    /// - Dotted: `schema.table.column`
    /// - Quoted: `"CamelCase"."UserTable"`, `[Order]`
    /// - Mixed: `public."UserTable".id`
    /// - Wildcard: `*`, `u.*`
    pub fn parse(s: &str) -> SqlResult<Self> {
        if s.is_empty() {
            return Err(SqlError::invalid_argument("Identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(SqlError::invalid_argument(
                "Identifier cannot contain NUL character",
            ));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            if !parts.is_empty() {
                if matches!(parts.last(), Some(IdentPart::Wildcard)) {
                    return Err(SqlError::invalid_argument(
                        "'*' must be the last identifier part",
                    ));
                }
                match chars.next() {
                    Some('.') => {
                        if chars.peek().is_none() {
                            return Err(SqlError::invalid_argument("Trailing '.' in identifier"));
                        }
                    }
                    Some(c) => {
                        return Err(SqlError::invalid_argument(format!(
                            "Expected '.' between identifier parts, got '{c}'"
                        )));
                    }
                    None => break,
                }
            }

            if chars.peek() == Some(&'*') {
                chars.next();
                parts.push(IdentPart::Wildcard);
                continue;
            }

            if let Some(close) = chars.peek().copied().and_then(closing_quote) {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some(c) if c == close => {
                            // Doubled close char is an escaped quote.
                            if chars.peek() == Some(&close) {
                                chars.next();
                                name.push(close);
                            } else {
                                break;
                            }
                        }
                        Some(c) => name.push(c),
                        None => {
                            return Err(SqlError::invalid_argument("Unclosed quoted identifier"));
                        }
                    }
                }
                if name.is_empty() {
                    return Err(SqlError::invalid_argument("Empty quoted identifier"));
                }
                parts.push(IdentPart::Quoted(name));
                continue;
            }

            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                let valid = if name.is_empty() {
                    c == '_' || c.is_ascii_alphabetic()
                } else {
                    c == '_' || c == '$' || c.is_ascii_alphanumeric()
                };
                if !valid {
                    return Err(SqlError::invalid_argument(format!(
                        "Invalid character in identifier: '{c}'"
                    )));
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                return Err(SqlError::invalid_argument("Empty identifier segment"));
            }
            parts.push(IdentPart::Unquoted(name));
        }

        if parts.is_empty() {
            return Err(SqlError::invalid_argument("Empty identifier"));
        }

        Ok(Self { parts })
    }

    /// Whether the identifier ends in `*`.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.parts.last(), Some(IdentPart::Wildcard))
    }

    /// Whether two identifiers name the same object. Unquoted parts compare
    /// ignoring ASCII case; two quoted parts must match exactly.
    pub fn same_name(&self, other: &Ident) -> bool {
        self.parts.len() == other.parts.len()
            && self.parts.iter().zip(&other.parts).all(|pair| match pair {
                (IdentPart::Quoted(a), IdentPart::Quoted(b)) => a == b,
                (
                    IdentPart::Unquoted(a) | IdentPart::Quoted(a),
                    IdentPart::Unquoted(b) | IdentPart::Quoted(b),
                ) => a.eq_ignore_ascii_case(b),
                (IdentPart::Wildcard, IdentPart::Wildcard) => true,
                _ => false,
            })
    }

    /// Render the identifier for `dialect`.
    pub fn to_sql(&self, dialect: &Dialect) -> String {
        let mut out = String::new();
        self.write_sql(dialect, &mut out);
        out
    }

    pub(crate) fn write_sql(&self, dialect: &Dialect, out: &mut String) {
        let (open, close) = dialect.identifier_quote;
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Unquoted(s) if !dialect.is_reserved(s) => out.push_str(s),
                IdentPart::Unquoted(s) | IdentPart::Quoted(s) => {
                    out.push(open);
                    for ch in s.chars() {
                        if ch == close {
                            out.push(close);
                        }
                        out.push(ch);
                    }
                    out.push(close);
                }
                IdentPart::Wildcard => out.push('*'),
            }
        }
    }
}

/// Validate a name that must be a single identifier (alias, CTE name).
pub(crate) fn parse_name(kind: &str, text: &str) -> SqlResult<Ident> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SqlError::invalid_argument(format!("{kind} cannot be empty")));
    }
    let ident = Ident::parse(trimmed)
        .map_err(|e| SqlError::invalid_argument(format!("invalid {kind} '{trimmed}': {e}")))?;
    if ident.is_wildcard() {
        return Err(SqlError::invalid_argument(format!(
            "{kind} cannot be a wildcard"
        )));
    }
    Ok(ident)
}

/// Reject empty or whitespace-only clause text.
pub(crate) fn require_text(kind: &str, text: &str) -> SqlResult<()> {
    if text.trim().is_empty() {
        return Err(SqlError::invalid_argument(format!("{kind} cannot be empty")));
    }
    Ok(())
}

/// Split `text` at commas that are outside parentheses and quotes.
///
/// The returned slices cover the whole input except the separating commas.
pub(crate) fn split_top_level(text: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if let Some(close) = quote {
            if c == close {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' => quote = Some('\''),
            c if closing_quote(c).is_some() => quote = closing_quote(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&text[start..]);
    items
}

/// Write comma-separated clause text, normalizing every item that is a bare identifier.
///
/// Whitespace and separators are preserved exactly.
pub(crate) fn write_normalized(text: &str, dialect: &Dialect, out: &mut String) {
    for (i, item) in split_top_level(text).into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let core = item.trim();
        match Ident::parse(core) {
            Ok(ident) if !core.is_empty() => {
                let lead = item.len() - item.trim_start().len();
                out.push_str(&item[..lead]);
                ident.write_sql(dialect, out);
                out.push_str(&item[lead + core.len()..]);
            }
            _ => out.push_str(item),
        }
    }
}

/// Count the items of a column list and whether any of them is a wildcard.
pub(crate) fn count_columns(text: &str) -> (usize, bool) {
    let mut count = 0;
    let mut wildcard = false;
    for item in split_top_level(text) {
        let core = item.trim();
        if core.is_empty() {
            continue;
        }
        if Ident::parse(core).is_ok_and(|ident| ident.is_wildcard()) {
            wildcard = true;
        } else {
            count += 1;
        }
    }
    (count, wildcard)
}

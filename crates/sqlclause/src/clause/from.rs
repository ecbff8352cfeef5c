use super::{push_caller_text, push_item};
use crate::error::{SqlError, SqlResult};
use crate::fragment::FragmentList;

/// Join flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// `FROM sources [joins]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FromClause {
    body: FragmentList,
}

impl FromClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a comma-separated source (`users`, `users u`).
    pub fn push_source(&mut self, source: &str, raw: bool) {
        let mut item = FragmentList::new();
        push_caller_text(&mut item, "FROM", source, raw);
        push_item(&mut self.body, item);
    }

    /// Append an already-built source (aliased table or subquery).
    pub(crate) fn push_fragments(&mut self, item: FragmentList) {
        push_item(&mut self.body, item);
    }

    /// Append `KIND JOIN target [ON on]`. A join needs an existing source.
    pub(crate) fn push_join(
        &mut self,
        kind: JoinKind,
        target: FragmentList,
        on: Option<&str>,
    ) -> SqlResult<()> {
        if self.body.is_empty() {
            return Err(SqlError::invalid_argument(format!(
                "{} requires a FROM source",
                kind.as_sql()
            )));
        }
        self.body.push_sql(" ").push_sql(kind.as_sql()).push_sql(" ");
        self.body.append(target);
        if let Some(on) = on {
            self.body.push_sql(" ON ").push_ident(on);
        }
        Ok(())
    }

    /// Append free-form text directly after the current content.
    pub fn append_sql(&mut self, text: &str, raw: bool) {
        push_caller_text(&mut self.body, "FROM", text, raw);
    }

    pub fn clear(&mut self) {
        self.body.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub(crate) fn write_to(&self, out: &mut FragmentList) {
        if self.body.is_empty() {
            return;
        }
        out.push_sql("FROM ");
        out.append(self.body.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_without_source_is_rejected() {
        let mut from = FromClause::new();
        let mut target = FragmentList::new();
        target.push_ident("orders");
        let err = from.push_join(JoinKind::Inner, target, Some("1=1")).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn sources_are_comma_separated() {
        let mut from = FromClause::new();
        from.push_source("a", false);
        from.push_source("b", false);
        assert!(!from.is_empty());
        let mut out = FragmentList::new();
        from.write_to(&mut out);
        assert_eq!(out.len(), 4);
    }
}

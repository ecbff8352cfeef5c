use super::{push_caller_text, push_item};
use crate::fragment::FragmentList;
use crate::ident::count_columns;

/// `SELECT [DISTINCT] columns`.
///
/// Repeated column appends accumulate; an empty clause renders `SELECT *`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectClause {
    body: FragmentList,
    distinct: bool,
    columns: usize,
    wildcard: bool,
    // Free-form text makes the column count unknowable.
    opaque: bool,
}

impl SelectClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a comma-separated column list.
    pub fn push_columns(&mut self, columns: &str, raw: bool) {
        let (count, wildcard) = count_columns(columns);
        self.columns += count;
        self.wildcard |= wildcard;
        let mut item = FragmentList::new();
        push_caller_text(&mut item, "SELECT", columns, raw);
        push_item(&mut self.body, item);
    }

    /// Append one already-built column expression (e.g. a parenthesized subquery).
    pub(crate) fn push_expression(&mut self, item: FragmentList) {
        self.columns += 1;
        push_item(&mut self.body, item);
    }

    /// Append free-form text directly after the current content.
    pub fn append_sql(&mut self, text: &str, raw: bool) {
        self.opaque = true;
        push_caller_text(&mut self.body, "SELECT", text, raw);
    }

    pub fn set_distinct(&mut self, distinct: bool) {
        self.distinct = distinct;
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// Explicit column count, when it can be known.
    pub fn column_count(&self) -> Option<usize> {
        if self.body.is_empty() || self.wildcard || self.opaque {
            None
        } else {
            Some(self.columns)
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && !self.distinct
    }

    pub(crate) fn write_to(&self, out: &mut FragmentList) {
        out.push_sql("SELECT ");
        if self.distinct {
            out.push_sql("DISTINCT ");
        }
        if self.body.is_empty() {
            out.push_sql("*");
        } else {
            out.append(self.body.clone());
        }
    }
}

use super::{push_caller_text, push_item};
use crate::fragment::FragmentList;

/// `ORDER BY items`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderByClause {
    body: FragmentList,
}

impl OrderByClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sort specification (`name`, `created_at DESC, id`).
    pub fn push_spec(&mut self, spec: &str, raw: bool) {
        let mut item = FragmentList::new();
        push_caller_text(&mut item, "ORDER BY", spec, raw);
        push_item(&mut self.body, item);
    }

    /// Append one column with an explicit direction.
    pub fn push_column(&mut self, column: &str, descending: bool) {
        let mut item = FragmentList::new();
        item.push_ident(column.trim())
            .push_sql(if descending { " DESC" } else { " ASC" });
        push_item(&mut self.body, item);
    }

    /// Append free-form text directly after the current content.
    pub fn append_sql(&mut self, text: &str, raw: bool) {
        push_caller_text(&mut self.body, "ORDER BY", text, raw);
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
        out.push_sql("ORDER BY ");
        out.append(self.body.clone());
    }
}

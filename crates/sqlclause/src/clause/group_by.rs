use super::{push_caller_text, push_item};
use crate::condition::ConditionClause;
use crate::fragment::FragmentList;

/// `GROUP BY columns` together with its `HAVING` conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupByClause {
    body: FragmentList,
    having: ConditionClause,
}

impl Default for GroupByClause {
    fn default() -> Self {
        Self {
            body: FragmentList::new(),
            having: ConditionClause::new("HAVING"),
        }
    }
}

impl GroupByClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_columns(&mut self, columns: &str, raw: bool) {
        let mut item = FragmentList::new();
        push_caller_text(&mut item, "GROUP BY", columns, raw);
        push_item(&mut self.body, item);
    }

    /// Append free-form text directly after the current content.
    pub fn append_sql(&mut self, text: &str, raw: bool) {
        push_caller_text(&mut self.body, "GROUP BY", text, raw);
    }

    pub fn having(&self) -> &ConditionClause {
        &self.having
    }

    pub fn having_mut(&mut self) -> &mut ConditionClause {
        &mut self.having
    }

    /// Clear the grouping columns and the HAVING conditions.
    pub fn clear(&mut self) {
        self.body.clear();
        self.having.clear();
    }

    /// Whether there are no grouping columns. HAVING is tracked separately.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub(crate) fn write_to(&self, out: &mut FragmentList) {
        if self.body.is_empty() {
            return;
        }
        out.push_sql("GROUP BY ");
        out.append(self.body.clone());
    }
}

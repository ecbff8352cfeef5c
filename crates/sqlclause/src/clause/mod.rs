//! Clause objects.
//!
//! Each clause owns its own fragments and knows how to write its section of
//! the statement. Clauses never look at each other; [`SqlBuilder`](crate::SqlBuilder)
//! decides the order and which sections appear.

mod end;
mod from;
mod group_by;
mod insert;
mod order_by;
mod select;
mod start;

pub use end::{EndClause, Paging};
pub use from::{FromClause, JoinKind};
pub use group_by::GroupByClause;
pub use insert::InsertClause;
pub use order_by::OrderByClause;
pub use select::SelectClause;
pub use start::StartClause;

use crate::audit;
use crate::fragment::FragmentList;

/// Addresses one clause of a builder for free-form appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Start,
    Select,
    From,
    Where,
    GroupBy,
    Having,
    OrderBy,
    End,
    Insert,
}

impl ClauseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ClauseKind::Start => "START",
            ClauseKind::Select => "SELECT",
            ClauseKind::From => "FROM",
            ClauseKind::Where => "WHERE",
            ClauseKind::GroupBy => "GROUP BY",
            ClauseKind::Having => "HAVING",
            ClauseKind::OrderBy => "ORDER BY",
            ClauseKind::End => "END",
            ClauseKind::Insert => "INSERT",
        }
    }
}

/// Push caller text, reporting raw appends on the audit channel.
pub(crate) fn push_caller_text(list: &mut FragmentList, clause: &str, text: &str, raw: bool) {
    if raw && !text.is_empty() {
        audit::raw_bypass(clause, text);
    }
    list.push_text(text, raw);
}

/// Append `item` to a comma-separated list.
pub(crate) fn push_item(list: &mut FragmentList, item: FragmentList) {
    if !list.is_empty() {
        list.push_sql(", ");
    }
    list.append(item);
}

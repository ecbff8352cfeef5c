//! UNION / INTERSECT / EXCEPT composition.

use crate::fragment::FragmentList;

/// Operator joining a set-operation member to the statement before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl SetOperator {
    /// SQL keyword for the operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            SetOperator::Union => "UNION",
            SetOperator::UnionAll => "UNION ALL",
            SetOperator::Intersect => "INTERSECT",
            SetOperator::Except => "EXCEPT",
        }
    }
}

/// One member statement, already remapped into the owner's parameter store.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SetOperation {
    pub(crate) kind: SetOperator,
    pub(crate) body: FragmentList,
    pub(crate) column_count: Option<usize>,
    /// The member itself combines statements and must be parenthesized.
    pub(crate) compound: bool,
}

impl SetOperation {
    pub(crate) fn write_to(&self, out: &mut FragmentList, with_keyword: bool) {
        if with_keyword {
            out.push_sql(self.kind.as_sql()).push_sql(" ");
        }
        if self.compound {
            out.push_sql("(");
            out.append(self.body.clone());
            out.push_sql(")");
        } else {
            out.append(self.body.clone());
        }
    }
}

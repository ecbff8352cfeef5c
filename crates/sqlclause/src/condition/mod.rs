//! Caller-facing boolean conditions for WHERE and HAVING.
//!
//! A [`Condition`] is an unbound description of a predicate. Nothing is
//! validated or bound when it is constructed; passing it to
//! [`SqlBuilder::and`](crate::SqlBuilder::and) or
//! [`SqlBuilder::having`](crate::SqlBuilder::having) binds its values into the
//! builder's parameter store and reports bad input right there.
//!
//! # Example
//! ```ignore
//! use sqlclause::prelude::*;
//!
//! let mut q = sqlclause::builder();
//! q.from("users")?.and(Condition::or([
//!     Condition::eq("status", "active"),
//!     Condition::is_null("deleted_at"),
//! ]))?;
//! ```

mod node;

pub use node::ConditionClause;
pub(crate) use node::Node;

use crate::builder::SqlBuilder;
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

/// Comparison operator of a leaf condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    In,
    NotIn,
    Like,
}

impl Operator {
    /// SQL spelling of the operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Like => "LIKE",
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone)]
pub enum Operand {
    Value(Value),
    List(Vec<Value>),
    Subquery(Box<SqlBuilder>),
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl From<SqlBuilder> for Operand {
    fn from(q: SqlBuilder) -> Self {
        Operand::Subquery(Box::new(q))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(values: Vec<T>) -> Self {
        Operand::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::Value(v.into())
    }
}

macro_rules! impl_operand_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(v: $ty) -> Self {
                    Operand::Value(v.into())
                }
            }
        )*
    };
}

impl_operand_from!(
    bool,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    String,
    &str,
    &String,
    Uuid,
    DateTime<Utc>,
    NaiveDateTime,
    NaiveDate,
    serde_json::Value,
);

/// Whether one side of a range includes its endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bound {
    #[default]
    Inclusive,
    Exclusive,
}

/// Endpoint behaviour of a BETWEEN condition, chosen per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Boundary {
    pub lower: Bound,
    pub upper: Bound,
}

impl Boundary {
    pub fn new(lower: Bound, upper: Bound) -> Self {
        Self { lower, upper }
    }

    /// `min <= col <= max`
    pub fn inclusive() -> Self {
        Self::new(Bound::Inclusive, Bound::Inclusive)
    }

    /// `min < col < max`
    pub fn exclusive() -> Self {
        Self::new(Bound::Exclusive, Bound::Exclusive)
    }

    fn is_inclusive(&self) -> bool {
        self.lower == Bound::Inclusive && self.upper == Bound::Inclusive
    }
}

/// A boolean predicate tree.
#[derive(Debug, Clone)]
pub enum Condition {
    /// `column op operand`
    Compare {
        column: String,
        op: Operator,
        operand: Operand,
    },
    /// Range check. A `Null` bound drops that side.
    Between {
        column: String,
        lower: Value,
        upper: Value,
        boundary: Boundary,
    },
    /// `column IS [NOT] NULL`
    NullCheck { column: String, is_null: bool },
    /// Null-or-empty-string check.
    EmptyCheck { column: String, is_empty: bool },
    /// `[NOT] EXISTS (subquery)`
    Exists {
        query: Box<SqlBuilder>,
        negated: bool,
    },
    /// Raw SQL predicate text, inserted verbatim.
    Raw(String),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    /// Create a comparison leaf.
    pub fn compare(column: impl Into<String>, op: Operator, operand: impl Into<Operand>) -> Self {
        Condition::Compare {
            column: column.into(),
            op,
            operand: operand.into(),
        }
    }

    /// `column = value` (or `column IS NULL` for a null value)
    pub fn eq(column: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(column, Operator::Equal, value)
    }

    /// `column <> value` (or `column IS NOT NULL` for a null value)
    pub fn ne(column: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(column, Operator::NotEqual, value)
    }

    pub fn gt(column: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(column, Operator::Greater, value)
    }

    pub fn gte(column: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(column, Operator::GreaterEqual, value)
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(column, Operator::Less, value)
    }

    pub fn lte(column: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(column, Operator::LessEqual, value)
    }

    pub fn like(column: impl Into<String>, pattern: impl Into<Operand>) -> Self {
        Self::compare(column, Operator::Like, pattern)
    }

    /// `column IN (values...)`. An empty list is always false.
    pub fn in_list<I, T>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::compare(
            column,
            Operator::In,
            Operand::List(values.into_iter().map(Into::into).collect()),
        )
    }

    /// `column NOT IN (values...)`. An empty list is always true.
    pub fn not_in<I, T>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::compare(
            column,
            Operator::NotIn,
            Operand::List(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn between(
        column: impl Into<String>,
        lower: impl Into<Value>,
        upper: impl Into<Value>,
        boundary: Boundary,
    ) -> Self {
        Condition::Between {
            column: column.into(),
            lower: lower.into(),
            upper: upper.into(),
            boundary,
        }
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Condition::NullCheck {
            column: column.into(),
            is_null: true,
        }
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Condition::NullCheck {
            column: column.into(),
            is_null: false,
        }
    }

    /// `(column IS NULL OR column = '')`
    pub fn is_empty(column: impl Into<String>) -> Self {
        Condition::EmptyCheck {
            column: column.into(),
            is_empty: true,
        }
    }

    /// `column IS NOT NULL AND column <> ''`
    pub fn is_not_empty(column: impl Into<String>) -> Self {
        Condition::EmptyCheck {
            column: column.into(),
            is_empty: false,
        }
    }

    pub fn exists(query: SqlBuilder) -> Self {
        Condition::Exists {
            query: Box::new(query),
            negated: false,
        }
    }

    pub fn not_exists(query: SqlBuilder) -> Self {
        Condition::Exists {
            query: Box::new(query),
            negated: true,
        }
    }

    /// Raw predicate text. Reported on the raw-bypass audit channel when bound.
    pub fn raw(sql: impl Into<String>) -> Self {
        Condition::Raw(sql.into())
    }

    /// All conditions must hold. Empty groups contribute nothing.
    pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::And(conditions.into_iter().collect())
    }

    /// At least one condition must hold. Empty groups contribute nothing.
    pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Or(conditions.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }
}

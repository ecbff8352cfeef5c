//! Everything needed to build and run statements.
//!
//! The shorthand predicates (`eq`, `in_list`, ...) live on [`Filterable`], so
//! importing the prelude is the usual way to reach them.

pub use crate::builder::{RenderedSql, SqlBuilder};
pub use crate::clause::{ClauseKind, JoinKind};
pub use crate::client::GenericClient;
pub use crate::condition::{Bound, Boundary, Condition, Operator};
pub use crate::config::Dialect;
pub use crate::error::{SqlError, SqlResult};
pub use crate::traits::{Filterable, InsertStatement, SelectStatement, SqlStatement};
pub use crate::value::Value;

//! # sqlclause
//!
//! A clause-oriented SQL statement builder.
//!
//! ## Features
//!
//! - **Clause objects**: SELECT, FROM, WHERE, GROUP BY/HAVING, ORDER BY, paging,
//!   INSERT and `WITH` are separate, independently editable parts of one builder
//! - **Values are always parameters**: every value becomes a named placeholder,
//!   never literal text
//! - **Composition**: subqueries, CTEs and set operations move their values into
//!   the parent without name collisions
//! - **Dialects**: placeholder style, identifier quoting and paging syntax come
//!   from a [`Dialect`], loadable from TOML
//! - **Raw escape hatch**: raw text is inserted verbatim and reported on the
//!   `sqlclause.raw` tracing target
//!
//! ```ignore
//! use sqlclause::prelude::*;
//!
//! let mut q = sqlclause::builder();
//! q.from("users")?
//!     .select("id,name")?
//!     .gte("age", 18)?
//!     .order_by("name")?
//!     .take(10)?;
//!
//! let rendered = q.render()?;
//! assert_eq!(rendered.sql, "SELECT id,name FROM users WHERE age >= @p0 ORDER BY name LIMIT 10");
//!
//! // Against Postgres
//! let mut q = sqlclause::postgres();
//! q.from("users")?.eq("id", 7)?;
//! let row = q.fetch_one(&client).await?;
//! ```

mod audit;
pub mod builder;
pub mod clause;
pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod fragment;
pub mod ident;
pub mod param;
pub mod prelude;
mod set_op;
pub mod traits;
pub mod value;

pub use audit::MAX_AUDIT_SQL_LENGTH;
pub use builder::{RenderedSql, SqlBuilder};
pub use clause::{ClauseKind, JoinKind, Paging};
pub use client::GenericClient;
pub use condition::{Bound, Boundary, Condition, ConditionClause, Operand, Operator};
pub use config::{Dialect, PlaceholderStyle};
pub use error::{SqlError, SqlResult};
pub use ident::{Ident, IdentPart};
pub use param::{ParamName, ParamStore};
pub use set_op::SetOperator;
pub use traits::{Filterable, InsertStatement, SelectStatement, SqlStatement};
pub use value::Value;

/// An empty builder with the default (`@p0`, ANSI quoting) dialect.
pub fn builder() -> SqlBuilder {
    SqlBuilder::default()
}

/// An empty builder for PostgreSQL (`$1` placeholders).
pub fn postgres() -> SqlBuilder {
    SqlBuilder::postgres()
}

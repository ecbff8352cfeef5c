//! Capability views over [`SqlBuilder`].
//!
//! There is one concrete builder. Code that should only see part of its
//! surface takes one of these traits instead:
//!
//! ```ignore
//! fn only_active(q: &mut impl Filterable) -> SqlResult<()> {
//!     q.eq("status", "active")?.is_null("deleted_at")?;
//!     Ok(())
//! }
//! ```

use crate::builder::{RenderedSql, SqlBuilder};
use crate::client::GenericClient;
use crate::condition::{Boundary, Condition, Operand, Operator};
use crate::config::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::value::Value;
use tokio_postgres::Row;

/// Something that renders to a statement and can be executed.
pub trait SqlStatement: Sync {
    fn render(&self) -> SqlResult<RenderedSql>;

    fn dialect(&self) -> &Dialect;

    /// Debug helper to get the SQL string.
    fn to_sql(&self) -> SqlResult<String> {
        self.render().map(|r| r.sql)
    }

    /// Render for `tokio-postgres`, which binds `$1, $2, ...` by position.
    fn render_for_driver(&self) -> SqlResult<RenderedSql> {
        let dialect = self.dialect();
        if !dialect.is_positional() || dialect.parameter_prefix != "$" {
            return Err(SqlError::config(format!(
                "dialect '{}' does not render $n placeholders and cannot be executed by tokio-postgres",
                dialect.name
            )));
        }
        self.render()
    }

    /// Execute query and return all rows.
    fn fetch_all(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = SqlResult<Vec<Row>>> + Send {
        async move {
            let rendered = self.render_for_driver()?;
            conn.query(&rendered.sql, &rendered.params_ref()).await
        }
    }

    /// Execute query and return the first row, or `NotFound`.
    fn fetch_one(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = SqlResult<Row>> + Send {
        async move {
            let rendered = self.render_for_driver()?;
            conn.query_one(&rendered.sql, &rendered.params_ref()).await
        }
    }

    /// Execute query and return the first row, if any.
    fn fetch_opt(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = SqlResult<Option<Row>>> + Send {
        async move {
            let rendered = self.render_for_driver()?;
            conn.query_opt(&rendered.sql, &rendered.params_ref()).await
        }
    }

    /// Execute and return affected row count.
    fn execute(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = SqlResult<u64>> + Send {
        async move {
            let rendered = self.render_for_driver()?;
            conn.execute(&rendered.sql, &rendered.params_ref()).await
        }
    }
}

/// WHERE-tree access with leaf shorthands.
pub trait Filterable {
    /// AND a condition into the WHERE tree.
    fn and(&mut self, condition: Condition) -> SqlResult<&mut Self>;

    fn and_where(
        &mut self,
        column: &str,
        op: Operator,
        operand: impl Into<Operand>,
    ) -> SqlResult<&mut Self> {
        self.and(Condition::compare(column, op, operand))
    }

    /// `column = value`; a null value renders `column IS NULL`.
    fn eq(&mut self, column: &str, value: impl Into<Operand>) -> SqlResult<&mut Self> {
        self.and(Condition::eq(column, value))
    }

    /// `column <> value`; a null value renders `column IS NOT NULL`.
    fn ne(&mut self, column: &str, value: impl Into<Operand>) -> SqlResult<&mut Self> {
        self.and(Condition::ne(column, value))
    }

    fn gt(&mut self, column: &str, value: impl Into<Operand>) -> SqlResult<&mut Self> {
        self.and(Condition::gt(column, value))
    }

    fn gte(&mut self, column: &str, value: impl Into<Operand>) -> SqlResult<&mut Self> {
        self.and(Condition::gte(column, value))
    }

    fn lt(&mut self, column: &str, value: impl Into<Operand>) -> SqlResult<&mut Self> {
        self.and(Condition::lt(column, value))
    }

    fn lte(&mut self, column: &str, value: impl Into<Operand>) -> SqlResult<&mut Self> {
        self.and(Condition::lte(column, value))
    }

    fn like(&mut self, column: &str, pattern: impl Into<Operand>) -> SqlResult<&mut Self> {
        self.and(Condition::like(column, pattern))
    }

    /// `column IN (...)`; an empty list renders `1=0`.
    fn in_list<I, T>(&mut self, column: &str, values: I) -> SqlResult<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.and(Condition::in_list(column, values))
    }

    /// `column NOT IN (...)`; an empty list renders `1=1`.
    fn not_in<I, T>(&mut self, column: &str, values: I) -> SqlResult<&mut Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.and(Condition::not_in(column, values))
    }

    fn between(
        &mut self,
        column: &str,
        lower: impl Into<Value>,
        upper: impl Into<Value>,
        boundary: Boundary,
    ) -> SqlResult<&mut Self> {
        self.and(Condition::between(column, lower, upper, boundary))
    }

    fn is_null(&mut self, column: &str) -> SqlResult<&mut Self> {
        self.and(Condition::is_null(column))
    }

    fn is_not_null(&mut self, column: &str) -> SqlResult<&mut Self> {
        self.and(Condition::is_not_null(column))
    }

    fn is_empty(&mut self, column: &str) -> SqlResult<&mut Self> {
        self.and(Condition::is_empty(column))
    }

    fn is_not_empty(&mut self, column: &str) -> SqlResult<&mut Self> {
        self.and(Condition::is_not_empty(column))
    }

    fn exists(&mut self, query: SqlBuilder) -> SqlResult<&mut Self> {
        self.and(Condition::exists(query))
    }

    fn not_exists(&mut self, query: SqlBuilder) -> SqlResult<&mut Self> {
        self.and(Condition::not_exists(query))
    }

    /// AND raw predicate text (reported as a raw bypass).
    fn where_raw(&mut self, sql: &str) -> SqlResult<&mut Self> {
        self.and(Condition::raw(sql))
    }
}

/// The SELECT-side surface of a builder.
pub trait SelectStatement: SqlStatement + Filterable {
    fn select(&mut self, columns: &str) -> SqlResult<&mut Self>;
    fn distinct(&mut self) -> &mut Self;
    fn from(&mut self, table: &str) -> SqlResult<&mut Self>;
    fn group_by(&mut self, columns: &str) -> SqlResult<&mut Self>;
    fn having(&mut self, condition: Condition) -> SqlResult<&mut Self>;
    fn order_by(&mut self, spec: &str) -> SqlResult<&mut Self>;
    fn skip(&mut self, n: i64) -> SqlResult<&mut Self>;
    fn take(&mut self, n: i64) -> SqlResult<&mut Self>;
    fn page(&mut self, number: i64, size: i64) -> SqlResult<&mut Self>;
}

/// The INSERT-side surface of a builder.
pub trait InsertStatement: SqlStatement {
    fn insert(&mut self, table: &str, columns: &str) -> SqlResult<&mut Self>;

    fn values<I, V>(&mut self, values: I) -> SqlResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>;

    fn insert_select(&mut self, query: SqlBuilder) -> SqlResult<&mut Self>;

    fn returning(&mut self, columns: &str) -> SqlResult<&mut Self>;
}

impl SqlStatement for SqlBuilder {
    fn render(&self) -> SqlResult<RenderedSql> {
        SqlBuilder::render(self)
    }

    fn dialect(&self) -> &Dialect {
        SqlBuilder::dialect(self)
    }
}

impl Filterable for SqlBuilder {
    fn and(&mut self, condition: Condition) -> SqlResult<&mut Self> {
        SqlBuilder::and(self, condition)
    }
}

impl SelectStatement for SqlBuilder {
    fn select(&mut self, columns: &str) -> SqlResult<&mut Self> {
        SqlBuilder::select(self, columns)
    }

    fn distinct(&mut self) -> &mut Self {
        SqlBuilder::distinct(self)
    }

    fn from(&mut self, table: &str) -> SqlResult<&mut Self> {
        SqlBuilder::from(self, table)
    }

    fn group_by(&mut self, columns: &str) -> SqlResult<&mut Self> {
        SqlBuilder::group_by(self, columns)
    }

    fn having(&mut self, condition: Condition) -> SqlResult<&mut Self> {
        SqlBuilder::having(self, condition)
    }

    fn order_by(&mut self, spec: &str) -> SqlResult<&mut Self> {
        SqlBuilder::order_by(self, spec)
    }

    fn skip(&mut self, n: i64) -> SqlResult<&mut Self> {
        SqlBuilder::skip(self, n)
    }

    fn take(&mut self, n: i64) -> SqlResult<&mut Self> {
        SqlBuilder::take(self, n)
    }

    fn page(&mut self, number: i64, size: i64) -> SqlResult<&mut Self> {
        SqlBuilder::page(self, number, size)
    }
}

impl InsertStatement for SqlBuilder {
    fn insert(&mut self, table: &str, columns: &str) -> SqlResult<&mut Self> {
        SqlBuilder::insert(self, table, columns)
    }

    fn values<I, V>(&mut self, values: I) -> SqlResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        SqlBuilder::values(self, values)
    }

    fn insert_select(&mut self, query: SqlBuilder) -> SqlResult<&mut Self> {
        SqlBuilder::insert_select(self, query)
    }

    fn returning(&mut self, columns: &str) -> SqlResult<&mut Self> {
        SqlBuilder::returning(self, columns)
    }
}

//! The statement builder.
//!
//! [`SqlBuilder`] owns one of each clause plus the parameter store, and is the
//! only place that knows the order in which clauses are rendered.
//!
//! # Example
//! ```ignore
//! let mut q = sqlclause::builder();
//! q.from("users")?
//!     .select("id,name")?
//!     .gte("age", 18)?
//!     .order_by("name")?
//!     .take(10)?;
//! let rendered = q.render()?;
//! assert_eq!(rendered.sql, "SELECT id,name FROM users WHERE age >= @p0 ORDER BY name LIMIT 10");
//! ```

mod render;
#[cfg(test)]
mod tests;

pub use render::RenderedSql;

use crate::clause::{
    ClauseKind, EndClause, FromClause, GroupByClause, InsertClause, JoinKind, OrderByClause,
    SelectClause, StartClause,
};
use crate::condition::{Condition, ConditionClause, Node, Operand, Operator};
use crate::config::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::fragment::FragmentList;
use crate::ident::{parse_name, require_text};
use crate::param::ParamStore;
use crate::set_op::{SetOperation, SetOperator};
use crate::value::Value;
use std::sync::Arc;

/// A mutable, clause-oriented SQL statement.
///
/// Builders are plain owned values: clone one to hand an independent copy to
/// another task.
#[derive(Debug, Clone)]
#[must_use]
pub struct SqlBuilder {
    dialect: Arc<Dialect>,
    params: ParamStore,
    start: StartClause,
    select: SelectClause,
    from: FromClause,
    filter: ConditionClause,
    group_by: GroupByClause,
    order_by: OrderByClause,
    end: EndClause,
    insert: InsertClause,
    set_ops: Vec<SetOperation>,
}

impl Default for SqlBuilder {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

impl SqlBuilder {
    /// Create an empty builder for `dialect`.
    pub fn new(dialect: Dialect) -> Self {
        Self::with_dialect(Arc::new(dialect))
    }

    /// Create an empty builder sharing an existing dialect.
    pub fn with_dialect(dialect: Arc<Dialect>) -> Self {
        Self {
            dialect,
            params: ParamStore::new(),
            start: StartClause::new(),
            select: SelectClause::new(),
            from: FromClause::new(),
            filter: ConditionClause::new("WHERE"),
            group_by: GroupByClause::new(),
            order_by: OrderByClause::new(),
            end: EndClause::new(),
            insert: InsertClause::new(),
            set_ops: Vec::new(),
        }
    }

    /// Empty builder for PostgreSQL (`$1` placeholders).
    pub fn postgres() -> Self {
        Self::new(Dialect::postgres())
    }

    /// An empty builder with the same dialect and no data.
    pub fn fresh(&self) -> Self {
        Self::with_dialect(Arc::clone(&self.dialect))
    }

    /// The dialect this builder renders for.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Values bound so far, in binding order.
    pub fn params(&self) -> &ParamStore {
        &self.params
    }

    /// Clear every clause and the parameter store.
    pub fn clear(&mut self) -> &mut Self {
        self.params.clear();
        self.start.clear();
        self.select.clear();
        self.from.clear();
        self.filter.clear();
        self.group_by.clear();
        self.order_by.clear();
        self.end.clear();
        self.insert.clear();
        self.set_ops.clear();
        self
    }

    /// Whether nothing has been added to any clause.
    ///
    /// Not `is_empty`: that name is the `IS NULL OR = ''` predicate shorthand.
    pub fn is_blank(&self) -> bool {
        !self.has_own_statement() && self.set_ops.is_empty() && self.start.is_empty()
    }

    // ==================== Clause access ====================

    /// The WITH clause.
    pub fn start_clause(&self) -> &StartClause {
        &self.start
    }

    /// Mutable access to the WITH clause.
    pub fn start_clause_mut(&mut self) -> &mut StartClause {
        &mut self.start
    }

    /// The SELECT column list.
    pub fn select_clause(&self) -> &SelectClause {
        &self.select
    }

    /// Mutable access to the SELECT column list.
    pub fn select_clause_mut(&mut self) -> &mut SelectClause {
        &mut self.select
    }

    /// The FROM clause and its joins.
    pub fn from_clause(&self) -> &FromClause {
        &self.from
    }

    /// Mutable access to the FROM clause.
    pub fn from_clause_mut(&mut self) -> &mut FromClause {
        &mut self.from
    }

    /// The WHERE condition tree.
    pub fn where_clause(&self) -> &ConditionClause {
        &self.filter
    }

    /// Mutable access to the WHERE condition tree.
    pub fn where_clause_mut(&mut self) -> &mut ConditionClause {
        &mut self.filter
    }

    /// The GROUP BY clause.
    pub fn group_by_clause(&self) -> &GroupByClause {
        &self.group_by
    }

    /// Mutable access to the GROUP BY clause.
    pub fn group_by_clause_mut(&mut self) -> &mut GroupByClause {
        &mut self.group_by
    }

    /// The HAVING condition tree.
    pub fn having_clause(&self) -> &ConditionClause {
        self.group_by.having()
    }

    /// Mutable access to the HAVING condition tree.
    pub fn having_clause_mut(&mut self) -> &mut ConditionClause {
        self.group_by.having_mut()
    }

    /// The ORDER BY clause.
    pub fn order_by_clause(&self) -> &OrderByClause {
        &self.order_by
    }

    /// Mutable access to the ORDER BY clause.
    pub fn order_by_clause_mut(&mut self) -> &mut OrderByClause {
        &mut self.order_by
    }

    /// Paging and trailing text.
    pub fn end_clause(&self) -> &EndClause {
        &self.end
    }

    /// Mutable access to paging and trailing text.
    pub fn end_clause_mut(&mut self) -> &mut EndClause {
        &mut self.end
    }

    /// The INSERT target, rows and tail.
    pub fn insert_clause(&self) -> &InsertClause {
        &self.insert
    }

    /// Mutable access to the INSERT clause.
    pub fn insert_clause_mut(&mut self) -> &mut InsertClause {
        &mut self.insert
    }

    /// Append free-form text to one clause. `raw = true` skips identifier
    /// normalization and is reported on the `sqlclause.raw` target.
    pub fn append_sql(&mut self, clause: ClauseKind, text: &str, raw: bool) -> &mut Self {
        match clause {
            ClauseKind::Start => self.start.append_sql(text, raw),
            ClauseKind::Select => self.select.append_sql(text, raw),
            ClauseKind::From => self.from.append_sql(text, raw),
            ClauseKind::Where => self.filter.append_sql(text, raw),
            ClauseKind::GroupBy => self.group_by.append_sql(text, raw),
            ClauseKind::Having => self.group_by.having_mut().append_sql(text, raw),
            ClauseKind::OrderBy => self.order_by.append_sql(text, raw),
            ClauseKind::End => self.end.append_sql(text, raw),
            ClauseKind::Insert => self.insert.append_sql(text, raw),
        }
        self
    }

    fn child(&self, build: impl FnOnce(&mut SqlBuilder) -> SqlResult<()>) -> SqlResult<SqlBuilder> {
        let mut child = self.fresh();
        build(&mut child)?;
        Ok(child)
    }

    /// `(subquery) AS alias`, with the subquery's values moved into this builder.
    fn aliased_subquery(&mut self, query: &SqlBuilder, alias: &str) -> SqlResult<FragmentList> {
        let alias = parse_name("subquery alias", alias)?;
        let embedded = query.embed(&mut self.params)?;
        let mut item = FragmentList::new();
        item.push_sql("(");
        item.append(embedded.fragments);
        item.push_sql(") AS ");
        item.push_sql(&alias.to_sql(&self.dialect));
        Ok(item)
    }

    // ==================== SELECT ====================

    /// Append a comma-separated column list. Repeated calls accumulate.
    pub fn select(&mut self, columns: &str) -> SqlResult<&mut Self> {
        require_text("column list", columns)?;
        self.select.push_columns(columns, false);
        Ok(self)
    }

    /// Append a column list verbatim.
    pub fn select_raw(&mut self, columns: &str) -> SqlResult<&mut Self> {
        require_text("column list", columns)?;
        self.select.push_columns(columns, true);
        Ok(self)
    }

    /// Append each column. The whole call fails if any column is blank.
    pub fn select_columns<I, S>(&mut self, columns: I) -> SqlResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<S> = columns.into_iter().collect();
        for column in &columns {
            require_text("column", column.as_ref())?;
        }
        for column in &columns {
            self.select.push_columns(column.as_ref(), false);
        }
        Ok(self)
    }

    /// Select `(subquery) AS alias`.
    pub fn select_subquery(&mut self, query: SqlBuilder, alias: &str) -> SqlResult<&mut Self> {
        let item = self.aliased_subquery(&query, alias)?;
        self.select.push_expression(item);
        Ok(self)
    }

    /// Select `(subquery) AS alias`, building the subquery in a closure.
    pub fn select_subquery_with(
        &mut self,
        alias: &str,
        build: impl FnOnce(&mut SqlBuilder) -> SqlResult<()>,
    ) -> SqlResult<&mut Self> {
        let child = self.child(build)?;
        self.select_subquery(child, alias)
    }

    /// Render `SELECT DISTINCT`.
    pub fn distinct(&mut self) -> &mut Self {
        self.select.set_distinct(true);
        self
    }

    // ==================== FROM / JOIN ====================

    /// Add a source (`users`, `public.users u`).
    pub fn from(&mut self, table: &str) -> SqlResult<&mut Self> {
        require_text("table", table)?;
        self.from.push_source(table, false);
        Ok(self)
    }

    /// Add a source verbatim.
    pub fn from_raw(&mut self, source: &str) -> SqlResult<&mut Self> {
        require_text("table", source)?;
        self.from.push_source(source, true);
        Ok(self)
    }

    /// Add `table AS alias`.
    pub fn from_as(&mut self, table: &str, alias: &str) -> SqlResult<&mut Self> {
        require_text("table", table)?;
        let alias = parse_name("table alias", alias)?;
        let mut item = FragmentList::new();
        item.push_ident(table.trim())
            .push_sql(" AS ")
            .push_sql(&alias.to_sql(&self.dialect));
        self.from.push_fragments(item);
        Ok(self)
    }

    /// Add `(subquery) AS alias`.
    pub fn from_subquery(&mut self, query: SqlBuilder, alias: &str) -> SqlResult<&mut Self> {
        let item = self.aliased_subquery(&query, alias)?;
        self.from.push_fragments(item);
        Ok(self)
    }

    /// Add `(subquery) AS alias`, building the subquery in a closure.
    pub fn from_subquery_with(
        &mut self,
        alias: &str,
        build: impl FnOnce(&mut SqlBuilder) -> SqlResult<()>,
    ) -> SqlResult<&mut Self> {
        let child = self.child(build)?;
        self.from_subquery(child, alias)
    }

    /// Add `KIND JOIN table [ON on]`. Requires an earlier `from`.
    pub fn join(&mut self, kind: JoinKind, table: &str, on: Option<&str>) -> SqlResult<&mut Self> {
        require_text("join target", table)?;
        if let Some(on) = on {
            require_text("join condition", on)?;
        }
        let mut target = FragmentList::new();
        target.push_ident(table.trim());
        self.from.push_join(kind, target, on)?;
        Ok(self)
    }

    /// Add `INNER JOIN table ON on`.
    pub fn inner_join(&mut self, table: &str, on: &str) -> SqlResult<&mut Self> {
        self.join(JoinKind::Inner, table, Some(on))
    }

    /// Add `LEFT JOIN table ON on`.
    pub fn left_join(&mut self, table: &str, on: &str) -> SqlResult<&mut Self> {
        self.join(JoinKind::Left, table, Some(on))
    }

    /// Add `RIGHT JOIN table ON on`.
    pub fn right_join(&mut self, table: &str, on: &str) -> SqlResult<&mut Self> {
        self.join(JoinKind::Right, table, Some(on))
    }

    /// Add `FULL JOIN table ON on`.
    pub fn full_join(&mut self, table: &str, on: &str) -> SqlResult<&mut Self> {
        self.join(JoinKind::Full, table, Some(on))
    }

    /// Add `CROSS JOIN table`.
    pub fn cross_join(&mut self, table: &str) -> SqlResult<&mut Self> {
        self.join(JoinKind::Cross, table, None)
    }

    // ==================== WHERE / HAVING ====================

    /// AND a condition into the WHERE tree. Values are bound now.
    pub fn and(&mut self, condition: Condition) -> SqlResult<&mut Self> {
        let node = Node::bind(&condition, &mut self.params, self.filter.name())?;
        self.filter.push(node);
        Ok(self)
    }

    /// AND `column op operand` into the WHERE tree.
    pub fn and_where(
        &mut self,
        column: &str,
        op: Operator,
        operand: impl Into<Operand>,
    ) -> SqlResult<&mut Self> {
        self.and(Condition::compare(column, op, operand))
    }

    /// AND a condition into the HAVING tree.
    pub fn having(&mut self, condition: Condition) -> SqlResult<&mut Self> {
        let having = self.group_by.having_mut();
        let node = Node::bind(&condition, &mut self.params, having.name())?;
        having.push(node);
        Ok(self)
    }

    /// AND `column op operand` into the HAVING tree.
    pub fn having_where(
        &mut self,
        column: &str,
        op: Operator,
        operand: impl Into<Operand>,
    ) -> SqlResult<&mut Self> {
        self.having(Condition::compare(column, op, operand))
    }

    /// AND raw predicate text into the HAVING tree.
    pub fn having_raw(&mut self, sql: &str) -> SqlResult<&mut Self> {
        self.having(Condition::raw(sql))
    }

    /// AND `EXISTS (subquery)`, building the subquery in a closure.
    pub fn exists_with(
        &mut self,
        build: impl FnOnce(&mut SqlBuilder) -> SqlResult<()>,
    ) -> SqlResult<&mut Self> {
        let child = self.child(build)?;
        self.and(Condition::exists(child))
    }

    /// AND `NOT EXISTS (subquery)`, building the subquery in a closure.
    pub fn not_exists_with(
        &mut self,
        build: impl FnOnce(&mut SqlBuilder) -> SqlResult<()>,
    ) -> SqlResult<&mut Self> {
        let child = self.child(build)?;
        self.and(Condition::not_exists(child))
    }

    // ==================== GROUP BY / ORDER BY ====================

    /// Append columns to GROUP BY.
    pub fn group_by(&mut self, columns: &str) -> SqlResult<&mut Self> {
        require_text("group by list", columns)?;
        self.group_by.push_columns(columns, false);
        Ok(self)
    }

    /// Append a sort specification (`name`, `created_at DESC`).
    pub fn order_by(&mut self, spec: &str) -> SqlResult<&mut Self> {
        require_text("order by list", spec)?;
        self.order_by.push_spec(spec, false);
        Ok(self)
    }

    /// Append `column ASC` to ORDER BY.
    pub fn order_by_asc(&mut self, column: &str) -> SqlResult<&mut Self> {
        require_text("order by column", column)?;
        self.order_by.push_column(column, false);
        Ok(self)
    }

    /// Append `column DESC` to ORDER BY.
    pub fn order_by_desc(&mut self, column: &str) -> SqlResult<&mut Self> {
        require_text("order by column", column)?;
        self.order_by.push_column(column, true);
        Ok(self)
    }

    // ==================== Paging ====================

    /// Skip `n` rows. Replaces an earlier `page`.
    pub fn skip(&mut self, n: i64) -> SqlResult<&mut Self> {
        self.end.skip(n)?;
        Ok(self)
    }

    /// Return at most `n` rows. Replaces an earlier `page`.
    pub fn take(&mut self, n: i64) -> SqlResult<&mut Self> {
        self.end.take(n)?;
        Ok(self)
    }

    /// Page `number` (1-based) of `size` rows. Replaces earlier `skip`/`take`.
    pub fn page(&mut self, number: i64, size: i64) -> SqlResult<&mut Self> {
        self.end.page(number, size)?;
        Ok(self)
    }

    // ==================== INSERT ====================

    /// Start `INSERT INTO table (columns)`. An empty column list omits the parentheses.
    pub fn insert(&mut self, table: &str, columns: &str) -> SqlResult<&mut Self> {
        require_text("insert table", table)?;
        self.insert.set_target(table, columns);
        Ok(self)
    }

    /// Add one `VALUES` row. Its width must match the column list.
    pub fn values<I, V>(&mut self, values: I) -> SqlResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.insert.check_row(values.len())?;
        let row = values.into_iter().map(|v| self.params.bind(v)).collect();
        self.insert.push_row(row);
        Ok(self)
    }

    /// Use a SELECT statement as the INSERT source.
    pub fn insert_select(&mut self, query: SqlBuilder) -> SqlResult<&mut Self> {
        if !self.insert.has_target() {
            return Err(SqlError::invalid_argument(
                "insert_select() requires insert() first",
            ));
        }
        let embedded = query.embed(&mut self.params)?;
        self.insert.set_source(embedded.fragments);
        Ok(self)
    }

    /// Use a SELECT statement built in a closure as the INSERT source.
    pub fn insert_select_with(
        &mut self,
        build: impl FnOnce(&mut SqlBuilder) -> SqlResult<()>,
    ) -> SqlResult<&mut Self> {
        let child = self.child(build)?;
        self.insert_select(child)
    }

    /// Append `RETURNING columns` to the statement.
    pub fn returning(&mut self, columns: &str) -> SqlResult<&mut Self> {
        require_text("returning list", columns)?;
        self.insert.push_returning(columns);
        Ok(self)
    }

    // ==================== WITH ====================

    fn push_cte(
        &mut self,
        name: &str,
        columns: Option<&str>,
        query: SqlBuilder,
        recursive: bool,
    ) -> SqlResult<&mut Self> {
        let name = parse_name("CTE name", name)?;
        if let Some(columns) = columns {
            require_text("CTE column list", columns)?;
        }
        self.start.check_name(&name, &self.dialect)?;
        let embedded = query.embed(&mut self.params)?;
        self.start
            .push_cte(name, columns, embedded.fragments, recursive);
        Ok(self)
    }

    /// Register `WITH name AS (query)`.
    pub fn with(&mut self, name: &str, query: SqlBuilder) -> SqlResult<&mut Self> {
        self.push_cte(name, None, query, false)
    }

    /// Register `WITH name (columns) AS (query)`.
    pub fn with_columns(
        &mut self,
        name: &str,
        columns: &str,
        query: SqlBuilder,
    ) -> SqlResult<&mut Self> {
        self.push_cte(name, Some(columns), query, false)
    }

    /// Register a recursive CTE; renders `WITH RECURSIVE` when the dialect spells it.
    pub fn with_recursive(&mut self, name: &str, query: SqlBuilder) -> SqlResult<&mut Self> {
        self.push_cte(name, None, query, true)
    }

    /// Register a recursive CTE with a column list.
    pub fn with_recursive_columns(
        &mut self,
        name: &str,
        columns: &str,
        query: SqlBuilder,
    ) -> SqlResult<&mut Self> {
        self.push_cte(name, Some(columns), query, true)
    }

    /// Register `WITH name AS (...)`, building the query in a closure.
    pub fn with_fn(
        &mut self,
        name: &str,
        build: impl FnOnce(&mut SqlBuilder) -> SqlResult<()>,
    ) -> SqlResult<&mut Self> {
        let child = self.child(build)?;
        self.with(name, child)
    }

    /// Append prologue text after the CTE list.
    pub fn start_sql(&mut self, text: &str, raw: bool) -> &mut Self {
        self.start.append_sql(text, raw);
        self
    }

    // ==================== Set operations ====================

    fn push_set_ops<I>(&mut self, kind: SetOperator, members: I) -> SqlResult<&mut Self>
    where
        I: IntoIterator<Item = SqlBuilder>,
    {
        // Embed into a scratch store so a failing member leaves no values behind.
        let mut scratch = self.params.clone();
        let mut ops = Vec::new();
        for member in members {
            let embedded = member.embed(&mut scratch)?;
            ops.push(SetOperation {
                kind,
                body: embedded.fragments,
                column_count: embedded.column_count,
                compound: embedded.compound,
            });
        }
        self.params = scratch;
        self.set_ops.extend(ops);
        Ok(self)
    }

    /// Append members joined with `UNION`.
    pub fn union<I: IntoIterator<Item = SqlBuilder>>(&mut self, members: I) -> SqlResult<&mut Self> {
        self.push_set_ops(SetOperator::Union, members)
    }

    /// Append members joined with `UNION ALL`.
    pub fn union_all<I: IntoIterator<Item = SqlBuilder>>(
        &mut self,
        members: I,
    ) -> SqlResult<&mut Self> {
        self.push_set_ops(SetOperator::UnionAll, members)
    }

    /// Append members joined with `INTERSECT`.
    pub fn intersect<I: IntoIterator<Item = SqlBuilder>>(
        &mut self,
        members: I,
    ) -> SqlResult<&mut Self> {
        self.push_set_ops(SetOperator::Intersect, members)
    }

    /// Append members joined with `EXCEPT`.
    pub fn except<I: IntoIterator<Item = SqlBuilder>>(
        &mut self,
        members: I,
    ) -> SqlResult<&mut Self> {
        self.push_set_ops(SetOperator::Except, members)
    }

    // ==================== Rendering ====================

    /// Render text and parameters. Pure: repeated calls return identical output.
    pub fn render(&self) -> SqlResult<RenderedSql> {
        let fragments = self.statement_fragments()?;
        render::render_fragments(&self.dialect, &self.params, &fragments)
    }

    /// Rendered text only (debug helper).
    pub fn to_sql(&self) -> SqlResult<String> {
        self.render().map(|r| r.sql)
    }

    /// Render `SELECT COUNT(*) FROM (statement) AS t`, without ordering or paging.
    pub fn count_sql(&self) -> SqlResult<RenderedSql> {
        let mut inner = self.clone();
        inner.order_by.clear();
        inner.end.clear_paging();
        let mut outer = self.fresh();
        outer.select("COUNT(*)")?.from_subquery(inner, "t")?;
        outer.render()
    }
}

use super::push_caller_text;
use crate::error::{SqlError, SqlResult};
use crate::fragment::FragmentList;
use crate::ident::count_columns;
use crate::param::ParamName;

/// `INSERT INTO table (columns)` with either `VALUES` rows or a `SELECT` source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertClause {
    head: FragmentList,
    column_count: usize,
    rows: Vec<Vec<ParamName>>,
    source: Option<FragmentList>,
    tail: FragmentList,
}

impl InsertClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target table and column list. Replaces a previous target.
    pub(crate) fn set_target(&mut self, table: &str, columns: &str) {
        self.head.clear();
        self.rows.clear();
        self.source = None;
        self.head.push_sql("INSERT INTO ").push_ident(table.trim());
        let columns = columns.trim();
        self.column_count = count_columns(columns).0;
        if !columns.is_empty() {
            self.head.push_sql(" (").push_ident(columns).push_sql(")");
        }
    }

    pub fn has_target(&self) -> bool {
        !self.head.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Width every row must have: the column list, or the first row without one.
    fn expected_width(&self) -> Option<usize> {
        if self.column_count > 0 {
            Some(self.column_count)
        } else {
            self.rows.first().map(Vec::len)
        }
    }

    /// Check a row against the target before any values are bound.
    pub(crate) fn check_row(&self, width: usize) -> SqlResult<()> {
        if !self.has_target() {
            return Err(SqlError::invalid_argument("values() requires insert() first"));
        }
        if width == 0 {
            return Err(SqlError::invalid_argument("values() requires at least one value"));
        }
        match self.expected_width() {
            Some(expected) if expected != width => Err(SqlError::invalid_argument(format!(
                "values() got {width} values for {expected} columns"
            ))),
            _ => Ok(()),
        }
    }

    pub(crate) fn push_row(&mut self, row: Vec<ParamName>) {
        self.rows.push(row);
    }

    pub(crate) fn set_source(&mut self, source: FragmentList) {
        self.source = Some(source);
    }

    pub fn has_values(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Append free-form text at the end of the statement (`RETURNING id`, `ON CONFLICT ...`).
    pub fn append_sql(&mut self, text: &str, raw: bool) {
        push_caller_text(&mut self.tail, "INSERT", text, raw);
    }

    /// Append `RETURNING columns` to the trailing text.
    pub fn push_returning(&mut self, columns: &str) {
        if !self.tail.is_empty() {
            self.tail.push_sql(" ");
        }
        self.tail.push_sql("RETURNING ").push_ident(columns.trim());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.tail.is_empty()
    }

    /// `INSERT INTO t (cols)` followed by `VALUES ...` or the embedded source.
    pub(crate) fn write_to(&self, out: &mut FragmentList) -> SqlResult<()> {
        if self.head.is_empty() {
            return Err(SqlError::structural("INSERT text without insert() target"));
        }
        if self.has_values() && self.has_source() {
            return Err(SqlError::structural(
                "INSERT cannot combine VALUES rows with a SELECT source",
            ));
        }
        out.append(self.head.clone());
        if self.has_values() {
            out.push_sql(" VALUES ");
            for (i, row) in self.rows.iter().enumerate() {
                if i > 0 {
                    out.push_sql(", ");
                }
                out.push_sql("(");
                for (j, name) in row.iter().enumerate() {
                    if j > 0 {
                        out.push_sql(", ");
                    }
                    out.push_param(*name);
                }
                out.push_sql(")");
            }
        }
        if let Some(source) = &self.source {
            out.push_sql(" ");
            out.append(source.clone());
        }
        Ok(())
    }

    pub(crate) fn write_tail(&self, out: &mut FragmentList) {
        out.append(self.tail.clone());
    }

    pub(crate) fn has_tail(&self) -> bool {
        !self.tail.is_empty()
    }
}

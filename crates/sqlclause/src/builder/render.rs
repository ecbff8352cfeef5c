//! Statement assembly and placeholder rendering.

use super::SqlBuilder;
use crate::config::{Dialect, PlaceholderStyle};
use crate::error::{SqlError, SqlResult};
use crate::fragment::{Fragment, FragmentList};
use crate::ident::write_normalized;
use crate::param::{ParamName, ParamStore};
use crate::value::Value;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use tokio_postgres::types::ToSql;

/// Rendered statement text with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSql {
    pub sql: String,
    /// `(name, value)` pairs: binding order for named placeholders, text order for positional ones.
    pub params: Vec<(String, Value)>,
    /// How many raw fragments went into `sql`.
    pub raw_fragments: usize,
}

impl RenderedSql {
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.params.iter().map(|(_, v)| v)
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|(_, v)| v as &(dyn ToSql + Sync))
            .collect()
    }
}

/// A child statement moved into a parent's parameter namespace.
#[derive(Debug, Clone)]
pub(crate) struct Embedded {
    pub(crate) fragments: FragmentList,
    pub(crate) column_count: Option<usize>,
    pub(crate) compound: bool,
}

fn join_sections(sections: Vec<FragmentList>) -> FragmentList {
    let mut out = FragmentList::new();
    for section in sections.into_iter().filter(|s| !s.is_empty()) {
        if !out.is_empty() {
            out.push_sql(" ");
        }
        out.append(section);
    }
    out
}

fn section(write: impl FnOnce(&mut FragmentList)) -> FragmentList {
    let mut out = FragmentList::new();
    write(&mut out);
    out
}

impl SqlBuilder {
    /// Whether any SELECT-side clause has content.
    fn has_query_part(&self) -> bool {
        !self.select.is_empty()
            || !self.from.is_empty()
            || !self.filter.is_empty()
            || !self.group_by.is_empty()
            || !self.group_by.having().is_empty()
            || !self.order_by.is_empty()
            || !self.end.is_empty()
    }

    pub(crate) fn has_own_statement(&self) -> bool {
        self.insert.has_target() || self.has_query_part()
    }

    /// Explicit column count of the statement, when it can be known.
    pub(crate) fn column_count(&self) -> Option<usize> {
        if self.has_query_part() {
            self.select.column_count()
        } else {
            self.set_ops.first().and_then(|op| op.column_count)
        }
    }

    /// Assemble the statement as fragments in this builder's own parameter namespace.
    pub(crate) fn statement_fragments(&self) -> SqlResult<FragmentList> {
        let own = self.has_own_statement();
        if !own && self.set_ops.is_empty() {
            return Err(SqlError::structural("cannot render an empty statement"));
        }
        if !self.insert.has_target() && self.insert.has_tail() {
            return Err(SqlError::structural("INSERT text without insert() target"));
        }

        let dialect = self.dialect.as_ref();
        let mut sections = vec![section(|out| self.start.write_to(dialect, out))];

        if self.insert.has_target() {
            let query_source = self.has_query_part() || !self.set_ops.is_empty();
            let own_source = self.insert.has_values() || self.insert.has_source();
            if query_source && own_source {
                return Err(SqlError::structural(
                    "INSERT has both a VALUES/SELECT source and a query of its own",
                ));
            }
            if !query_source && !own_source {
                return Err(SqlError::structural("INSERT has no VALUES or SELECT source"));
            }
            let mut head = FragmentList::new();
            self.insert.write_to(&mut head)?;
            sections.push(head);
        }

        if self.has_query_part() {
            if self.from.is_empty() {
                return Err(SqlError::structural("SELECT statement has no FROM source"));
            }
            sections.push(section(|out| self.select.write_to(out)));
            sections.push(section(|out| self.from.write_to(out)));
            sections.push(section(|out| self.filter.write_to(out)));
            sections.push(section(|out| self.group_by.write_to(out)));
            sections.push(section(|out| self.group_by.having().write_to(out)));
            if self.order_by.is_empty() && self.end.has_paging() && dialect.supports_offset_fetch {
                // OFFSET/FETCH is only legal after ORDER BY.
                sections.push(section(|out| {
                    out.push_sql("ORDER BY (SELECT NULL)");
                }));
            } else {
                sections.push(section(|out| self.order_by.write_to(out)));
            }
            sections.push(section(|out| self.end.write_to(dialect, out)));
        }

        if !self.set_ops.is_empty() {
            self.check_set_columns()?;
            for (i, op) in self.set_ops.iter().enumerate() {
                // Under a bare INSERT head the first member is the source itself.
                let keyword = self.has_query_part() || i > 0;
                sections.push(section(|out| op.write_to(out, keyword)));
            }
        }

        sections.push(section(|out| self.insert.write_tail(out)));
        Ok(join_sections(sections))
    }

    fn check_set_columns(&self) -> SqlResult<()> {
        if !self.dialect.check_set_operation_columns {
            return Ok(());
        }
        let Some(expected) = self.column_count() else {
            return Ok(());
        };
        for op in &self.set_ops {
            if let Some(got) = op.column_count {
                if got != expected {
                    return Err(SqlError::structural(format!(
                        "{} member selects {got} columns, expected {expected}",
                        op.kind.as_sql()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Move this statement into `store`, returning fragments that refer to the new names.
    pub(crate) fn embed(&self, store: &mut ParamStore) -> SqlResult<Embedded> {
        let mut fragments = self.statement_fragments()?;
        let table = store.remap(&self.params);
        fragments.remap(&table);
        Ok(Embedded {
            fragments,
            column_count: self.column_count(),
            compound: !self.set_ops.is_empty(),
        })
    }
}

/// Turn fragments into text, resolving every parameter against `store`.
pub(crate) fn render_fragments(
    dialect: &Dialect,
    store: &ParamStore,
    fragments: &FragmentList,
) -> SqlResult<RenderedSql> {
    let mut sql = String::new();
    let mut params = Vec::new();
    let mut raw_fragments = 0;
    let mut referenced: HashSet<ParamName> = HashSet::new();
    let mut positions: HashMap<ParamName, usize> = HashMap::new();

    for fragment in fragments.iter() {
        match fragment {
            Fragment::Sql(s) => sql.push_str(s),
            Fragment::Raw(s) => {
                raw_fragments += 1;
                sql.push_str(s);
            }
            Fragment::Ident(s) => write_normalized(s, dialect, &mut sql),
            Fragment::Param(name) => {
                let value = store.get(*name).ok_or_else(|| {
                    SqlError::structural(format!("parameter {name} is not bound"))
                })?;
                sql.push_str(&dialect.parameter_prefix);
                match dialect.placeholder {
                    PlaceholderStyle::Named => {
                        let _ = write!(sql, "{name}");
                        referenced.insert(*name);
                    }
                    PlaceholderStyle::Numbered => {
                        let next = positions.len() + 1;
                        let position = *positions.entry(*name).or_insert_with(|| {
                            params.push((name.to_string(), value.clone()));
                            next
                        });
                        let _ = write!(sql, "{position}");
                    }
                    PlaceholderStyle::Anonymous => {
                        params.push((name.to_string(), value.clone()));
                    }
                }
            }
        }
    }

    if dialect.placeholder == PlaceholderStyle::Named {
        params = store
            .iter()
            .filter(|(name, _)| referenced.contains(name))
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
    }

    tracing::trace!(
        target: "sqlclause.render",
        dialect = %dialect.name,
        param_count = params.len(),
        sql_len = sql.len(),
        raw_fragments,
        "statement rendered",
    );

    Ok(RenderedSql {
        sql,
        params,
        raw_fragments,
    })
}

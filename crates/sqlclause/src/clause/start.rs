use super::push_caller_text;
use crate::config::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::fragment::FragmentList;
use crate::ident::Ident;

#[derive(Debug, Clone, PartialEq)]
struct Cte {
    name: Ident,
    columns: Option<String>,
    body: FragmentList,
    recursive: bool,
}

/// Statement prologue: `WITH` common table expressions, then free-form text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartClause {
    ctes: Vec<Cte>,
    prologue: FragmentList,
}

impl StartClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a CTE with this name is registered.
    pub fn contains(&self, name: &Ident) -> bool {
        self.ctes.iter().any(|cte| cte.name.same_name(name))
    }

    /// Reject a name that is already registered.
    pub(crate) fn check_name(&self, name: &Ident, dialect: &Dialect) -> SqlResult<()> {
        if self.contains(name) {
            return Err(SqlError::structural(format!(
                "CTE '{}' is already defined",
                name.to_sql(dialect)
            )));
        }
        Ok(())
    }

    /// Register a CTE. Callers check the name with [`StartClause::check_name`] first.
    pub(crate) fn push_cte(
        &mut self,
        name: Ident,
        columns: Option<&str>,
        body: FragmentList,
        recursive: bool,
    ) {
        self.ctes.push(Cte {
            name,
            columns: columns.map(|c| c.trim().to_string()),
            body,
            recursive,
        });
    }

    pub fn cte_count(&self) -> usize {
        self.ctes.len()
    }

    /// Append free-form prologue text, rendered after the CTE list.
    pub fn append_sql(&mut self, text: &str, raw: bool) {
        push_caller_text(&mut self.prologue, "START", text, raw);
    }

    pub fn clear(&mut self) {
        self.ctes.clear();
        self.prologue.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.ctes.is_empty() && self.prologue.is_empty()
    }

    pub(crate) fn write_to(&self, dialect: &Dialect, out: &mut FragmentList) {
        if !self.ctes.is_empty() {
            out.push_sql("WITH ");
            if dialect.recursive_keyword && self.ctes.iter().any(|c| c.recursive) {
                out.push_sql("RECURSIVE ");
            }
            for (i, cte) in self.ctes.iter().enumerate() {
                if i > 0 {
                    out.push_sql(", ");
                }
                out.push_sql(&cte.name.to_sql(dialect));
                if let Some(columns) = &cte.columns {
                    out.push_sql(" (").push_ident(columns).push_sql(")");
                }
                out.push_sql(" AS (");
                out.append(cte.body.clone());
                out.push_sql(")");
            }
        }
        if !self.prologue.is_empty() {
            if !self.ctes.is_empty() {
                out.push_sql(" ");
            }
            out.append(self.prologue.clone());
        }
    }
}

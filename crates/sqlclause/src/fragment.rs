//! Ordered clause content.

use crate::param::{ParamName, RemapTable};

/// An atomic piece of clause content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Syntax generated by the builder itself (keywords, separators, operators).
    Sql(String),
    /// Caller text inserted verbatim with `raw = true`. Never inspected.
    Raw(String),
    /// Caller text subject to identifier normalization at render time.
    Ident(String),
    /// A bound parameter, rendered as the dialect placeholder.
    Param(ParamName),
}

/// Ordered sequence of fragments accumulated by a clause.
///
/// Adjacent generated syntax is merged into one fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentList {
    items: Vec<Fragment>,
}

impl FragmentList {
    /// An empty list.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append builder-generated syntax.
    pub fn push_sql(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }
        match self.items.last_mut() {
            Some(Fragment::Sql(last)) => last.push_str(sql),
            _ => self.items.push(Fragment::Sql(sql.to_string())),
        }
        self
    }

    /// Append caller text verbatim.
    pub fn push_raw(&mut self, text: &str) -> &mut Self {
        if !text.is_empty() {
            self.items.push(Fragment::Raw(text.to_string()));
        }
        self
    }

    /// Append caller text that is normalized as identifiers when rendered.
    pub fn push_ident(&mut self, text: &str) -> &mut Self {
        if !text.is_empty() {
            self.items.push(Fragment::Ident(text.to_string()));
        }
        self
    }

    /// Append caller text, raw or normalized.
    pub fn push_text(&mut self, text: &str, raw: bool) -> &mut Self {
        if raw {
            self.push_raw(text)
        } else {
            self.push_ident(text)
        }
    }

    /// Append a placeholder for a bound value.
    pub fn push_param(&mut self, name: ParamName) -> &mut Self {
        self.items.push(Fragment::Param(name));
        self
    }

    /// Move every fragment of `other` to the end of this list.
    pub fn append(&mut self, other: FragmentList) -> &mut Self {
        for fragment in other.items {
            match fragment {
                Fragment::Sql(s) => {
                    self.push_sql(&s);
                }
                other => self.items.push(other),
            }
        }
        self
    }

    /// Rewrite parameter names after the values moved to another store.
    pub fn remap(&mut self, table: &RemapTable) {
        for fragment in &mut self.items {
            if let Fragment::Param(name) = fragment {
                if let Some(new) = table.get(name) {
                    *name = *new;
                }
            }
        }
    }

    /// Iterate fragments in render order.
    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.items.iter()
    }

    /// Whether the list holds no fragments.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of fragments.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Remove every fragment.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of raw fragments.
    pub fn raw_count(&self) -> usize {
        self.items
            .iter()
            .filter(|f| matches!(f, Fragment::Raw(_)))
            .count()
    }
}

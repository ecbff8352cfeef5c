//! Bound condition tree.
//!
//! Binding turns a [`Condition`] into a [`Node`] whose leaves already refer to
//! parameters in the owning store. Empty groups vanish during binding, so the
//! tree that is rendered never contains `()` or a dangling `AND`.

use super::{Bound, Condition, Operand, Operator};
use crate::audit;
use crate::error::{SqlError, SqlResult};
use crate::fragment::FragmentList;
use crate::ident::require_text;
use crate::param::{ParamStore, RemapTable};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Leaf(FragmentList),
    /// Free-form predicate text; parenthesized whenever it has siblings.
    Text(FragmentList),
    And(Vec<Node>),
    Or(Vec<Node>),
    Not(Box<Node>),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Group {
    Top,
    And,
    Or,
}

impl Node {
    /// Bind `condition` into `store`.
    ///
    /// Values are collected in a scratch store first, so a failing condition
    /// leaves `store` untouched.
    pub(crate) fn bind(
        condition: &Condition,
        store: &mut ParamStore,
        clause: &str,
    ) -> SqlResult<Option<Node>> {
        let mut scratch = ParamStore::new();
        let node = bind_condition(condition, &mut scratch, clause)?;
        let table = store.remap(&scratch);
        Ok(node.map(|mut node| {
            node.remap(&table);
            node
        }))
    }

    pub(crate) fn remap(&mut self, table: &RemapTable) {
        match self {
            Node::Leaf(list) | Node::Text(list) => list.remap(table),
            Node::And(children) | Node::Or(children) => {
                children.iter_mut().for_each(|c| c.remap(table));
            }
            Node::Not(inner) => inner.remap(table),
        }
    }

    fn write(&self, out: &mut FragmentList, ctx: Group) {
        match self {
            Node::Leaf(list) => {
                out.append(list.clone());
            }
            Node::Text(list) => {
                if ctx == Group::Top {
                    out.append(list.clone());
                } else {
                    out.push_sql("(");
                    out.append(list.clone());
                    out.push_sql(")");
                }
            }
            Node::And(children) => write_group(children, Group::And, out, ctx),
            Node::Or(children) => write_group(children, Group::Or, out, ctx),
            Node::Not(inner) => {
                out.push_sql("NOT (");
                inner.write(out, Group::Top);
                out.push_sql(")");
            }
        }
    }
}

fn write_group(children: &[Node], kind: Group, out: &mut FragmentList, ctx: Group) {
    // Single-child groups are transparent.
    if let [only] = children {
        only.write(out, ctx);
        return;
    }
    let wrap = ctx != Group::Top && ctx != kind;
    let separator = if kind == Group::Or { " OR " } else { " AND " };
    if wrap {
        out.push_sql("(");
    }
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            out.push_sql(separator);
        }
        child.write(out, kind);
    }
    if wrap {
        out.push_sql(")");
    }
}

fn leaf(build: impl FnOnce(&mut FragmentList)) -> Node {
    let mut list = FragmentList::new();
    build(&mut list);
    Node::Leaf(list)
}

fn null_check(column: &str, is_null: bool) -> Node {
    leaf(|l| {
        l.push_ident(column)
            .push_sql(if is_null { " IS NULL" } else { " IS NOT NULL" });
    })
}

fn compare_value(column: &str, op: Operator, value: Value, store: &mut ParamStore) -> Node {
    let name = store.bind(value);
    leaf(|l| {
        l.push_ident(column)
            .push_sql(" ")
            .push_sql(op.as_sql())
            .push_sql(" ")
            .push_param(name);
    })
}

fn bind_children(
    children: &[Condition],
    store: &mut ParamStore,
    clause: &str,
) -> SqlResult<Vec<Node>> {
    let mut nodes = Vec::with_capacity(children.len());
    for child in children {
        if let Some(node) = bind_condition(child, store, clause)? {
            nodes.push(node);
        }
    }
    Ok(nodes)
}

fn bind_condition(
    condition: &Condition,
    store: &mut ParamStore,
    clause: &str,
) -> SqlResult<Option<Node>> {
    match condition {
        Condition::Compare {
            column,
            op,
            operand,
        } => {
            require_text("condition column", column)?;
            bind_compare(column, *op, operand, store).map(Some)
        }
        Condition::Between {
            column,
            lower,
            upper,
            boundary,
        } => {
            require_text("condition column", column)?;
            let both_present = !lower.is_null() && !upper.is_null();
            if both_present && boundary.is_inclusive() {
                let low = store.bind(lower.clone());
                let high = store.bind(upper.clone());
                return Ok(Some(leaf(|l| {
                    l.push_ident(column)
                        .push_sql(" BETWEEN ")
                        .push_param(low)
                        .push_sql(" AND ")
                        .push_param(high);
                })));
            }
            let mut sides = Vec::with_capacity(2);
            if !lower.is_null() {
                let op = match boundary.lower {
                    Bound::Inclusive => Operator::GreaterEqual,
                    Bound::Exclusive => Operator::Greater,
                };
                sides.push(compare_value(column, op, lower.clone(), store));
            }
            if !upper.is_null() {
                let op = match boundary.upper {
                    Bound::Inclusive => Operator::LessEqual,
                    Bound::Exclusive => Operator::Less,
                };
                sides.push(compare_value(column, op, upper.clone(), store));
            }
            Ok(group(sides, Node::And))
        }
        Condition::NullCheck { column, is_null } => {
            require_text("condition column", column)?;
            Ok(Some(null_check(column, *is_null)))
        }
        Condition::EmptyCheck { column, is_empty } => {
            require_text("condition column", column)?;
            let node = if *is_empty {
                Node::Or(vec![
                    null_check(column, true),
                    leaf(|l| {
                        l.push_ident(column).push_sql(" = ''");
                    }),
                ])
            } else {
                Node::And(vec![
                    null_check(column, false),
                    leaf(|l| {
                        l.push_ident(column).push_sql(" <> ''");
                    }),
                ])
            };
            Ok(Some(node))
        }
        Condition::Exists { query, negated } => {
            let embedded = query.embed(store)?;
            let mut list = FragmentList::new();
            list.push_sql(if *negated { "NOT EXISTS (" } else { "EXISTS (" });
            list.append(embedded.fragments);
            list.push_sql(")");
            Ok(Some(Node::Leaf(list)))
        }
        Condition::Raw(sql) => {
            require_text("raw condition", sql)?;
            audit::raw_bypass(clause, sql);
            let mut list = FragmentList::new();
            list.push_raw(sql);
            Ok(Some(Node::Text(list)))
        }
        Condition::And(children) => Ok(group(bind_children(children, store, clause)?, Node::And)),
        Condition::Or(children) => Ok(group(bind_children(children, store, clause)?, Node::Or)),
        Condition::Not(inner) => {
            Ok(bind_condition(inner, store, clause)?.map(|node| Node::Not(Box::new(node))))
        }
    }
}

fn group(nodes: Vec<Node>, make: fn(Vec<Node>) -> Node) -> Option<Node> {
    if nodes.is_empty() {
        None
    } else {
        Some(make(nodes))
    }
}

fn bind_compare(
    column: &str,
    op: Operator,
    operand: &Operand,
    store: &mut ParamStore,
) -> SqlResult<Node> {
    match operand {
        Operand::Subquery(query) => {
            let embedded = query.embed(store)?;
            let mut list = FragmentList::new();
            list.push_ident(column)
                .push_sql(" ")
                .push_sql(op.as_sql())
                .push_sql(" (");
            list.append(embedded.fragments);
            list.push_sql(")");
            Ok(Node::Leaf(list))
        }
        Operand::List(values) if op.is_list() => Ok(bind_list(column, op, values, store)),
        Operand::Value(value) if op.is_list() => {
            Ok(bind_list(column, op, std::slice::from_ref(value), store))
        }
        Operand::List(_) => Err(SqlError::invalid_argument(format!(
            "operator {} does not take a list operand (column '{column}')",
            op.as_sql()
        ))),
        Operand::Value(Value::Null) => match op {
            Operator::Equal => Ok(null_check(column, true)),
            Operator::NotEqual => Ok(null_check(column, false)),
            _ => Err(SqlError::invalid_argument(format!(
                "operator {} cannot compare column '{column}' with NULL",
                op.as_sql()
            ))),
        },
        Operand::Value(value) => Ok(compare_value(column, op, value.clone(), store)),
    }
}

fn bind_list(column: &str, op: Operator, values: &[Value], store: &mut ParamStore) -> Node {
    let negated = op == Operator::NotIn;
    let has_null = values.iter().any(Value::is_null);
    let present: Vec<&Value> = values.iter().filter(|v| !v.is_null()).collect();

    if present.is_empty() {
        return match (has_null, negated) {
            (false, false) => leaf(|l| {
                l.push_sql("1=0");
            }),
            (false, true) => leaf(|l| {
                l.push_sql("1=1");
            }),
            (true, _) => null_check(column, !negated),
        };
    }

    let mut list = FragmentList::new();
    list.push_ident(column)
        .push_sql(" ")
        .push_sql(op.as_sql())
        .push_sql(" (");
    for (i, value) in present.into_iter().enumerate() {
        if i > 0 {
            list.push_sql(", ");
        }
        let name = store.bind(value.clone());
        list.push_param(name);
    }
    list.push_sql(")");
    let in_leaf = Node::Leaf(list);

    match (has_null, negated) {
        (false, _) => in_leaf,
        (true, false) => Node::Or(vec![in_leaf, null_check(column, true)]),
        (true, true) => Node::And(vec![in_leaf, null_check(column, false)]),
    }
}

/// WHERE or HAVING: a top-level AND list of bound nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionClause {
    keyword: &'static str,
    nodes: Vec<Node>,
}

impl ConditionClause {
    pub(crate) fn new(keyword: &'static str) -> Self {
        Self {
            keyword,
            nodes: Vec::new(),
        }
    }

    /// Clause name used in audit events and error messages.
    pub fn name(&self) -> &'static str {
        self.keyword
    }

    pub(crate) fn push(&mut self, node: Option<Node>) {
        if let Some(node) = node {
            self.nodes.push(node);
        }
    }

    /// Append free-form predicate text, ANDed with the existing conditions.
    pub fn append_sql(&mut self, text: &str, raw: bool) {
        if text.trim().is_empty() {
            return;
        }
        if raw {
            audit::raw_bypass(self.keyword, text);
        }
        let mut list = FragmentList::new();
        list.push_text(text, raw);
        self.nodes.push(Node::Text(list));
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn write_to(&self, out: &mut FragmentList) {
        if self.nodes.is_empty() {
            return;
        }
        out.push_sql(self.keyword).push_sql(" ");
        write_group(&self.nodes, Group::And, out, Group::Top);
    }
}

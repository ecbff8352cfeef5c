//! Builder-level tests: clause ordering, composition and dialect output.

use super::SqlBuilder;
use crate::clause::{ClauseKind, JoinKind};
use crate::condition::{Boundary, Condition};
use crate::config::Dialect;
use crate::error::SqlResult;
use crate::traits::Filterable;
use crate::value::Value;

fn users() -> SqlBuilder {
    let mut q = SqlBuilder::default();
    q.from("users").unwrap();
    q
}

fn values(q: &SqlBuilder) -> Vec<Value> {
    q.render().unwrap().values().cloned().collect()
}

#[test]
fn test_select_basic() {
    assert_eq!(users().to_sql().unwrap(), "SELECT * FROM users");
}

#[test]
fn test_select_scenario() {
    let mut q = SqlBuilder::default();
    q.from("users")
        .unwrap()
        .select("id,name")
        .unwrap()
        .gte("age", 18)
        .unwrap()
        .order_by("name")
        .unwrap()
        .take(10)
        .unwrap();

    let rendered = q.render().unwrap();
    assert_eq!(
        rendered.sql,
        "SELECT id,name FROM users WHERE age >= @p0 ORDER BY name LIMIT 10"
    );
    assert_eq!(rendered.params, vec![("p0".to_string(), Value::Int(18))]);
    assert_eq!(rendered.raw_fragments, 0);
}

#[test]
fn test_select_calls_accumulate() {
    let mut q = users();
    q.select("id").unwrap().select("name").unwrap();
    assert_eq!(q.to_sql().unwrap(), "SELECT id, name FROM users");
}

#[test]
fn test_select_columns_is_all_or_nothing() {
    let mut q = users();
    assert!(q.select_columns(["id", "  "]).unwrap_err().is_invalid_argument());
    assert_eq!(q.to_sql().unwrap(), "SELECT * FROM users");

    q.select_columns(["id", "email"]).unwrap();
    assert_eq!(q.to_sql().unwrap(), "SELECT id, email FROM users");
}

#[test]
fn test_distinct() {
    let mut q = users();
    q.distinct().select("country").unwrap();
    assert_eq!(q.to_sql().unwrap(), "SELECT DISTINCT country FROM users");
}

#[test]
fn test_blank_arguments_rejected() {
    let mut q = SqlBuilder::default();
    assert!(q.from("").unwrap_err().is_invalid_argument());
    assert!(q.select(" ").unwrap_err().is_invalid_argument());
    assert!(q.order_by("\t").unwrap_err().is_invalid_argument());
    assert!(q.group_by("").unwrap_err().is_invalid_argument());
    assert!(q.from_as("users", " ").unwrap_err().is_invalid_argument());
    assert!(q.is_blank());
}

#[test]
fn test_missing_from_is_structural() {
    let mut q = SqlBuilder::default();
    q.select("id").unwrap();
    assert!(q.render().unwrap_err().is_structural());
}

#[test]
fn test_empty_builder_is_structural() {
    assert!(SqlBuilder::default().render().unwrap_err().is_structural());
}

#[test]
fn test_reserved_and_quoted_identifiers() {
    let mut q = SqlBuilder::default();
    q.from("public.user").unwrap().select("id, \"Order\"").unwrap();
    assert_eq!(
        q.to_sql().unwrap(),
        "SELECT id, \"Order\" FROM public.\"user\""
    );

    let mut q = SqlBuilder::new(Dialect::mysql());
    q.from("order").unwrap().select("\"Total\", COUNT(*) AS n").unwrap();
    assert_eq!(q.to_sql().unwrap(), "SELECT `Total`, COUNT(*) AS n FROM `order`");

    let mut q = SqlBuilder::new(Dialect::sql_server());
    q.from("users").unwrap().select("[First Name]").unwrap();
    assert_eq!(q.to_sql().unwrap(), "SELECT [First Name] FROM users");
}

#[test]
fn test_raw_text_is_verbatim() {
    let mut q = SqlBuilder::new(Dialect::mysql());
    q.from_raw("\"order\"")
        .unwrap()
        .select_raw("\"Total\"")
        .unwrap();
    let rendered = q.render().unwrap();
    assert_eq!(rendered.sql, "SELECT \"Total\" FROM \"order\"");
    assert_eq!(rendered.raw_fragments, 2);
}

#[test]
fn test_append_sql_per_clause() {
    let mut q = users();
    q.eq("a", 1).unwrap();
    q.append_sql(ClauseKind::Where, "score > 10", true)
        .append_sql(ClauseKind::End, "FOR UPDATE", true);
    let rendered = q.render().unwrap();
    assert_eq!(
        rendered.sql,
        "SELECT * FROM users WHERE a = @p0 AND (score > 10) FOR UPDATE"
    );
    assert_eq!(rendered.raw_fragments, 2);
}

#[test]
fn test_from_as_and_joins() {
    let mut q = SqlBuilder::default();
    q.from_as("users", "u")
        .unwrap()
        .left_join("orders o", "o.user_id = u.id")
        .unwrap()
        .cross_join("regions")
        .unwrap()
        .select("u.id, o.total")
        .unwrap();
    assert_eq!(
        q.to_sql().unwrap(),
        "SELECT u.id, o.total FROM users AS u LEFT JOIN orders o ON o.user_id = u.id CROSS JOIN regions"
    );
}

#[test]
fn test_join_requires_source() {
    let mut q = SqlBuilder::default();
    let err = q.join(JoinKind::Inner, "orders", Some("1=1")).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_where_shorthands() {
    let mut q = users();
    q.eq("status", "active")
        .unwrap()
        .ne("role", "guest")
        .unwrap()
        .in_list("id", [1, 2, 3])
        .unwrap()
        .like("email", "%@example.com")
        .unwrap()
        .is_not_null("verified_at")
        .unwrap();
    assert_eq!(
        q.to_sql().unwrap(),
        "SELECT * FROM users WHERE status = @p0 AND role <> @p1 AND id IN (@p2, @p3, @p4) \
         AND email LIKE @p5 AND verified_at IS NOT NULL"
    );
    assert_eq!(q.params().len(), 6);
}

#[test]
fn test_eq_null_binds_nothing() {
    let mut q = users();
    q.eq("deleted_at", Value::Null).unwrap();
    let rendered = q.render().unwrap();
    assert_eq!(rendered.sql, "SELECT * FROM users WHERE deleted_at IS NULL");
    assert!(rendered.params.is_empty());
}

#[test]
fn test_empty_in_list() {
    let mut q = users();
    q.in_list("id", Vec::<i64>::new()).unwrap();
    assert_eq!(q.to_sql().unwrap(), "SELECT * FROM users WHERE 1=0");
}

#[test]
fn test_one_sided_between() {
    let mut q = users();
    q.between("age", Value::Null, 10, Boundary::inclusive()).unwrap();
    let rendered = q.render().unwrap();
    assert_eq!(rendered.sql, "SELECT * FROM users WHERE age <= @p0");
    assert_eq!(rendered.params, vec![("p0".to_string(), Value::Int(10))]);
}

#[test]
fn test_or_group_is_parenthesized() {
    let mut q = users();
    q.eq("tenant_id", 7)
        .unwrap()
        .and(Condition::or([
            Condition::eq("status", "active"),
            Condition::gt("credits", 0),
        ]))
        .unwrap();
    assert_eq!(
        q.to_sql().unwrap(),
        "SELECT * FROM users WHERE tenant_id = @p0 AND (status = @p1 OR credits > @p2)"
    );
}

#[test]
fn test_failed_condition_binds_nothing() {
    let mut q = users();
    q.eq("a", 1).unwrap();
    assert!(q.gt("age", Value::Null).unwrap_err().is_invalid_argument());
    assert_eq!(q.params().len(), 1);
    assert_eq!(q.to_sql().unwrap(), "SELECT * FROM users WHERE a = @p0");
}

#[test]
fn test_group_by_having() {
    let mut q = SqlBuilder::default();
    q.from("employees")
        .unwrap()
        .select("dept, COUNT(*) AS n")
        .unwrap()
        .group_by("dept")
        .unwrap()
        .having(Condition::gt("COUNT(*)", 5))
        .unwrap()
        .order_by_desc("n")
        .unwrap();
    assert_eq!(
        q.to_sql().unwrap(),
        "SELECT dept, COUNT(*) AS n FROM employees GROUP BY dept HAVING COUNT(*) > @p0 ORDER BY n DESC"
    );
}

#[test]
fn test_paging_limit_offset() {
    let mut q = users();
    q.order_by("id").unwrap().skip(20).unwrap().take(10).unwrap();
    assert_eq!(
        q.to_sql().unwrap(),
        "SELECT * FROM users ORDER BY id LIMIT 10 OFFSET 20"
    );

    q.page(3, 25).unwrap();
    assert_eq!(
        q.to_sql().unwrap(),
        "SELECT * FROM users ORDER BY id LIMIT 25 OFFSET 50"
    );

    // Direct paging discards the page.
    q.take(5).unwrap();
    assert_eq!(q.to_sql().unwrap(), "SELECT * FROM users ORDER BY id LIMIT 5");
}

#[test]
fn test_paging_validation() {
    let mut q = users();
    assert!(q.skip(-1).unwrap_err().is_invalid_argument());
    assert!(q.take(-5).unwrap_err().is_invalid_argument());
    assert!(q.page(0, 10).unwrap_err().is_invalid_argument());
    assert!(q.page(1, 0).unwrap_err().is_invalid_argument());
    assert_eq!(q.to_sql().unwrap(), "SELECT * FROM users");
}

#[test]
fn test_paging_offset_fetch() {
    let mut q = SqlBuilder::new(Dialect::sql_server());
    q.from("users").unwrap().order_by("id").unwrap().page(2, 10).unwrap();
    assert_eq!(
        q.to_sql().unwrap(),
        "SELECT * FROM users ORDER BY id OFFSET 10 ROWS FETCH NEXT 10 ROWS ONLY"
    );

    let mut q = SqlBuilder::new(Dialect::sql_server());
    q.from("users").unwrap().take(5).unwrap();
    assert_eq!(
        q.to_sql().unwrap(),
        "SELECT * FROM users ORDER BY (SELECT NULL) OFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY"
    );
}

#[test]
fn test_subquery_params_are_remapped() {
    let mut inner = SqlBuilder::default();
    inner.from("a").unwrap().eq("x", 1).unwrap().eq("y", 2).unwrap();

    let mut exists = SqlBuilder::default();
    exists.from("b").unwrap().in_list("z", [3, 4, 5]).unwrap();

    let mut q = SqlBuilder::default();
    q.from_subquery(inner, "s").unwrap().exists(exists).unwrap();

    let rendered = q.render().unwrap();
    assert_eq!(
        rendered.sql,
        "SELECT * FROM (SELECT * FROM a WHERE x = @p0 AND y = @p1) AS s \
         WHERE EXISTS (SELECT * FROM b WHERE z IN (@p2, @p3, @p4))"
    );
    let names: Vec<&str> = rendered.params.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["p0", "p1", "p2", "p3", "p4"]);
    assert_eq!(
        values(&q),
        vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(3),
            Value::Int(4),
            Value::Int(5)
        ]
    );
}

#[test]
fn test_subquery_closures() -> SqlResult<()> {
    let mut q = SqlBuilder::default();
    q.from("users u")?
        .select("u.id")?
        .select_subquery_with("orders", |s| {
            s.from("orders o")?
                .select("COUNT(*)")?
                .where_raw("o.user_id = u.id")?;
            Ok(())
        })?
        .not_exists_with(|s| {
            s.from("bans b")?.where_raw("b.user_id = u.id")?;
            Ok(())
        })?;
    assert_eq!(
        q.to_sql()?,
        "SELECT u.id, (SELECT COUNT(*) FROM orders o WHERE o.user_id = u.id) AS orders \
         FROM users u WHERE NOT EXISTS (SELECT * FROM bans b WHERE b.user_id = u.id)"
    );
    Ok(())
}

#[test]
fn test_in_subquery() -> SqlResult<()> {
    let mut admins = SqlBuilder::default();
    admins.from("admins")?.select("user_id")?.eq("active", true)?;

    let mut q = users();
    q.eq("tenant_id", 3)?.in_list("deleted", [false])?;
    q.and_where("id", crate::condition::Operator::In, admins)?;
    assert_eq!(
        q.to_sql()?,
        "SELECT * FROM users WHERE tenant_id = @p0 AND deleted IN (@p1) \
         AND id IN (SELECT user_id FROM admins WHERE active = @p2)"
    );
    Ok(())
}

#[test]
fn test_positional_numbers_follow_text_order() {
    let mut inner = SqlBuilder::postgres();
    inner.from("t").unwrap().eq("b", 2).unwrap();

    let mut q = SqlBuilder::postgres();
    q.eq("a", 1).unwrap().from_subquery(inner, "s").unwrap();

    let rendered = q.render().unwrap();
    assert_eq!(
        rendered.sql,
        "SELECT * FROM (SELECT * FROM t WHERE b = $1) AS s WHERE a = $2"
    );
    assert_eq!(values(&q), vec![Value::Int(2), Value::Int(1)]);
}

#[test]
fn test_anonymous_placeholders() {
    let mut q = SqlBuilder::new(Dialect::mysql());
    q.from("users").unwrap().eq("a", 1).unwrap().eq("b", "x").unwrap();
    let rendered = q.render().unwrap();
    assert_eq!(rendered.sql, "SELECT * FROM users WHERE a = ? AND b = ?");
    assert_eq!(rendered.params.len(), 2);
}

#[test]
fn test_clone_is_independent() {
    let mut a = users();
    a.eq("a", 1).unwrap();
    let mut b = a.clone();
    b.eq("b", 2).unwrap().order_by("id").unwrap();

    assert_eq!(a.to_sql().unwrap(), "SELECT * FROM users WHERE a = @p0");
    assert_eq!(a.params().len(), 1);
    assert_eq!(
        b.to_sql().unwrap(),
        "SELECT * FROM users WHERE a = @p0 AND b = @p1 ORDER BY id"
    );
}

#[test]
fn test_fresh_keeps_only_dialect() {
    let mut q = SqlBuilder::postgres();
    q.from("users").unwrap().eq("a", 1).unwrap();
    let fresh = q.fresh();
    assert!(fresh.is_blank());
    assert!(fresh.params().is_empty());
    assert_eq!(fresh.dialect().name, "postgres");
}

#[test]
fn test_clear() {
    let mut q = users();
    q.eq("a", 1).unwrap().take(3).unwrap();
    q.clear();
    assert!(q.is_blank());
    assert!(q.params().is_empty());
    q.from("orders").unwrap();
    assert_eq!(q.to_sql().unwrap(), "SELECT * FROM orders");
}

#[test]
fn test_render_is_pure() {
    let mut q = users();
    q.eq("a", 1).unwrap().page(2, 5).unwrap();
    let first = q.render().unwrap();
    let second = q.render().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_union_all_order() {
    let select = |table: &str, id: i32| {
        let mut q = SqlBuilder::default();
        q.from(table).unwrap().select("id").unwrap().eq("v", id).unwrap();
        q
    };
    let mut a = select("a", 1);
    a.union_all([select("b", 2), select("c", 3)]).unwrap();

    let rendered = a.render().unwrap();
    assert_eq!(
        rendered.sql,
        "SELECT id FROM a WHERE v = @p0 UNION ALL SELECT id FROM b WHERE v = @p1 \
         UNION ALL SELECT id FROM c WHERE v = @p2"
    );
    assert_eq!(values(&a), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_set_operation_without_own_statement() {
    let mut b = SqlBuilder::default();
    b.from("b").unwrap().select("id").unwrap();
    let mut c = SqlBuilder::default();
    c.from("c").unwrap().select("id").unwrap();

    let mut q = SqlBuilder::default();
    q.union([b, c]).unwrap();
    assert_eq!(q.to_sql().unwrap(), "SELECT id FROM b UNION SELECT id FROM c");
}

#[test]
fn test_compound_member_is_parenthesized() {
    let mut b = SqlBuilder::default();
    b.from("b").unwrap().select("id").unwrap();
    let mut c = SqlBuilder::default();
    c.from("c").unwrap().select("id").unwrap();
    b.intersect([c]).unwrap();

    let mut a = SqlBuilder::default();
    a.from("a").unwrap().select("id").unwrap().except([b]).unwrap();
    assert_eq!(
        a.to_sql().unwrap(),
        "SELECT id FROM a EXCEPT (SELECT id FROM b INTERSECT SELECT id FROM c)"
    );
}

#[test]
fn test_set_operation_column_check() {
    let dialect = Dialect::default().with_set_operation_column_check(true);
    let mut a = SqlBuilder::new(dialect);
    a.from("a").unwrap().select("id, name").unwrap();

    let mut b = a.fresh();
    b.from("b").unwrap().select("id").unwrap();
    a.union([b]).unwrap();
    assert!(a.render().unwrap_err().is_structural());

    // `*` is never counted.
    let mut a = SqlBuilder::new(Dialect::default().with_set_operation_column_check(true));
    a.from("a").unwrap();
    let mut b = a.fresh();
    b.from("b").unwrap().select("id").unwrap();
    a.union([b]).unwrap();
    assert!(a.render().is_ok());
}

#[test]
fn test_failed_set_member_binds_nothing() {
    let mut ok = SqlBuilder::default();
    ok.from("b").unwrap().eq("x", 1).unwrap();
    let broken = SqlBuilder::default();

    let mut a = users();
    assert!(a.union_all([ok, broken]).unwrap_err().is_structural());
    assert!(a.params().is_empty());
    assert_eq!(a.to_sql().unwrap(), "SELECT * FROM users");
}

#[test]
fn test_with_cte() -> SqlResult<()> {
    let mut recent = SqlBuilder::default();
    recent.from("orders")?.gt("total", 100)?;

    let mut q = SqlBuilder::default();
    q.with("recent", recent)?.from("recent")?.eq("status", "paid")?;
    assert_eq!(
        q.to_sql()?,
        "WITH recent AS (SELECT * FROM orders WHERE total > @p0) SELECT * FROM recent WHERE status = @p1"
    );
    Ok(())
}

#[test]
fn test_duplicate_cte_is_structural() -> SqlResult<()> {
    let mut q = SqlBuilder::default();
    q.with_fn("recent", |s| {
        s.from("orders")?;
        Ok(())
    })?;

    let mut again = SqlBuilder::default();
    again.from("orders")?.eq("a", 1)?;
    assert!(q.with("recent", again.clone()).unwrap_err().is_structural());
    assert!(q.with("Recent", again.clone()).unwrap_err().is_structural());
    assert!(q.with("\"RECENT\"", again).unwrap_err().is_structural());
    assert!(q.params().is_empty());
    assert_eq!(q.start_clause().cte_count(), 1);
    Ok(())
}

#[test]
fn test_with_recursive_and_columns() -> SqlResult<()> {
    let mut child = SqlBuilder::default();
    child
        .from("nodes n")?
        .inner_join("tree t", "n.parent_id = t.id")?
        .select("n.id, t.depth + 1")?;

    let mut seed = SqlBuilder::default();
    seed.from("nodes")?
        .select("id, 0")?
        .eq("parent_id", Value::Null)?
        .union_all([child])?;

    let mut q = SqlBuilder::default();
    q.with_recursive_columns("tree", "id, depth", seed.clone())?
        .from("tree")?;
    assert_eq!(
        q.to_sql()?,
        "WITH RECURSIVE tree (id, depth) AS (SELECT id, 0 FROM nodes WHERE parent_id IS NULL \
         UNION ALL SELECT n.id, t.depth + 1 FROM nodes n INNER JOIN tree t ON n.parent_id = t.id) \
         SELECT * FROM tree"
    );

    let mut q = SqlBuilder::new(Dialect::sql_server());
    q.with_recursive("tree", seed)?.from("tree")?;
    assert!(q.to_sql()?.starts_with("WITH tree AS (SELECT"));
    Ok(())
}

#[test]
fn test_start_prologue() {
    let mut q = users();
    q.start_sql("/* report */", true);
    assert_eq!(q.to_sql().unwrap(), "/* report */ SELECT * FROM users");
}

#[test]
fn test_insert_values() -> SqlResult<()> {
    let mut q = SqlBuilder::default();
    q.insert("users", "name, age")?
        .values([Value::from("ann"), Value::from(31)])?
        .values([Value::from("bob"), Value::Null])?;
    let rendered = q.render()?;
    assert_eq!(
        rendered.sql,
        "INSERT INTO users (name, age) VALUES (@p0, @p1), (@p2, @p3)"
    );
    assert_eq!(rendered.params[3].1, Value::Null);
    Ok(())
}

#[test]
fn test_insert_validation() {
    let mut q = SqlBuilder::default();
    assert!(q.values([1]).unwrap_err().is_invalid_argument());

    q.insert("users", "name, age").unwrap();
    assert!(q.values(["ann"]).unwrap_err().is_invalid_argument());
    assert!(q.params().is_empty());

    let mut q = SqlBuilder::default();
    let source = SqlBuilder::default();
    assert!(q.insert_select(source).unwrap_err().is_invalid_argument());
}

#[test]
fn test_insert_without_source_is_structural() {
    let mut q = SqlBuilder::default();
    q.insert("users", "name").unwrap();
    assert!(q.render().unwrap_err().is_structural());

    q.returning("id").unwrap();
    assert!(q.render().unwrap_err().is_structural());
}

#[test]
fn test_insert_from_set_operation() -> SqlResult<()> {
    let names = |table: &str| {
        let mut q = SqlBuilder::default();
        q.from(table).unwrap().select("name").unwrap();
        q
    };
    let mut q = SqlBuilder::default();
    q.insert("users", "name")?.union_all([names("a"), names("b")])?;
    assert_eq!(
        q.to_sql()?,
        "INSERT INTO users (name) SELECT name FROM a UNION ALL SELECT name FROM b"
    );

    let mut q = SqlBuilder::default();
    q.insert("users", "name")?.values(["ann"])?.union_all([names("other")])?;
    assert!(q.render().unwrap_err().is_structural());

    let mut q = SqlBuilder::default();
    q.insert("users", "name")?
        .insert_select(names("a"))?
        .union([names("b")])?;
    assert!(q.render().unwrap_err().is_structural());
    Ok(())
}

#[test]
fn test_reinsert_drops_previous_source() -> SqlResult<()> {
    let mut source = SqlBuilder::default();
    source.from("users")?.select("id, name")?;
    let mut q = SqlBuilder::default();
    q.insert("archive", "id, name")?.insert_select(source)?;
    q.insert("audit", "id")?;
    assert!(!q.insert_clause().has_source());
    assert!(q.render().unwrap_err().is_structural());
    Ok(())
}

#[test]
fn test_insert_select_and_returning() -> SqlResult<()> {
    let mut q = SqlBuilder::postgres();
    q.insert("archive", "id, name")?
        .insert_select_with(|s| {
            s.from("users")?.select("id, name")?.eq("active", false)?;
            Ok(())
        })?
        .returning("id")?;
    let rendered = q.render()?;
    assert_eq!(
        rendered.sql,
        "INSERT INTO archive (id, name) SELECT id, name FROM users WHERE active = $1 RETURNING id"
    );
    assert_eq!(rendered.params, vec![("p0".to_string(), Value::Bool(false))]);
    Ok(())
}

#[test]
fn test_insert_with_own_select() -> SqlResult<()> {
    let mut q = SqlBuilder::default();
    q.insert("archive", "id")?.from("users")?.select("id")?;
    assert_eq!(q.to_sql()?, "INSERT INTO archive (id) SELECT id FROM users");

    q.values([1])?;
    assert!(q.render().unwrap_err().is_structural());
    Ok(())
}

#[test]
fn test_count_sql() -> SqlResult<()> {
    let mut q = users();
    q.eq("status", "active")?.order_by("name")?.take(10)?;
    let count = q.count_sql()?;
    assert_eq!(
        count.sql,
        "SELECT COUNT(*) FROM (SELECT * FROM users WHERE status = @p0) AS t"
    );
    assert_eq!(count.params, vec![("p0".to_string(), Value::Text("active".into()))]);
    // The original keeps its ordering and paging.
    assert!(q.to_sql()?.ends_with("ORDER BY name LIMIT 10"));
    Ok(())
}

#[test]
fn test_shared_dialect() {
    let dialect = std::sync::Arc::new(Dialect::postgres());
    let a = SqlBuilder::with_dialect(std::sync::Arc::clone(&dialect));
    let b = SqlBuilder::with_dialect(dialect);
    assert_eq!(a.dialect(), b.dialect());
}

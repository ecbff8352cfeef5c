//! Raw-bypass reporting.
//!
//! Text appended with `raw = true` (and every [`Condition::Raw`](crate::Condition::Raw))
//! skips identifier normalization entirely. Each such call emits a `tracing`
//! event on the `sqlclause.raw` target so these paths can be told apart from
//! structured ones in logs.

/// Upper bound (in bytes) of the SQL text carried by an audit event.
pub const MAX_AUDIT_SQL_LENGTH: usize = 200;

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn truncate_sql(sql: &str) -> String {
    if sql.len() > MAX_AUDIT_SQL_LENGTH {
        format!("{}...", truncate_sql_bytes(sql, MAX_AUDIT_SQL_LENGTH))
    } else {
        sql.to_string()
    }
}

pub(crate) fn raw_bypass(clause: &str, sql: &str) {
    tracing::debug!(
        target: "sqlclause.raw",
        clause,
        len = sql.len(),
        sql = %truncate_sql(sql),
        "raw sql appended",
    );
}

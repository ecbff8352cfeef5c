//! Raw appends are reported on the `sqlclause.raw` tracing target.

use sqlclause::prelude::*;
use sqlclause::MAX_AUDIT_SQL_LENGTH;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Debug, Default)]
struct Fields(HashMap<String, String>);

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<HashMap<String, String>>>>);

impl<S: tracing::Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != "sqlclause.raw" {
            return;
        }
        assert_eq!(*event.metadata().level(), tracing::Level::DEBUG);
        let mut fields = Fields::default();
        event.record(&mut fields);
        self.0.lock().unwrap().push(fields.0);
    }
}

fn captured(build: impl FnOnce()) -> Vec<HashMap<String, String>> {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, build);
    let events = capture.0.lock().unwrap();
    events.clone()
}

#[test]
fn structured_calls_are_silent() {
    let events = captured(|| {
        let mut q = sqlclause::builder();
        q.from("users")
            .unwrap()
            .select("id, name")
            .unwrap()
            .eq("id", 1)
            .unwrap();
        q.render().unwrap();
    });
    assert!(events.is_empty());
}

#[test]
fn every_raw_path_is_reported() {
    let events = captured(|| {
        let mut q = sqlclause::builder();
        q.from_raw("users u").unwrap().select_raw("u.*").unwrap();
        q.where_raw("u.score > 10").unwrap();
        q.having_raw("COUNT(*) > 1").unwrap();
        q.append_sql(ClauseKind::End, "FOR UPDATE", true);
        // Not raw: no event.
        q.append_sql(ClauseKind::OrderBy, "u.id", false);
    });

    let clauses: Vec<&str> = events.iter().map(|e| e["clause"].as_str()).collect();
    assert_eq!(clauses, ["FROM", "SELECT", "WHERE", "HAVING", "END"]);
    assert_eq!(events[2]["sql"], "u.score > 10");
    assert_eq!(events[2]["len"], "12");
}

#[test]
fn long_raw_text_is_truncated() {
    let sql = format!("id IN ({})", "1, ".repeat(200));
    let events = captured(|| {
        let mut q = sqlclause::builder();
        q.from("t").unwrap().where_raw(&sql).unwrap();
    });
    assert_eq!(events.len(), 1);
    let logged = &events[0]["sql"];
    assert_eq!(logged.len(), MAX_AUDIT_SQL_LENGTH + 3);
    assert!(logged.ends_with("..."));
    assert_eq!(events[0]["len"], sql.len().to_string());
}

#[test]
fn raw_fragments_are_counted() {
    let mut q = sqlclause::builder();
    q.from("users").unwrap().where_raw("active").unwrap();
    assert_eq!(q.render().unwrap().raw_fragments, 1);
}

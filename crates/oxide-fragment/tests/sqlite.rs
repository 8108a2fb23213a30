//! Executes rendered statements against an in-memory SQLite database.

mod common;
use common::*;

use oxide_fragment::{Dialect, Embedded, Query, SqlValue, args, query};
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqlitePoolOptions};
use sqlx::{Row, Sqlite};

async fn pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::query("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, team TEXT)")
        .execute(&pool)
        .await
        .unwrap();

    for (id, name, team) in [
        (1, "alice", Some("core")),
        (2, "bob", Some("web")),
        (3, "O'Hara", None),
        (4, "dave", Some("core")),
    ] {
        let q = query!("INSERT INTO users (id, name, team) VALUES (?, ?, ?)", id, name, team);
        let rendered = render(&q, &Dialect::Sql);
        bind_all(sqlx::query(&rendered.sql), rendered.params)
            .execute(&pool)
            .await
            .unwrap();
    }

    pool
}

fn bind_all<'q>(
    mut query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    params: Vec<SqlValue>,
) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(Option::<i64>::None),
            SqlValue::Bool(b) => query.bind(b),
            SqlValue::Int(i) => query.bind(i),
            SqlValue::Float(f) => query.bind(f),
            SqlValue::Text(s) => query.bind(s),
            SqlValue::Blob(b) => query.bind(b),
        };
    }
    query
}

fn names_query() -> Query {
    let mut where_ = Query::optional("WHERE");
    where_.space("team IN (?)", args![vec!["core", "web"]]);
    where_.space("AND name <> ?", args!["bob"]);

    let mut q = query!("SELECT name FROM users ?", where_);
    q.space("ORDER BY ?", args![Embedded::new("id")]);
    q
}

async fn fetch_names(pool: &SqlitePool, dialect: &Dialect) -> Vec<String> {
    let rendered = render(&names_query(), dialect);
    bind_all(sqlx::query(&rendered.sql), rendered.params)
        .fetch_all(pool)
        .await
        .unwrap_or_else(|e| panic!("Failed to run {}: {e}", rendered.sql))
        .iter()
        .map(|row| row.get::<String, _>("name"))
        .collect()
}

#[tokio::test]
async fn native_and_raw_return_same_rows() {
    let pool = pool().await;

    let native = fetch_names(&pool, &Dialect::Sql).await;
    let raw = fetch_names(&pool, &Dialect::Raw).await;

    assert_eq!(native, vec!["alice", "dave"]);
    assert_eq!(native, raw);
}

#[tokio::test]
async fn numbered_placeholders_run_on_sqlite() {
    // SQLite accepts `$n` as well
    let pool = pool().await;
    let names = fetch_names(&pool, &Dialect::Postgres).await;
    assert_eq!(names, vec!["alice", "dave"]);
}

#[tokio::test]
async fn quotes_in_inlined_text_are_escaped() {
    let pool = pool().await;
    let q = query!("SELECT id FROM users WHERE name = ?", "O'Hara");
    let rendered = render(&q, &Dialect::Raw);
    let row = sqlx::query(&rendered.sql).fetch_one(&pool).await.unwrap();
    assert_eq!(row.get::<i64, _>("id"), 3);
}

#[tokio::test]
async fn empty_list_matches_nothing() {
    let pool = pool().await;
    let q = query!("SELECT count(*) AS n FROM users WHERE team IN (?)", Vec::<&str>::new());
    let rendered = render(&q, &Dialect::Sql);
    let row = bind_all(sqlx::query(&rendered.sql), rendered.params)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.get::<i64, _>("n"), 0);
}

use crate::error::Result;
use crate::models::{Record, Value};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;

pub type DbPool = Pool<SqliteConnectionManager>;

const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys=ON; PRAGMA busy_timeout=5000;";

pub struct Database {
    pool: DbPool,
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

impl Database {
    pub fn open(path: &str, pool_size: u32) -> Result<Self> {
        let path = Path::new(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(path)
            .with_init(|c| c.execute_batch(CONNECTION_PRAGMAS));
        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        let conn = pool.get()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        Ok(Self { pool })
    }

    /// Opens a named shared-cache in-memory database. The data lives as long
    /// as the pool keeps a connection open.
    pub fn open_memory(name: &str) -> Result<Self> {
        let uri = format!("file:{}?mode=memory&cache=shared", name);
        let manager =
            SqliteConnectionManager::file(uri).with_init(|c| c.execute_batch(CONNECTION_PRAGMAS));
        let pool = Pool::builder().max_size(2).build(manager)?;
        Ok(Self { pool })
    }

    pub fn get(&self) -> Result<r2d2::PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.get()?;
        run_migrations(&conn)?;
        Ok(())
    }

    pub fn exists(&self, table: &str, field: &str, value: &Value) -> Result<bool> {
        let conn = self.get()?;
        exists(&conn, table, field, value)
    }

    pub fn count(&self, table: &str) -> Result<i64> {
        let conn = self.get()?;
        count(&conn, table)
    }
}

const MIGRATIONS: [(i32, &str); 1] = [(1, include_str!("migrations/001_initial.sql"))];

fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )?;

    let current_version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    for (version, sql) in MIGRATIONS {
        if version > current_version {
            tracing::info!("Running migration {}", version);
            conn.execute_batch(sql)?;
            conn.execute(
                "INSERT INTO schema_migrations (version) VALUES (?)",
                [version],
            )?;
        }
    }

    Ok(())
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Exact-match existence query on a single column.
pub fn exists(conn: &Connection, table: &str, field: &str, value: &Value) -> Result<bool> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1)",
        quote(table),
        quote(field)
    );
    let found: bool = conn.query_row(&sql, [value], |row| row.get(0))?;
    Ok(found)
}

/// Like [`exists`], ignoring the row whose primary key is `pk_value`.
pub fn exists_other(
    conn: &Connection,
    table: &str,
    field: &str,
    value: &Value,
    pk: &str,
    pk_value: &Value,
) -> Result<bool> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1 AND {} <> ?2)",
        quote(table),
        quote(field),
        quote(pk)
    );
    let found: bool = conn.query_row(&sql, [value, pk_value], |row| row.get(0))?;
    Ok(found)
}

pub fn insert_record<R: Record>(conn: &Connection, record: &R) -> Result<()> {
    let columns: Vec<String> = R::FIELDS.iter().map(|f| quote(f.name)).collect();
    let placeholders: Vec<String> = (1..=R::FIELDS.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote(R::TABLE),
        columns.join(", "),
        placeholders.join(", ")
    );
    let values: Vec<Value> = R::FIELDS.iter().map(|f| record.value(f.name)).collect();
    conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
    Ok(())
}

/// Writes every non-key field. Returns the number of rows matched.
pub fn update_record<R: Record>(conn: &Connection, record: &R) -> Result<usize> {
    let fields: Vec<_> = R::FIELDS
        .iter()
        .filter(|f| f.name != R::PRIMARY_KEY)
        .collect();
    let assignments: Vec<String> = fields
        .iter()
        .enumerate()
        .map(|(i, f)| format!("{} = ?{}", quote(f.name), i + 1))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?{}",
        quote(R::TABLE),
        assignments.join(", "),
        quote(R::PRIMARY_KEY),
        fields.len() + 1
    );
    let mut values: Vec<Value> = fields.iter().map(|f| record.value(f.name)).collect();
    values.push(record.value(R::PRIMARY_KEY));
    let updated = conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
    Ok(updated)
}

pub fn count(conn: &Connection, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", quote(table));
    let n: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(n)
}

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::DrawRecord;
use crate::store::{AppendSummary, HistoryStore};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    date    TEXT PRIMARY KEY,
    number  TEXT NOT NULL CHECK (length(number) = 2)
);
";

pub fn db_path() -> PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("thailotto.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create directory {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("cannot open database {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA).context("migration failed")?;
    Ok(())
}

pub fn insert_record(conn: &Connection, record: &DrawRecord) -> Result<bool> {
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO draws (date, number) VALUES (?1, ?2)",
            rusqlite::params![record.date.to_string(), record.number.to_string()],
        )
        .context("insert failed")?;
    Ok(changed > 0)
}

/// Rows are revalidated on the way out; a malformed row is a hard error.
fn decode_rows(rows: Vec<(String, String)>) -> Result<Vec<DrawRecord>> {
    rows.into_iter()
        .map(|(date, number)| {
            DrawRecord::parse(&date, &number)
                .with_context(|| format!("corrupt history row ({date}, {number})"))
        })
        .collect()
}

pub fn fetch_all_records(conn: &Connection) -> Result<Vec<DrawRecord>> {
    let mut stmt = conn.prepare("SELECT date, number FROM draws ORDER BY date ASC")?;
    let rows: Vec<(String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    decode_rows(rows)
}

pub fn fetch_last_records(conn: &Connection, limit: u32) -> Result<Vec<DrawRecord>> {
    let mut stmt = conn.prepare("SELECT date, number FROM draws ORDER BY date DESC LIMIT ?1")?;
    let rows: Vec<(String, String)> = stmt
        .query_map([limit], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    decode_rows(rows)
}

pub fn count_records(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

/// SQLite-backed history.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = open_db(path)?;
        migrate(&conn)?;
        debug!(path = %path.display(), "history store opened");
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrate(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl HistoryStore for SqliteStore {
    fn load(&self) -> Result<Vec<DrawRecord>> {
        fetch_all_records(&self.conn)
    }

    fn most_recent(&self, n: usize) -> Result<Vec<DrawRecord>> {
        let limit = u32::try_from(n).unwrap_or(u32::MAX);
        fetch_last_records(&self.conn, limit)
    }

    fn append(&mut self, record: &DrawRecord) -> Result<bool> {
        insert_record(&self.conn, record)
    }

    fn count(&self) -> Result<usize> {
        Ok(count_records(&self.conn)? as usize)
    }

    fn append_many(&mut self, records: &[DrawRecord]) -> Result<AppendSummary> {
        let tx = self
            .conn
            .transaction()
            .context("cannot start transaction")?;
        let mut summary = AppendSummary::default();
        for record in records {
            if insert_record(&tx, record)? {
                summary.inserted += 1;
            } else {
                summary.skipped += 1;
            }
        }
        tx.commit().context("commit failed")?;
        Ok(summary)
    }
}

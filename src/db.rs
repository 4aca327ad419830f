use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, ScrapeError};

static TABLE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// One parsed row of the revenue table. Revenue is in base currency units,
/// change is a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Record {
    pub year: u32,
    pub revenue: f64,
    pub change: f64,
}

pub fn connect(store: &Path) -> Result<Connection> {
    if let Some(dir) = store.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(store)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

fn checked_table_name(table: &str) -> Result<&str> {
    if TABLE_NAME_RE.is_match(table) {
        Ok(table)
    } else {
        Err(ScrapeError::InvalidTableName(table.to_string()))
    }
}

// ── Save / load ──

/// Replace the whole table with `records`. Returns the number of rows written.
pub fn save(records: &[Record], store: &Path, table: &str) -> Result<usize> {
    let table = checked_table_name(table)?;
    let conn = connect(store)?;
    let n = replace_table(&conn, table, records)?;
    info!("Saved {} rows to {}:{}", n, store.display(), table);
    Ok(n)
}

/// Every row of the table, in whatever order the store returns them.
pub fn load(store: &Path, table: &str) -> Result<Vec<Record>> {
    let table = checked_table_name(table)?;
    let conn = connect(store)?;
    let rows = read_table(&conn, table)?;
    info!("Loaded {} rows from {}:{}", rows.len(), store.display(), table);
    Ok(rows)
}

fn replace_table(conn: &Connection, table: &str, records: &[Record]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS \"{table}\";
         CREATE TABLE \"{table}\" (
             year    INTEGER NOT NULL,
             revenue REAL    NOT NULL,
             change  REAL    NOT NULL
         );"
    ))?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO \"{table}\" (year, revenue, change) VALUES (?1, ?2, ?3)"
        ))?;
        for r in records {
            count += stmt.execute(rusqlite::params![r.year, r.revenue, r.change])?;
        }
    }
    tx.commit()?;
    debug!("Replaced table {} ({} rows)", table, count);
    Ok(count)
}

fn read_table(conn: &Connection, table: &str) -> Result<Vec<Record>> {
    let mut stmt = conn.prepare(&format!("SELECT year, revenue, change FROM \"{table}\""))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Record {
                year: row.get(0)?,
                revenue: row.get(1)?,
                change: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Summary {
    pub rows: usize,
    pub first_year: Option<u32>,
    pub last_year: Option<u32>,
    pub latest_revenue: Option<f64>,
}

pub fn summarize(store: &Path, table: &str) -> Result<Summary> {
    let table = checked_table_name(table)?;
    let conn = connect(store)?;
    let rows: usize =
        conn.query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |r| r.get(0))?;
    let (first_year, last_year): (Option<u32>, Option<u32>) = conn.query_row(
        &format!("SELECT MIN(year), MAX(year) FROM \"{table}\" WHERE year > 0"),
        [],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    let latest_revenue: Option<f64> = conn.query_row(
        &format!("SELECT MAX(revenue) FROM \"{table}\" WHERE year = (SELECT MAX(year) FROM \"{table}\")"),
        [],
        |r| r.get(0),
    )?;
    Ok(Summary {
        rows,
        first_year,
        last_year,
        latest_revenue,
    })
}

use crate::error::{PipelineError, Result};
use crate::schema;
use crate::table::{Table, Value};
use csv::ReaderBuilder;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Query run against the relational source when none is configured.
pub const DEFAULT_QUERY: &str = r#"SELECT * FROM "CIN_2009-2019""#;

/// Anything that can hand back the raw wide CIN table in one call.
///
/// Implementations acquire whatever connection they need inside `fetch` and
/// release it before returning.
pub trait TableSource {
    /// Short label used in logs and error messages.
    fn describe(&self) -> String;

    fn fetch(&self) -> Result<Table>;
}

/// A delimited export of the CIN table.
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvSource { path: path.into() }
    }
}

impl TableSource for CsvSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn fetch(&self) -> Result<Table> {
        let mut rdr = ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| PipelineError::unavailable(self.describe(), e))?;
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let width = headers.len();
        let mut table = Table::new(headers);
        for result in rdr.records() {
            let record = result?;
            if record.len() != width {
                return Err(PipelineError::RowWidth {
                    line: record.position().map_or(0, |p| p.line()),
                    expected: width,
                    found: record.len(),
                });
            }
            table.push_row(record.iter().map(text_cell).collect());
        }
        Ok(table)
    }
}

/// A SQLite database holding the CIN table; one query, read-only.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    pub path: PathBuf,
    pub query: String,
}

impl SqliteSource {
    pub fn new(path: impl Into<PathBuf>, query: impl Into<String>) -> Self {
        SqliteSource {
            path: path.into(),
            query: query.into(),
        }
    }
}

impl TableSource for SqliteSource {
    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    fn fetch(&self) -> Result<Table> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| PipelineError::unavailable(self.describe(), e))?;
        let table = read_query(&conn, &self.query)?;
        conn.close()
            .map_err(|(_, e)| PipelineError::unavailable(self.describe(), e))?;
        Ok(table)
    }
}

fn read_query(conn: &Connection, sql: &str) -> Result<Table> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();
    let mut table = Table::new(columns);
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            cells.push(match row.get_ref(i)? {
                ValueRef::Null | ValueRef::Blob(_) => Value::Missing,
                ValueRef::Integer(n) => Value::Number(n as f64),
                ValueRef::Real(f) => Value::Number(f),
                ValueRef::Text(bytes) => text_cell(&String::from_utf8_lossy(bytes)),
            });
        }
        table.push_row(cells);
    }
    Ok(table)
}

/// Empty fields are NULLs in the export.
fn text_cell(raw: &str) -> Value {
    let s = raw.trim();
    if s.is_empty() {
        Value::Missing
    } else {
        Value::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            retries: 1,
            delay: Duration::from_millis(500),
        }
    }
}

/// Fetch the raw table and check it has every expected column.
///
/// Only connectivity failures are retried, at most `policy.retries` times.
pub fn load(source: &dyn TableSource, policy: RetryPolicy) -> Result<Table> {
    let mut attempt = 0u32;
    let table = loop {
        match source.fetch() {
            Ok(t) => break t,
            Err(e) if e.is_connectivity() && attempt < policy.retries => {
                attempt += 1;
                warn!(source = %source.describe(), attempt, error = %e, "fetch failed; retrying");
                thread::sleep(policy.delay);
            }
            Err(e) => return Err(e),
        }
    };
    schema::validate(&table)?;
    info!(
        source = %source.describe(),
        rows = table.len(),
        columns = table.columns().len(),
        "raw table loaded"
    );
    Ok(table)
}

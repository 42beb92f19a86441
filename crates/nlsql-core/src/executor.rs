use crate::model::ExecutionOutcome;
use rusqlite::types::ValueRef;
use rusqlite::{Batch, Connection};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ONE_STATEMENT_ONLY: &str = "You can only execute one statement at a time.";

/// Runs one statement per call against a SQLite file.
///
/// Each call opens its own connection and closes it before returning, so no
/// transaction state survives between statements. Engine errors come back
/// as [`ExecutionOutcome::Failure`] with the engine's text untouched.
#[derive(Debug, Clone)]
pub struct StatementExecutor {
    db_path: PathBuf,
    busy_timeout: Duration,
}

impl StatementExecutor {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_busy_timeout(mut self, t: Duration) -> Self {
        self.busy_timeout = t;
        self
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn execute(&self, sql: &str) -> ExecutionOutcome {
        let sql = strip_terminator(sql);
        if sql.is_empty() {
            return ExecutionOutcome::Failure {
                message: "empty statement".to_string(),
            };
        }

        match self.run(sql) {
            Ok(outcome) => {
                match &outcome {
                    ExecutionOutcome::Rows { columns, rows } => tracing::debug!(
                        event = "executor.rows",
                        columns = columns.len() as u64,
                        rows = rows.len() as u64,
                    ),
                    ExecutionOutcome::Effect { rows_affected } => {
                        tracing::debug!(event = "executor.effect", rows_affected = *rows_affected as u64)
                    }
                    ExecutionOutcome::Failure { message } => {
                        tracing::debug!(event = "executor.rejected", sql = %sql, error = %message)
                    }
                }
                outcome
            }
            Err(e) => {
                let message = e.to_string();
                tracing::debug!(event = "executor.failure", sql = %sql, error = %message);
                ExecutionOutcome::Failure { message }
            }
        }
    }

    fn run(&self, sql: &str) -> rusqlite::Result<ExecutionOutcome> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(self.busy_timeout)?;

        let outcome = {
            // Nothing runs until the tail is known to be empty.
            let mut batch = Batch::new(&conn, sql);
            let Some(mut stmt) = batch.next()? else {
                return Ok(ExecutionOutcome::Failure {
                    message: "empty statement".to_string(),
                });
            };
            if !matches!(batch.next(), Ok(None)) {
                return Ok(ExecutionOutcome::Failure {
                    message: ONE_STATEMENT_ONLY.to_string(),
                });
            }
            if stmt.column_count() > 0 {
                let columns: Vec<String> =
                    stmt.column_names().into_iter().map(String::from).collect();
                let width = columns.len();
                let mut rows = Vec::new();
                let mut cursor = stmt.query([])?;
                while let Some(row) = cursor.next()? {
                    let mut values = Vec::with_capacity(width);
                    for i in 0..width {
                        values.push(to_json(row.get_ref(i)?));
                    }
                    rows.push(values);
                }
                ExecutionOutcome::Rows { columns, rows }
            } else {
                let rows_affected = stmt.execute([])?;
                ExecutionOutcome::Effect { rows_affected }
            }
        };

        // A statement may have opened a transaction; never leave it pending.
        if !conn.is_autocommit() {
            conn.execute_batch("COMMIT")?;
        }
        conn.close().map_err(|(_, e)| e)?;
        Ok(outcome)
    }
}

/// Trim, then drop at most one trailing `;`.
fn strip_terminator(sql: &str) -> &str {
    let sql = sql.trim();
    sql.strip_suffix(';').unwrap_or(sql).trim_end()
}

fn to_json(v: ValueRef<'_>) -> serde_json::Value {
    match v {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(t) => serde_json::Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => serde_json::Value::String(hex::encode(b)),
    }
}

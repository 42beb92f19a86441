//! Schema description handed to the model, plus read-only introspection
//! used by the schema viewer and `SchemaDescriptor::from_tables`.

use anyhow::Context;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

const PREAMBLE: &str = "You are an expert SQL assistant for a SQLite database.";

const GENERATION_RULES: &str = "\
Instructions:
- Your job is to convert the user's natural language request into ONE valid SQL statement.
- The SQL must be compatible with SQLite.
- You MAY generate:
  - SELECT statements (to read data)
  - INSERT, UPDATE, DELETE (to modify data)
  - CREATE TABLE and ALTER TABLE (to change schema)
- Prefer single-statement queries (no multiple statements separated by semicolons).
- Use existing tables and columns unless the user clearly asks you to create/alter them.
- Be careful with destructive operations like DROP TABLE or DELETE; only use them if the user explicitly asks.
- Do NOT include explanations, comments, or extra text.
- Do NOT wrap the SQL in markdown or ``` fences.
- Output ONLY the raw SQL statement as plain text.";

const STUDENTS_TABLE: &str = "\
Current database details:
- There is one main table named 'students'.

Table: students
Columns:
- id (INTEGER, primary key)
- name (TEXT): student name
- dept (TEXT): department, e.g., 'CSE', 'ECE', 'EEE', 'IT', 'MECH'
- year (INTEGER): year of study, 1 to 4
- city (TEXT): city name, e.g., 'Chennai', 'Coimbatore', 'Madurai'
- cgpa (REAL): CGPA out of 10";

/// Immutable text describing the database layout and the generation rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    text: String,
}

impl SchemaDescriptor {
    /// Built-in description of the sample `students` table.
    pub fn students() -> Self {
        Self::compose(STUDENTS_TABLE)
    }

    /// Use `text` verbatim; the caller owns the rules it contains.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read schema description {}", path.display()))?;
        if text.trim().is_empty() {
            anyhow::bail!("schema description {} is empty", path.display());
        }
        Ok(Self::from_text(text))
    }

    /// Describe an introspected layout, followed by the standard rules.
    pub fn from_tables(tables: &[TableInfo]) -> Self {
        let mut body = String::from("Current database details:\n");
        if tables.is_empty() {
            body.push_str("- The database has no tables yet.\n");
        }
        for t in tables {
            let _ = write!(body, "\nTable: {}\nColumns:\n", t.name);
            for c in &t.columns {
                let ty = if c.ty.is_empty() { "ANY" } else { c.ty.as_str() };
                if c.pk {
                    let _ = writeln!(body, "- {} ({}, primary key)", c.name, ty);
                } else {
                    let _ = writeln!(body, "- {} ({})", c.name, ty);
                }
            }
        }
        Self::compose(body.trim_end())
    }

    pub fn introspect(db_path: &Path) -> anyhow::Result<Self> {
        let tables = describe_database(db_path)?;
        Ok(Self::from_tables(&tables))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn compose(tables: &str) -> Self {
        Self {
            text: format!("{}\n\n{}\n\n{}\n", PREAMBLE, tables, GENERATION_RULES),
        }
    }
}

impl Default for SchemaDescriptor {
    fn default() -> Self {
        Self::students()
    }
}

impl std::fmt::Display for SchemaDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub pk: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

fn open_read_only(db_path: &Path) -> anyhow::Result<Connection> {
    Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("failed to open sqlite db {}", db_path.display()))
}

/// Table names in `sqlite_master` order. A missing or unreadable database
/// yields an empty list.
pub fn list_tables(db_path: &Path) -> Vec<String> {
    match try_list_tables(db_path) {
        Ok(t) => t,
        Err(e) => {
            tracing::debug!(event = "schema.list_tables_failed", error = %e);
            Vec::new()
        }
    }
}

fn try_list_tables(db_path: &Path) -> anyhow::Result<Vec<String>> {
    let conn = open_read_only(db_path)?;
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table'")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

/// Columns of `table` (name, declared type, primary key flag). Unknown
/// tables and unreadable databases yield an empty list.
pub fn table_columns(db_path: &Path, table: &str) -> Vec<ColumnInfo> {
    match open_read_only(db_path).and_then(|conn| columns_of(&conn, table)) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(event = "schema.table_info_failed", table = %table, error = %e);
            Vec::new()
        }
    }
}

fn columns_of(conn: &Connection, table: &str) -> anyhow::Result<Vec<ColumnInfo>> {
    let sql = format!("PRAGMA table_info({})", quote_ident(table));
    let mut stmt = conn.prepare(&sql)?;
    let cols = stmt
        .query_map([], |row| {
            Ok(ColumnInfo {
                name: row.get(1)?,
                ty: row.get(2)?,
                pk: row.get::<_, i64>(5)? != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cols)
}

/// Every table with its columns, skipping sqlite's internal tables.
pub fn describe_database(db_path: &Path) -> anyhow::Result<Vec<TableInfo>> {
    let conn = open_read_only(db_path)?;
    let mut out = Vec::new();
    for name in try_list_tables(db_path)? {
        if name.starts_with("sqlite_") {
            continue;
        }
        let columns = columns_of(&conn, &name)?;
        out.push(TableInfo { name, columns });
    }
    Ok(out)
}

fn quote_ident(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

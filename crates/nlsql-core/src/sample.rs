use anyhow::Context;
use rusqlite::{params, Connection};
use std::path::Path;

pub const STUDENTS_DDL: &str = r#"
DROP TABLE IF EXISTS students;

CREATE TABLE students (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL,
  dept TEXT NOT NULL,
  year INTEGER NOT NULL,
  city TEXT NOT NULL,
  cgpa REAL NOT NULL
);
"#;

pub const STUDENTS: [(&str, &str, i64, &str, f64); 10] = [
    ("Arun Kumar", "CSE", 3, "Chennai", 8.4),
    ("Sanjay", "CSE", 2, "Coimbatore", 9.1),
    ("Priya", "ECE", 4, "Chennai", 7.8),
    ("Divya", "EEE", 1, "Madurai", 8.0),
    ("Rahul", "MECH", 3, "Chennai", 6.9),
    ("Anitha", "CSE", 1, "Salem", 9.3),
    ("Vignesh", "ECE", 2, "Coimbatore", 7.5),
    ("Karthik", "CSE", 4, "Chennai", 8.9),
    ("Meena", "IT", 3, "Trichy", 8.2),
    ("Harini", "IT", 2, "Chennai", 9.0),
];

/// (Re)create the sample `students` table. Returns the number of rows seeded.
pub fn seed_students(path: &Path) -> anyhow::Result<usize> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let mut conn = Connection::open(path).context("failed to open sqlite db")?;
    let tx = conn.transaction()?;
    tx.execute_batch(STUDENTS_DDL)?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO students (name, dept, year, city, cgpa) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for (name, dept, year, city, cgpa) in STUDENTS {
            stmt.execute(params![name, dept, year, city, cgpa])?;
        }
    }
    tx.commit()?;
    tracing::info!(event = "sample.seeded", db = %path.display(), rows = STUDENTS.len() as u64);
    Ok(STUDENTS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reseeding_replaces_rows() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let db = dir.path().join("nested").join("students.db");
        assert_eq!(seed_students(&db)?, 10);
        assert_eq!(seed_students(&db)?, 10);

        let conn = Connection::open(&db)?;
        let count: i64 = conn.query_row("SELECT count(*) FROM students", [], |r| r.get(0))?;
        assert_eq!(count, 10);
        let first_id: i64 = conn.query_row("SELECT min(id) FROM students", [], |r| r.get(0))?;
        assert!(first_id >= 1);
        Ok(())
    }
}

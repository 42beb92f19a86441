use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn nlsql(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("nlsql").unwrap();
    cmd.current_dir(dir)
        .env_remove("NLSQL_CONFIG")
        .env_remove("NLSQL_DB")
        .env_remove("NLSQL_PROVIDER")
        .env_remove("NLSQL_MODEL")
        .env_remove("NLSQL_TIMEOUT_SECS")
        .env("NLSQL_LOG", "error");
    cmd
}

/// Config using the fake provider with the given scripted completions.
fn fake_config(dir: &Path, responses: &[&str]) {
    let list: Vec<String> = responses
        .iter()
        .map(|r| serde_json::to_string(r).unwrap())
        .collect();
    fs::write(
        dir.join("nlsql.yaml"),
        format!(
            "version: 1\ndatabase: students.db\nprovider:\n  kind: fake\n  responses: [{}]\nhistory: history.jsonl\n",
            list.join(", ")
        ),
    )
    .unwrap();
}

fn seeded(responses: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fake_config(dir.path(), responses);
    nlsql(dir.path())
        .arg("init-db")
        .assert()
        .success()
        .stdout(contains("created with sample data (10 rows)"));
    dir
}

#[test]
fn exec_runs_statement_without_model() {
    let dir = seeded(&[]);
    nlsql(dir.path())
        .args(["exec", "SELECT count(*) AS n FROM students;"])
        .assert()
        .success()
        .stdout(contains("n").and(contains("10")));
}

#[test]
fn exec_failure_exits_one_with_engine_message() {
    let dir = seeded(&[]);
    nlsql(dir.path())
        .args(["exec", "SELECT nickname FROM students"])
        .assert()
        .code(1)
        .stdout(contains("no such column: nickname"));
}

#[test]
fn ask_prints_generated_sql_and_rows() {
    let dir = seeded(&["```sql\nSELECT name, city FROM students WHERE cgpa > 9;\n```"]);
    nlsql(dir.path())
        .args(["ask", "students", "with", "cgpa", "above", "9"])
        .assert()
        .success()
        .stdout(
            contains("Generated SQL:\n  SELECT name, city FROM students WHERE cgpa > 9")
                .and(contains("Sanjay"))
                .and(contains("Anitha"))
                .and(contains("(2 rows)")),
        );

    let history = fs::read_to_string(dir.path().join("history.jsonl")).unwrap();
    assert_eq!(history.lines().count(), 2);
    assert!(history.contains("students with cgpa above 9"));
}

#[test]
fn ask_json_reports_repair() {
    let dir = seeded(&["SELECT nme FROM students", "SELECT name FROM students"]);
    let out = nlsql(dir.path())
        .args(["--format", "json", "ask", "all names"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["outcome"], "rows");
    assert_eq!(v["candidate"]["sql"], "SELECT name FROM students");
    assert_eq!(v["candidate"]["provenance"]["source"], "repaired");
    assert_eq!(v["rows"].as_array().unwrap().len(), 10);
}

#[test]
fn ask_double_failure_exits_one() {
    let dir = seeded(&["SELECT a FROM students", "SELECT b FROM students"]);
    nlsql(dir.path())
        .args(["ask", "something odd"])
        .assert()
        .code(1)
        .stdout(contains("Database error even after fix: no such column: b"));
}

#[test]
fn ask_rejects_prose() {
    let dir = seeded(&["Sure! Which students?"]);
    nlsql(dir.path())
        .args(["ask", "show students"])
        .assert()
        .code(1)
        .stdout(contains("Could not generate SQL"));
}

#[test]
fn chat_handles_lines_in_order() {
    let dir = seeded(&[
        "SELECT count(*) FROM students WHERE dept = 'IT'",
        "DELETE FROM students WHERE cgpa < 5",
    ]);
    nlsql(dir.path())
        .arg("chat")
        .write_stdin("how many IT students\n\ndelete students with cgpa below 5\n:history\n:quit\n")
        .assert()
        .success()
        .stdout(
            contains("count(*)\n--------\n2\n(1 row)\n")
                .and(contains("(0 rows affected)"))
                .and(contains("you: delete students with cgpa below 5")),
        );
}

#[test]
fn schema_lists_students_table() {
    let dir = seeded(&[]);
    nlsql(dir.path())
        .arg("schema")
        .assert()
        .success()
        .stdout(contains("Table: students").and(contains("cgpa")));

    let out = nlsql(dir.path())
        .args(["--format", "json", "schema", "--table", "students"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v[0]["columns"].as_array().unwrap().len(), 6);
    assert_eq!(v[0]["columns"][0]["pk"], true);
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    nlsql(dir.path()).arg("init").assert().success();
    assert!(dir.path().join("nlsql.yaml").exists());
    nlsql(dir.path()).arg("init").assert().code(2);
    nlsql(dir.path()).args(["init", "--force"]).assert().success();
}

#[test]
fn strict_mode_rejects_unknown_keys() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("nlsql.yaml"), "version: 1\ntables: []\n").unwrap();
    nlsql(dir.path())
        .args(["--strict", "schema"])
        .assert()
        .code(2)
        .stderr(contains("Unknown fields"));
    nlsql(dir.path()).arg("schema").assert().success();
}

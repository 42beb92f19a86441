use crate::errors::{ExecutionFailure, RepairExhausted};
use crate::model::{Candidate, ExecutionOutcome, InteractionResult, Provenance};
use crate::schema::TableInfo;
use std::fmt::Write as _;

pub fn render_interaction(result: &InteractionResult) -> String {
    let mut s = String::new();
    match result {
        InteractionResult::GenerationFailed { error } => {
            let _ = writeln!(s, "❌ Could not generate SQL: {}", error);
        }
        InteractionResult::Rows {
            candidate,
            columns,
            rows,
        } => {
            push_candidate(&mut s, candidate);
            let after = after_fix(candidate);
            if rows.is_empty() {
                let _ = writeln!(s, "No rows found for this query{}.", after);
            } else {
                s.push_str(&render_table(columns, rows));
                let _ = writeln!(
                    s,
                    "({} row{}{})",
                    rows.len(),
                    if rows.len() == 1 { "" } else { "s" },
                    after
                );
            }
        }
        InteractionResult::Effect {
            candidate,
            rows_affected,
        } => {
            push_candidate(&mut s, candidate);
            let _ = writeln!(
                s,
                "✅ Command executed successfully{} ({} row{} affected).",
                after_fix(candidate),
                rows_affected,
                if *rows_affected == 1 { "" } else { "s" }
            );
        }
        InteractionResult::Exhausted { failure } => match failure {
            RepairExhausted::RepairRejected { original, repair } => {
                push_failure(&mut s, original);
                let _ = writeln!(s, "❌ Could not repair SQL: {}", repair);
            }
            RepairExhausted::FailedAfterRepair { original, after } => {
                push_failure(&mut s, original);
                push_sql(&mut s, "Fixed SQL", &after.sql);
                let _ = writeln!(s, "❌ Database error even after fix: {}", after.message);
            }
        },
    }
    s
}

pub fn render_outcome(sql: &str, outcome: &ExecutionOutcome) -> String {
    let mut s = String::new();
    push_sql(&mut s, "SQL", sql);
    match outcome {
        ExecutionOutcome::Rows { rows, .. } if rows.is_empty() => {
            s.push_str("No rows found for this query.\n");
        }
        ExecutionOutcome::Rows { columns, rows } => s.push_str(&render_table(columns, rows)),
        ExecutionOutcome::Effect { rows_affected } => {
            let _ = writeln!(
                s,
                "✅ Command executed successfully ({} row{} affected).",
                rows_affected,
                if *rows_affected == 1 { "" } else { "s" }
            );
        }
        ExecutionOutcome::Failure { message } => {
            let _ = writeln!(s, "❌ Database error: {}", message);
        }
    }
    s
}

pub fn render_schema(tables: &[TableInfo]) -> String {
    if tables.is_empty() {
        return "No tables found. Run `nlsql init-db` to create the sample database.\n".into();
    }
    let mut s = String::new();
    for t in tables {
        let _ = writeln!(s, "Table: {}", t.name);
        let rows: Vec<Vec<serde_json::Value>> = t
            .columns
            .iter()
            .map(|c| {
                vec![
                    c.name.clone().into(),
                    c.ty.clone().into(),
                    serde_json::Value::from(if c.pk { "yes" } else { "" }),
                ]
            })
            .collect();
        s.push_str(&render_table(
            &["name".to_string(), "type".to_string(), "pk".to_string()],
            &rows,
        ));
        s.push('\n');
    }
    s
}

/// Left-aligned text table with a dashed header rule.
pub fn render_table(columns: &[String], rows: &[Vec<serde_json::Value>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| r.iter().map(cell_text).collect())
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for r in &cells {
        for (i, c) in r.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(c.chars().count());
            }
        }
    }

    let line = |vals: &[String]| -> String {
        let padded: Vec<String> = vals
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect();
        format!("{}\n", padded.join(" | ").trim_end())
    };

    let mut s = line(columns);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    s.push_str(&format!("{}\n", rule.join("-+-")));
    for r in &cells {
        s.push_str(&line(r.as_slice()));
    }
    s
}

fn cell_text(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => "NULL".into(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn after_fix(c: &Candidate) -> &'static str {
    if c.is_repaired() {
        " (after fix)"
    } else {
        ""
    }
}

fn push_sql(s: &mut String, label: &str, sql: &str) {
    let _ = writeln!(s, "{}:", label);
    for l in sql.lines() {
        let _ = writeln!(s, "  {}", l);
    }
}

fn push_failure(s: &mut String, f: &ExecutionFailure) {
    push_sql(s, "Generated SQL", &f.sql);
    let _ = writeln!(s, "⚠️  Database error: {}", f.message);
}

fn push_candidate(s: &mut String, c: &Candidate) {
    match &c.provenance {
        Provenance::Original => push_sql(s, "Generated SQL", &c.sql),
        Provenance::Repaired { failure } => {
            push_failure(s, failure);
            push_sql(s, "Fixed SQL", &c.sql);
        }
    }
}

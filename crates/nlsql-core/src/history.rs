use crate::model::InteractionResult;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// Append-only conversation log owned by the front end. The pipeline never
/// reads it.
#[derive(Default)]
pub struct InteractionLog {
    entries: Vec<LogEntry>,
    sink: Option<File>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log that also appends every entry as a JSON line to `path`.
    pub fn with_file(path: &Path) -> anyhow::Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let sink = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open history file {}", path.display()))?;
        Ok(Self {
            entries: Vec::new(),
            sink: Some(sink),
        })
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) -> anyhow::Result<()> {
        let entry = LogEntry {
            role,
            content: content.into(),
            at: Utc::now(),
        };
        if let Some(sink) = self.sink.as_mut() {
            let line = serde_json::to_string(&entry)?;
            writeln!(sink, "{}", line).context("failed to append history entry")?;
        }
        self.entries.push(entry);
        Ok(())
    }

    /// The request followed by the assistant's summary of its result.
    pub fn record(&mut self, request: &str, result: &InteractionResult) -> anyhow::Result<()> {
        self.append(Role::User, request)?;
        self.append(Role::Assistant, result.summary())
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read a JSONL history file back, skipping blank lines.
pub fn load(path: &Path) -> anyhow::Result<Vec<LogEntry>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read history file {}", path.display()))?;
    raw.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| {
            serde_json::from_str(l).map_err(|e| anyhow::anyhow!("line {}: parse error: {}", i + 1, e))
        })
        .collect()
}

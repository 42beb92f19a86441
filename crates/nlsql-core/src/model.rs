use crate::errors::{ExecutionFailure, GenerationError, RepairExhausted};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// Where a candidate statement came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source")]
pub enum Provenance {
    Original,
    /// Produced by the repair cycle after `failure` was reported.
    Repaired { failure: ExecutionFailure },
}

/// A statement that passed shape validation and may be executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub sql: String,
    pub provenance: Provenance,
}

impl Candidate {
    pub fn original(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            provenance: Provenance::Original,
        }
    }

    pub fn repaired(sql: impl Into<String>, failure: ExecutionFailure) -> Self {
        Self {
            sql: sql.into(),
            provenance: Provenance::Repaired { failure },
        }
    }

    pub fn is_repaired(&self) -> bool {
        matches!(self.provenance, Provenance::Repaired { .. })
    }
}

/// What happened when a single statement ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ExecutionOutcome {
    /// The statement described a result set. `rows` may be empty.
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<serde_json::Value>>,
    },
    /// No result set; changes (if any) are committed.
    Effect { rows_affected: usize },
    /// Engine diagnostic, verbatim.
    Failure { message: String },
}

impl ExecutionOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionOutcome::Failure { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    CouldNotGenerate,
    CouldNotRepair,
    CouldNotExecute,
}

/// Caller-facing result of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum InteractionResult {
    GenerationFailed {
        error: GenerationError,
    },
    Rows {
        candidate: Candidate,
        columns: Vec<String>,
        rows: Vec<Vec<serde_json::Value>>,
    },
    Effect {
        candidate: Candidate,
        rows_affected: usize,
    },
    Exhausted {
        failure: RepairExhausted,
    },
}

impl InteractionResult {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            InteractionResult::Rows { .. } | InteractionResult::Effect { .. }
        )
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            InteractionResult::GenerationFailed { .. } => Some(FailureKind::CouldNotGenerate),
            InteractionResult::Exhausted {
                failure: RepairExhausted::RepairRejected { .. },
            } => Some(FailureKind::CouldNotRepair),
            InteractionResult::Exhausted {
                failure: RepairExhausted::FailedAfterRepair { .. },
            } => Some(FailureKind::CouldNotExecute),
            _ => None,
        }
    }

    /// The statement whose outcome this is (the repaired one when repair ran).
    pub fn final_sql(&self) -> Option<&str> {
        match self {
            InteractionResult::GenerationFailed { .. } => None,
            InteractionResult::Rows { candidate, .. }
            | InteractionResult::Effect { candidate, .. } => Some(&candidate.sql),
            InteractionResult::Exhausted { failure } => match failure {
                RepairExhausted::RepairRejected { original, .. } => Some(&original.sql),
                RepairExhausted::FailedAfterRepair { after, .. } => Some(&after.sql),
            },
        }
    }

    /// One-line assistant message for the interaction log.
    pub fn summary(&self) -> String {
        let suffix = |c: &Candidate| if c.is_repaired() { " (after fix)" } else { "" };
        match self {
            InteractionResult::GenerationFailed { error } => format!("❌ {}", error),
            InteractionResult::Rows {
                candidate, rows, ..
            } if rows.is_empty() => format!(
                "✅ Query ran successfully{}, but no rows matched.",
                suffix(candidate)
            ),
            InteractionResult::Rows { candidate, .. } => format!(
                "✅ Query ran successfully{} and returned rows.",
                suffix(candidate)
            ),
            InteractionResult::Effect { candidate, .. } => format!(
                "✅ Command executed successfully on the database{}.",
                suffix(candidate)
            ),
            InteractionResult::Exhausted { failure } => format!("❌ {}", failure),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Configuration could not be loaded or is invalid.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct ConfigError(pub String);

/// The completion service did not yield a usable statement.
///
/// Carries the raw completion where there is one, so an operator can see
/// exactly what the model said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum GenerationError {
    #[error("Please type a question or command.")]
    EmptyRequest,

    #[error("model returned an empty completion")]
    EmptyCompletion { raw: String },

    #[error("model did not return a valid SQL statement. It returned:\n{cleaned}")]
    NotAStatement { raw: String, cleaned: String },

    #[error("error from LLM: {message}")]
    Provider { message: String },

    #[error("LLM did not answer within {}", format_limit(.millis))]
    TimedOut { millis: u64 },
}

fn format_limit(millis: &u64) -> String {
    if *millis >= 1000 && millis % 1000 == 0 {
        format!("{}s", millis / 1000)
    } else {
        format!("{}ms", millis)
    }
}

impl GenerationError {
    /// Raw model text, when the model answered at all.
    pub fn raw_completion(&self) -> Option<&str> {
        match self {
            GenerationError::EmptyCompletion { raw } | GenerationError::NotAStatement { raw, .. } => {
                Some(raw)
            }
            _ => None,
        }
    }

    pub(crate) fn provider(err: anyhow::Error) -> Self {
        GenerationError::Provider {
            message: format!("{:#}", err),
        }
    }
}

/// The database rejected a statement. `message` is the engine's own text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ExecutionFailure {
    pub sql: String,
    pub message: String,
}

/// The single repair cycle did not produce a working statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RepairExhausted {
    /// The model's repair attempt was itself not a statement.
    #[error("DB error: {original}\n\nAnd fix also failed: {repair}")]
    RepairRejected {
        original: ExecutionFailure,
        repair: GenerationError,
    },

    /// The repaired statement failed as well.
    #[error("DB error after fix: {after}")]
    FailedAfterRepair {
        original: ExecutionFailure,
        after: ExecutionFailure,
    },
}

impl RepairExhausted {
    pub fn original(&self) -> &ExecutionFailure {
        match self {
            RepairExhausted::RepairRejected { original, .. }
            | RepairExhausted::FailedAfterRepair { original, .. } => original,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_statement_shows_cleaned_text() {
        let err = GenerationError::NotAStatement {
            raw: "```\nSure thing\n```".into(),
            cleaned: "Sure thing".into(),
        };
        assert!(err.to_string().ends_with("It returned:\nSure thing"));
        assert_eq!(err.raw_completion(), Some("```\nSure thing\n```"));
        assert_eq!(GenerationError::EmptyRequest.raw_completion(), None);
    }

    #[test]
    fn timeout_keeps_sub_second_limits() {
        let short = GenerationError::TimedOut { millis: 250 };
        assert_eq!(short.to_string(), "LLM did not answer within 250ms");
        let long = GenerationError::TimedOut { millis: 120_000 };
        assert_eq!(long.to_string(), "LLM did not answer within 120s");
    }

    #[test]
    fn repair_exhausted_keeps_both_diagnostics() {
        let original = ExecutionFailure {
            sql: "SELECT agee FROM students".into(),
            message: "no such column: agee".into(),
        };
        let after = ExecutionFailure {
            sql: "SELECT age FROM students".into(),
            message: "no such column: age".into(),
        };
        let err = RepairExhausted::FailedAfterRepair {
            original: original.clone(),
            after,
        };
        assert_eq!(err.original(), &original);
        assert_eq!(err.to_string(), "DB error after fix: no such column: age");

        let rejected = RepairExhausted::RepairRejected {
            original,
            repair: GenerationError::EmptyCompletion { raw: String::new() },
        };
        assert!(rejected.to_string().contains("no such column: agee"));
        assert!(rejected.to_string().contains("fix also failed"));
    }
}

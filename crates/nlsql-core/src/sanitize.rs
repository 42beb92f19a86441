//! Turning raw completion text into a single candidate statement.
//!
//! The model is an untrusted producer of strings. The only parsing done
//! here is code-fence extraction and a leading-keyword check; anything
//! deeper is left to the database engine.

use crate::errors::GenerationError;
use serde::{Deserialize, Serialize};

/// Leading keywords accepted by shape validation.
pub const STATEMENT_KEYWORDS: [&str; 8] = [
    "select", "insert", "update", "delete", "create", "alter", "drop", "pragma",
];

/// Keywords that mark a fenced fragment as SQL under `FirstMention`.
const FRAGMENT_KEYWORDS: [&str; 7] = [
    "select", "insert", "update", "delete", "create", "alter", "drop",
];

const FENCE: &str = "```";

const LANGUAGE_TAGS: [&str; 3] = ["sql", "sqlite", "sqlite3"];

/// How to pick the statement out of a completion that contains code fences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FenceStrategy {
    /// First fragment whose first token is a statement keyword.
    #[default]
    LeadingKeyword,
    /// First fragment mentioning a keyword anywhere, even in prose.
    FirstMention,
}

impl FenceStrategy {
    fn accepts(self, fragment: &str) -> bool {
        match self {
            FenceStrategy::LeadingKeyword => first_token(fragment)
                .map(|t| is_statement_keyword(&t))
                .unwrap_or(false),
            FenceStrategy::FirstMention => {
                let lower = fragment.to_lowercase();
                FRAGMENT_KEYWORDS.iter().any(|k| lower.contains(k))
            }
        }
    }
}

pub fn is_statement_keyword(token: &str) -> bool {
    STATEMENT_KEYWORDS.contains(&token)
}

/// First whitespace-delimited token, lower-cased.
pub fn first_token(text: &str) -> Option<String> {
    text.split_whitespace().next().map(str::to_lowercase)
}

/// Drops a leading ```` ```sql ```` style language tag line from a fragment.
fn strip_language_tag(fragment: &str) -> &str {
    let fragment = fragment.trim();
    match fragment.split_once('\n') {
        Some((first, rest)) if LANGUAGE_TAGS.contains(&first.trim().to_lowercase().as_str()) => {
            rest.trim()
        }
        None if LANGUAGE_TAGS.contains(&fragment.to_lowercase().as_str()) => "",
        _ => fragment,
    }
}

/// Fence extraction plus removal of one trailing `;`. Never fails; the
/// result may be empty or prose.
pub fn clean_completion(raw: &str, strategy: FenceStrategy) -> String {
    let mut text = raw.trim();

    if text.contains(FENCE) {
        if let Some(fragment) = text
            .split(FENCE)
            .map(strip_language_tag)
            .find(|f| strategy.accepts(f))
        {
            text = fragment;
        }
    }

    let sql = text.trim();
    let sql = sql.strip_suffix(';').map(str::trim_end).unwrap_or(sql);
    sql.to_string()
}

/// Clean `raw` and check its shape. Errors carry the raw text.
pub fn extract_statement(raw: &str, strategy: FenceStrategy) -> Result<String, GenerationError> {
    let cleaned = clean_completion(raw, strategy);
    if cleaned.is_empty() {
        return Err(GenerationError::EmptyCompletion {
            raw: raw.to_string(),
        });
    }

    match first_token(&cleaned) {
        Some(t) if is_statement_keyword(&t) => Ok(cleaned),
        _ => Err(GenerationError::NotAStatement {
            raw: raw.to_string(),
            cleaned,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LK: FenceStrategy = FenceStrategy::LeadingKeyword;
    const FM: FenceStrategy = FenceStrategy::FirstMention;

    #[test]
    fn plain_statement_passes_through() {
        assert_eq!(
            extract_statement("  SELECT * FROM students;\n", LK).unwrap(),
            "SELECT * FROM students"
        );
    }

    #[test]
    fn only_one_terminator_is_removed() {
        assert_eq!(clean_completion("SELECT 1;;", LK), "SELECT 1;");
    }

    #[test]
    fn fenced_fragment_is_extracted_with_language_tag() {
        let raw = "```sql\nSELECT name FROM students WHERE city = 'Chennai';\n```";
        for s in [LK, FM] {
            assert_eq!(
                extract_statement(raw, s).unwrap(),
                "SELECT name FROM students WHERE city = 'Chennai'"
            );
        }
    }

    #[test]
    fn fenced_fragment_without_tag() {
        let raw = "Here you go:\n```\nDELETE FROM students WHERE cgpa < 5\n```\nDone.";
        assert_eq!(
            extract_statement(raw, LK).unwrap(),
            "DELETE FROM students WHERE cgpa < 5"
        );
    }

    #[test]
    fn first_mention_can_pick_prose() {
        let raw = "I'll select every student:\n```sql\nSELECT * FROM students\n```";
        assert_eq!(
            extract_statement(raw, LK).unwrap(),
            "SELECT * FROM students"
        );
        let err = extract_statement(raw, FM).unwrap_err();
        assert!(matches!(err, GenerationError::NotAStatement { ref cleaned, .. }
            if cleaned == "I'll select every student:"));
    }

    #[test]
    fn pragma_is_valid_but_not_a_fence_marker() {
        assert_eq!(
            extract_statement("PRAGMA table_info(students)", LK).unwrap(),
            "PRAGMA table_info(students)"
        );
        // FirstMention ignores a pragma-only fragment, so the fences stay.
        let raw = "```\nPRAGMA table_info(students)\n```";
        assert!(extract_statement(raw, FM).is_err());
        assert_eq!(
            extract_statement(raw, LK).unwrap(),
            "PRAGMA table_info(students)"
        );
    }

    #[test]
    fn prose_is_rejected_with_raw_text() {
        let raw = "Sorry, I cannot help with that.";
        let err = extract_statement(raw, LK).unwrap_err();
        assert_eq!(err.raw_completion(), Some(raw));
    }

    #[test]
    fn empty_completion_is_rejected() {
        for raw in ["", "   ", ";", "```sql\n```"] {
            let err = extract_statement(raw, LK).unwrap_err();
            assert!(
                matches!(err, GenerationError::EmptyCompletion { .. } | GenerationError::NotAStatement { .. }),
                "{raw:?}"
            );
        }
        assert!(matches!(
            extract_statement(" ; ", LK),
            Err(GenerationError::EmptyCompletion { .. })
        ));
    }

    #[test]
    fn keyword_check_is_case_insensitive_on_first_token() {
        assert!(extract_statement("Update students SET year = 2", LK).is_ok());
        assert!(extract_statement("WITH t AS (SELECT 1) SELECT * FROM t", LK).is_err());
        assert!(extract_statement("SELECT*FROM students", LK).is_err());
    }
}

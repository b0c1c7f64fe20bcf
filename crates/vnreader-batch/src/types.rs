//! Batch task and result types

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vnreader_core::SentenceField;

use crate::control::BatchState;
use crate::error::ParseActionError;

/// AI transformation applied to each selected sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Generate an annotated reading
    Reading,
    /// Translate
    Meaning,
    /// Explain
    Memo,
    /// Check the existing reading
    Verification,
}

impl ActionKind {
    /// Sentence field written when a result is applied
    pub fn target_field(&self) -> SentenceField {
        match self {
            ActionKind::Reading | ActionKind::Verification => SentenceField::Reading,
            ActionKind::Meaning => SentenceField::Meaning,
            ActionKind::Memo => SentenceField::Memo,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ActionKind::Reading => "Reading",
            ActionKind::Meaning => "Translation",
            ActionKind::Memo => "Explanation",
            ActionKind::Verification => "Reading check",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Reading => write!(f, "reading"),
            ActionKind::Meaning => write!(f, "meaning"),
            ActionKind::Memo => write!(f, "memo"),
            ActionKind::Verification => write!(f, "verification"),
        }
    }
}

impl FromStr for ActionKind {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reading" | "furigana" => Ok(ActionKind::Reading),
            "meaning" | "translation" => Ok(ActionKind::Meaning),
            "memo" | "explanation" => Ok(ActionKind::Memo),
            "verification" | "verify" => Ok(ActionKind::Verification),
            _ => Err(ParseActionError(s.to_string())),
        }
    }
}

/// What to run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Selected sentence indices, any order
    pub indices: Vec<usize>,
    pub action: ActionKind,
}

impl BatchRequest {
    pub fn new(indices: impl IntoIterator<Item = usize>, action: ActionKind) -> Self {
        Self {
            indices: indices.into_iter().collect(),
            action,
        }
    }
}

/// One scheduled unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTask {
    pub sentence_index: usize,
    /// Identifier of the sentence at that index when the batch started
    pub sentence_id: Option<Uuid>,
    pub action: ActionKind,
}

/// How a verification result relates to the existing reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Existing reading judged correct
    Confirmed,
    /// Model proposed a different reading
    Corrected,
}

/// Outcome of one completed task, pending review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResultEntry {
    pub sentence_index: usize,
    pub sentence_id: Uuid,
    /// Sentence text, for review
    pub expression: String,
    /// Target field value when the task started
    pub original: String,
    pub produced_value: String,
    pub action: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    /// Whether apply will write this entry
    pub selected: bool,
}

impl BatchResultEntry {
    /// Whether applying would change the field
    pub fn changes_field(&self) -> bool {
        self.original != self.produced_value
    }
}

/// Why a task produced no entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Index no longer refers to a sentence
    MissingSentence,
    /// Verification requested but the sentence has no reading
    NoExistingReading,
    /// Model returned nothing usable
    EmptyResult,
    /// Verification neither confirmed nor corrected the reading
    Inconclusive,
}

/// Per-task outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// A result entry was added
    Produced,
    Skipped(SkipReason),
    /// The AI call failed
    Failed(String),
}

/// Outcome record for one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub sentence_index: usize,
    pub outcome: TaskOutcome,
}

/// Progress reported before each task starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProgress {
    /// 1-based position of the task about to start
    pub current: usize,
    pub total: usize,
    pub action: ActionKind,
}

impl BatchProgress {
    /// Tasks already finished when this report was made
    pub fn finished(&self) -> usize {
        self.current.saturating_sub(1)
    }
}

/// Everything a finished run hands back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// `Completed` or `Cancelled`
    pub state: BatchState,
    pub action: ActionKind,
    /// Tasks queued at start
    pub total: usize,
    /// Result entries in ascending index order
    pub entries: Vec<BatchResultEntry>,
    /// One record per task actually started
    pub records: Vec<TaskRecord>,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.records.len()
    }

    pub fn failed(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, TaskOutcome::Failed(_)))
            .count()
    }

    pub fn was_cancelled(&self) -> bool {
        self.state == BatchState::Cancelled
    }

    /// No usable result was produced
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_fields() {
        assert_eq!(ActionKind::Reading.target_field(), SentenceField::Reading);
        assert_eq!(ActionKind::Verification.target_field(), SentenceField::Reading);
        assert_eq!(ActionKind::Meaning.target_field(), SentenceField::Meaning);
        assert_eq!(ActionKind::Memo.target_field(), SentenceField::Memo);
    }

    #[test]
    fn test_parse_action() {
        assert_eq!("Reading".parse::<ActionKind>().unwrap(), ActionKind::Reading);
        assert_eq!("verify".parse::<ActionKind>().unwrap(), ActionKind::Verification);
        assert_eq!("translation".parse::<ActionKind>().unwrap(), ActionKind::Meaning);
        assert!("summary".parse::<ActionKind>().is_err());
    }

    #[test]
    fn test_progress_finished_count() {
        let progress = |current| BatchProgress {
            current,
            total: 3,
            action: ActionKind::Reading,
        };
        assert_eq!(progress(1).finished(), 0);
        assert_eq!(progress(3).finished(), 2);
        assert_eq!(progress(0).finished(), 0);
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&TaskOutcome::Skipped(SkipReason::EmptyResult)).unwrap();
        assert_eq!(json, r#"{"status":"skipped","detail":"empty_result"}"#);
    }
}

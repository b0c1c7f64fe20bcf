//! Sequential batch runner
//!
//! Tasks run one at a time in ascending sentence order. Each AI call is
//! awaited before the next task starts; a failing task never aborts the
//! batch, it just leaves no result entry.

use std::collections::{BTreeSet, VecDeque};
use std::time::Duration;

use tracing::{debug, info, warn};
use vnreader_core::{Sentence, SentenceStore};
use vnreader_llm::{LlmError, ReadingAssistant, SentenceRequest, Verification};

use crate::control::{BatchControl, BatchState};
use crate::error::BatchError;
use crate::types::{
    ActionKind, BatchProgress, BatchReport, BatchRequest, BatchResultEntry, BatchTask,
    SkipReason, TaskOutcome, TaskRecord, Verdict,
};

/// Runner settings
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// How often a paused runner checks for resume or cancel
    pub pause_poll_interval: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            pause_poll_interval: Duration::from_millis(100),
        }
    }
}

/// Batch AI task runner
pub struct BatchRunner<A> {
    assistant: A,
    config: RunnerConfig,
    control: BatchControl,
}

impl<A: ReadingAssistant> BatchRunner<A> {
    /// Create a runner with default settings
    pub fn new(assistant: A) -> Self {
        Self::with_config(assistant, RunnerConfig::default())
    }

    pub fn with_config(assistant: A, config: RunnerConfig) -> Self {
        Self {
            assistant,
            config,
            control: BatchControl::new(),
        }
    }

    /// Use an existing control handle
    pub fn with_control(mut self, control: BatchControl) -> Self {
        self.control = control;
        self
    }

    /// Handle for pausing, resuming and cancelling
    pub fn control(&self) -> BatchControl {
        self.control.clone()
    }

    pub fn assistant(&self) -> &A {
        &self.assistant
    }

    /// Run a batch to completion or cancellation.
    ///
    /// Refuses up front, before any task, when nothing is selected, no
    /// credential is configured or another batch is active. `progress` is
    /// called before each task starts.
    pub async fn run<S, F>(
        &self,
        store: &S,
        request: BatchRequest,
        progress: F,
    ) -> Result<BatchReport, BatchError>
    where
        S: SentenceStore + ?Sized,
        F: Fn(BatchProgress),
    {
        if request.indices.is_empty() {
            return Err(BatchError::EmptySelection);
        }
        if !self.assistant.is_configured() {
            warn!("Batch refused: no API credential configured");
            return Err(BatchError::MissingCredential);
        }
        self.control.begin()?;

        let mut queue = build_queue(store, &request);
        let total = queue.len();
        let action = request.action;

        info!("Starting {} batch over {} sentences", action, total);

        let mut entries = Vec::new();
        let mut records = Vec::with_capacity(total);

        let final_state = loop {
            self.wait_while_paused().await;

            if self.control.is_cancelled() {
                info!(
                    "Batch cancelled after {} of {} tasks",
                    records.len(),
                    total
                );
                break BatchState::Cancelled;
            }

            let Some(task) = queue.pop_front() else {
                break BatchState::Completed;
            };

            progress(BatchProgress {
                current: total - queue.len(),
                total,
                action,
            });

            let (outcome, entry) = self.execute(store, &task).await;
            debug!("Task for sentence {}: {:?}", task.sentence_index, outcome);

            if let Some(entry) = entry {
                entries.push(entry);
            }
            records.push(TaskRecord {
                sentence_index: task.sentence_index,
                outcome,
            });
        };

        self.control.finish(final_state);

        info!(
            "Batch finished ({:?}): {} results from {} tasks",
            final_state,
            entries.len(),
            records.len()
        );

        Ok(BatchReport {
            state: final_state,
            action,
            total,
            entries,
            records,
        })
    }

    async fn wait_while_paused(&self) {
        if !self.control.is_paused() || self.control.is_cancelled() {
            return;
        }

        self.control.set_state(BatchState::Paused);
        info!("Batch paused");

        while self.control.is_paused() && !self.control.is_cancelled() {
            tokio::time::sleep(self.config.pause_poll_interval).await;
        }

        if !self.control.is_cancelled() {
            self.control.set_state(BatchState::Running);
            info!("Batch resumed");
        }
    }

    async fn execute<S>(&self, store: &S, task: &BatchTask) -> (TaskOutcome, Option<BatchResultEntry>)
    where
        S: SentenceStore + ?Sized,
    {
        let Some(sentence) = store.sentence(task.sentence_index) else {
            warn!("Sentence {} no longer exists", task.sentence_index);
            return (TaskOutcome::Skipped(SkipReason::MissingSentence), None);
        };

        let request = SentenceRequest::new(
            sentence.expression.clone(),
            store.reading_dict().hints_for(&sentence.expression),
        );

        let produced = match task.action {
            ActionKind::Reading => self
                .assistant
                .generate_reading(&request)
                .await
                .map(|value| Some((value, None))),
            ActionKind::Meaning => self
                .assistant
                .generate_meaning(&request)
                .await
                .map(|value| Some((value, None))),
            ActionKind::Memo => self
                .assistant
                .generate_explanation(&request)
                .await
                .map(|value| Some((value, None))),
            ActionKind::Verification => {
                let Some(existing) = sentence.existing_reading() else {
                    return (TaskOutcome::Skipped(SkipReason::NoExistingReading), None);
                };
                self.assistant
                    .verify_reading(&request, existing)
                    .await
                    .map(|verification| judge(verification, existing))
            }
        };

        match produced {
            Ok(Some((value, verdict))) => {
                let value = value.trim().to_string();
                if value.is_empty() {
                    return (TaskOutcome::Skipped(SkipReason::EmptyResult), None);
                }
                let entry = result_entry(task, sentence, value, verdict);
                (TaskOutcome::Produced, Some(entry))
            }
            Ok(None) => (TaskOutcome::Skipped(SkipReason::Inconclusive), None),
            Err(LlmError::EmptyResponse) => (TaskOutcome::Skipped(SkipReason::EmptyResult), None),
            Err(e) => {
                warn!("Batch error at sentence {}: {}", task.sentence_index, e);
                (TaskOutcome::Failed(e.to_string()), None)
            }
        }
    }
}

/// Sorted, de-duplicated task queue
fn build_queue<S>(store: &S, request: &BatchRequest) -> VecDeque<BatchTask>
where
    S: SentenceStore + ?Sized,
{
    request
        .indices
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|sentence_index| BatchTask {
            sentence_index,
            sentence_id: store.sentence(sentence_index).map(|s| s.id),
            action: request.action,
        })
        .collect()
}

// A proposed correction wins over a bare "correct" verdict.
fn judge(verification: Verification, existing: &str) -> Option<(String, Option<Verdict>)> {
    match verification.corrected_reading {
        Some(corrected) if corrected.trim() == existing.trim() => {
            Some((existing.to_string(), Some(Verdict::Confirmed)))
        }
        Some(corrected) => Some((corrected, Some(Verdict::Corrected))),
        None if verification.is_correct => Some((existing.to_string(), Some(Verdict::Confirmed))),
        None => None,
    }
}

fn result_entry(
    task: &BatchTask,
    sentence: &Sentence,
    produced_value: String,
    verdict: Option<Verdict>,
) -> BatchResultEntry {
    BatchResultEntry {
        sentence_index: task.sentence_index,
        sentence_id: task.sentence_id.unwrap_or(sentence.id),
        expression: sentence.expression.clone(),
        original: sentence.field(task.action.target_field()).to_string(),
        produced_value,
        action: task.action,
        verdict,
        selected: true,
    }
}

//! Selection and result review around a batch run
//!
//! Results never touch the sentences until [`BatchSession::apply`] is called,
//! and then only the selected entries are written.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vnreader_core::{SentenceStore, SentenceUpdate};

use crate::types::{ActionKind, BatchReport, BatchRequest, BatchResultEntry};

/// Per-entry apply outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// Written to the sentence now at `index`
    Applied { index: usize },
    /// The sentence was deleted since the batch ran
    TargetMissing,
    Failed { message: String },
}

/// Summary of an apply step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplySummary {
    /// Outcome for each selected entry, in result order
    pub outcomes: Vec<(usize, ApplyOutcome)>,
}

impl ApplySummary {
    pub fn applied(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, ApplyOutcome::Applied { .. }))
            .count()
    }

    pub fn missing(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == ApplyOutcome::TargetMissing)
            .count()
    }
}

/// Write selected entries back to the store.
///
/// Each entry is resolved by the identity of the sentence it was produced
/// for: the original index if it still holds that sentence, otherwise the
/// sentence's new position. Only the action's target field is updated.
pub fn apply_results<S>(store: &mut S, entries: &[BatchResultEntry]) -> ApplySummary
where
    S: SentenceStore + ?Sized,
{
    let mut summary = ApplySummary::default();

    for entry in entries.iter().filter(|e| e.selected) {
        let target = match store.sentence(entry.sentence_index) {
            Some(s) if s.id == entry.sentence_id => Some(entry.sentence_index),
            _ => store.position_of(entry.sentence_id),
        };

        let outcome = match target {
            Some(index) => {
                let update = SentenceUpdate::single(
                    entry.action.target_field(),
                    entry.produced_value.clone(),
                );
                match store.update_field(index, update) {
                    Ok(()) => ApplyOutcome::Applied { index },
                    Err(e) => ApplyOutcome::Failed {
                        message: e.to_string(),
                    },
                }
            }
            None => {
                warn!(
                    "Sentence for result at index {} no longer exists",
                    entry.sentence_index
                );
                ApplyOutcome::TargetMissing
            }
        };

        summary.outcomes.push((entry.sentence_index, outcome));
    }

    info!(
        "Applied {} of {} batch results",
        summary.applied(),
        summary.outcomes.len()
    );
    summary
}

/// Selected indices and pending results for one reader session
#[derive(Debug, Clone, Default)]
pub struct BatchSession {
    selection: BTreeSet<usize>,
    results: Vec<BatchResultEntry>,
}

impl BatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &BTreeSet<usize> {
        &self.selection
    }

    pub fn select(&mut self, index: usize) {
        self.selection.insert(index);
    }

    /// Flip selection of `index`, returning whether it is now selected
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.selection.remove(&index) {
            false
        } else {
            self.selection.insert(index);
            true
        }
    }

    /// Replace the selection
    pub fn set(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.selection = indices.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    /// Request for running `action` over the current selection
    pub fn request(&self, action: ActionKind) -> BatchRequest {
        BatchRequest::new(self.selection.iter().copied(), action)
    }

    /// Take the entries of a finished run for review, replacing older ones
    pub fn receive(&mut self, report: BatchReport) {
        self.results = report.entries;
    }

    pub fn results(&self) -> &[BatchResultEntry] {
        &self.results
    }

    /// Flip whether result `position` will be applied
    pub fn toggle_result(&mut self, position: usize) -> Option<bool> {
        let entry = self.results.get_mut(position)?;
        entry.selected = !entry.selected;
        Some(entry.selected)
    }

    pub fn set_all_results(&mut self, selected: bool) {
        for entry in &mut self.results {
            entry.selected = selected;
        }
    }

    /// Drop pending results without applying them
    pub fn discard(&mut self) {
        self.results.clear();
    }

    /// Apply selected results and clear the pending list.
    ///
    /// The sentence selection is kept so another action can run over it.
    pub fn apply<S>(&mut self, store: &mut S) -> ApplySummary
    where
        S: SentenceStore + ?Sized,
    {
        let summary = apply_results(store, &self.results);
        self.results.clear();
        summary
    }
}

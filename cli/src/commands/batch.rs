//! Batch AI processing with review and optional apply

use std::collections::BTreeSet;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use vnreader_batch::{
    ActionKind, ApplyOutcome, BatchReport, BatchResultEntry, BatchRunner, BatchSession, Verdict,
};

use crate::state::AppState;

/// Which results to keep for apply, by sentence index
#[derive(Debug, Default)]
pub struct ResultPicks {
    /// When non-empty, nothing else is applied
    pub only: Vec<usize>,
    pub exclude: Vec<usize>,
}

impl ResultPicks {
    /// Mark the session's results selected or not
    pub fn select(&self, session: &mut BatchSession) {
        let only: BTreeSet<usize> = self.only.iter().copied().collect();
        let exclude: BTreeSet<usize> = self.exclude.iter().copied().collect();

        session.set_all_results(only.is_empty());
        for position in 0..session.results().len() {
            let index = session.results()[position].sentence_index;
            let wanted = (only.is_empty() || only.contains(&index)) && !exclude.contains(&index);
            if wanted != session.results()[position].selected {
                session.toggle_result(position);
            }
        }
    }
}

pub async fn run(
    state: &mut AppState,
    action: ActionKind,
    indices: Vec<usize>,
    apply: bool,
    picks: ResultPicks,
) -> Result<()> {
    let mut session = BatchSession::new();
    session.set(indices);
    let request = session.request(action);

    let runner = BatchRunner::new(state.assistant());
    let control = runner.control();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling after the current sentence...");
            control.cancel();
        }
    });

    let bar = ProgressBar::new(request.indices.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{bar:30}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    bar.set_message(action.display_name());

    let result = runner
        .run(&state.store, request, |progress| {
            bar.set_position(progress.finished() as u64);
        })
        .await;

    interrupt.abort();
    bar.finish_and_clear();

    let report = result?;
    print_summary(&report);
    session.receive(report);

    for entry in session.results() {
        print_entry(entry);
    }

    if session.results().is_empty() {
        println!("\nFinished with no usable results.");
        return Ok(());
    }

    picks.select(&mut session);

    if !apply {
        println!("\nResults not applied. Re-run with --apply to write them.");
        session.discard();
        return Ok(());
    }

    let summary = session.apply(&mut state.store);
    for (index, outcome) in &summary.outcomes {
        match outcome {
            ApplyOutcome::Applied { .. } => {}
            ApplyOutcome::TargetMissing => warn!("Sentence {} was deleted, result skipped", index),
            ApplyOutcome::Failed { message } => warn!("Could not apply to {}: {}", index, message),
        }
    }
    state.save()?;
    println!("\nApplied {} result(s)", summary.applied());
    Ok(())
}

fn print_summary(report: &BatchReport) {
    if report.was_cancelled() {
        println!(
            "Cancelled after {} of {} sentences",
            report.attempted(),
            report.total
        );
    }
    println!(
        "{}: {} result(s), {} failed",
        report.action.display_name(),
        report.entries.len(),
        report.failed()
    );
}

fn print_entry(entry: &BatchResultEntry) {
    let label = match entry.verdict {
        Some(Verdict::Confirmed) => " [ok]",
        Some(Verdict::Corrected) => " [corrected]",
        None => "",
    };
    println!("\n[{}]{} {}", entry.sentence_index, label, entry.expression);
    if entry.changes_field() {
        if !entry.original.is_empty() {
            println!("  - {}", entry.original);
        }
        println!("  + {}", entry.produced_value);
    } else {
        println!("  = {}", entry.produced_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vnreader_batch::BatchState;
    use vnreader_core::Sentence;

    fn session_with(indices: &[usize]) -> BatchSession {
        let entries = indices
            .iter()
            .map(|&index| {
                let sentence = Sentence::new(format!("s{index}"));
                BatchResultEntry {
                    sentence_index: index,
                    sentence_id: sentence.id,
                    expression: sentence.expression,
                    original: String::new(),
                    produced_value: "x".to_string(),
                    action: ActionKind::Meaning,
                    verdict: None,
                    selected: true,
                }
            })
            .collect::<Vec<_>>();
        let mut session = BatchSession::new();
        session.receive(BatchReport {
            state: BatchState::Completed,
            action: ActionKind::Meaning,
            total: entries.len(),
            entries,
            records: Vec::new(),
        });
        session
    }

    fn selected(session: &BatchSession) -> Vec<usize> {
        session
            .results()
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.sentence_index)
            .collect()
    }

    #[test]
    fn test_exclude_drops_listed_results() {
        let mut session = session_with(&[1, 3, 5]);
        ResultPicks {
            only: vec![],
            exclude: vec![3],
        }
        .select(&mut session);
        assert_eq!(selected(&session), vec![1, 5]);
    }

    #[test]
    fn test_only_keeps_listed_results() {
        let mut session = session_with(&[1, 3, 5]);
        ResultPicks {
            only: vec![5, 1],
            exclude: vec![1],
        }
        .select(&mut session);
        assert_eq!(selected(&session), vec![5]);
    }

    #[test]
    fn test_default_picks_select_everything() {
        let mut session = session_with(&[2, 4]);
        session.toggle_result(0);
        ResultPicks::default().select(&mut session);
        assert_eq!(selected(&session), vec![2, 4]);
    }
}

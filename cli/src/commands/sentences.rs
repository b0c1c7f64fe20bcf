//! Library browsing and editing

use anyhow::{bail, Context, Result};
use vnreader_core::{Sentence, SentenceStore};

use crate::commands::furigana::print_render_plan;
use crate::state::AppState;

pub fn add(
    state: &mut AppState,
    expression: String,
    reading: Option<String>,
    meaning: Option<String>,
    speaker: Option<String>,
) -> Result<()> {
    if expression.trim().is_empty() {
        bail!("Expression must not be empty");
    }

    let mut sentence = Sentence::new(expression);
    sentence.reading = reading.unwrap_or_default();
    sentence.meaning = meaning.unwrap_or_default();
    sentence.speaker = speaker.unwrap_or_default();

    let index = state.store.add_sentence(sentence);
    state.save()?;
    println!("Added sentence {index}");
    Ok(())
}

pub fn show(state: &AppState, index: usize) -> Result<()> {
    let sentence = state
        .store
        .sentence(index)
        .with_context(|| format!("No sentence at index {index}"))?;

    let bookmarked = state.store.bookmarks().contains(&index);
    println!(
        "#{} (index {}){}",
        sentence.order,
        index,
        if bookmarked { " *" } else { "" }
    );
    if !sentence.speaker.is_empty() {
        println!("speaker:    {}", sentence.speaker);
    }
    println!("expression: {}", sentence.expression);
    println!("reading:    {}", sentence.reading);
    println!("meaning:    {}", sentence.meaning);
    if !sentence.memo.is_empty() {
        println!("memo:\n{}", sentence.memo);
    }
    println!();
    print_render_plan(sentence);
    Ok(())
}

pub fn list(state: &AppState, bookmarks_only: bool) {
    let bookmarks = state.store.bookmarks();
    for (index, sentence) in state.store.sentences().iter().enumerate() {
        let marked = bookmarks.contains(&index);
        if bookmarks_only && !marked {
            continue;
        }
        let flag = if marked { '*' } else { ' ' };
        println!("{index:>5}{flag} {}", sentence.expression);
    }
}

pub fn delete(state: &mut AppState, indices: &[usize]) -> Result<()> {
    let removed = state.store.delete_sentences(indices);
    if removed == 0 {
        bail!("None of the given indices exist");
    }
    state.save()?;
    println!("Deleted {removed} sentence(s)");
    Ok(())
}

pub fn bookmark(state: &mut AppState, index: usize) -> Result<()> {
    let marked = state.store.toggle_bookmark(index)?;
    state.save()?;
    println!(
        "Sentence {index} {}",
        if marked { "bookmarked" } else { "unbookmarked" }
    );
    Ok(())
}

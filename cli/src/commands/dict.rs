//! Reading dictionary commands

use anyhow::{bail, Result};
use vnreader_core::SentenceStore;

use crate::state::AppState;

pub fn list(state: &AppState) {
    let dict = state.store.reading_dict();
    if dict.is_empty() {
        println!("Reading dictionary is empty");
        return;
    }
    for (word, reading) in dict.iter() {
        println!("{word}\t{reading}");
    }
}

pub fn add(state: &mut AppState, word: &str, reading: &str) -> Result<()> {
    let (word, reading) = (word.trim(), reading.trim());
    if word.is_empty() || reading.is_empty() {
        bail!("Word and reading must not be empty");
    }
    if !state.store.update_reading_dict(word, reading) {
        state.store.add_to_reading_dict(word, reading);
    }
    state.save()?;
    println!("{word} -> {reading}");
    Ok(())
}

pub fn remove(state: &mut AppState, words: &[String]) -> Result<()> {
    let removed = state.store.remove_many_from_reading_dict(words);
    state.save()?;
    println!("Removed {removed} word(s)");
    Ok(())
}

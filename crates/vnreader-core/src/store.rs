//! Sentence library state
//!
//! All mutations go through named operations; callers never assign fields
//! of the library directly.

use std::collections::BTreeSet;

use tracing::debug;
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{ReadingDict, Sentence, SentenceUpdate, Settings};

/// Read/update access to the sentence collection
pub trait SentenceStore {
    /// All sentences in script order
    fn sentences(&self) -> &[Sentence];

    /// User reading dictionary
    fn reading_dict(&self) -> &ReadingDict;

    /// Apply a partial update to the sentence at `index`
    fn update_field(&mut self, index: usize, update: SentenceUpdate) -> Result<(), StoreError>;

    fn sentence(&self, index: usize) -> Option<&Sentence> {
        self.sentences().get(index)
    }

    /// Current index of the sentence with `id`
    fn position_of(&self, id: Uuid) -> Option<usize> {
        self.sentences().iter().position(|s| s.id == id)
    }

    fn len(&self) -> usize {
        self.sentences().len()
    }

    fn is_empty(&self) -> bool {
        self.sentences().is_empty()
    }
}

/// In-memory application state
#[derive(Debug, Clone, Default)]
pub struct AppStore {
    sentences: Vec<Sentence>,
    bookmarks: BTreeSet<usize>,
    reading_dict: ReadingDict,
    current_index: usize,
    settings: Settings,
    dirty: bool,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store around existing sentences, renumbering their order
    pub fn from_sentences(sentences: Vec<Sentence>) -> Self {
        let mut store = Self::default();
        store.set_sentences(sentences);
        store.dirty = false;
        store
    }

    pub(crate) fn from_parts(
        sentences: Vec<Sentence>,
        bookmarks: BTreeSet<usize>,
        reading_dict: ReadingDict,
        current_index: usize,
        settings: Settings,
    ) -> Self {
        let mut store = Self {
            sentences,
            bookmarks,
            reading_dict,
            current_index,
            settings,
            dirty: false,
        };
        store.normalize();
        store
    }

    /// Whether anything changed since the last save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn bookmarks(&self) -> &BTreeSet<usize> {
        &self.bookmarks
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the whole sentence list
    pub fn set_sentences(&mut self, sentences: Vec<Sentence>) {
        self.sentences = sentences;
        self.normalize();
        self.dirty = true;
    }

    /// Append a sentence, returning its index
    pub fn add_sentence(&mut self, mut sentence: Sentence) -> usize {
        sentence.order = self.sentences.len() + 1;
        self.sentences.push(sentence);
        self.dirty = true;
        self.sentences.len() - 1
    }

    /// Delete sentences by index.
    ///
    /// Remaining sentences are renumbered, bookmarks shift down past removed
    /// positions and the current index is clamped. Returns the number removed.
    pub fn delete_sentences(&mut self, indices: &[usize]) -> usize {
        let doomed: BTreeSet<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.sentences.len())
            .collect();
        if doomed.is_empty() {
            return 0;
        }

        let mut bookmarks = BTreeSet::new();
        let mut removed = 0;
        for i in 0..self.sentences.len() {
            if doomed.contains(&i) {
                removed += 1;
            } else if self.bookmarks.contains(&i) {
                bookmarks.insert(i - removed);
            }
        }

        let mut index = 0;
        self.sentences.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });

        self.bookmarks = bookmarks;
        self.normalize();
        self.dirty = true;
        debug!("Deleted {} sentences", removed);
        removed
    }

    /// Toggle a bookmark, returning whether it is now set
    pub fn toggle_bookmark(&mut self, index: usize) -> Result<bool, StoreError> {
        self.check_index(index)?;
        self.dirty = true;
        if self.bookmarks.remove(&index) {
            Ok(false)
        } else {
            self.bookmarks.insert(index);
            Ok(true)
        }
    }

    pub fn set_current_index(&mut self, index: usize) -> Result<(), StoreError> {
        self.check_index(index)?;
        self.current_index = index;
        self.dirty = true;
        Ok(())
    }

    /// Move to the next sentence, if any
    pub fn next_sentence(&mut self) -> bool {
        if self.current_index + 1 < self.sentences.len() {
            self.current_index += 1;
            self.dirty = true;
            true
        } else {
            false
        }
    }

    /// Move to the previous sentence, if any
    pub fn prev_sentence(&mut self) -> bool {
        if self.current_index > 0 {
            self.current_index -= 1;
            self.dirty = true;
            true
        } else {
            false
        }
    }

    /// Add or overwrite a dictionary entry
    pub fn add_to_reading_dict(&mut self, word: &str, reading: &str) {
        self.reading_dict.insert(word, reading);
        self.dirty = true;
    }

    /// Change the reading of an existing entry; unknown words are ignored
    pub fn update_reading_dict(&mut self, word: &str, reading: &str) -> bool {
        if !self.reading_dict.contains(word) {
            return false;
        }
        self.reading_dict.insert(word, reading);
        self.dirty = true;
        true
    }

    pub fn remove_from_reading_dict(&mut self, word: &str) -> bool {
        let removed = self.reading_dict.remove(word).is_some();
        self.dirty |= removed;
        removed
    }

    /// Remove several words, returning how many existed
    pub fn remove_many_from_reading_dict<S: AsRef<str>>(&mut self, words: &[S]) -> usize {
        let removed = words
            .iter()
            .filter(|w| self.reading_dict.remove(w.as_ref()).is_some())
            .count();
        self.dirty |= removed > 0;
        removed
    }

    pub fn set_reading_dict(&mut self, reading_dict: ReadingDict) {
        self.reading_dict = reading_dict;
        self.dirty = true;
    }

    pub fn set_bookmarks(&mut self, bookmarks: BTreeSet<usize>) {
        self.bookmarks = bookmarks;
        self.normalize();
        self.dirty = true;
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.dirty = true;
    }

    /// Edit settings in place
    pub fn update_settings(&mut self, f: impl FnOnce(&mut Settings)) {
        f(&mut self.settings);
        self.dirty = true;
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.sentences.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.sentences.len(),
            })
        }
    }

    // Keeps order numbers, bookmarks and position consistent with the list.
    fn normalize(&mut self) {
        for (i, sentence) in self.sentences.iter_mut().enumerate() {
            sentence.order = i + 1;
        }
        let len = self.sentences.len();
        self.bookmarks.retain(|&b| b < len);
        if self.current_index >= len {
            self.current_index = len.saturating_sub(1);
        }
    }
}

impl SentenceStore for AppStore {
    fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    fn reading_dict(&self) -> &ReadingDict {
        &self.reading_dict
    }

    fn update_field(&mut self, index: usize, update: SentenceUpdate) -> Result<(), StoreError> {
        let len = self.sentences.len();
        let sentence = self
            .sentences
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;
        sentence.apply(&update);
        self.dirty = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SentenceField;

    fn store_with(n: usize) -> AppStore {
        AppStore::from_sentences((0..n).map(|i| Sentence::new(format!("文{i}"))).collect())
    }

    #[test]
    fn test_from_sentences_numbers_order() {
        let store = store_with(3);
        let orders: Vec<_> = store.sentences().iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_update_field() {
        let mut store = store_with(2);
        store
            .update_field(1, SentenceUpdate::single(SentenceField::Meaning, "sentence"))
            .unwrap();
        assert_eq!(store.sentence(1).unwrap().meaning, "sentence");
        assert_eq!(store.sentence(0).unwrap().meaning, "");
        assert!(store.is_dirty());
    }

    #[test]
    fn test_update_field_out_of_range() {
        let mut store = store_with(1);
        let err = store
            .update_field(5, SentenceUpdate::single(SentenceField::Memo, "x"))
            .unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 5, len: 1 }));
    }

    #[test]
    fn test_delete_remaps_bookmarks_and_clamps_index() {
        let mut store = store_with(5);
        store.toggle_bookmark(1).unwrap();
        store.toggle_bookmark(3).unwrap();
        store.toggle_bookmark(4).unwrap();
        store.set_current_index(4).unwrap();

        let removed = store.delete_sentences(&[0, 3, 9]);

        assert_eq!(removed, 2);
        assert_eq!(store.len(), 3);
        let expressions: Vec<_> = store.sentences().iter().map(|s| s.expression.as_str()).collect();
        assert_eq!(expressions, vec!["文1", "文2", "文4"]);
        assert_eq!(store.bookmarks().iter().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(store.current_index(), 2);
        assert_eq!(store.sentence(2).unwrap().order, 3);
    }

    #[test]
    fn test_position_of_follows_id() {
        let mut store = store_with(3);
        let id = store.sentence(2).unwrap().id;
        store.delete_sentences(&[0]);
        assert_eq!(store.position_of(id), Some(1));
    }

    #[test]
    fn test_navigation_bounds() {
        let mut store = store_with(2);
        assert!(!store.prev_sentence());
        assert!(store.next_sentence());
        assert!(!store.next_sentence());
        assert_eq!(store.current_index(), 1);
        assert!(store.set_current_index(2).is_err());
    }

    #[test]
    fn test_reading_dict_operations() {
        let mut store = AppStore::new();
        store.add_to_reading_dict("岡部", "おかべ");
        assert!(!store.update_reading_dict("紅莉栖", "くりす"));
        assert!(store.update_reading_dict("岡部", "オカベ"));
        assert_eq!(store.reading_dict().get("岡部"), Some("オカベ"));

        store.add_to_reading_dict("紅莉栖", "くりす");
        assert_eq!(store.remove_many_from_reading_dict(&["岡部", "まゆり"]), 1);
        assert!(store.remove_from_reading_dict("紅莉栖"));
        assert!(store.reading_dict().is_empty());
    }
}

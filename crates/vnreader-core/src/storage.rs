//! JSON persistence for the library

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::{AppStore, SentenceStore};
use crate::types::{ReadingDict, Sentence, Settings};

const SENTENCES_FILE: &str = "sentences.json";
const READING_DICT_FILE: &str = "reading_dict.json";
const PROGRESS_FILE: &str = "progress.json";
const SETTINGS_FILE: &str = "settings.json";

/// Reading position and bookmarks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct Progress {
    bookmarks: BTreeSet<usize>,
    current_index: usize,
}

/// Directory holding the library files
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Platform data directory
    pub fn new() -> Result<Self, StoreError> {
        let dirs = ProjectDirs::from("com", "vnreader", "VNReader").ok_or_else(|| {
            StoreError::DataDirectory("Could not determine data directory".to_string())
        })?;

        Ok(Self {
            root: dirs.data_dir().to_path_buf(),
        })
    }

    /// Explicit directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the library; missing files load as empty defaults
    pub fn load(&self) -> Result<AppStore, StoreError> {
        let sentences: Vec<Sentence> = self.read_or_default(SENTENCES_FILE)?;
        let reading_dict: ReadingDict = self.read_or_default(READING_DICT_FILE)?;
        let progress: Progress = self.read_or_default(PROGRESS_FILE)?;
        let settings: Settings = self.read_or_default(SETTINGS_FILE)?;

        info!(
            "Loaded {} sentences and {} dictionary words from {}",
            sentences.len(),
            reading_dict.len(),
            self.root.display()
        );

        Ok(AppStore::from_parts(
            sentences,
            progress.bookmarks,
            reading_dict,
            progress.current_index,
            settings,
        ))
    }

    /// Write every section of the library
    pub fn save(&self, store: &mut AppStore) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;

        self.write(SENTENCES_FILE, &store.sentences())?;
        self.write(READING_DICT_FILE, store.reading_dict())?;
        self.write(
            PROGRESS_FILE,
            &Progress {
                bookmarks: store.bookmarks().clone(),
                current_index: store.current_index(),
            },
        )?;
        self.write(SETTINGS_FILE, store.settings())?;

        store.mark_saved();
        debug!("Saved library to {}", self.root.display());
        Ok(())
    }

    /// Save only when something changed
    pub fn save_if_dirty(&self, store: &mut AppStore) -> Result<bool, StoreError> {
        if store.is_dirty() {
            self.save(store)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Remove every library file
    pub fn reset(&self) -> Result<(), StoreError> {
        for file in [SENTENCES_FILE, READING_DICT_FILE, PROGRESS_FILE, SETTINGS_FILE] {
            let path = self.root.join(file);
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        info!("Library data reset");
        Ok(())
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T, StoreError> {
        let path = self.root.join(file);
        if !path.exists() {
            debug!("{} not found, using defaults", path.display());
            return Ok(T::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        let path = self.root.join(file);
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, serde_json::to_vec_pretty(value)?)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SentenceField, SentenceUpdate};

    #[test]
    fn test_missing_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataDir::with_root(dir.path()).load().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = DataDir::with_root(dir.path().join("library"));

        let mut store = AppStore::from_sentences(vec![Sentence::new("猫"), Sentence::new("犬")]);
        store
            .update_field(0, SentenceUpdate::single(SentenceField::Reading, "猫[ねこ]"))
            .unwrap();
        store.toggle_bookmark(1).unwrap();
        store.set_current_index(1).unwrap();
        store.add_to_reading_dict("犬", "いぬ");
        store.update_settings(|s| s.api_model = "claude-test".to_string());

        assert!(data_dir.save_if_dirty(&mut store).unwrap());
        assert!(!data_dir.save_if_dirty(&mut store).unwrap());

        let loaded = data_dir.load().unwrap();
        assert_eq!(loaded.sentences(), store.sentences());
        assert!(loaded.bookmarks().contains(&1));
        assert_eq!(loaded.current_index(), 1);
        assert_eq!(loaded.reading_dict().get("犬"), Some("いぬ"));
        assert_eq!(loaded.settings().api_model, "claude-test");
    }

    #[test]
    fn test_reset_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = DataDir::with_root(dir.path());
        let mut store = AppStore::from_sentences(vec![Sentence::new("猫")]);
        data_dir.save(&mut store).unwrap();
        assert!(dir.path().join(SENTENCES_FILE).exists());

        data_dir.reset().unwrap();
        assert!(data_dir.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SENTENCES_FILE), "not json").unwrap();
        let err = DataDir::with_root(dir.path()).load().unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }
}

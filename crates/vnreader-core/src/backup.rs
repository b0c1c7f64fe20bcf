//! Backup export and import

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StoreError;
use crate::store::{AppStore, SentenceStore};
use crate::types::{ReadingDict, Sentence, Settings};

/// Current backup format version
pub const BACKUP_VERSION: &str = "1.0";

/// Versioned backup document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub data: BackupContents,
}

/// Library sections; absent sections are left untouched on import
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupContents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentences: Option<Vec<Sentence>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmarks: Option<BTreeSet<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_dict: Option<ReadingDict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

impl BackupData {
    /// Snapshot the whole library
    pub fn export(store: &AppStore) -> Self {
        Self {
            version: BACKUP_VERSION.to_string(),
            export_date: Utc::now(),
            data: BackupContents {
                sentences: Some(store.sentences().to_vec()),
                bookmarks: Some(store.bookmarks().clone()),
                reading_dict: Some(store.reading_dict().clone()),
                current_index: Some(store.current_index()),
                settings: Some(store.settings().clone()),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let backup: Self = serde_json::from_str(json)?;
        if backup.version.split('.').next() != BACKUP_VERSION.split('.').next() {
            return Err(StoreError::InvalidBackup(format!(
                "unsupported version {}",
                backup.version
            )));
        }
        Ok(backup)
    }

    /// Replace every section present in the backup
    pub fn import_into(self, store: &mut AppStore) -> Result<(), StoreError> {
        let data = self.data;
        if let Some(sentences) = data.sentences {
            store.set_sentences(sentences);
        }
        if let Some(bookmarks) = data.bookmarks {
            store.set_bookmarks(bookmarks);
        }
        if let Some(reading_dict) = data.reading_dict {
            store.set_reading_dict(reading_dict);
        }
        if let Some(index) = data.current_index {
            // Out-of-range positions from older backups fall back to the start
            if store.set_current_index(index).is_err() && !store.is_empty() {
                store.set_current_index(0)?;
            }
        }
        if let Some(settings) = data.settings {
            store.set_settings(settings);
        }
        info!("Imported backup with {} sentences", store.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_import_round_trip() {
        let mut store = AppStore::from_sentences(vec![Sentence::new("猫"), Sentence::new("犬")]);
        store.toggle_bookmark(0).unwrap();
        store.add_to_reading_dict("猫", "ねこ");
        store.set_current_index(1).unwrap();

        let json = BackupData::export(&store).to_json().unwrap();
        assert!(json.contains("\"exportDate\""));

        let mut restored = AppStore::new();
        BackupData::from_json(&json).unwrap().import_into(&mut restored).unwrap();

        assert_eq!(restored.sentences(), store.sentences());
        assert_eq!(restored.bookmarks(), store.bookmarks());
        assert_eq!(restored.reading_dict(), store.reading_dict());
        assert_eq!(restored.current_index(), 1);
    }

    #[test]
    fn test_partial_backup_keeps_other_sections() {
        let mut store = AppStore::from_sentences(vec![Sentence::new("猫")]);
        store.add_to_reading_dict("猫", "ねこ");

        let json = r#"{
            "version": "1.0",
            "exportDate": "2025-01-01T00:00:00Z",
            "data": { "readingDict": { "犬": "いぬ" } }
        }"#;
        BackupData::from_json(json).unwrap().import_into(&mut store).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.reading_dict().get("犬"), Some("いぬ"));
        assert!(store.reading_dict().get("猫").is_none());
    }

    #[test]
    fn test_import_camel_case_settings() {
        let json = r#"{
            "version": "1.0",
            "exportDate": "2025-01-01T00:00:00Z",
            "data": { "settings": { "apiKey": "sk-original", "apiModel": "claude-x" } }
        }"#;
        let mut store = AppStore::new();
        BackupData::from_json(json).unwrap().import_into(&mut store).unwrap();

        assert_eq!(store.settings().api_key, "sk-original");
        assert_eq!(store.settings().api_model, "claude-x");
    }

    #[test]
    fn test_export_writes_camel_case_settings() {
        let mut store = AppStore::new();
        store.update_settings(|s| s.api_key = "sk-test".to_string());
        let json = BackupData::export(&store).to_json().unwrap();

        assert!(json.contains("\"apiKey\": \"sk-test\""));
        assert!(json.contains("\"translationLanguage\""));
        assert!(!json.contains("api_key"));
    }

    #[test]
    fn test_import_empty_library_with_stale_index() {
        let json = r#"{
            "version": "1.0",
            "exportDate": "2025-01-01T00:00:00Z",
            "data": { "sentences": [], "currentIndex": 5 }
        }"#;
        let mut store = AppStore::from_sentences(vec![Sentence::new("猫")]);
        BackupData::from_json(json).unwrap().import_into(&mut store).unwrap();

        assert!(store.is_empty());
        assert_eq!(store.current_index(), 0);
    }

    #[test]
    fn test_rejects_unknown_major_version() {
        let json = r#"{"version": "2.0", "exportDate": "2025-01-01T00:00:00Z", "data": {}}"#;
        assert!(matches!(
            BackupData::from_json(json),
            Err(StoreError::InvalidBackup(_))
        ));
    }
}

//! Shared type definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Stable identifier, survives reordering and deletion of other sentences
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// 1-based position in the script
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub speaker: String,
    /// Original text
    pub expression: String,
    /// Annotated reading, e.g. `食[た]べる` (empty when unknown)
    #[serde(default)]
    pub reading: String,
    /// Translation
    #[serde(default)]
    pub meaning: String,
    /// Voice file name
    #[serde(default)]
    pub audio: String,
    /// Explanation notes
    #[serde(default)]
    pub memo: String,
    /// Pre-segmented tokens from an offline tokenizer
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<Token>,
}

impl Sentence {
    /// Create a sentence with only its expression set
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            order: 0,
            speaker: String::new(),
            expression: expression.into(),
            reading: String::new(),
            meaning: String::new(),
            audio: String::new(),
            memo: String::new(),
            tokens: Vec::new(),
        }
    }

    /// Existing reading, `None` when empty
    pub fn existing_reading(&self) -> Option<&str> {
        non_empty(&self.reading)
    }

    /// Current value of an editable field
    pub fn field(&self, field: SentenceField) -> &str {
        match field {
            SentenceField::Reading => &self.reading,
            SentenceField::Meaning => &self.meaning,
            SentenceField::Memo => &self.memo,
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: &SentenceUpdate) {
        if let Some(reading) = &update.reading {
            self.reading = reading.clone();
        }
        if let Some(meaning) = &update.meaning {
            self.meaning = meaning.clone();
        }
        if let Some(memo) = &update.memo {
            self.memo = memo.clone();
        }
    }
}

/// A tokenizer token
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Literal substring as it appears in the sentence
    pub surface: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dict_form: Option<String>,
}

impl Token {
    pub fn new(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            ..Default::default()
        }
    }

    pub fn with_reading(mut self, reading: impl Into<String>) -> Self {
        self.reading = Some(reading.into());
        self
    }

    pub fn with_base_form(mut self, base_form: impl Into<String>) -> Self {
        self.base_form = Some(base_form.into());
        self
    }

    pub fn with_dict_form(mut self, dict_form: impl Into<String>) -> Self {
        self.dict_form = Some(dict_form.into());
        self
    }

    /// Whether this token forces a line break
    pub fn is_line_break(&self) -> bool {
        self.surface == "\n"
    }

    /// Key used for dictionary and kanji lookups.
    ///
    /// Inflected forms resolve to their dictionary headword when the tokenizer
    /// supplied one: `base_form`, then `dict_form`, then `surface`.
    pub fn lookup_key(&self) -> &str {
        self.base_form
            .as_deref()
            .and_then(non_empty)
            .or_else(|| self.dict_form.as_deref().and_then(non_empty))
            .unwrap_or(&self.surface)
    }
}

/// Editable sentence fields targeted by AI actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentenceField {
    Reading,
    Meaning,
    Memo,
}

impl std::fmt::Display for SentenceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentenceField::Reading => write!(f, "reading"),
            SentenceField::Meaning => write!(f, "meaning"),
            SentenceField::Memo => write!(f, "memo"),
        }
    }
}

/// Partial field update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl SentenceUpdate {
    /// Update touching exactly one field
    pub fn single(field: SentenceField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match field {
            SentenceField::Reading => Self { reading: value, ..Default::default() },
            SentenceField::Meaning => Self { meaning: value, ..Default::default() },
            SentenceField::Memo => Self { memo: value, ..Default::default() },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reading.is_none() && self.meaning.is_none() && self.memo.is_none()
    }
}

/// A known word and its reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryHint {
    pub word: String,
    pub reading: String,
}

/// User-maintained word → reading dictionary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadingDict(BTreeMap<String, String>);

impl ReadingDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&str> {
        self.0.get(word).map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains_key(word)
    }

    /// Insert or overwrite an entry
    pub fn insert(&mut self, word: impl Into<String>, reading: impl Into<String>) {
        self.0.insert(word.into(), reading.into());
    }

    pub fn remove(&mut self, word: &str) -> Option<String> {
        self.0.remove(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(w, r)| (w.as_str(), r.as_str()))
    }

    /// Entries whose word occurs in `expression`
    pub fn hints_for(&self, expression: &str) -> Vec<DictionaryHint> {
        self.0
            .iter()
            .filter(|(word, _)| !word.is_empty() && expression.contains(word.as_str()))
            .map(|(word, reading)| DictionaryHint {
                word: word.clone(),
                reading: reading.clone(),
            })
            .collect()
    }
}

impl FromIterator<(String, String)> for ReadingDict {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Which LLM backend to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Claude,
    Ollama,
}

/// Persisted user settings
///
/// Keys are camelCase; snake_case spellings are still accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub provider: ProviderKind,
    /// Claude API key (empty when not configured)
    #[serde(alias = "api_key")]
    pub api_key: String,
    /// Claude model identifier
    #[serde(alias = "api_model")]
    pub api_model: String,
    #[serde(alias = "ollama_url")]
    pub ollama_url: String,
    #[serde(alias = "ollama_model")]
    pub ollama_model: String,
    /// Target language for translations and explanations
    #[serde(alias = "translation_language")]
    pub translation_language: String,
    /// Free-form description of the work being read, passed to prompts
    #[serde(alias = "work_context")]
    pub work_context: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Claude,
            api_key: String::new(),
            api_model: "claude-sonnet-4-5-20250929".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.2".to_string(),
            translation_language: "Korean".to_string(),
            work_context: String::new(),
        }
    }
}

pub(crate) fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

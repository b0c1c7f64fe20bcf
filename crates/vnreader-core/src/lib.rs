//! vnreader-core - data model and text handling for the script reader
//!
//! Provides the sentence model, furigana parsing, the library store and its
//! persistence.

pub mod backup;
pub mod error;
pub mod furigana;
pub mod storage;
pub mod store;
pub mod types;

pub use backup::BackupData;
pub use error::StoreError;
pub use furigana::{AnnotatedSegment, DisplayToken, RenderPlan};
pub use storage::DataDir;
pub use store::{AppStore, SentenceStore};
pub use types::*;

//! Subcommand handlers

pub mod backup;
pub mod batch;
pub mod config;
pub mod dict;
pub mod furigana;
pub mod sentences;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use vnreader_batch::ActionKind;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Library directory, defaults to the platform data directory.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse annotated text such as `今日[きょう]は` and print its segments.
    Furigana {
        text: String,
        /// Split plain text into one-character display units; annotated runs stay grouped.
        #[arg(short, long)]
        units: bool,
    },
    /// Append a sentence to the library.
    Add {
        expression: String,
        #[arg(short, long)]
        reading: Option<String>,
        #[arg(short, long)]
        meaning: Option<String>,
        #[arg(short, long)]
        speaker: Option<String>,
    },
    /// Print a sentence and how it would be rendered.
    Show { index: usize },
    /// List sentences with their indices.
    List {
        /// Only bookmarked sentences.
        #[arg(short, long)]
        bookmarks: bool,
    },
    /// Delete sentences by index.
    Delete {
        #[arg(required = true)]
        indices: Vec<usize>,
    },
    /// Toggle the bookmark on a sentence.
    Bookmark { index: usize },
    /// Run one AI action over the selected sentences.
    Batch {
        /// reading, meaning, memo or verification
        action: ActionKind,
        #[arg(required = true)]
        indices: Vec<usize>,
        /// Write the results to the library after the run.
        #[arg(short, long)]
        apply: bool,
        /// Sentence indices whose results should not be applied.
        #[arg(short, long, value_delimiter = ',')]
        exclude: Vec<usize>,
        /// Apply only the results for these sentence indices.
        #[arg(short, long, value_delimiter = ',')]
        only: Vec<usize>,
    },
    /// Manage the reading dictionary.
    Dict {
        #[command(subcommand)]
        command: DictCommand,
    },
    /// Show or change settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Export or import a full backup.
    Backup {
        #[command(subcommand)]
        command: BackupCommand,
    },
}

#[derive(Subcommand)]
pub enum DictCommand {
    List,
    /// Add or replace a word's reading.
    Add { word: String, reading: String },
    Remove {
        #[arg(required = true)]
        words: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    Show,
    /// Store the Claude API key.
    SetKey { key: String },
    /// Set the model used by the current provider.
    SetModel { model: String },
    SetProvider { provider: Provider },
    /// Set the translation language and optional work description.
    SetContext {
        language: String,
        #[arg(short, long)]
        work: Option<String>,
    },
    /// List models installed in the local Ollama server.
    Models,
}

#[derive(Subcommand)]
pub enum BackupCommand {
    Export { path: PathBuf },
    Import { path: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Provider {
    Claude,
    Ollama,
}

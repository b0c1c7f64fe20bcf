//! vnreader command-line reader
//!
//! Browses a library of annotated script lines and runs batch AI actions
//! (readings, translations, explanations, reading checks) over them.

mod cli;
mod commands;
mod state;

use anyhow::Result;
use clap::Parser;
use cli::{BackupCommand, Cli, Command, ConfigCommand, DictCommand};
use tracing_subscriber::EnvFilter;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::Furigana { text, units } = &cli.command {
        commands::furigana::parse(text, *units);
        return Ok(());
    }

    let mut state = AppState::open(cli.data_dir.as_deref())?;

    match cli.command {
        Command::Furigana { .. } => {}
        Command::Add {
            expression,
            reading,
            meaning,
            speaker,
        } => commands::sentences::add(&mut state, expression, reading, meaning, speaker)?,
        Command::Show { index } => commands::sentences::show(&state, index)?,
        Command::List { bookmarks } => commands::sentences::list(&state, bookmarks),
        Command::Delete { indices } => commands::sentences::delete(&mut state, &indices)?,
        Command::Bookmark { index } => commands::sentences::bookmark(&mut state, index)?,
        Command::Batch {
            action,
            indices,
            apply,
            exclude,
            only,
        } => {
            let picks = commands::batch::ResultPicks { only, exclude };
            commands::batch::run(&mut state, action, indices, apply, picks).await?
        }
        Command::Dict { command } => match command {
            DictCommand::List => commands::dict::list(&state),
            DictCommand::Add { word, reading } => commands::dict::add(&mut state, &word, &reading)?,
            DictCommand::Remove { words } => commands::dict::remove(&mut state, &words)?,
        },
        Command::Config { command } => match command {
            ConfigCommand::Show => commands::config::show(&state).await,
            ConfigCommand::SetKey { key } => commands::config::set_key(&mut state, &key)?,
            ConfigCommand::SetModel { model } => commands::config::set_model(&mut state, &model)?,
            ConfigCommand::SetProvider { provider } => {
                commands::config::set_provider(&mut state, provider)?
            }
            ConfigCommand::SetContext { language, work } => {
                commands::config::set_context(&mut state, &language, work)?
            }
            ConfigCommand::Models => commands::config::models(&state).await?,
        },
        Command::Backup { command } => match command {
            BackupCommand::Export { path } => commands::backup::export(&state, &path)?,
            BackupCommand::Import { path } => commands::backup::import(&mut state, &path)?,
        },
    }

    Ok(())
}

//! Backup export and import

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use vnreader_core::{BackupData, SentenceStore};

use crate::state::AppState;

pub fn export(state: &AppState, path: &Path) -> Result<()> {
    let json = BackupData::export(&state.store).to_json()?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Backup written to {}", path.display());
    println!(
        "Exported {} sentences to {}",
        state.store.len(),
        path.display()
    );
    Ok(())
}

pub fn import(state: &mut AppState, path: &Path) -> Result<()> {
    let json =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let backup = BackupData::from_json(&json)
        .with_context(|| format!("{} is not a valid backup", path.display()))?;
    backup.import_into(&mut state.store)?;
    state.save()?;
    println!("Imported {} sentences", state.store.len());
    Ok(())
}

//! JSON persistence for builder state and command history.
//!
//! Saved history is the serialized-record form: captured previous values
//! live in each record's `data`, so a loaded history replays undo without
//! the session that produced it.

use std::fs;
use std::path::Path;

use tracing::debug;

use formkit_core::{FormBuilderState, Result};

use crate::commands::{CommandRecord, FormCommand};

/// Writes a builder state to a pretty-printed JSON file.
pub fn save_state(path: &Path, state: &FormBuilderState) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), elements = state.element_count(), "saved form state");
    Ok(())
}

/// Reads a builder state from a JSON file.
pub fn load_state(path: &Path) -> Result<FormBuilderState> {
    let contents = fs::read_to_string(path)?;
    let state = serde_json::from_str(&contents)?;
    Ok(state)
}

/// Writes serialized command records to a JSON file.
pub fn save_history(path: &Path, records: &[CommandRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), records = records.len(), "saved command history");
    Ok(())
}

/// Reads serialized command records from a JSON file.
pub fn load_history(path: &Path) -> Result<Vec<CommandRecord>> {
    let contents = fs::read_to_string(path)?;
    let records = serde_json::from_str(&contents)?;
    Ok(records)
}

/// Reconstructs commands from loaded records, oldest first.
pub fn commands_from_records(records: &[CommandRecord]) -> Result<Vec<FormCommand>> {
    records.iter().map(FormCommand::from_record).collect()
}

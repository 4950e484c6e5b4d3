//! JSON file persistence for the price history

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::shared::errors::HistoryError;
use crate::shared::types::PriceHistory;

pub struct HistoryStore;

impl HistoryStore {
    /// Load the history file. Never fails: a missing file is an empty
    /// history, and an unreadable or corrupt one degrades to empty with
    /// a warning rather than losing the run.
    pub fn load(path: &Path) -> PriceHistory {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return PriceHistory::new(),
            Err(e) => {
                warn!("could not read history file {}: {}", path.display(), e);
                return PriceHistory::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(history) => history,
            Err(e) => {
                warn!(
                    "history file {} is corrupt ({}), starting from an empty history",
                    path.display(),
                    e
                );
                PriceHistory::new()
            }
        }
    }

    /// Persist the history. Writes a sibling temp file and renames it
    /// into place, so a crash mid-write leaves the previous file intact.
    pub fn save(history: &PriceHistory, path: &Path) -> Result<(), HistoryError> {
        let mut json = serde_json::to_string_pretty(history)?;
        json.push('\n');

        let staging = staging_path(path);
        fs::write(&staging, json).map_err(|source| HistoryError::Write {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, path).map_err(|source| HistoryError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "history".into());
    name.push(".tmp");
    path.with_file_name(name)
}

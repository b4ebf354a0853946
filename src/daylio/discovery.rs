use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ExportError;

const BACKUP_NAME_MARKER: &str = "ios_backup";

fn is_backup_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains(BACKUP_NAME_MARKER))
}

pub fn latest_backup_file(dir: &Path) -> Result<PathBuf> {
    let mut latest: Option<(SystemTime, PathBuf)> = None;
    let read_dir =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    for entry in read_dir {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !is_backup_name(&path) {
            continue;
        }
        tracing::debug!(path = %path.display(), "found backup file");
        let modified = entry.metadata()?.modified().unwrap_or(UNIX_EPOCH);
        match &latest {
            Some((best, _)) if modified <= *best => {}
            _ => latest = Some((modified, path)),
        }
    }

    latest
        .map(|(_, p)| p)
        .ok_or_else(|| ExportError::NoBackupsFound(dir.display().to_string()).into())
}

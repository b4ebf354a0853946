pub mod backup;
pub mod csv;
pub mod discovery;
pub mod entry;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::daylio::entry::SourceEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Backup,
}

impl SourceFormat {
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Backup,
        }
    }
}

pub fn resolve_source_path(path: &Path) -> Result<PathBuf> {
    if path.is_dir() {
        let picked = discovery::latest_backup_file(path)?;
        tracing::info!(backup = %picked.display(), "using newest Daylio backup");
        return Ok(picked);
    }
    Ok(path.to_path_buf())
}

pub fn read_entries(path: &Path) -> Result<Vec<SourceEntry>> {
    let entries = match SourceFormat::detect(path) {
        SourceFormat::Csv => self::csv::entries_from_csv_file(path)?,
        SourceFormat::Backup => backup::entries_from_backup_file(path)?,
    };
    tracing::info!(count = entries.len(), source = %path.display(), "read Daylio entries");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::SourceFormat;
    use std::path::Path;

    #[test]
    fn format_follows_extension() {
        assert_eq!(SourceFormat::detect(Path::new("daylio_export.csv")), SourceFormat::Csv);
        assert_eq!(SourceFormat::detect(Path::new("EXPORT.CSV")), SourceFormat::Csv);
        assert_eq!(
            SourceFormat::detect(Path::new("ios_backup_2023_12_24.daylio")),
            SourceFormat::Backup
        );
        assert_eq!(SourceFormat::detect(Path::new("backup")), SourceFormat::Backup);
    }
}

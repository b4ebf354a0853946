use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::daylio::entry::SourceEntry;

#[derive(Debug, Deserialize)]
struct CsvRow {
    full_date: String,
    date: String,
    weekday: String,
    time: String,
    mood: String,
    #[serde(default)]
    activities: String,
    #[serde(default)]
    note_title: String,
    #[serde(default)]
    note: String,
}

fn split_activities(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

impl From<CsvRow> for SourceEntry {
    fn from(row: CsvRow) -> Self {
        Self {
            activities: split_activities(&row.activities),
            full_date: row.full_date,
            date: row.date,
            weekday: row.weekday,
            time: row.time,
            mood: row.mood,
            note_title: row.note_title,
            note: row.note,
        }
    }
}

pub fn entries_from_reader<R: Read>(reader: R) -> Result<Vec<SourceEntry>> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::Headers)
        .from_reader(reader);
    let mut out = Vec::new();
    for (idx, row) in rdr.deserialize::<CsvRow>().enumerate() {
        // +2: one for the header, one for 1-based numbering
        let row = row.with_context(|| format!("failed to parse CSV row {}", idx + 2))?;
        out.push(row.into());
    }
    Ok(out)
}

pub fn entries_from_csv_file(path: &Path) -> Result<Vec<SourceEntry>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    entries_from_reader(file).with_context(|| format!("failed to read {}", path.display()))
}

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::daylio::entry::{MOOD_AWFUL, MOOD_BAD, MOOD_GOOD, MOOD_OK, MOOD_RAD, SourceEntry};
use crate::error::ExportError;

pub const BACKUP_MEMBER_NAME: &str = "backup.daylio";

/// The parts of a Daylio backup this tool reads. Real backups carry many more
/// fields (goals, reminders, prefs); serde skips them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Backup {
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, rename = "dayEntries")]
    pub day_entries: Vec<DayEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DayEntry {
    #[serde(default)]
    pub note: String,
    #[serde(default, rename = "note_title")]
    pub title: String,
    #[serde(rename = "datetime")]
    pub time_unix: i64,
    #[serde(default, rename = "tags")]
    pub tag_ids: Vec<i64>,
    pub mood: i64,
}

pub fn resolve_mood(code: i64) -> Result<&'static str, ExportError> {
    match code {
        1 => Ok(MOOD_RAD),
        2 => Ok(MOOD_GOOD),
        3 => Ok(MOOD_OK),
        4 => Ok(MOOD_BAD),
        5 => Ok(MOOD_AWFUL),
        other => Err(ExportError::InvalidMood(other)),
    }
}

pub fn resolve_tag_names(ids: &[i64], tags: &[Tag]) -> Result<Vec<String>, ExportError> {
    let by_id: HashMap<i64, &str> = tags.iter().map(|t| (t.id, t.name.as_str())).collect();
    ids.iter()
        .map(|id| {
            tracing::trace!(tag_id = id, "resolving tag");
            by_id
                .get(id)
                .map(|name| (*name).to_string())
                .ok_or(ExportError::UnknownTag(*id))
        })
        .collect()
}

fn day_entry_to_source(day: &DayEntry, tags: &[Tag]) -> Result<SourceEntry> {
    let activities = resolve_tag_names(&day.tag_ids, tags)?;
    let mood = resolve_mood(day.mood)?;
    let at: DateTime<Utc> = DateTime::from_timestamp(day.time_unix, 0)
        .ok_or_else(|| ExportError::InvalidTimestamp(day.time_unix.to_string()))?;
    Ok(SourceEntry {
        full_date: at.format("%Y-%m-%d").to_string(),
        date: at.format("%b %d").to_string(),
        weekday: at.format("%A").to_string(),
        time: at.format("%H:%M").to_string(),
        mood: mood.to_string(),
        activities,
        note_title: day.title.clone(),
        note: day.note.clone(),
    })
}

pub fn entries_from_backup(backup: &Backup) -> Result<Vec<SourceEntry>> {
    backup
        .day_entries
        .iter()
        .map(|day| day_entry_to_source(day, &backup.tags))
        .collect()
}

pub fn decode_backup_payload(encoded: &[u8]) -> Result<Vec<u8>> {
    let text = String::from_utf8_lossy(encoded).replace("\r\n", "");
    STANDARD
        .decode(text.trim_end().as_bytes())
        .context("backup payload is not valid base64")
}

pub fn backup_from_json(raw: &[u8]) -> Result<Backup> {
    serde_json::from_slice(raw).context("backup payload is not a valid Daylio backup document")
}

pub fn read_backup<R: Read + Seek>(reader: R, label: &str) -> Result<Backup> {
    let mut archive =
        zip::ZipArchive::new(reader).with_context(|| format!("failed to open zip {label}"))?;
    let mut member = match archive.by_name(BACKUP_MEMBER_NAME) {
        Ok(member) => member,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(ExportError::MissingBackupMember(label.to_string()).into());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {BACKUP_MEMBER_NAME} in {label}"));
        }
    };
    // The header's size field is untrusted; let the buffer grow with the data.
    let mut encoded = Vec::new();
    member
        .read_to_end(&mut encoded)
        .with_context(|| format!("failed to read {BACKUP_MEMBER_NAME} in {label}"))?;
    let json = decode_backup_payload(&encoded)?;
    backup_from_json(&json)
}

pub fn entries_from_backup_file(path: &Path) -> Result<Vec<SourceEntry>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let backup = read_backup(file, &path.display().to_string())?;
    tracing::debug!(
        tags = backup.tags.len(),
        entries = backup.day_entries.len(),
        "decoded Daylio backup"
    );
    entries_from_backup(&backup)
}

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::config::TransformConfig;
use crate::daylio::entry::SourceEntry;
use crate::dayone::generators::Generators;
use crate::dayone::quirks::{resolve_home_location, resolve_tag};
use crate::dayone::types::{
    DayOneDateTime, DayOneEntry, RichTextAttributes, RichTextBlock, RichTextDocument, RichTextLine,
    RichTextMeta,
};

pub const DEFAULT_NOTE_TITLE: &str = "Note";

const DEVICE_TYPE: &str = "Laptop";
const OS_NAME: &str = "macOS";
const OS_VERSION: &str = "14.1.2";
const DEVICE_MODEL: &str = "Mac14,2";
const DEVICE_NAME: &str = "MacBook";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTimestamps {
    pub created: DayOneDateTime,
    pub modified: DayOneDateTime,
}

pub fn compose_text(entry: &SourceEntry) -> String {
    let title = if entry.note_title.is_empty() {
        DEFAULT_NOTE_TITLE
    } else {
        entry.note_title.as_str()
    };
    format!("{title}\n\n{}", entry.note)
}

pub fn build_rich_text(text: &str, identifier: Uuid) -> Result<String> {
    let doc = RichTextDocument {
        contents: vec![RichTextBlock {
            text: text.to_string(),
            attributes: RichTextAttributes {
                line: RichTextLine {
                    header: 1,
                    identifier,
                },
            },
        }],
        meta: RichTextMeta::default(),
    };
    Ok(serde_json::to_string(&doc)?)
}

pub fn resolve_tags(entry: &SourceEntry, cfg: &TransformConfig) -> Vec<String> {
    entry
        .activities
        .iter()
        .map(|a| resolve_tag(a, &cfg.quirks))
        .collect()
}

pub fn created_time(entry: &SourceEntry) -> Result<DayOneDateTime> {
    // Daylio records wall-clock time; Day One receives it as-is with a Z suffix.
    let raw = format!("{}T{}Z", entry.full_date.trim(), entry.time.trim());
    Ok(DayOneDateTime::parse(&raw)?)
}

pub fn create_timestamps(entry: &SourceEntry, generators: &Generators) -> Result<EntryTimestamps> {
    let created = created_time(entry)?;
    let modified = generators
        .timestamps
        .create_modified_time(entry)
        .context("modified timestamp generator failed")?;
    Ok(EntryTimestamps {
        created,
        modified: modified.into(),
    })
}

pub fn transform_entry(
    entry: &SourceEntry,
    generators: &Generators,
    cfg: &TransformConfig,
) -> Result<DayOneEntry> {
    let text = compose_text(entry);
    let line_id = generators
        .uuids
        .generate_uuid(entry)
        .context("rich text UUID generator failed")?;
    let rich_text = build_rich_text(&text, line_id)?;
    let tags = resolve_tags(entry, cfg);
    let location = resolve_home_location(&entry.activities, &cfg.quirks);
    let ts = create_timestamps(entry, generators)?;
    let uuid = generators
        .ids
        .create_id(entry)
        .context("entry ID generator failed")?;

    Ok(DayOneEntry {
        starred: false,
        location,
        creation_device_type: DEVICE_TYPE.to_string(),
        creation_os_name: OS_NAME.to_string(),
        creation_os_version: OS_VERSION.to_string(),
        creation_date: ts.created,
        time_zone: cfg.timezone.clone(),
        tags,
        duration: 0,
        creation_device_model: DEVICE_MODEL.to_string(),
        uuid,
        is_all_day: false,
        weather: BTreeMap::new(),
        modified_date: ts.modified,
        rich_text,
        text,
        is_pinned: false,
        creation_device: DEVICE_NAME.to_string(),
    })
}

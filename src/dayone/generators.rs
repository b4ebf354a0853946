//! Values the transformer cannot derive from an entry on its own. Every port
//! receives the source entry so an implementation may derive its value from
//! entry content; the random and clock-based defaults ignore it.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::daylio::entry::SourceEntry;

pub trait EntryIdGenerator {
    fn create_id(&self, entry: &SourceEntry) -> Result<String>;
}

pub trait RichTextUuidGenerator {
    fn generate_uuid(&self, entry: &SourceEntry) -> Result<Uuid>;
}

pub trait ModifiedTimestamper {
    fn create_modified_time(&self, entry: &SourceEntry) -> Result<DateTime<Utc>>;
}

pub const ENTRY_ID_LEN: usize = 32;

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomEntryIdGenerator;

impl EntryIdGenerator for RandomEntryIdGenerator {
    fn create_id(&self, _entry: &SourceEntry) -> Result<String> {
        Ok(Uuid::new_v4().simple().to_string().to_ascii_uppercase())
    }
}

/// Derives the ID from the entry's content so re-running an export yields the
/// same IDs and Day One can recognise entries it already imported.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentHashIdGenerator;

impl EntryIdGenerator for ContentHashIdGenerator {
    fn create_id(&self, entry: &SourceEntry) -> Result<String> {
        let mut hasher = Sha256::new();
        for field in [
            &entry.full_date,
            &entry.time,
            &entry.mood,
            &entry.note_title,
            &entry.note,
        ] {
            hasher.update(field.as_bytes());
            hasher.update([0x1f_u8]);
        }
        for activity in &entry.activities {
            hasher.update(activity.as_bytes());
            hasher.update([0x1e_u8]);
        }
        let digest = hasher.finalize();
        Ok(digest[..ENTRY_ID_LEN / 2]
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRichTextUuidGenerator;

impl RichTextUuidGenerator for RandomRichTextUuidGenerator {
    fn generate_uuid(&self, _entry: &SourceEntry) -> Result<Uuid> {
        Ok(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClockTimestamper;

impl ModifiedTimestamper for ClockTimestamper {
    fn create_modified_time(&self, _entry: &SourceEntry) -> Result<DateTime<Utc>> {
        Ok(Utc::now())
    }
}

pub struct Generators {
    pub ids: Box<dyn EntryIdGenerator>,
    pub uuids: Box<dyn RichTextUuidGenerator>,
    pub timestamps: Box<dyn ModifiedTimestamper>,
}

impl Generators {
    pub fn new(
        ids: impl EntryIdGenerator + 'static,
        uuids: impl RichTextUuidGenerator + 'static,
        timestamps: impl ModifiedTimestamper + 'static,
    ) -> Self {
        Self {
            ids: Box::new(ids),
            uuids: Box::new(uuids),
            timestamps: Box::new(timestamps),
        }
    }

    pub fn with_stable_ids(stable_ids: bool) -> Self {
        if stable_ids {
            Self::new(ContentHashIdGenerator, RandomRichTextUuidGenerator, ClockTimestamper)
        } else {
            Self::default()
        }
    }
}

impl Default for Generators {
    fn default() -> Self {
        Self::new(RandomEntryIdGenerator, RandomRichTextUuidGenerator, ClockTimestamper)
    }
}

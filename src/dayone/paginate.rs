use anyhow::{Context, Result};
use std::collections::HashSet;

use crate::config::{MAX_ENTRIES_PER_EXPORT, TransformConfig};
use crate::daylio::entry::SourceEntry;
use crate::dayone::generators::Generators;
use crate::dayone::transform::transform_entry;
use crate::dayone::types::DayOneExport;
use crate::error::ExportError;

/// Day One refuses imports with more entries than this.
pub const DEFAULT_PAGE_SIZE: usize = MAX_ENTRIES_PER_EXPORT;

pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size)
}

pub fn paginate(
    entries: &[SourceEntry],
    page_size: usize,
    generators: &Generators,
    cfg: &TransformConfig,
) -> Result<Vec<DayOneExport>> {
    if page_size == 0 || page_size > MAX_ENTRIES_PER_EXPORT {
        return Err(ExportError::InvalidPageSize(page_size, MAX_ENTRIES_PER_EXPORT).into());
    }

    let mut seen_ids = HashSet::with_capacity(entries.len());
    let mut pages = Vec::with_capacity(page_count(entries.len(), page_size));
    for (page_idx, chunk) in entries.chunks(page_size).enumerate() {
        let mut out = Vec::with_capacity(chunk.len());
        for (offset, entry) in chunk.iter().enumerate() {
            let position = page_idx * page_size + offset + 1;
            let converted = transform_entry(entry, generators, cfg).with_context(|| {
                format!(
                    "failed to convert entry {position} ({} {})",
                    entry.full_date, entry.time
                )
            })?;
            if !seen_ids.insert(converted.uuid.clone()) {
                return Err(ExportError::DuplicateEntryId(converted.uuid).into());
            }
            out.push(converted);
        }
        tracing::debug!(page = page_idx + 1, entries = out.len(), "built export page");
        pages.push(DayOneExport::new(out));
    }
    Ok(pages)
}
